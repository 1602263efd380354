//! Per-request authorization.
//!
//! A request is allowed only when, in order:
//!
//! 1. its method and path map to a required right;
//! 2. the fingerprint of its bearer token resolves to a user;
//! 3. the token itself decrypts and grants that right to that user.
//!
//! The first failing step decides. Every denial carries a [`DenyReason`] for
//! the log, but callers must answer all of them the same way.

use crate::registry::RightsRegistry;
use crate::store::TokenIndex;
use std::fmt;
use std::sync::Arc;
use streamgate_token::{Rejection, TokenCodec, fingerprint};

/// Outcome of [`Authorizer::authorize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow { subject: String, right: String },
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow { .. })
    }
}

/// Why a request was denied. Never sent to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// No right is registered for the method and path.
    UnknownRoute,
    /// The request carried no bearer token.
    MissingToken,
    /// The token fingerprint is not in the index.
    UnknownToken,
    /// The index could not be queried.
    IndexUnavailable(String),
    /// The token was rejected by the codec.
    Rejected(Rejection),
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::UnknownRoute => f.write_str("no right registered for route"),
            DenyReason::MissingToken => f.write_str("missing bearer token"),
            DenyReason::UnknownToken => f.write_str("token not found in index"),
            DenyReason::IndexUnavailable(e) => write!(f, "token index unavailable: {e}"),
            DenyReason::Rejected(r) => write!(f, "token rejected: {r}"),
        }
    }
}

/// Combines the rights registry, the token index and the token codec.
pub struct Authorizer<I: ?Sized> {
    registry: Arc<RightsRegistry>,
    codec: Arc<TokenCodec>,
    index: Arc<I>,
}

impl<I: ?Sized> Clone for Authorizer<I> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            codec: Arc::clone(&self.codec),
            index: Arc::clone(&self.index),
        }
    }
}

impl<I: TokenIndex + ?Sized> Authorizer<I> {
    pub fn new(registry: Arc<RightsRegistry>, codec: Arc<TokenCodec>, index: Arc<I>) -> Self {
        Self {
            registry,
            codec,
            index,
        }
    }

    /// Decide whether `bearer` may call `method path`.
    pub async fn authorize(&self, bearer: &str, method: &str, path: &str) -> Decision {
        let decision = self.decide(bearer, method, path).await;
        match &decision {
            Decision::Allow { subject, right } => {
                tracing::debug!(%method, %path, %subject, %right, "request authorized");
            }
            Decision::Deny(reason) => {
                tracing::warn!(%method, %path, %reason, "request denied");
            }
        }
        decision
    }

    async fn decide(&self, bearer: &str, method: &str, path: &str) -> Decision {
        let Some(right) = self.registry.lookup(method, path) else {
            return Decision::Deny(DenyReason::UnknownRoute);
        };

        if bearer.is_empty() {
            return Decision::Deny(DenyReason::MissingToken);
        }

        let subject = match self
            .index
            .find_identity_by_fingerprint(&fingerprint(bearer))
            .await
        {
            Ok(Some(subject)) => subject,
            Ok(None) => return Decision::Deny(DenyReason::UnknownToken),
            Err(e) => return Decision::Deny(DenyReason::IndexUnavailable(e.to_string())),
        };

        match self.codec.verify(bearer, right, &subject) {
            Ok(_) => Decision::Allow {
                subject,
                right: right.to_string(),
            },
            Err(rejection) => Decision::Deny(DenyReason::Rejected(rejection)),
        }
    }
}

/// Token from an `Authorization` header value, with or without the
/// `Bearer ` scheme.
pub fn bearer_token(header: &str) -> &str {
    let header = header.trim();
    match header.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer ") => header[7..].trim(),
        _ => header,
    }
}
