//! Shared application state.

use crate::error::ApiError;
use std::sync::Arc;
use streamgate_core::{AppIdentity, StreamgateConfig};
use streamgate_policy::{Authorizer, RightsRegistry, Store};
use streamgate_token::{SecretKey, TokenCodec};

/// Everything a handler needs. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    codec: Arc<TokenCodec>,
    store: Arc<dyn Store>,
    authorizer: Authorizer<dyn Store>,
    token_lifetime: chrono::Duration,
}

impl AppState {
    pub fn new(
        codec: TokenCodec,
        store: Arc<dyn Store>,
        registry: RightsRegistry,
        token_lifetime: chrono::Duration,
    ) -> Self {
        let codec = Arc::new(codec);
        let authorizer = Authorizer::new(Arc::new(registry), Arc::clone(&codec), Arc::clone(&store));
        Self {
            inner: Arc::new(AppStateInner {
                codec,
                store,
                authorizer,
                token_lifetime,
            }),
        }
    }

    /// Build the state for the stream API from configuration.
    pub fn from_config(config: &StreamgateConfig, store: Arc<dyn Store>) -> Result<Self, ApiError> {
        let hex_key = config
            .security
            .resolve_secret_key()
            .map_err(|e| ApiError::Startup(format!("failed to read secret key: {e}")))?
            .ok_or_else(|| ApiError::Startup("no secret key configured".into()))?;
        let key = SecretKey::from_hex(&hex_key)?;

        let codec = TokenCodec::new(&key, AppIdentity::current(), config.token.format)?;
        let lifetime = config
            .token
            .lifetime()
            .map_err(|e| ApiError::Startup(e.to_string()))?;

        tracing::info!(
            key_size = %key.size(),
            format = ?config.token.format,
            lifetime = %config.token.lifetime,
            "token codec ready"
        );

        Ok(Self::new(codec, store, RightsRegistry::stream_api(), lifetime))
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.inner.codec
    }

    pub fn store(&self) -> &dyn Store {
        self.inner.store.as_ref()
    }

    pub fn authorizer(&self) -> &Authorizer<dyn Store> {
        &self.inner.authorizer
    }

    /// Lifetime of tokens issued at login.
    pub fn token_lifetime(&self) -> chrono::Duration {
        self.inner.token_lifetime
    }
}
