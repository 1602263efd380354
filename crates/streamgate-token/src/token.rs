//! Token issuance and validation.

use crate::cipher::{Cipher, SecretKey};
use crate::claims::{ClaimSet, MIN_FIELDS, parse_timestamp, split_fields};
use crate::error::TokenError;
use chrono::{DateTime, Utc};
use streamgate_core::{AppIdentity, ClaimFormat};
use thiserror::Error;

/// Literal prefix of every token.
pub const TOKEN_PREFIX: &str = "k_token:";

/// Why a token was refused.
///
/// Internal only: callers log it and answer with a single opaque denial.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("token is empty")]
    EmptyToken,
    #[error("required right is empty")]
    EmptyRight,
    #[error("expected subject is empty")]
    EmptySubject,
    #[error("token is shorter than its prefix")]
    TooShort,
    #[error("token does not start with the k_token: prefix")]
    WrongPrefix,
    #[error("token failed to decrypt: {0}")]
    Decryption(String),
    #[error("claim set framing is malformed")]
    MalformedPayload,
    #[error("claim set has {0} fields, expected at least 5")]
    TooFewFields(usize),
    #[error("issued-at timestamp is malformed")]
    MalformedIssuedAt,
    #[error("token was issued in the future")]
    IssuedInFuture,
    #[error("expiry timestamp is malformed")]
    MalformedExpiry,
    #[error("token has expired")]
    Expired,
    #[error("token subject does not match")]
    SubjectMismatch,
    #[error("token was issued by another application")]
    AppMismatch,
    #[error("token does not grant the required right")]
    MissingRight,
}

/// Issues and validates tokens for one application under one key.
///
/// Holds no mutable state; share it behind an `Arc` between requests.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    cipher: Cipher,
    identity: AppIdentity,
    format: ClaimFormat,
}

impl TokenCodec {
    pub fn new(
        key: &SecretKey,
        identity: AppIdentity,
        format: ClaimFormat,
    ) -> Result<Self, TokenError> {
        Ok(Self {
            cipher: Cipher::new(key)?,
            identity,
            format,
        })
    }

    pub fn identity(&self) -> &AppIdentity {
        &self.identity
    }

    /// Issue a token for `subject` carrying `rights`, valid until `expiry`.
    pub fn issue<S: AsRef<str>>(
        &self,
        subject: &str,
        rights: &[S],
        expiry: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        self.issue_at(subject, rights, expiry, Utc::now())
    }

    /// [`TokenCodec::issue`] with an explicit issuing instant.
    pub fn issue_at<S: AsRef<str>>(
        &self,
        subject: &str,
        rights: &[S],
        expiry: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        if subject.is_empty() {
            return Err(TokenError::InvalidArgument("subject cannot be empty".into()));
        }
        if rights.is_empty() {
            return Err(TokenError::InvalidArgument("rights cannot be empty".into()));
        }
        if expiry == DateTime::<Utc>::default() {
            return Err(TokenError::InvalidArgument("expiry is not set".into()));
        }
        if expiry <= now {
            return Err(TokenError::InvalidArgument(
                "expiry must be in the future".into(),
            ));
        }

        let claims = ClaimSet {
            issued_at: now,
            expires_at: expiry,
            subject: subject.to_string(),
            app: self.identity.clone(),
            rights: rights.iter().map(|r| r.as_ref().to_string()).collect(),
        };

        let plaintext = claims.encode(self.format)?;
        let sealed = self.cipher.encrypt(&plaintext)?;

        tracing::debug!(
            subject = %subject,
            rights = claims.rights.len(),
            expires_at = %expiry,
            "issued token"
        );

        Ok(format!("{TOKEN_PREFIX}{sealed}"))
    }

    /// Whether `token` grants `required_right` to `expected_subject` right now.
    ///
    /// Never fails: every problem is a `false`, with the reason logged.
    pub fn validate(&self, token: &str, required_right: &str, expected_subject: &str) -> bool {
        match self.verify(token, required_right, expected_subject) {
            Ok(_) => true,
            Err(reason) => {
                tracing::warn!(
                    subject = %expected_subject,
                    right = %required_right,
                    reason = %reason,
                    "token rejected"
                );
                false
            }
        }
    }

    /// Like [`TokenCodec::validate`], returning the claims or the rejection reason.
    pub fn verify(
        &self,
        token: &str,
        required_right: &str,
        expected_subject: &str,
    ) -> Result<ClaimSet, Rejection> {
        self.verify_at(token, required_right, expected_subject, Utc::now())
    }

    /// [`TokenCodec::verify`] against an explicit clock reading.
    pub fn verify_at(
        &self,
        token: &str,
        required_right: &str,
        expected_subject: &str,
        now: DateTime<Utc>,
    ) -> Result<ClaimSet, Rejection> {
        if token.is_empty() {
            return Err(Rejection::EmptyToken);
        }
        if required_right.is_empty() {
            return Err(Rejection::EmptyRight);
        }
        if expected_subject.is_empty() {
            return Err(Rejection::EmptySubject);
        }

        let plaintext = self.open(token)?;
        let fields = split_fields(&plaintext, self.format).ok_or(Rejection::MalformedPayload)?;
        if fields.len() < MIN_FIELDS {
            return Err(Rejection::TooFewFields(fields.len()));
        }

        let issued_at = parse_timestamp(fields[0]).ok_or(Rejection::MalformedIssuedAt)?;
        if issued_at > now {
            return Err(Rejection::IssuedInFuture);
        }

        let expires_at = parse_timestamp(fields[1]).ok_or(Rejection::MalformedExpiry)?;
        if expires_at < now {
            return Err(Rejection::Expired);
        }

        if fields[2] != expected_subject {
            return Err(Rejection::SubjectMismatch);
        }
        if fields[3] != self.identity.name {
            return Err(Rejection::AppMismatch);
        }

        let claims = ClaimSet {
            issued_at,
            expires_at,
            subject: fields[2].to_string(),
            app: AppIdentity::new(fields[3], fields[4]),
            rights: fields[MIN_FIELDS..].iter().map(|r| r.to_string()).collect(),
        };

        if !claims.has_right(required_right) {
            return Err(Rejection::MissingRight);
        }

        Ok(claims)
    }

    /// Strip the prefix and decrypt, without reading the claims.
    fn open(&self, token: &str) -> Result<String, Rejection> {
        if token.len() < TOKEN_PREFIX.len() {
            return Err(Rejection::TooShort);
        }
        let sealed = token.strip_prefix(TOKEN_PREFIX).ok_or(Rejection::WrongPrefix)?;
        self.cipher
            .decrypt(sealed)
            .map_err(|e| Rejection::Decryption(e.to_string()))
    }
}

/// Decrypt a token and decode its claims without checking expiry, subject,
/// application or rights. For diagnostics only.
pub fn inspect_token_unverified(
    token: &str,
    key: &SecretKey,
    format: ClaimFormat,
) -> Result<ClaimSet, Rejection> {
    let codec = TokenCodec::new(key, AppIdentity::current(), format)
        .map_err(|e| Rejection::Decryption(e.to_string()))?;
    let plaintext = codec.open(token)?;
    ClaimSet::decode(&plaintext, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const TEST_KEY: &str = "882093050f95bfb1d2b83510d90393b623f86be241169d5db3ea76d715628ef9";

    fn codec(format: ClaimFormat) -> TokenCodec {
        let key = SecretKey::from_hex(TEST_KEY).unwrap();
        TokenCodec::new(&key, AppIdentity::new("StreamAPI", "0.0.1"), format).unwrap()
    }

    fn in_one_hour() -> DateTime<Utc> {
        Utc::now() + Duration::hours(1)
    }

    const RIGHTS: &[&str] = &["get_stream", "post_stream", "get_all_streams"];

    #[test]
    fn test_issue_then_validate_every_right() {
        for format in [ClaimFormat::Framed, ClaimFormat::Delimited] {
            let codec = codec(format);
            let token = codec.issue("alice", RIGHTS, in_one_hour()).unwrap();
            assert!(token.starts_with(TOKEN_PREFIX));

            for right in RIGHTS {
                assert!(codec.validate(&token, right, "alice"), "{format:?} {right}");
            }
            assert!(!codec.validate(&token, "delete_stream", "alice"));
            assert!(!codec.validate(&token, "0.0.1", "alice"));
        }
    }

    #[test]
    fn test_version_is_not_a_right() {
        let codec = codec(ClaimFormat::Delimited);
        let token = codec.issue("alice", &["get_stream"], in_one_hour()).unwrap();
        assert_eq!(
            codec.verify(&token, "0.0.1", "alice").unwrap_err(),
            Rejection::MissingRight
        );
    }

    #[test]
    fn test_verify_returns_claims() {
        let codec = codec(ClaimFormat::Framed);
        let expiry = in_one_hour();
        let token = codec.issue("alice", RIGHTS, expiry).unwrap();

        let claims = codec.verify(&token, "get_stream", "alice").unwrap();
        assert_eq!(claims.subject, "alice");
        assert_eq!(claims.expires_at, expiry);
        assert_eq!(claims.app.name, "StreamAPI");
        assert_eq!(claims.rights, RIGHTS);
    }

    #[test]
    fn test_every_flipped_character_is_rejected() {
        let codec = codec(ClaimFormat::Framed);
        let token = codec.issue("alice", &["get_stream"], in_one_hour()).unwrap();

        let bytes = token.as_bytes();
        for i in TOKEN_PREFIX.len()..bytes.len() {
            let mut tampered = bytes.to_vec();
            tampered[i] = if tampered[i] == b'0' { b'1' } else { b'0' };
            let tampered = String::from_utf8(tampered).unwrap();
            assert!(!codec.validate(&tampered, "get_stream", "alice"), "position {i}");
        }
    }

    #[test]
    fn test_expiry_boundary() {
        let codec = codec(ClaimFormat::Framed);
        let issued = Utc::now();
        let expiry = issued + Duration::seconds(1);
        let token = codec.issue_at("alice", &["get_stream"], expiry, issued).unwrap();

        assert!(codec.verify_at(&token, "get_stream", "alice", issued).is_ok());
        assert!(codec.verify_at(&token, "get_stream", "alice", expiry).is_ok());
        assert_eq!(
            codec
                .verify_at(&token, "get_stream", "alice", expiry + Duration::nanoseconds(1))
                .unwrap_err(),
            Rejection::Expired
        );
    }

    #[test]
    fn test_expires_after_sleeping() {
        let codec = codec(ClaimFormat::Framed);
        let token = codec
            .issue("alice", &["get_stream"], Utc::now() + Duration::seconds(1))
            .unwrap();

        assert!(codec.validate(&token, "get_stream", "alice"));
        std::thread::sleep(std::time::Duration::from_millis(1100));
        assert!(!codec.validate(&token, "get_stream", "alice"));
    }

    #[test]
    fn test_issued_in_future_is_rejected() {
        let codec = codec(ClaimFormat::Framed);
        let now = Utc::now();
        let token = codec
            .issue_at("alice", &["get_stream"], now + Duration::hours(2), now + Duration::hours(1))
            .unwrap();
        assert_eq!(
            codec.verify_at(&token, "get_stream", "alice", now).unwrap_err(),
            Rejection::IssuedInFuture
        );
    }

    #[test]
    fn test_subject_isolation() {
        let codec = codec(ClaimFormat::Framed);
        let token = codec.issue("alice", RIGHTS, in_one_hour()).unwrap();
        assert!(!codec.validate(&token, "get_stream", "bob"));
        assert_eq!(
            codec.verify(&token, "get_stream", "bob").unwrap_err(),
            Rejection::SubjectMismatch
        );
    }

    #[test]
    fn test_other_application_is_rejected() {
        let key = SecretKey::from_hex(TEST_KEY).unwrap();
        let other = TokenCodec::new(&key, AppIdentity::new("OtherAPI", "0.0.1"), ClaimFormat::Framed)
            .unwrap();
        let token = other.issue("alice", RIGHTS, in_one_hour()).unwrap();

        assert_eq!(
            codec(ClaimFormat::Framed)
                .verify(&token, "get_stream", "alice")
                .unwrap_err(),
            Rejection::AppMismatch
        );
    }

    #[test]
    fn test_newer_version_same_name_is_accepted() {
        let key = SecretKey::from_hex(TEST_KEY).unwrap();
        let newer = TokenCodec::new(&key, AppIdentity::new("StreamAPI", "9.9.9"), ClaimFormat::Framed)
            .unwrap();
        let token = newer.issue("alice", RIGHTS, in_one_hour()).unwrap();
        assert!(codec(ClaimFormat::Framed).validate(&token, "get_stream", "alice"));
    }

    #[test]
    fn test_issuance_guards() {
        let codec = codec(ClaimFormat::Framed);
        let future = in_one_hour();
        let invalid = |r: Result<String, TokenError>| matches!(r, Err(TokenError::InvalidArgument(_)));

        assert!(invalid(codec.issue("", RIGHTS, future)));
        assert!(invalid(codec.issue::<&str>("alice", &[], future)));
        assert!(invalid(codec.issue("alice", RIGHTS, Utc::now() - Duration::seconds(1))));
        assert!(invalid(codec.issue("alice", RIGHTS, DateTime::<Utc>::default())));

        let now = Utc::now();
        assert!(invalid(codec.issue_at("alice", RIGHTS, now, now)));
    }

    #[test]
    fn test_tokens_are_not_deterministic() {
        let codec = codec(ClaimFormat::Framed);
        let now = Utc::now();
        let expiry = now + Duration::hours(1);
        let a = codec.issue_at("alice", RIGHTS, expiry, now).unwrap();
        let b = codec.issue_at("alice", RIGHTS, expiry, now).unwrap();
        assert_ne!(a, b);
        assert!(codec.validate(&a, "get_stream", "alice"));
        assert!(codec.validate(&b, "get_stream", "alice"));
    }

    #[test]
    fn test_malformed_tokens() {
        let codec = codec(ClaimFormat::Framed);
        let token = codec.issue("alice", RIGHTS, in_one_hour()).unwrap();

        assert_eq!(codec.verify("", "get_stream", "alice").unwrap_err(), Rejection::EmptyToken);
        assert_eq!(codec.verify(&token, "", "alice").unwrap_err(), Rejection::EmptyRight);
        assert_eq!(codec.verify(&token, "get_stream", "").unwrap_err(), Rejection::EmptySubject);
        assert_eq!(codec.verify("k_tok", "get_stream", "alice").unwrap_err(), Rejection::TooShort);

        let wrong_prefix = token.replacen("k_token:", "x_token:", 1);
        assert_eq!(
            codec.verify(&wrong_prefix, "get_stream", "alice").unwrap_err(),
            Rejection::WrongPrefix
        );
        assert!(matches!(
            codec.verify("k_token:", "get_stream", "alice").unwrap_err(),
            Rejection::Decryption(_)
        ));
        assert!(matches!(
            codec.verify("k_token:not-hex", "get_stream", "alice").unwrap_err(),
            Rejection::Decryption(_)
        ));
    }

    #[test]
    fn test_sealed_garbage_is_rejected() {
        let key = SecretKey::from_hex(TEST_KEY).unwrap();
        let cipher = Cipher::new(&key).unwrap();
        let codec = codec(ClaimFormat::Delimited);
        let seal = |plaintext: &str| format!("{TOKEN_PREFIX}{}", cipher.encrypt(plaintext).unwrap());

        let now = Utc::now();
        let iat = crate::claims::format_timestamp(now - Duration::minutes(1));
        let exp = crate::claims::format_timestamp(now + Duration::hours(1));

        let cases = [
            (seal("a|b|c"), Rejection::TooFewFields(3)),
            (
                seal(&format!("soon|{exp}|alice|StreamAPI|1|get_stream")),
                Rejection::MalformedIssuedAt,
            ),
            (
                seal(&format!("{iat}|never|alice|StreamAPI|1|get_stream")),
                Rejection::MalformedExpiry,
            ),
        ];
        for (token, expected) in cases {
            assert_eq!(codec.verify(&token, "get_stream", "alice").unwrap_err(), expected);
        }

        // Five fields and no rights: well formed, grants nothing.
        let bare = seal(&format!("{iat}|{exp}|alice|StreamAPI|1"));
        assert_eq!(
            codec.verify(&bare, "get_stream", "alice").unwrap_err(),
            Rejection::MissingRight
        );
    }

    #[test]
    fn test_format_mismatch_is_rejected() {
        let framed = codec(ClaimFormat::Framed);
        let delimited = codec(ClaimFormat::Delimited);
        let token = delimited.issue("alice", RIGHTS, in_one_hour()).unwrap();
        assert!(!framed.validate(&token, "get_stream", "alice"));

        let token = framed.issue("alice", RIGHTS, in_one_hour()).unwrap();
        assert!(!delimited.validate(&token, "get_stream", "alice"));
    }

    #[test]
    fn test_right_with_delimiter() {
        let rights = ["get|stream"];
        let token = codec(ClaimFormat::Framed)
            .issue("alice", &rights, in_one_hour())
            .unwrap();
        assert!(codec(ClaimFormat::Framed).validate(&token, "get|stream", "alice"));
        assert!(!codec(ClaimFormat::Framed).validate(&token, "get", "alice"));

        assert!(codec(ClaimFormat::Delimited)
            .issue("alice", &rights, in_one_hour())
            .is_err());
    }

    #[test]
    fn test_inspect_skips_semantic_checks() {
        let codec = codec(ClaimFormat::Framed);
        let now = Utc::now();
        let token = codec
            .issue_at("alice", RIGHTS, now + Duration::seconds(1), now - Duration::hours(1))
            .unwrap();
        let key = SecretKey::from_hex(TEST_KEY).unwrap();

        let claims = inspect_token_unverified(&token, &key, ClaimFormat::Framed).unwrap();
        assert_eq!(claims.subject, "alice");
        assert_eq!(claims.rights, RIGHTS);

        let other = SecretKey::generate(crate::KeySize::Aes256);
        assert!(inspect_token_unverified(&token, &other, ClaimFormat::Framed).is_err());
    }
}
