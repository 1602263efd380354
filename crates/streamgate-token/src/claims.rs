//! The claim set sealed inside a token, and its two plaintext encodings.
//!
//! Fields, in order: issued-at, expiry, subject, application name,
//! application version, then zero or more rights.
//!
//! - [`ClaimFormat::Framed`] writes each field as `<byte-len>:<value>`, so any
//!   field may contain any character.
//! - [`ClaimFormat::Delimited`] joins the fields with `|`. This is the layout
//!   older deployments read, and no field may contain `|`.
//!
//! Timestamps are RFC 3339 in UTC with nanosecond precision.

use crate::error::TokenError;
use crate::token::Rejection;
use chrono::{DateTime, SecondsFormat, Utc};
use streamgate_core::{AppIdentity, ClaimFormat};

/// Separator used by [`ClaimFormat::Delimited`].
pub const DELIMITER: char = '|';

/// Issued-at, expiry, subject, app name and app version.
pub const MIN_FIELDS: usize = 5;

/// Decoded token payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimSet {
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub subject: String,
    pub app: AppIdentity,
    pub rights: Vec<String>,
}

impl ClaimSet {
    /// Whether `right` is granted. Both sides are trimmed, then compared exactly.
    pub fn has_right(&self, right: &str) -> bool {
        let right = right.trim();
        self.rights.iter().any(|r| r.trim() == right)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Serialize to plaintext in the given format.
    pub fn encode(&self, format: ClaimFormat) -> Result<String, TokenError> {
        let issued_at = format_timestamp(self.issued_at);
        let expires_at = format_timestamp(self.expires_at);

        let mut fields: Vec<&str> = vec![
            &issued_at,
            &expires_at,
            &self.subject,
            &self.app.name,
            &self.app.version,
        ];
        fields.extend(self.rights.iter().map(String::as_str));

        match format {
            ClaimFormat::Framed => Ok(encode_framed(&fields)),
            ClaimFormat::Delimited => {
                if let Some(field) = fields.iter().find(|f| f.contains(DELIMITER)) {
                    return Err(TokenError::InvalidArgument(format!(
                        "field {field:?} contains the '{DELIMITER}' delimiter"
                    )));
                }
                Ok(fields.join("|"))
            }
        }
    }

    /// Parse plaintext without any semantic checks (expiry, subject, app).
    pub fn decode(plaintext: &str, format: ClaimFormat) -> Result<Self, Rejection> {
        let fields = split_fields(plaintext, format).ok_or(Rejection::MalformedPayload)?;
        if fields.len() < MIN_FIELDS {
            return Err(Rejection::TooFewFields(fields.len()));
        }

        Ok(Self {
            issued_at: parse_timestamp(fields[0]).ok_or(Rejection::MalformedIssuedAt)?,
            expires_at: parse_timestamp(fields[1]).ok_or(Rejection::MalformedExpiry)?,
            subject: fields[2].to_string(),
            app: AppIdentity::new(fields[3], fields[4]),
            rights: fields[MIN_FIELDS..].iter().map(|r| r.to_string()).collect(),
        })
    }
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse an RFC 3339 timestamp, with any fractional precision and offset.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Split plaintext into raw fields. `None` when framing is malformed.
pub fn split_fields(plaintext: &str, format: ClaimFormat) -> Option<Vec<&str>> {
    match format {
        ClaimFormat::Framed => decode_framed(plaintext),
        ClaimFormat::Delimited => Some(plaintext.split(DELIMITER).collect()),
    }
}

fn encode_framed(fields: &[&str]) -> String {
    let mut out = String::new();
    for field in fields {
        out.push_str(&field.len().to_string());
        out.push(':');
        out.push_str(field);
    }
    out
}

fn decode_framed(mut rest: &str) -> Option<Vec<&str>> {
    let mut fields = Vec::new();
    while !rest.is_empty() {
        let (len, tail) = rest.split_once(':')?;
        if len.is_empty() || len.len() > 10 || !len.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let len: usize = len.parse().ok()?;
        // `get` also rejects lengths that end inside a multi-byte character.
        let value = tail.get(..len)?;
        fields.push(value);
        rest = &tail[len..];
    }
    Some(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample(rights: &[&str]) -> ClaimSet {
        let issued_at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        ClaimSet {
            issued_at,
            expires_at: issued_at + Duration::hours(2),
            subject: "alice".into(),
            app: AppIdentity::new("StreamAPI", "0.0.1"),
            rights: rights.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_delimited_layout() {
        let plaintext = sample(&["get_stream", "post_stream"])
            .encode(ClaimFormat::Delimited)
            .unwrap();
        assert_eq!(
            plaintext,
            "2026-01-02T03:04:05.000000000Z|2026-01-02T05:04:05.000000000Z|alice|StreamAPI|0.0.1|get_stream|post_stream"
        );
    }

    #[test]
    fn test_framed_layout() {
        let plaintext = sample(&["a|b"]).encode(ClaimFormat::Framed).unwrap();
        assert!(plaintext.starts_with("30:2026-01-02T03:04:05.000000000Z30:"));
        assert!(plaintext.ends_with("5:alice9:StreamAPI5:0.0.13:a|b"));
    }

    #[test]
    fn test_both_formats_decode_to_same_claims() {
        let claims = sample(&["get_stream", "delete_stream"]);
        for format in [ClaimFormat::Framed, ClaimFormat::Delimited] {
            let plaintext = claims.encode(format).unwrap();
            assert_eq!(ClaimSet::decode(&plaintext, format).unwrap(), claims);
        }
    }

    #[test]
    fn test_delimiter_in_field_is_rejected_for_delimited() {
        let err = sample(&["bad|right"]).encode(ClaimFormat::Delimited).unwrap_err();
        assert!(matches!(err, TokenError::InvalidArgument(_)));

        let mut claims = sample(&["ok"]);
        claims.subject = "ali|ce".into();
        assert!(claims.encode(ClaimFormat::Delimited).is_err());
    }

    #[test]
    fn test_delimiter_in_field_survives_framed() {
        let claims = sample(&["bad|right", "ünïcode"]);
        let plaintext = claims.encode(ClaimFormat::Framed).unwrap();
        let decoded = ClaimSet::decode(&plaintext, ClaimFormat::Framed).unwrap();
        assert_eq!(decoded.rights, vec!["bad|right", "ünïcode"]);
    }

    #[test]
    fn test_malformed_frames() {
        assert_eq!(decode_framed(""), Some(vec![]));
        assert_eq!(decode_framed("3:abc2:de"), Some(vec!["abc", "de"]));
        assert_eq!(decode_framed("3:ab"), None);
        assert_eq!(decode_framed("x:abc"), None);
        assert_eq!(decode_framed(":abc"), None);
        assert_eq!(decode_framed("+3:abc"), None);
        assert_eq!(decode_framed("3abc"), None);
        // length ending inside the two-byte 'é'
        assert_eq!(decode_framed("1:é"), None);
    }

    #[test]
    fn test_too_few_fields() {
        let err = ClaimSet::decode("a|b|c|d", ClaimFormat::Delimited).unwrap_err();
        assert_eq!(err, Rejection::TooFewFields(4));
    }

    #[test]
    fn test_has_right_trims() {
        let claims = sample(&[" get_stream "]);
        assert!(claims.has_right("get_stream"));
        assert!(claims.has_right("get_stream\n"));
        assert!(!claims.has_right("GET_STREAM"));
        assert!(!claims.has_right("get"));
    }

    #[test]
    fn test_parse_offset_timestamps() {
        // Trailing zeros trimmed and a numeric offset, as other producers emit them.
        let ts = parse_timestamp("2026-01-02T05:04:05.5+02:00").unwrap();
        assert_eq!(format_timestamp(ts), "2026-01-02T03:04:05.500000000Z");
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
