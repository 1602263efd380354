//! Token issuance configuration.

use super::ConfigError;
use serde::{Deserialize, Serialize};

/// Plaintext layout of the claim set inside the encrypted token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClaimFormat {
    /// Length-prefixed fields (`<len>:<value>`). Field content is unrestricted.
    #[default]
    Framed,
    /// Fields joined by `|`, in the field order older deployments of the API
    /// use. Field-compatible, not byte-identical: timestamps are always
    /// written with nine fractional digits in UTC (`...000000000Z`).
    Delimited,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Claim set encoding for newly issued tokens.
    #[serde(default)]
    pub format: ClaimFormat,

    /// How long login tokens stay valid (e.g. "365d", "12h", "30m").
    #[serde(default = "default_lifetime")]
    pub lifetime: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            format: ClaimFormat::default(),
            lifetime: default_lifetime(),
        }
    }
}

impl TokenConfig {
    pub fn lifetime(&self) -> Result<chrono::Duration, ConfigError> {
        parse_duration(&self.lifetime)
    }
}

fn default_lifetime() -> String {
    "365d".to_string()
}

/// Parse a duration string like "24h", "7d", "90s" into `chrono::Duration`.
/// A bare number is read as hours.
pub fn parse_duration(s: &str) -> Result<chrono::Duration, ConfigError> {
    let s = s.trim().to_lowercase();
    let invalid = || ConfigError::Config(format!("invalid duration: {s:?}"));

    let (value, unit): (&str, fn(i64) -> Option<chrono::Duration>) =
        if let Some(days) = s.strip_suffix('d') {
            (days, chrono::Duration::try_days)
        } else if let Some(hours) = s.strip_suffix('h') {
            (hours, chrono::Duration::try_hours)
        } else if let Some(minutes) = s.strip_suffix('m') {
            (minutes, chrono::Duration::try_minutes)
        } else if let Some(seconds) = s.strip_suffix('s') {
            (seconds, chrono::Duration::try_seconds)
        } else {
            (s.as_str(), chrono::Duration::try_hours)
        };

    let n: i64 = value.trim().parse().map_err(|_| invalid())?;
    unit(n).ok_or_else(|| ConfigError::Config(format!("duration out of range: {s:?}")))
}

/// `now + lifetime`, or an error when the result is past the last
/// representable timestamp.
pub fn expiry_after(
    now: chrono::DateTime<chrono::Utc>,
    lifetime: chrono::Duration,
) -> Result<chrono::DateTime<chrono::Utc>, ConfigError> {
    now.checked_add_signed(lifetime)
        .ok_or_else(|| ConfigError::Config(format!("lifetime {lifetime} is too long")))
}
