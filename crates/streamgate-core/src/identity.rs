//! Application identity embedded in tokens.

use serde::{Deserialize, Serialize};

/// Name under which this service issues and accepts tokens.
pub const APPLICATION_NAME: &str = "StreamAPI";

/// The (name, version) pair written into every claim set.
///
/// Validation compares only the name: tokens minted by an older build of the
/// same service stay valid across upgrades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppIdentity {
    pub name: String,
    pub version: String,
}

impl AppIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Identity of the running build.
    pub fn current() -> Self {
        Self::new(APPLICATION_NAME, env!("CARGO_PKG_VERSION"))
    }
}

impl Default for AppIdentity {
    fn default() -> Self {
        Self::current()
    }
}
