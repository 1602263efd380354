//! Icecast mount records managed through `/api/streams`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which Icecast config template a mount is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    #[default]
    Default,
    Private,
}

impl TemplateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::Default => "default",
            TemplateType::Private => "private",
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "private" => Ok(TemplateType::Private),
            "default" | "" => Ok(TemplateType::Default),
            other => Err(format!("unknown template type: {other}")),
        }
    }
}

/// A single mount point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mount {
    /// Unique mount name, also the `{streamName}` path parameter.
    #[serde(default)]
    pub mount_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// 1 when the stream is listed publicly.
    #[serde(default)]
    pub public: i64,
    #[serde(default)]
    pub stream_name: String,
    #[serde(default)]
    pub stream_description: String,
    #[serde(default)]
    pub template_type: TemplateType,
}

impl Mount {
    pub fn new(mount_name: impl Into<String>) -> Self {
        Self {
            mount_name: mount_name.into(),
            username: String::new(),
            password: String::new(),
            public: 0,
            stream_name: String::new(),
            stream_description: String::new(),
            template_type: TemplateType::Default,
        }
    }

    pub fn is_public(&self) -> bool {
        self.public != 0
    }
}
