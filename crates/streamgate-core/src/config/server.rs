//! HTTP listener configuration.

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`ServerConfig::port`].
pub const PORT_ENV: &str = "STREAM_API_PORT";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Port to listen on. `STREAM_API_PORT` wins when set.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whether to log every request through the trace layer.
    #[serde(default = "super::default_true")]
    pub request_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
            request_logging: true,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listen_addr, self.port)
    }

    /// Apply `STREAM_API_PORT` if it holds a valid port number.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var(PORT_ENV)
            && let Ok(port) = port.trim().parse::<u16>()
        {
            self.port = port;
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}
