//! # streamgate-core
//!
//! Types shared by every Streamgate crate:
//! - [`StreamgateConfig`] and its sections, loaded from `streamgate.yaml`
//! - [`AppIdentity`], the name/version pair embedded in every issued token
//! - the well-known capability rights in [`rights`]
//! - the [`Mount`] record managed by the stream API

pub mod config;
pub mod identity;
pub mod mount;
pub mod rights;

pub use config::{
    AdminConfig, ClaimFormat, ConfigError, SecurityConfig, ServerConfig, StorageBackend,
    StorageConfig, StreamgateConfig, TokenConfig, expiry_after, parse_duration,
};
pub use identity::AppIdentity;
pub use mount::{Mount, TemplateType};
