//! # streamgate-policy
//!
//! Decides whether a request may proceed.
//!
//! - [`RightsRegistry`]: which right a method and path require
//! - [`Authorizer`]: resolves the caller from the token index and checks the
//!   token grants that right
//! - [`store`]: the storage contracts the authorizer and login flow rely on,
//!   plus [`MemoryStore`]

pub mod authorizer;
pub mod error;
pub mod registry;
pub mod store;

pub use authorizer::{Authorizer, Decision, DenyReason, bearer_token};
pub use error::StoreError;
pub use registry::{
    NormalizationRule, RightsRegistry, RouteRight, STREAM_NAME_PLACEHOLDER, stream_api_routes,
};
pub use store::{CredentialStore, MemoryStore, MountStore, Store, TokenIndex};
