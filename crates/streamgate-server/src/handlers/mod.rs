//! HTTP handlers.

pub mod public;
pub mod streams;
pub mod user;
