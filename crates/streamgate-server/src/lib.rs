//! # streamgate-server
//!
//! HTTP service for managing Icecast mounts:
//! - `GET /public/health`, `GET /public/version`
//! - `GET /user/token` to log in and receive a token
//! - `/api/streams` mount CRUD, each route guarded by its own right
//!
//! Storage is either process memory or SQLite (see [`store`]).

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;

pub use error::ApiError;
pub use routes::create_router;
pub use server::StreamgateServer;
pub use state::AppState;
pub use store::{SqliteStore, open_store};
