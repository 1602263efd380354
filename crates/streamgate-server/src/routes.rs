//! Route definitions.

use crate::handlers::{public, streams, user};
use crate::middleware::require_right;
use crate::state::AppState;
use axum::{Router, middleware, routing::get};

/// Build the full API router.
///
/// `/public` and `/user` are open. Everything under `/api` requires a token
/// granting the right registered for the route.
pub fn create_router(state: AppState) -> Router {
    let open = Router::new()
        .route("/public/health", get(public::health))
        .route("/public/version", get(public::version))
        .route("/user/token", get(user::issue_token));

    let protected = Router::new()
        .route(
            "/api/streams",
            get(streams::list_streams).post(streams::create_stream),
        )
        .route(
            "/api/streams/{streamName}",
            get(streams::get_stream)
                .post(streams::update_stream)
                .delete(streams::delete_stream),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_right));

    open.merge(protected).with_state(state)
}
