//! Bearer-token authorization for protected routes.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use streamgate_policy::{Decision, bearer_token};

/// The authenticated user, inserted into request extensions on success.
#[derive(Clone, Debug)]
pub struct Caller {
    pub username: String,
}

/// Allow the request only if its bearer token grants the route's right.
pub async fn require_right(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(bearer_token)
        .unwrap_or_default()
        .to_string();
    let method = request.method().as_str().to_string();
    let path = request.uri().path().to_string();

    match state.authorizer().authorize(&bearer, &method, &path).await {
        Decision::Allow { subject, .. } => {
            request.extensions_mut().insert(Caller { username: subject });
            next.run(request).await
        }
        Decision::Deny(_) => ApiError::Unauthorized.into_response(),
    }
}
