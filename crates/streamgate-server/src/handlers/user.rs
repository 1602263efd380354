//! Login: exchange a username and password for a token.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use streamgate_core::expiry_after;
use streamgate_core::rights::ADMIN_RIGHTS;
use streamgate_policy::{CredentialStore, TokenIndex};
use streamgate_token::{fingerprint, hash_password, needs_rehash, verify_password};

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// `GET /user/token?username=..&password=..`
///
/// Every failure answers with the same "invalid credentials" error.
pub async fn issue_token(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Result<Json<Value>, ApiError> {
    match login(&state, &query.username, &query.password).await {
        Ok(token) => {
            tracing::info!(username = %query.username, "token issued");
            Ok(Json(json!({ "token": token })))
        }
        Err(e) => {
            tracing::warn!(username = %query.username, error = %e, "login failed");
            Err(ApiError::InvalidCredentials)
        }
    }
}

async fn login(state: &AppState, username: &str, password: &str) -> Result<String, ApiError> {
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest("username and password are required".into()));
    }

    let stored = state
        .store()
        .find_password_hash(username)
        .await?
        .ok_or_else(|| ApiError::BadRequest(format!("unknown user {username}")))?;

    let (candidate, hash) = (password.to_string(), stored.clone());
    let verified = tokio::task::spawn_blocking(move || verify_password(&candidate, &hash))
        .await
        .unwrap_or(false);
    if !verified {
        return Err(ApiError::BadRequest("password mismatch".into()));
    }

    if needs_rehash(&stored) {
        let candidate = password.to_string();
        match tokio::task::spawn_blocking(move || hash_password(&candidate)).await {
            Ok(Ok(rehashed)) => state.store().store_password(username, &rehashed).await?,
            Ok(Err(e)) => tracing::warn!(username = %username, error = %e, "password rehash failed"),
            Err(e) => tracing::warn!(username = %username, error = %e, "password rehash aborted"),
        }
    }

    let expiry = expiry_after(chrono::Utc::now(), state.token_lifetime())
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let token = state.codec().issue(username, ADMIN_RIGHTS, expiry)?;
    state
        .store()
        .record_token_fingerprint(username, &fingerprint(&token))
        .await?;

    Ok(token)
}
