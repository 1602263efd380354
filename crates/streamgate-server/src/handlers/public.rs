//! Unauthenticated endpoints under `/public`.

use crate::state::AppState;
use axum::{Json, extract::State};
use serde_json::{Value, json};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn version(State(state): State<AppState>) -> Json<Value> {
    let identity = state.codec().identity();
    Json(json!({ "name": identity.name, "version": identity.version }))
}
