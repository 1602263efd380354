//! Mount management under `/api/streams`. Every route here sits behind
//! [`crate::middleware::require_right`].

use crate::error::ApiError;
use crate::middleware::Caller;
use crate::state::AppState;
use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::{Value, json};
use streamgate_core::Mount;
use streamgate_policy::{MountStore, StoreError};

fn body(payload: Result<Json<Mount>, JsonRejection>) -> Result<Mount, ApiError> {
    payload
        .map(|Json(mount)| mount)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

pub async fn create_stream(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<Mount>, JsonRejection>,
) -> Result<(StatusCode, Json<Mount>), ApiError> {
    let mount = body(payload)?;
    if mount.mount_name.trim().is_empty() {
        return Err(ApiError::BadRequest("mount_name is required".into()));
    }

    state.store().create_mount(&mount).await?;
    tracing::info!(mount = %mount.mount_name, by = %caller.username, "mount created");
    Ok((StatusCode::CREATED, Json(mount)))
}

pub async fn list_streams(State(state): State<AppState>) -> Result<Json<Vec<Mount>>, ApiError> {
    Ok(Json(state.store().list_mounts().await?))
}

pub async fn get_stream(
    State(state): State<AppState>,
    Path(stream_name): Path<String>,
) -> Result<Json<Mount>, ApiError> {
    state
        .store()
        .get_mount(&stream_name)
        .await?
        .map(Json)
        .ok_or_else(|| StoreError::NotFound(format!("mount {stream_name}")).into())
}

/// The path names the mount; any `mount_name` in the body is ignored.
pub async fn update_stream(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(stream_name): Path<String>,
    payload: Result<Json<Mount>, JsonRejection>,
) -> Result<Json<Mount>, ApiError> {
    let mut mount = body(payload)?;
    mount.mount_name = stream_name;

    state.store().update_mount(&mount).await?;
    tracing::info!(mount = %mount.mount_name, by = %caller.username, "mount updated");
    Ok(Json(mount))
}

pub async fn delete_stream(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(stream_name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let removed = state.store().delete_mount(&stream_name).await?;
    tracing::info!(
        mount = %removed.mount_name,
        template = %removed.template_type,
        by = %caller.username,
        "mount deleted"
    );
    Ok(Json(json!({ "status": "deleted" })))
}
