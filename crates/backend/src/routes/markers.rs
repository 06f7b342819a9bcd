use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use hunterdash_shared::error::ValidationError;
use hunterdash_shared::models::{MapImage, Marker, MarkerId, MarkerInput, MarkerUpdate};

use super::AppState;
use crate::auth::MapUser;
use crate::error::ApiError;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::Unprocessable(rejection.body_text()))
}

/// Trim the name in place and reject it if nothing is left.
fn normalize_name(name: &mut String) -> Result<(), ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Unprocessable(ValidationError::EmptyName.to_string()));
    }
    if trimmed.len() != name.len() {
        *name = trimmed.to_string();
    }
    Ok(())
}

pub async fn list_markers(
    _user: MapUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Marker>>, ApiError> {
    let markers = state.storage.list_markers().map_err(ApiError::Storage)?;
    Ok(Json(markers))
}

pub async fn create_marker(
    user: MapUser,
    State(state): State<AppState>,
    payload: Result<Json<MarkerInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Marker>), ApiError> {
    let mut input = body(payload)?;
    normalize_name(&mut input.name)?;

    let mut marker = Marker::from_input(MarkerId::generate(), input);
    marker.created_by = Some(user.name);
    marker.created_at = Some(chrono::Utc::now().to_rfc3339());

    state.storage.save_marker(&marker).map_err(ApiError::Storage)?;
    tracing::info!(marker_id = %marker.id, user = ?marker.created_by, "marker created");
    Ok((StatusCode::CREATED, Json(marker)))
}

pub async fn update_marker(
    _user: MapUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<MarkerUpdate>, JsonRejection>,
) -> Result<Json<Marker>, ApiError> {
    let mut update = body(payload)?;
    if let Some(name) = update.name.as_mut() {
        normalize_name(name)?;
    }
    let id = MarkerId(id);
    // Read, apply and write in one transaction so a concurrent delete wins.
    let marker = state
        .storage
        .update_marker(&id, update)
        .map_err(ApiError::Storage)?
        .ok_or_else(|| ApiError::NotFound(id.to_string()))?;

    tracing::info!(marker_id = %marker.id, "marker updated");
    Ok(Json(marker))
}

pub async fn delete_marker(
    _user: MapUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = MarkerId(id);
    if !state.storage.delete_marker(&id).map_err(ApiError::Storage)? {
        return Err(ApiError::NotFound(id.to_string()));
    }
    tracing::info!(marker_id = %id, "marker deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn map_image(State(state): State<AppState>) -> Json<MapImage> {
    Json(state.map_image.as_ref().clone())
}
