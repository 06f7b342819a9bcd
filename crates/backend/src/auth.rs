use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::config::MAP_PERMISSION;
use crate::error::ApiError;
use crate::routes::AppState;

/// Caller of a marker route, authenticated by bearer token and holding the
/// `map` permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapUser {
    pub name: String,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<AppState> for MapUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::Unauthorized)?;
        let grant = state.tokens.get(token).ok_or(ApiError::Unauthorized)?;
        if !grant.has(MAP_PERMISSION) {
            tracing::info!(user = %grant.user, "marker access denied");
            return Err(ApiError::Forbidden(MAP_PERMISSION));
        }
        Ok(MapUser {
            name: grant.user.clone(),
        })
    }
}
