mod markers;

use std::collections::HashMap;
use std::sync::Arc;

use axum::routing::{get, put};
use axum::Router;
use hunterdash_shared::models::MapImage;

use crate::config::TokenGrant;
use crate::storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
    pub tokens: Arc<HashMap<String, TokenGrant>>,
    pub map_image: Arc<MapImage>,
}

/// REST routes under `/api`.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/map/markers",
            get(markers::list_markers).post(markers::create_marker),
        )
        .route(
            "/api/map/markers/{id}",
            put(markers::update_marker).delete(markers::delete_marker),
        )
        .route("/api/map/image", get(markers::map_image))
}
