mod assets;
mod auth;
mod config;
mod error;
mod routes;
mod storage;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use axum::{response::Html, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use config::Config;
use routes::AppState;

const CACHE_1DAY: &str = "public, max-age=86400, must-revalidate";
const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Directory of the built frontend, relative to the working directory.
const DIST_DIR: &str = "dist";

fn cached_dir(dir: &Path, cache_header: &'static str) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::CACHE_CONTROL,
            HeaderValue::from_static(cache_header),
        ))
}

/// Map image and metadata under `/static`, hashed frontend bundles under
/// `/dist` and `/assets`.
fn static_routes(assets_dir: &Path, dist_dir: &Path) -> Router {
    Router::new()
        .nest("/static", cached_dir(assets_dir, CACHE_1DAY))
        .nest("/dist", cached_dir(dist_dir, CACHE_IMMUTABLE))
        .nest("/assets", cached_dir(&dist_dir.join("assets"), CACHE_IMMUTABLE))
}

fn build_app(state: AppState, assets_dir: &Path) -> Router {
    routes::api_router()
        .route("/", get(serve_index))
        .route("/map", get(serve_index))
        .with_state(state)
        .merge(static_routes(assets_dir, Path::new(DIST_DIR)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let map_image = assets::load_map_image(&config.assets_dir).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "using default map dimensions");
        assets::fallback_map_image()
    });

    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }
    let storage = storage::Storage::open(&config.db_path).map_err(anyhow::Error::msg)?;
    tracing::info!(
        path = %config.db_path.display(),
        markers = storage.count_markers().map_err(anyhow::Error::msg)?,
        "Opened marker database"
    );

    let state = AppState {
        storage,
        tokens: Arc::new(config.tokens.clone()),
        map_image: Arc::new(map_image),
    };
    let app = build_app(state, &config.assets_dir);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server running at http://localhost:{}", config.port);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn serve_index() -> Html<String> {
    match std::fs::read_to_string(Path::new(DIST_DIR).join("index.html")) {
        Ok(html) => Html(html),
        Err(_) => Html(
            r#"<!DOCTYPE html>
<html>
<head><title>HunterDash Map</title></head>
<body>
<h1>HunterDash Map</h1>
<p>Frontend not built yet. The marker API lives under <code>/api/map</code>.</p>
</body>
</html>"#
                .to_string(),
        ),
    }
}
