//! Router construction.

use std::path::Path;

use axum::routing::{get, post};
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use super::handlers::{details, diagnose, health};
use super::middleware::{log_request, noindex};
use super::state::SharedState;

/// Build the API routes plus the bundled front-end assets under `static_dir`.
///
/// Only the page, its script, its stylesheet and `images/` are exposed, so
/// other files in the directory (config, `.env`) are never served.
pub fn build_router(state: SharedState, static_dir: &Path) -> Router {
    Router::new()
        // --- API ---
        .route("/diagnose", post(diagnose::diagnose))
        .route("/veterinary-details", post(details::veterinary_details))
        .route("/health", get(health::health))
        // --- Front-end ---
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route_service("/scripts.js", ServeFile::new(static_dir.join("scripts.js")))
        .route_service("/styles.css", ServeFile::new(static_dir.join("styles.css")))
        .nest_service("/images", ServeDir::new(static_dir.join("images")))
        // --- Middleware ---
        .layer(axum::middleware::from_fn(log_request))
        .layer(noindex())
        .with_state(state)
}
