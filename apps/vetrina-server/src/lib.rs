//! Vetrina Server Library
//!
//! Portfolio document previews: first-page thumbnails and titles for a list
//! of documents, with graceful fallback when no rendering engine is present,
//! plus best-effort profile extraction from one designated document.
//!
//! # Modules
//!
//! - `engine`: optional rendering engine and where to load it from
//! - `raster`: first-page rasterization at display density
//! - `resolver`: per-document title/thumbnail resolution and the upgrade pass
//! - `listing`: display entries, entry list and viewer requests
//! - `bio`: profile text heuristics
//! - `routes`: HTTP surface

pub mod bio;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod listing;
pub mod pipeline;
pub mod raster;
pub mod resolver;
pub mod routes;
pub mod state;
pub mod storage;

#[cfg(feature = "mupdf")]
mod mupdf;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let documents_path = format!("/{}", state.config().documents.base_path);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/v1/health", get(routes::health::health_check))
        .nest("/api/v1/documents", routes::documents::router())
        .nest("/api/v1/profile", routes::profile::router())
        .nest("/api/v1/engine", routes::engine::router())
        .nest(&documents_path, routes::files::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Populate the entry list and the profile slots.
///
/// Optionally acquires the engine first, then runs the preview pipeline and
/// the bio extractor side by side.
pub async fn hydrate(state: AppState) {
    if state.config().engine.preload && state.registry().acquire().await.is_none() {
        tracing::warn!("Rendering engine unavailable, previews start as icons");
    }

    let bio = {
        let state = state.clone();
        tokio::spawn(async move {
            let extractor = state.bio_extractor();
            if let Some(result) = extractor.extract(state.descriptors()).await {
                result.apply(state.profile().as_ref());
            }
        })
    };

    let items = state.pipeline().run(state.descriptors()).await;
    tracing::info!(
        "Preview pipeline finished: {} entries, {} with thumbnails",
        items.len(),
        items.iter().filter(|i| i.has_thumbnail()).count()
    );

    if let Err(e) = bio.await {
        tracing::warn!("Profile extraction task failed: {}", e);
    }
}
