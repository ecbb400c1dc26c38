//! Document list endpoints
//!
//! Expose the mounted entry list to the host page:
//! - `GET /`                    entries as JSON
//! - `GET /fragment`            entries as an HTML fragment
//! - `GET /:index/thumbnail`    thumbnail PNG, 404 while the entry shows an icon
//! - `GET /:index/viewer`       what activating the preview should do

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::listing::{fragment_html, DisplayEntry, OpenAction, ViewerRequest};
use crate::state::AppState;

/// One entry of the document list
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEntryResponse {
    pub index: usize,
    pub file_name: String,
    pub url: String,
    pub title: String,
    pub has_thumbnail: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub open: OpenAction,
}

impl DocumentEntryResponse {
    fn from_entry(index: usize, entry: &DisplayEntry) -> Self {
        let thumbnail = entry.preview.thumbnail();
        Self {
            index,
            file_name: entry.file_name.clone(),
            url: entry.url.clone(),
            title: entry.title.clone(),
            has_thumbnail: thumbnail.is_some(),
            display_width: thumbnail.map(|t| t.display_width()),
            display_height: thumbnail.map(|t| t.display_height()),
            thumbnail_url: thumbnail.map(|_| format!("/api/v1/documents/{}/thumbnail", index)),
            open: entry.open_action(),
        }
    }
}

/// Create the documents router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_documents))
        .route("/fragment", get(list_fragment))
        .route("/:index/thumbnail", get(get_thumbnail))
        .route("/:index/viewer", get(open_viewer))
}

async fn list_documents(State(state): State<AppState>) -> Json<Vec<DocumentEntryResponse>> {
    let entries = state.entries().snapshot();
    Json(
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| DocumentEntryResponse::from_entry(index, entry))
            .collect(),
    )
}

async fn list_fragment(State(state): State<AppState>) -> Result<Html<String>> {
    // Thumbnails are PNG-encoded into data URIs, keep that off the runtime
    let entries = state.entries().snapshot();
    let html = tokio::task::spawn_blocking(move || fragment_html(&entries))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Html(html))
}

fn entry_at(state: &AppState, index: usize) -> Result<DisplayEntry> {
    state
        .entries()
        .get(index)
        .ok_or_else(|| AppError::NotFound(format!("Document entry {} not found", index)))
}

async fn get_thumbnail(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Response> {
    let entry = entry_at(&state, index)?;
    let surface = entry
        .preview
        .thumbnail()
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("No thumbnail for '{}'", entry.file_name)))?;

    let png = tokio::task::spawn_blocking(move || surface.encode_png())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/png")
        .header(header::CACHE_CONTROL, "max-age=3600")
        .body(Body::from(png))
        .map_err(|e| AppError::Internal(e.to_string()))
}

async fn open_viewer(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<ViewerRequest>> {
    let entry = entry_at(&state, index)?;
    Ok(Json(entry.activate_preview(state.viewer())))
}
