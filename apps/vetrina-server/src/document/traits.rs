//! Engine traits
//!
//! Format-agnostic interfaces the preview pipeline talks to. The MuPDF
//! engine implements them; tests plug in in-memory engines.

use std::sync::Arc;

use async_trait::async_trait;
use image::RgbaImage;

use super::error::Result;
use super::types::{DocumentMetadata, PageRenderRequest, Viewport};

/// A loaded document-rendering engine
#[async_trait]
pub trait RenderEngine: Send + Sync {
    /// Engine name for logs and status reporting
    fn name(&self) -> &str;

    /// Set the background worker location.
    ///
    /// First writer wins: returns `false` without changing anything if a
    /// location is already configured.
    fn configure_worker(&self, location: &str) -> bool;

    /// Currently configured worker location
    fn worker_location(&self) -> Option<String>;

    /// Open a document from fetched bytes
    async fn open(&self, data: Vec<u8>, id: &str) -> Result<Box<dyn EngineDocument>>;
}

/// A document opened by an engine
#[async_trait]
pub trait EngineDocument: Send + Sync {
    /// Number of pages
    fn page_count(&self) -> usize;

    /// Read title metadata
    async fn metadata(&self) -> Result<DocumentMetadata>;

    /// Load a page (1-based, like page labels in viewers)
    async fn page(&self, page_number: usize) -> Result<Box<dyn EnginePage>>;

    /// Release engine resources held for this document
    async fn cleanup(&self);
}

/// A single page of an opened document
#[async_trait]
pub trait EnginePage: Send + Sync {
    /// 1-based page number
    fn page_number(&self) -> usize;

    /// Page size at the given logical scale
    fn viewport(&self, scale: f32) -> Viewport;

    /// Render into an RGBA buffer of `request.width` x `request.height`
    async fn render(&self, request: &PageRenderRequest) -> Result<RgbaImage>;

    /// Text items in reading order
    async fn text_content(&self) -> Result<Vec<String>>;
}

/// One place an engine can be loaded from
#[async_trait]
pub trait EngineSource: Send + Sync {
    /// Source name for logs
    fn name(&self) -> &str;

    /// Try to load the engine
    async fn load(&self) -> Result<Arc<dyn RenderEngine>>;
}
