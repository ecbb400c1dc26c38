//! Document error types
//!
//! Every variant maps to one step of the preview pipeline. The pipeline turns
//! these into absent values; they never reach the end user.

use thiserror::Error;

use crate::storage::StoreError;

/// Unified document error type
#[derive(Debug, Error)]
pub enum DocumentError {
    /// No rendering engine could be obtained from any source
    #[error("Rendering engine unavailable: {0}")]
    EngineUnavailable(String),

    /// Document bytes could not be fetched
    #[error("Failed to fetch document: {0}")]
    Fetch(#[from] StoreError),

    /// Engine could not open or parse the document
    #[error("Failed to open document: {0}")]
    OpenError(String),

    /// Metadata dictionary could not be read
    #[error("Metadata error: {0}")]
    MetadataError(String),

    /// Page (1-based) does not exist
    #[error("Page {0} not found (document has {1} pages)")]
    PageNotFound(usize, usize),

    /// Failed to render a page
    #[error("Render error: {0}")]
    RenderError(String),

    /// Text extraction error
    #[error("Text extraction error: {0}")]
    TextExtractionError(String),

    /// MuPDF context error
    #[error("MuPDF context error: {0}")]
    ContextError(String),

    /// Image processing error
    #[error("Image error: {0}")]
    ImageError(String),

    /// Blocking task failed to complete
    #[error("Task join error: {0}")]
    Join(String),
}

/// Result type alias for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Alias for Result (used by engine implementations)
pub type DocumentResult<T> = Result<T>;

#[cfg(feature = "mupdf")]
impl From<mupdf::Error> for DocumentError {
    fn from(err: mupdf::Error) -> Self {
        DocumentError::ContextError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for DocumentError {
    fn from(err: tokio::task::JoinError) -> Self {
        DocumentError::Join(err.to_string())
    }
}

impl From<image::ImageError> for DocumentError {
    fn from(err: image::ImageError) -> Self {
        DocumentError::ImageError(err.to_string())
    }
}
