//! Document storage
//!
//! The preview pipeline fetches documents by URL (`documents/<encoded name>`).
//! A store maps those URLs back to bytes.

mod local_store;

use async_trait::async_trait;
use thiserror::Error;

pub use local_store::LocalDocumentStore;

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Invalid document path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of document bytes addressed by document URL
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the full document behind `url`
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, StoreError>;
}
