//! Thread-safe document wrapper for MuPDF
//!
//! # Design
//!
//! MuPDF documents are not thread-safe. This wrapper:
//!
//! 1. Stores the document bytes
//! 2. Opens a fresh document for each operation
//! 3. Uses `parking_lot::Mutex` to serialize access
//!
//! No `mupdf` handle outlives a closure, so the wrapper itself is `Send + Sync`
//! without any unsafe impls.

use std::sync::Arc;

use mupdf::Document;
use parking_lot::Mutex;

use crate::document::{DocumentError, DocumentResult};

const PDF_MIME: &str = "application/pdf";

/// Serialized access to one PDF held in memory
pub struct SafeDocument {
    data: Arc<Vec<u8>>,
    id: String,
    page_count: usize,
    lock: Mutex<()>,
}

impl SafeDocument {
    /// Validate that the bytes open as a PDF and cache the page count
    pub fn from_bytes(data: Vec<u8>, id: String) -> DocumentResult<Self> {
        if !data.starts_with(b"%PDF") {
            return Err(DocumentError::OpenError(format!("{}: not a PDF", id)));
        }

        let doc = Document::from_bytes(&data, PDF_MIME)
            .map_err(|e| DocumentError::OpenError(format!("{}: {}", id, e)))?;
        let page_count = doc
            .page_count()
            .map_err(|e| DocumentError::OpenError(format!("{}: {}", id, e)))?
            .max(0) as usize;

        Ok(Self {
            data: Arc::new(data),
            id,
            page_count,
            lock: Mutex::new(()),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Execute a closure with access to a freshly opened document.
    ///
    /// The document is dropped when the closure returns. Access is
    /// serialized via mutex.
    pub fn with_doc<F, R>(&self, f: F) -> DocumentResult<R>
    where
        F: FnOnce(&Document) -> DocumentResult<R>,
    {
        let _guard = self.lock.lock();
        let doc = Document::from_bytes(&self.data, PDF_MIME)?;
        f(&doc)
    }
}
