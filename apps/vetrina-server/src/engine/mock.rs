//! In-memory engine, sources and store for tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use parking_lot::Mutex;

use crate::document::{
    DocumentError, DocumentMetadata, DocumentResult, EngineDocument, EnginePage, EngineSource,
    PageRenderRequest, RenderEngine, Viewport,
};
use crate::storage::{DocumentStore, StoreError};

use super::WorkerSlot;

/// Page definition for [`MockEngine`]
#[derive(Debug, Clone)]
pub struct MockPage {
    pub width: f32,
    pub height: f32,
    pub text: Vec<String>,
    pub render_fails: bool,
}

impl MockPage {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            text: Vec::new(),
            render_fails: false,
        }
    }

    pub fn with_text(mut self, items: &[&str]) -> Self {
        self.text = items.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn failing_render(mut self) -> Self {
        self.render_fails = true;
        self
    }
}

/// Document definition for [`MockEngine`]
#[derive(Debug, Clone, Default)]
pub struct MockDoc {
    pub info_title: Option<String>,
    pub xmp_title: Option<String>,
    pub metadata_fails: bool,
    pub pages: Vec<MockPage>,
}

impl MockDoc {
    pub fn new(pages: Vec<MockPage>) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    pub fn titled(mut self, title: &str) -> Self {
        self.info_title = Some(title.to_string());
        self
    }

    pub fn xmp_titled(mut self, title: &str) -> Self {
        self.xmp_title = Some(title.to_string());
        self
    }

    pub fn failing_metadata(mut self) -> Self {
        self.metadata_fails = true;
        self
    }
}

#[derive(Default)]
struct Counters {
    opens: AtomicUsize,
    cleanups: AtomicUsize,
    text_reads: AtomicUsize,
    renders: Mutex<Vec<PageRenderRequest>>,
}

/// Engine that "opens" documents whose bytes are a key into its table
pub struct MockEngine {
    docs: HashMap<String, MockDoc>,
    worker: WorkerSlot,
    counters: Arc<Counters>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            docs: HashMap::new(),
            worker: WorkerSlot::new(),
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn with_document(mut self, key: &str, doc: MockDoc) -> Self {
        self.docs.insert(key.to_string(), doc);
        self
    }

    pub fn opens(&self) -> usize {
        self.counters.opens.load(Ordering::SeqCst)
    }

    pub fn cleanups(&self) -> usize {
        self.counters.cleanups.load(Ordering::SeqCst)
    }

    pub fn text_reads(&self) -> usize {
        self.counters.text_reads.load(Ordering::SeqCst)
    }

    pub fn renders(&self) -> Vec<PageRenderRequest> {
        self.counters.renders.lock().clone()
    }
}

#[async_trait]
impl RenderEngine for MockEngine {
    fn name(&self) -> &str {
        "mock"
    }

    fn configure_worker(&self, location: &str) -> bool {
        self.worker.configure(location)
    }

    fn worker_location(&self) -> Option<String> {
        self.worker.get()
    }

    async fn open(&self, data: Vec<u8>, id: &str) -> DocumentResult<Box<dyn EngineDocument>> {
        let key = String::from_utf8(data)
            .map_err(|e| DocumentError::OpenError(format!("{}: {}", id, e)))?;
        let doc = self
            .docs
            .get(&key)
            .cloned()
            .ok_or_else(|| DocumentError::OpenError(format!("{}: not a document", id)))?;
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockDocument {
            doc,
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct MockDocument {
    doc: MockDoc,
    counters: Arc<Counters>,
}

#[async_trait]
impl EngineDocument for MockDocument {
    fn page_count(&self) -> usize {
        self.doc.pages.len()
    }

    async fn metadata(&self) -> DocumentResult<DocumentMetadata> {
        if self.doc.metadata_fails {
            return Err(DocumentError::MetadataError("corrupt info dictionary".into()));
        }
        Ok(DocumentMetadata {
            info_title: self.doc.info_title.clone(),
            xmp_title: self.doc.xmp_title.clone(),
        })
    }

    async fn page(&self, page_number: usize) -> DocumentResult<Box<dyn EnginePage>> {
        let page = page_number
            .checked_sub(1)
            .and_then(|i| self.doc.pages.get(i))
            .cloned()
            .ok_or(DocumentError::PageNotFound(page_number, self.doc.pages.len()))?;
        Ok(Box::new(MockEnginePage {
            number: page_number,
            page,
            counters: Arc::clone(&self.counters),
        }))
    }

    async fn cleanup(&self) {
        self.counters.cleanups.fetch_add(1, Ordering::SeqCst);
    }
}

struct MockEnginePage {
    number: usize,
    page: MockPage,
    counters: Arc<Counters>,
}

#[async_trait]
impl EnginePage for MockEnginePage {
    fn page_number(&self) -> usize {
        self.number
    }

    fn viewport(&self, scale: f32) -> Viewport {
        Viewport {
            width: self.page.width * scale,
            height: self.page.height * scale,
        }
    }

    async fn render(&self, request: &PageRenderRequest) -> DocumentResult<RgbaImage> {
        self.counters.renders.lock().push(*request);
        if self.page.render_fails {
            return Err(DocumentError::RenderError("unsupported shading".into()));
        }
        Ok(RgbaImage::from_pixel(
            request.width,
            request.height,
            Rgba([255, 255, 255, 255]),
        ))
    }

    async fn text_content(&self) -> DocumentResult<Vec<String>> {
        self.counters.text_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.page.text.clone())
    }
}

/// Source that always yields the given engine
pub struct MockSource {
    name: String,
    engine: Arc<MockEngine>,
    attempts: AtomicUsize,
}

impl MockSource {
    pub fn new(name: &str, engine: Arc<MockEngine>) -> Self {
        Self {
            name: name.to_string(),
            engine,
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EngineSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> DocumentResult<Arc<dyn RenderEngine>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Ok(self.engine.clone())
    }
}

/// Source that never loads
pub struct FailingSource {
    name: String,
    attempts: AtomicUsize,
}

impl FailingSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EngineSource for FailingSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> DocumentResult<Arc<dyn RenderEngine>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(DocumentError::EngineUnavailable(format!(
            "{} unreachable",
            self.name
        )))
    }
}

/// Store backed by a URL -> bytes map
#[derive(Default)]
pub struct MemoryStore {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `key` (a [`MockEngine`] document key) at `url`
    pub fn with(mut self, url: &str, key: &str) -> Self {
        self.files.insert(url.to_string(), key.as_bytes().to_vec());
        self
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, StoreError> {
        self.files
            .get(url)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(url.to_string()))
    }
}
