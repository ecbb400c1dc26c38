//! Process-wide engine handle
//!
//! ```text
//! current() ──► engine present? ──► yes ─► Some(engine)
//!                      │
//!                      no ─► None
//!
//! acquire() ──► engine present? ──► yes ─► Some(engine)
//!                      │
//!                      no ─► [serialized] try source 1, 2, ... ─► first Ok wins
//!                                      │
//!                                      └─► configure worker once, install
//! ```

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::OnceCell;

use crate::document::{DocumentError, DocumentResult, EngineSource, RenderEngine};

/// Holds the optional rendering engine and the sources to load it from
pub struct EngineRegistry {
    engine: OnceCell<Arc<dyn RenderEngine>>,
    sources: Vec<Arc<dyn EngineSource>>,
    worker_src: String,
}

/// Engine availability snapshot
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatus {
    pub available: bool,
    pub name: Option<String>,
    pub worker_src: Option<String>,
    pub sources: Vec<String>,
}

impl EngineRegistry {
    /// Registry with no engine yet
    pub fn new(sources: Vec<Arc<dyn EngineSource>>, worker_src: impl Into<String>) -> Self {
        Self {
            engine: OnceCell::new(),
            sources,
            worker_src: worker_src.into(),
        }
    }

    /// Registry whose engine is already present
    pub fn with_engine(
        engine: Arc<dyn RenderEngine>,
        sources: Vec<Arc<dyn EngineSource>>,
        worker_src: impl Into<String>,
    ) -> Self {
        let worker_src = worker_src.into();
        Self::configure_worker(engine.as_ref(), &worker_src);
        Self {
            engine: OnceCell::new_with(Some(engine)),
            sources,
            worker_src,
        }
    }

    /// The engine, if one is already loaded
    pub fn current(&self) -> Option<Arc<dyn RenderEngine>> {
        self.engine.get().cloned()
    }

    /// The loaded engine, or the first source that loads successfully.
    ///
    /// Concurrent callers wait on the same attempt. A failed attempt leaves
    /// the registry empty so a later pass may try again.
    pub async fn acquire(&self) -> Option<Arc<dyn RenderEngine>> {
        if let Some(engine) = self.current() {
            return Some(engine);
        }

        match self
            .engine
            .get_or_try_init(|| self.load_from_sources())
            .await
        {
            Ok(engine) => Some(Arc::clone(engine)),
            Err(e) => {
                tracing::info!("No rendering engine available: {}", e);
                None
            }
        }
    }

    async fn load_from_sources(&self) -> DocumentResult<Arc<dyn RenderEngine>> {
        for source in &self.sources {
            match source.load().await {
                Ok(engine) => {
                    Self::configure_worker(engine.as_ref(), &self.worker_src);
                    tracing::info!(
                        "Loaded rendering engine '{}' from source '{}'",
                        engine.name(),
                        source.name()
                    );
                    return Ok(engine);
                }
                Err(e) => {
                    tracing::debug!("Engine source '{}' failed: {}", source.name(), e);
                }
            }
        }

        Err(DocumentError::EngineUnavailable(format!(
            "all {} sources failed",
            self.sources.len()
        )))
    }

    fn configure_worker(engine: &dyn RenderEngine, worker_src: &str) {
        if engine.configure_worker(worker_src) {
            tracing::debug!("Configured worker for '{}': {}", engine.name(), worker_src);
        } else {
            tracing::debug!(
                "Worker for '{}' already configured, keeping {:?}",
                engine.name(),
                engine.worker_location()
            );
        }
    }

    pub fn status(&self) -> EngineStatus {
        let engine = self.current();
        EngineStatus {
            available: engine.is_some(),
            name: engine.as_ref().map(|e| e.name().to_string()),
            worker_src: engine.as_ref().and_then(|e| e.worker_location()),
            sources: self.sources.iter().map(|s| s.name().to_string()).collect(),
        }
    }
}
