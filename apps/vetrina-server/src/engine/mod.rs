//! Rendering engine adapter
//!
//! The engine is optional. `EngineRegistry` holds the process-wide handle and
//! knows the ordered list of sources it can be loaded from; everything
//! downstream treats "no engine" as a reason to fall back, never as an error.

#[cfg(test)]
pub(crate) mod mock;
#[cfg(feature = "mupdf")]
mod mupdf_engine;
mod registry;
mod source;

use std::sync::OnceLock;

#[cfg(feature = "mupdf")]
pub use mupdf_engine::MupdfEngine;
pub use registry::{EngineRegistry, EngineStatus};
pub use source::{sources_from_names, MupdfSource};

/// Default worker location handed to a freshly acquired engine
pub const DEFAULT_WORKER_SRC: &str = "blocking-pool";

/// First-writer-wins storage for an engine's worker location
#[derive(Debug, Default)]
pub struct WorkerSlot {
    location: OnceLock<String>,
}

impl WorkerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if this call set the location
    pub fn configure(&self, location: &str) -> bool {
        self.location.set(location.to_string()).is_ok()
    }

    pub fn get(&self) -> Option<String> {
        self.location.get().cloned()
    }
}
