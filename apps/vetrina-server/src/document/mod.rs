//! Document model and engine interfaces
//!
//! This module holds the types that flow through the preview pipeline and the
//! traits a rendering engine implements.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │              EngineRegistry (process-wide)              │
//! │    current() / acquire() over ordered EngineSources     │
//! └─────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//!   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!   │ RenderEngine │ → │EngineDocument│ → │  EnginePage  │
//!   │   (MuPDF)    │   │ metadata()   │   │ render()     │
//!   │              │   │ page(n)      │   │ text_content │
//!   └──────────────┘   └──────────────┘   └──────────────┘
//! ```

mod error;
mod traits;
mod types;

pub use error::{DocumentError, DocumentResult, Result};
pub use traits::{EngineDocument, EnginePage, EngineSource, RenderEngine};
pub use types::{
    document_url, parse_file_list, DocumentDescriptor, DocumentMetadata, ManualTitles,
    PageRenderRequest, RasterSurface, ResolvedItem, Viewport, DEFAULT_BASE_PATH,
};
