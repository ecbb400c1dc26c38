//! Low-level MuPDF wrapper
//!
//! MuPDF's `fz_context` is **NOT thread-safe**. Documents here keep only their
//! bytes; every operation opens a fresh `mupdf::Document` under a mutex and
//! drops it before returning. Callers run these operations on tokio's blocking
//! pool.
//!
//! ```rust,ignore
//! let doc = SafeDocument::from_bytes(pdf_bytes, "1.pdf".into())?;
//! let lines = doc.with_doc(|d| {
//!     let page = d.load_page(0)?;
//!     stext::extract_text_lines(&page)
//! })?;
//! ```

mod safe;
mod stext;

pub use safe::SafeDocument;
pub use stext::{extract_text_lines, pixmap_to_rgba};
