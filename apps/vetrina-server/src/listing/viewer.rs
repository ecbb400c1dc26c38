//! Full-view viewer collaborator

use serde::Serialize;

/// What the host page should do to show a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum ViewerRequest {
    /// Load `src` into the modal frame
    Embed { src: String },
    /// No modal available, open the document in a new tab
    NewTab { url: String },
}

pub trait Viewer: Send + Sync {
    fn open_viewer(&self, url: &str) -> ViewerRequest;
}

/// First page, fitted to the frame
pub fn viewer_src(url: &str) -> String {
    format!("{}#page=1&zoom=page-fit", url)
}

/// Modal viewer of the portfolio page
#[derive(Debug, Clone, Copy)]
pub struct ModalViewer {
    modal_mounted: bool,
}

impl ModalViewer {
    pub fn new(modal_mounted: bool) -> Self {
        Self { modal_mounted }
    }
}

impl Default for ModalViewer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Viewer for ModalViewer {
    fn open_viewer(&self, url: &str) -> ViewerRequest {
        if self.modal_mounted {
            ViewerRequest::Embed {
                src: viewer_src(url),
            }
        } else {
            ViewerRequest::NewTab {
                url: url.to_string(),
            }
        }
    }
}
