//! List renderer
//!
//! Turns resolved items into display entries, mounts them into a
//! [`ListContainer`] and serializes them as HTML for the host page.

mod container;
mod viewer;

pub use container::{fragment_html, EntryList, ListContainer};
pub use viewer::{viewer_src, ModalViewer, Viewer, ViewerRequest};

use std::sync::Arc;

use serde::Serialize;

use crate::document::{ManualTitles, RasterSurface, ResolvedItem};

/// Background behind the generic document icon
pub const ICON_BACKGROUND: &str = "var(--surface)";

/// Label of the explicit open action
pub const OPEN_LABEL: &str = "Apri PDF";

const DOCUMENT_ICON_SVG: &str = concat!(
    r#"<svg class="doc-icon" viewBox="0 0 24 24" width="48" height="48" aria-hidden="true">"#,
    r#"<path fill="none" stroke="currentColor" stroke-width="1.5" "#,
    r#"d="M14 3H7a2 2 0 0 0-2 2v14a2 2 0 0 0 2 2h10a2 2 0 0 0 2-2V8z M14 3v5h5 M9 13h6 M9 17h6"/>"#,
    "</svg>"
);

/// What the preview area of an entry shows
#[derive(Debug, Clone)]
pub enum Preview {
    Thumbnail(Arc<RasterSurface>),
    Icon { background: &'static str },
}

impl Preview {
    fn icon() -> Self {
        Preview::Icon {
            background: ICON_BACKGROUND,
        }
    }

    pub fn thumbnail(&self) -> Option<&Arc<RasterSurface>> {
        match self {
            Preview::Thumbnail(surface) => Some(surface),
            Preview::Icon { .. } => None,
        }
    }
}

/// Link that opens the document in a new browsing context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenAction {
    pub href: String,
    pub target: &'static str,
    pub rel: &'static str,
    pub label: &'static str,
}

/// A mounted list entry
#[derive(Debug, Clone)]
pub struct DisplayEntry {
    pub file_name: String,
    pub url: String,
    pub title: String,
    pub preview: Preview,
}

/// Build the display entry for a resolved item.
///
/// Title: manual override, then extracted title, then file name.
pub fn render(item: &ResolvedItem, titles: &ManualTitles) -> DisplayEntry {
    let title = titles.display_title(&item.descriptor.file_name, item.title.as_deref());
    let preview = match &item.thumbnail {
        Some(surface) => Preview::Thumbnail(Arc::clone(surface)),
        None => Preview::icon(),
    };

    DisplayEntry {
        file_name: item.descriptor.file_name.clone(),
        url: item.descriptor.url.clone(),
        title,
        preview,
    }
}

impl DisplayEntry {
    pub fn has_thumbnail(&self) -> bool {
        self.preview.thumbnail().is_some()
    }

    /// Clicking the preview opens the viewer on this document
    pub fn activate_preview(&self, viewer: &dyn Viewer) -> ViewerRequest {
        viewer.open_viewer(&self.url)
    }

    pub fn open_action(&self) -> OpenAction {
        OpenAction {
            href: self.url.clone(),
            target: "_blank",
            rel: "noreferrer",
            label: OPEN_LABEL,
        }
    }

    /// Replace the icon with a thumbnail. An existing thumbnail is kept and
    /// `false` is returned.
    pub fn upgrade_preview(&mut self, surface: Arc<RasterSurface>) -> bool {
        if self.has_thumbnail() {
            return false;
        }
        self.preview = Preview::Thumbnail(surface);
        true
    }

    /// Serialize as an HTML card. All text and attribute values are escaped.
    pub fn to_html(&self) -> String {
        let title = html_escape::encode_text(&self.title);
        let title_attr = html_escape::encode_double_quoted_attribute(&self.title);
        let url_attr = html_escape::encode_double_quoted_attribute(&self.url);
        let action = self.open_action();

        format!(
            concat!(
                r#"<article class="doc-card">"#,
                r#"<button type="button" class="doc-preview" data-viewer-url="{url}" aria-label="{title_attr}">{preview}</button>"#,
                r#"<h3 class="doc-title">{title}</h3>"#,
                r#"<a class="doc-open" href="{url}" target="{target}" rel="{rel}">{label}</a>"#,
                "</article>"
            ),
            url = url_attr,
            title_attr = title_attr,
            preview = self.preview_html(&title_attr),
            title = title,
            target = action.target,
            rel = action.rel,
            label = action.label,
        )
    }

    fn preview_html(&self, alt: &str) -> String {
        if let Preview::Thumbnail(surface) = &self.preview {
            match surface.to_data_uri() {
                Ok(src) => {
                    return format!(
                        r#"<img class="doc-thumb" src="{}" width="{}" height="{}" alt="{}">"#,
                        src,
                        surface.display_width(),
                        surface.display_height(),
                        alt
                    );
                }
                Err(e) => {
                    tracing::debug!("Thumbnail for {} not encodable: {}", self.file_name, e);
                }
            }
        }

        format!(
            r#"<div class="doc-icon-wrap" style="background: {}">{}</div>"#,
            ICON_BACKGROUND, DOCUMENT_ICON_SVG
        )
    }
}
