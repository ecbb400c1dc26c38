//! Mount point for display entries

use std::sync::Arc;

use parking_lot::RwLock;

use super::DisplayEntry;
use crate::document::RasterSurface;

/// Append-only list the renderer mounts entries into.
///
/// Entries keep their position once appended; only an icon preview may be
/// replaced by a thumbnail.
pub trait ListContainer: Send + Sync {
    fn append(&self, entry: DisplayEntry);

    /// Swap the icon of entry `index` for `surface`. Returns `false` when the
    /// index is out of range or the entry already shows a thumbnail.
    fn upgrade_preview(&self, index: usize, surface: Arc<RasterSurface>) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory entry list shared between the pipeline and the HTTP layer
#[derive(Debug, Default)]
pub struct EntryList {
    entries: RwLock<Vec<DisplayEntry>>,
}

impl EntryList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<DisplayEntry> {
        self.entries.read().get(index).cloned()
    }

    pub fn snapshot(&self) -> Vec<DisplayEntry> {
        self.entries.read().clone()
    }

    /// The whole list as an HTML fragment. Encoding happens on a snapshot,
    /// after the lock is released.
    pub fn to_html(&self) -> String {
        fragment_html(&self.snapshot())
    }
}

/// Wrap rendered entries in the list container markup
pub fn fragment_html(entries: &[DisplayEntry]) -> String {
    let mut html = String::from(r#"<div class="doc-list">"#);
    for entry in entries {
        html.push_str(&entry.to_html());
    }
    html.push_str("</div>");
    html
}

impl ListContainer for EntryList {
    fn append(&self, entry: DisplayEntry) {
        self.entries.write().push(entry);
    }

    fn upgrade_preview(&self, index: usize, surface: Arc<RasterSurface>) -> bool {
        match self.entries.write().get_mut(index) {
            Some(entry) => entry.upgrade_preview(surface),
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}
