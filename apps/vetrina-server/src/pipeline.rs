//! Two-pass preview pipeline
//!
//! The first pass resolves every descriptor with whatever engine is already
//! loaded and mounts each entry as soon as it is ready. The upgrade pass then
//! acquires an engine and swaps icons for thumbnails in place.

use std::sync::Arc;

use crate::document::{DocumentDescriptor, ManualTitles, ResolvedItem};
use crate::listing::{self, ListContainer};
use crate::resolver::DocumentResolver;

pub struct PreviewPipeline {
    resolver: DocumentResolver,
    titles: ManualTitles,
    entries: Arc<dyn ListContainer>,
}

impl PreviewPipeline {
    /// `entries` should start empty: item `i` is mounted at position `i`.
    pub fn new(
        resolver: DocumentResolver,
        titles: ManualTitles,
        entries: Arc<dyn ListContainer>,
    ) -> Self {
        Self {
            resolver,
            titles,
            entries,
        }
    }

    /// Resolve and mount every descriptor in input order
    pub async fn first_pass(&self, descriptors: &[DocumentDescriptor]) -> Vec<ResolvedItem> {
        self.resolver
            .resolve_each(descriptors, |_, item| {
                self.entries.append(listing::render(item, &self.titles));
            })
            .await
    }

    /// Fill missing thumbnails and mount them. Returns the upgraded indices.
    pub async fn upgrade_pass(&self, items: &mut [ResolvedItem]) -> Vec<usize> {
        self.resolver
            .upgrade_each(items, |index, surface| {
                if !self.entries.upgrade_preview(index, Arc::clone(surface)) {
                    tracing::debug!("Entry {} kept its existing preview", index);
                }
            })
            .await
    }

    /// Both passes back to back
    pub async fn run(&self, descriptors: &[DocumentDescriptor]) -> Vec<ResolvedItem> {
        let mut items = self.first_pass(descriptors).await;
        self.upgrade_pass(&mut items).await;
        items
    }
}
