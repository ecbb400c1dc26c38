//! Document resolver
//!
//! Resolves each descriptor into a title and a first-page thumbnail. Every
//! step is best-effort: a failure leaves the corresponding field empty and
//! never stops the pass.
//!
//! ```text
//! resolve pass                       upgrade pass
//! ────────────                       ────────────
//! engine = current()                 engine = acquire()
//! for each descriptor (in order):    for each item without thumbnail:
//!   open     ── fail ─► (None, None)   open ── fail ─► skip
//!   metadata ── fail ─► title None     page 1 @ upgrade scale
//!   page 1   ── fail ─► thumb None     cleanup
//!   cleanup                            merge (absent ─► present only)
//! ```

use std::sync::Arc;

use crate::document::{
    DocumentDescriptor, DocumentResult, EngineDocument, RasterSurface, RenderEngine,
    ResolvedItem,
};
use crate::engine::EngineRegistry;
use crate::raster::{self, FIRST_PASS_SCALE, UPGRADE_PASS_SCALE};
use crate::storage::DocumentStore;

/// Scales and density used by the two passes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverConfig {
    pub first_pass_scale: f32,
    pub upgrade_scale: f32,
    /// Raw device pixel ratio, clamped by the rasterizer
    pub device_pixel_ratio: Option<f32>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            first_pass_scale: FIRST_PASS_SCALE,
            upgrade_scale: UPGRADE_PASS_SCALE,
            device_pixel_ratio: None,
        }
    }
}

/// Turns descriptors into [`ResolvedItem`]s
pub struct DocumentResolver {
    registry: Arc<EngineRegistry>,
    store: Arc<dyn DocumentStore>,
    config: ResolverConfig,
}

impl DocumentResolver {
    pub fn new(
        registry: Arc<EngineRegistry>,
        store: Arc<dyn DocumentStore>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            registry,
            store,
            config,
        }
    }

    /// Resolve every descriptor, in input order. Always returns one item per
    /// descriptor.
    pub async fn resolve_all(&self, descriptors: &[DocumentDescriptor]) -> Vec<ResolvedItem> {
        self.resolve_each(descriptors, |_, _| {}).await
    }

    /// Like [`resolve_all`](Self::resolve_all), calling `on_resolved` as soon
    /// as each item is ready.
    pub async fn resolve_each<F>(
        &self,
        descriptors: &[DocumentDescriptor],
        mut on_resolved: F,
    ) -> Vec<ResolvedItem>
    where
        F: FnMut(usize, &ResolvedItem),
    {
        let engine = self.registry.current();
        if engine.is_none() {
            tracing::info!(
                "No rendering engine loaded, {} documents use fallback previews",
                descriptors.len()
            );
        }

        let mut items = Vec::with_capacity(descriptors.len());
        for (index, descriptor) in descriptors.iter().enumerate() {
            let item = match &engine {
                Some(engine) => self.resolve_one(engine.as_ref(), descriptor).await,
                None => ResolvedItem::unresolved(descriptor.clone()),
            };
            on_resolved(index, &item);
            items.push(item);
        }

        tracing::info!(
            "Resolved {} documents ({} with thumbnails, {} with titles)",
            items.len(),
            items.iter().filter(|i| i.has_thumbnail()).count(),
            items.iter().filter(|i| i.title.is_some()).count()
        );

        items
    }

    #[tracing::instrument(skip_all, fields(file = %descriptor.file_name))]
    async fn resolve_one(
        &self,
        engine: &dyn RenderEngine,
        descriptor: &DocumentDescriptor,
    ) -> ResolvedItem {
        let doc = match self.open(engine, descriptor).await {
            Ok(doc) => doc,
            Err(e) => {
                tracing::debug!("Open failed, using fallback entry: {}", e);
                return ResolvedItem::unresolved(descriptor.clone());
            }
        };

        let title = match doc.metadata().await {
            Ok(metadata) => metadata.title(),
            Err(e) => {
                tracing::debug!("Metadata unavailable: {}", e);
                None
            }
        };

        let thumbnail = self
            .first_page_surface(doc.as_ref(), self.config.first_pass_scale)
            .await;

        doc.cleanup().await;

        ResolvedItem {
            descriptor: descriptor.clone(),
            title,
            thumbnail,
        }
    }

    /// Fill thumbnails that are still missing. Returns the indices that were
    /// upgraded.
    pub async fn upgrade_missing(&self, items: &mut [ResolvedItem]) -> Vec<usize> {
        self.upgrade_each(items, |_, _| {}).await
    }

    /// Like [`upgrade_missing`](Self::upgrade_missing), calling `on_upgraded`
    /// for each newly filled thumbnail.
    ///
    /// Acquires the engine if none is loaded yet. Items that already have a
    /// thumbnail are never touched.
    pub async fn upgrade_each<F>(&self, items: &mut [ResolvedItem], mut on_upgraded: F) -> Vec<usize>
    where
        F: FnMut(usize, &Arc<RasterSurface>),
    {
        let mut upgraded = Vec::new();
        if items.iter().all(ResolvedItem::has_thumbnail) {
            return upgraded;
        }

        let Some(engine) = self.registry.acquire().await else {
            tracing::info!("Upgrade pass skipped, keeping fallback previews");
            return upgraded;
        };

        for (index, item) in items.iter_mut().enumerate() {
            if item.has_thumbnail() {
                continue;
            }

            let doc = match self.open(engine.as_ref(), &item.descriptor).await {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::debug!("Upgrade open failed for {}: {}", item.descriptor.file_name, e);
                    continue;
                }
            };

            let surface = self
                .first_page_surface(doc.as_ref(), self.config.upgrade_scale)
                .await;
            doc.cleanup().await;

            if let Some(surface) = surface {
                if item.merge_thumbnail(Arc::clone(&surface)) {
                    on_upgraded(index, &surface);
                    upgraded.push(index);
                }
            }
        }

        tracing::info!("Upgrade pass filled {} thumbnails", upgraded.len());
        upgraded
    }

    async fn open(
        &self,
        engine: &dyn RenderEngine,
        descriptor: &DocumentDescriptor,
    ) -> DocumentResult<Box<dyn EngineDocument>> {
        let data = self.store.fetch(&descriptor.url).await?;
        engine.open(data, &descriptor.file_name).await
    }

    async fn first_page_surface(
        &self,
        doc: &dyn EngineDocument,
        css_scale: f32,
    ) -> Option<Arc<RasterSurface>> {
        let result = async {
            let page = doc.page(1).await?;
            raster::rasterize(page.as_ref(), css_scale, self.config.device_pixel_ratio).await
        }
        .await;

        match result {
            Ok(surface) => Some(Arc::new(surface)),
            Err(e) => {
                tracing::debug!("Thumbnail unavailable: {}", e);
                None
            }
        }
    }
}
