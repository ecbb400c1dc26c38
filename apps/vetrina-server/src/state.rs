//! Application state management

use std::sync::Arc;

use crate::bio::{BioExtractor, ProfileSlots};
use crate::config::Config;
use crate::document::{DocumentDescriptor, ManualTitles};
use crate::engine::{sources_from_names, EngineRegistry};
use crate::listing::{EntryList, ModalViewer, Viewer};
use crate::pipeline::PreviewPipeline;
use crate::resolver::DocumentResolver;
use crate::storage::{DocumentStore, LocalDocumentStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    registry: Arc<EngineRegistry>,
    store: Arc<dyn DocumentStore>,
    descriptors: Vec<DocumentDescriptor>,
    titles: ManualTitles,
    entries: Arc<EntryList>,
    profile: Arc<ProfileSlots>,
    viewer: Arc<dyn Viewer>,
}

impl AppState {
    /// Create the state from configuration: MuPDF-backed registry and a
    /// filesystem store rooted at the documents directory.
    pub fn new(config: Config) -> Self {
        let registry = EngineRegistry::new(
            sources_from_names(&config.engine.sources),
            config.engine.worker_src.clone(),
        );
        let store = LocalDocumentStore::new(&config.documents.dir, config.documents.base_path.clone());
        Self::with_parts(config, Arc::new(registry), Arc::new(store))
    }

    /// Create the state around an existing registry and store
    pub fn with_parts(
        config: Config,
        registry: Arc<EngineRegistry>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        let descriptors = DocumentDescriptor::from_file_names(
            &config.documents.base_path,
            config.documents.files.iter().cloned(),
        );
        let titles = ManualTitles::default().with_overrides(config.titles.overrides.clone());
        let viewer = ModalViewer::new(config.documents.modal_viewer);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                registry,
                store,
                descriptors,
                titles,
                entries: Arc::new(EntryList::new()),
                profile: Arc::new(ProfileSlots::new()),
                viewer: Arc::new(viewer),
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn registry(&self) -> &Arc<EngineRegistry> {
        &self.inner.registry
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.inner.store
    }

    /// Configured documents, in display order
    pub fn descriptors(&self) -> &[DocumentDescriptor] {
        &self.inner.descriptors
    }

    pub fn entries(&self) -> &Arc<EntryList> {
        &self.inner.entries
    }

    pub fn profile(&self) -> &Arc<ProfileSlots> {
        &self.inner.profile
    }

    pub fn viewer(&self) -> &dyn Viewer {
        self.inner.viewer.as_ref()
    }

    /// Preview pipeline mounting into this state's entry list
    pub fn pipeline(&self) -> PreviewPipeline {
        let resolver = DocumentResolver::new(
            Arc::clone(&self.inner.registry),
            Arc::clone(&self.inner.store),
            self.inner.config.render.resolver_config(),
        );
        PreviewPipeline::new(
            resolver,
            self.inner.titles.clone(),
            self.inner.entries.clone(),
        )
    }

    pub fn bio_extractor(&self) -> BioExtractor {
        BioExtractor::new(
            Arc::clone(&self.inner.registry),
            Arc::clone(&self.inner.store),
            self.inner.config.documents.base_path.clone(),
        )
    }
}
