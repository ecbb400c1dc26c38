//! Reads the profile document and runs the heuristics over its text

use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::heuristics::{SegmentationRules, SkillRules};
use super::BioExtractionResult;
use crate::document::{document_url, DocumentDescriptor, DocumentResult, EngineDocument, RenderEngine};
use crate::engine::EngineRegistry;
use crate::storage::DocumentStore;

/// Document used when no listed file looks like a profile
pub const PROFILE_FALLBACK_FILE: &str = "Profile.pdf";

/// Pages read from the profile document
pub const MAX_TEXT_PAGES: usize = 3;

static PROFILE_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)profile\.pdf$").expect("profile pattern compiles"));

pub struct BioExtractor {
    registry: Arc<EngineRegistry>,
    store: Arc<dyn DocumentStore>,
    base_path: String,
    segmentation: SegmentationRules,
    skills: SkillRules,
}

impl BioExtractor {
    pub fn new(
        registry: Arc<EngineRegistry>,
        store: Arc<dyn DocumentStore>,
        base_path: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            store,
            base_path: base_path.into(),
            segmentation: SegmentationRules::default(),
            skills: SkillRules::default(),
        }
    }

    pub fn with_rules(mut self, segmentation: SegmentationRules, skills: SkillRules) -> Self {
        self.segmentation = segmentation;
        self.skills = skills;
        self
    }

    /// URL of the first listed profile document, or the fallback location
    pub fn target_url(&self, descriptors: &[DocumentDescriptor]) -> String {
        descriptors
            .iter()
            .find(|d| PROFILE_FILE.is_match(&d.file_name))
            .map(|d| d.url.clone())
            .unwrap_or_else(|| document_url(&self.base_path, PROFILE_FALLBACK_FILE))
    }

    /// Extract bio, roles and skills from the profile document.
    ///
    /// Uses the engine only if one is already loaded. Returns `None` when
    /// there is no engine or the document cannot be read.
    pub async fn extract(&self, descriptors: &[DocumentDescriptor]) -> Option<BioExtractionResult> {
        let Some(engine) = self.registry.current() else {
            tracing::debug!("No rendering engine loaded, skipping profile extraction");
            return None;
        };

        let url = self.target_url(descriptors);
        match self.read_text(engine.as_ref(), &url).await {
            Ok(raw) => {
                let result = BioExtractionResult::from_text(&raw, &self.segmentation, &self.skills);
                tracing::info!(
                    "Extracted profile from {}: {} chars, {} roles, skills {}",
                    url,
                    result.bio_text.chars().count(),
                    result.role_segments.len(),
                    if result.skill_chips.is_some() { "found" } else { "absent" }
                );
                Some(result)
            }
            Err(e) => {
                tracing::debug!("Profile document {} unavailable: {}", url, e);
                None
            }
        }
    }

    async fn read_text(&self, engine: &dyn RenderEngine, url: &str) -> DocumentResult<String> {
        let data = self.store.fetch(url).await?;
        let doc = engine.open(data, url).await?;

        let text = collect_text(doc.as_ref()).await;
        doc.cleanup().await;
        text
    }
}

/// Text of the first pages: items joined by spaces, one line per page
async fn collect_text(doc: &dyn EngineDocument) -> DocumentResult<String> {
    let mut text = String::new();
    for number in 1..=doc.page_count().min(MAX_TEXT_PAGES) {
        let page = doc.page(number).await?;
        let items = page.text_content().await?;
        text.push_str(&items.join(" "));
        text.push('\n');
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{EngineSource, DEFAULT_BASE_PATH};
    use crate::engine::mock::{MemoryStore, MockDoc, MockEngine, MockPage, MockSource};

    fn profile_doc() -> MockDoc {
        MockDoc::new(vec![
            MockPage::new(595.0, 842.0).with_text(&["Experience", "2019", "Manager at X"]),
            MockPage::new(595.0, 842.0).with_text(&["Skills:", "Go,", "testing;", "design"]),
            MockPage::new(595.0, 842.0).with_text(&["page three"]),
            MockPage::new(595.0, 842.0).with_text(&["never read"]),
        ])
    }

    fn extractor(engine: Arc<MockEngine>, store: MemoryStore) -> BioExtractor {
        let registry = EngineRegistry::with_engine(engine, vec![], "worker.js");
        BioExtractor::new(Arc::new(registry), Arc::new(store), DEFAULT_BASE_PATH)
    }

    fn descriptors(names: &[&str]) -> Vec<DocumentDescriptor> {
        DocumentDescriptor::from_file_names(DEFAULT_BASE_PATH, names.iter().copied())
    }

    #[test]
    fn test_target_url() {
        let bio = extractor(Arc::new(MockEngine::new()), MemoryStore::new());

        assert_eq!(
            bio.target_url(&descriptors(&["1.pdf", "Mario_PROFILE.PDF", "profile.pdf"])),
            "documents/Mario_PROFILE.PDF"
        );
        assert_eq!(bio.target_url(&descriptors(&["1.pdf"])), "documents/Profile.pdf");
        assert_eq!(
            bio.target_url(&descriptors(&["profile.pdf.bak"])),
            "documents/Profile.pdf"
        );
    }

    #[tokio::test]
    async fn test_extract_reads_first_three_pages() {
        let engine = Arc::new(MockEngine::new().with_document("profile", profile_doc()));
        let store = MemoryStore::new().with("documents/cv-profile.pdf", "profile");
        let bio = extractor(engine.clone(), store);

        let result = bio
            .extract(&descriptors(&["1.pdf", "cv-profile.pdf"]))
            .await
            .expect("profile extracted");

        assert_eq!(
            result.bio_text,
            "Experience 2019 Manager at X Skills: Go, testing; design page three"
        );
        assert_eq!(
            result.skill_chips,
            Some(vec!["Go".to_string(), "testing".to_string(), "design page three".to_string()])
        );
        assert_eq!(result.role_segments[0], "Experience");
        assert_eq!(engine.text_reads(), 3);
        assert_eq!(engine.cleanups(), 1);
    }

    #[tokio::test]
    async fn test_extract_uses_fallback_document() {
        let engine = Arc::new(MockEngine::new().with_document("profile", profile_doc()));
        let store = MemoryStore::new().with("documents/Profile.pdf", "profile");
        let bio = extractor(engine, store);

        assert!(bio.extract(&descriptors(&["1.pdf"])).await.is_some());
    }

    #[tokio::test]
    async fn test_extract_without_target_is_none() {
        let engine = Arc::new(MockEngine::new().with_document("profile", profile_doc()));
        let bio = extractor(engine, MemoryStore::new());

        assert!(bio.extract(&descriptors(&["1.pdf", "2.pdf"])).await.is_none());
    }

    #[tokio::test]
    async fn test_extract_never_acquires_engine() {
        let engine = Arc::new(MockEngine::new().with_document("profile", profile_doc()));
        let source = Arc::new(MockSource::new("builtin", engine));
        let sources: Vec<Arc<dyn EngineSource>> = vec![source.clone()];
        let registry = Arc::new(EngineRegistry::new(sources, "worker.js"));
        let store = MemoryStore::new().with("documents/Profile.pdf", "profile");
        let bio = BioExtractor::new(registry, Arc::new(store), DEFAULT_BASE_PATH);

        assert!(bio.extract(&[]).await.is_none());
        assert_eq!(source.attempts(), 0);
    }

    #[tokio::test]
    async fn test_extract_short_document() {
        let doc = MockDoc::new(vec![MockPage::new(10.0, 10.0).with_text(&["Solo  testo"])]);
        let engine = Arc::new(MockEngine::new().with_document("short", doc));
        let store = MemoryStore::new().with("documents/profile.pdf", "short");
        let bio = extractor(engine.clone(), store);

        let result = bio.extract(&descriptors(&["profile.pdf"])).await.unwrap();
        assert_eq!(result.bio_text, "Solo testo");
        assert_eq!(result.skill_chips, None);
        assert_eq!(engine.text_reads(), 1);
    }

    #[tokio::test]
    async fn test_custom_rules() {
        let doc = MockDoc::new(vec![
            MockPage::new(10.0, 10.0).with_text(&["Stage 2010 Tools: Rust; SQL"]),
        ]);
        let engine = Arc::new(MockEngine::new().with_document("custom", doc));
        let store = MemoryStore::new().with("documents/Profile.pdf", "custom");
        let bio = extractor(engine, store).with_rules(
            SegmentationRules::new(&["Stage"], 6, 180).unwrap(),
            SkillRules::new(&["Tools"], 250, 12).unwrap(),
        );

        let result = bio.extract(&[]).await.unwrap();
        assert_eq!(result.role_segments, vec!["Stage", "2010 Tools: Rust; SQL"]);
        assert_eq!(result.skill_chips, Some(vec!["Rust".to_string(), "SQL".to_string()]));
    }
}
