//! Engine sources

use std::sync::Arc;

use async_trait::async_trait;

use crate::document::{DocumentResult, EngineSource, RenderEngine};

/// Built-in MuPDF engine
///
/// Reports the engine as unavailable when the crate is built without the
/// `mupdf` feature.
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfSource;

#[async_trait]
impl EngineSource for MupdfSource {
    fn name(&self) -> &str {
        "mupdf"
    }

    #[cfg(feature = "mupdf")]
    async fn load(&self) -> DocumentResult<Arc<dyn RenderEngine>> {
        Ok(Arc::new(super::MupdfEngine::new()))
    }

    #[cfg(not(feature = "mupdf"))]
    async fn load(&self) -> DocumentResult<Arc<dyn RenderEngine>> {
        Err(crate::document::DocumentError::EngineUnavailable(
            "built without the `mupdf` feature".to_string(),
        ))
    }
}

/// Build the ordered source list from configured names.
///
/// Unknown names are logged and skipped.
pub fn sources_from_names(names: &[String]) -> Vec<Arc<dyn EngineSource>> {
    names
        .iter()
        .filter_map(|name| match name.trim().to_lowercase().as_str() {
            "mupdf" => Some(Arc::new(MupdfSource) as Arc<dyn EngineSource>),
            other => {
                tracing::warn!("Unknown engine source '{}', skipping", other);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_from_names_skips_unknown() {
        let names = vec!["MuPDF".to_string(), "pdfium".to_string(), " mupdf ".to_string()];
        let sources = sources_from_names(&names);
        assert_eq!(sources.len(), 2);
        assert!(sources.iter().all(|s| s.name() == "mupdf"));
    }

    #[cfg(not(feature = "mupdf"))]
    #[tokio::test]
    async fn test_mupdf_source_unavailable_without_feature() {
        let err = MupdfSource.load().await.err().unwrap();
        assert!(matches!(
            err,
            crate::document::DocumentError::EngineUnavailable(_)
        ));
    }
}
