//! Filesystem-backed document store

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use super::{DocumentStore, StoreError};

/// Serves `<base_path>/<encoded name>` URLs from a directory
#[derive(Debug, Clone)]
pub struct LocalDocumentStore {
    root: PathBuf,
    base_path: String,
}

impl LocalDocumentStore {
    pub fn new<P: AsRef<Path>>(root: P, base_path: impl Into<String>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            base_path: base_path.into().trim_matches('/').to_string(),
        }
    }

    /// Map a document URL to a path under the root.
    ///
    /// The URL must live under the base path and decode to a single plain
    /// file name; anything that could escape the root is rejected.
    pub fn resolve_path(&self, url: &str) -> Result<PathBuf, StoreError> {
        let encoded = url
            .trim_start_matches('/')
            .strip_prefix(self.base_path.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| StoreError::InvalidPath(url.to_string()))?;

        // Drop any viewer fragment such as `#page=1`
        let encoded = encoded.split('#').next().unwrap_or_default();

        let name = urlencoding::decode(encoded)
            .map_err(|_| StoreError::InvalidPath(url.to_string()))?;

        let relative = Path::new(name.as_ref());
        let mut components = relative.components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(relative)),
            _ => Err(StoreError::InvalidPath(url.to_string())),
        }
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.resolve_path(url)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(url.to_string()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentDescriptor;

    #[tokio::test]
    async fn test_fetch_encoded_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("My CV.pdf"), b"%PDF-1.7").unwrap();

        let store = LocalDocumentStore::new(dir.path(), "documents");
        let descriptor = DocumentDescriptor::new("My CV.pdf");
        let data = store.fetch(&descriptor.url).await.unwrap();
        assert_eq!(data, b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_fetch_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDocumentStore::new(dir.path(), "documents");
        let err = store.fetch("documents/missing.pdf").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_rejects_traversal() {
        let store = LocalDocumentStore::new("/srv/docs", "documents/");
        assert!(store.resolve_path("documents/..%2Fsecret").is_err());
        assert!(store.resolve_path("documents/%2Fetc%2Fpasswd").is_err());
        assert!(store.resolve_path("documents/..").is_err());
        assert!(store.resolve_path("other/file.pdf").is_err());
        assert!(store.resolve_path("documents/").is_err());
    }

    #[test]
    fn test_resolve_strips_fragment() {
        let store = LocalDocumentStore::new("/srv/docs", "documents");
        let path = store
            .resolve_path("documents/1.pdf#page=1&zoom=page-fit")
            .unwrap();
        assert_eq!(path, PathBuf::from("/srv/docs/1.pdf"));
    }
}
