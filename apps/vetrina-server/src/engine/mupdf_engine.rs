//! MuPDF implementation of the engine traits
//!
//! All MuPDF calls are CPU-bound and not thread-safe, so each one runs inside
//! `spawn_blocking` against a [`SafeDocument`].

use std::sync::Arc;

use async_trait::async_trait;
use image::RgbaImage;
use mupdf::{Colorspace, Matrix, MetadataName};
use parking_lot::Mutex;

use crate::document::{
    DocumentError, DocumentMetadata, DocumentResult, EngineDocument, EnginePage,
    PageRenderRequest, RenderEngine, Viewport,
};
use crate::mupdf::{extract_text_lines, pixmap_to_rgba, SafeDocument};

use super::WorkerSlot;

/// Rendering engine backed by the MuPDF library
#[derive(Debug, Default)]
pub struct MupdfEngine {
    worker: WorkerSlot,
}

impl MupdfEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RenderEngine for MupdfEngine {
    fn name(&self) -> &str {
        "mupdf"
    }

    fn configure_worker(&self, location: &str) -> bool {
        self.worker.configure(location)
    }

    fn worker_location(&self) -> Option<String> {
        self.worker.get()
    }

    async fn open(&self, data: Vec<u8>, id: &str) -> DocumentResult<Box<dyn EngineDocument>> {
        let id = id.to_string();
        let doc = tokio::task::spawn_blocking(move || SafeDocument::from_bytes(data, id)).await??;
        let page_count = doc.page_count();

        Ok(Box::new(MupdfDocument {
            inner: Mutex::new(Some(Arc::new(doc))),
            page_count,
        }))
    }
}

struct MupdfDocument {
    /// `None` once cleaned up
    inner: Mutex<Option<Arc<SafeDocument>>>,
    page_count: usize,
}

impl MupdfDocument {
    fn handle(&self) -> DocumentResult<Arc<SafeDocument>> {
        self.inner
            .lock()
            .clone()
            .ok_or_else(|| DocumentError::OpenError("document already released".to_string()))
    }
}

#[async_trait]
impl EngineDocument for MupdfDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    async fn metadata(&self) -> DocumentResult<DocumentMetadata> {
        let doc = self.handle()?;

        tokio::task::spawn_blocking(move || {
            doc.with_doc(|d| {
                let info_title = d
                    .metadata(MetadataName::Title)
                    .map_err(|e| DocumentError::MetadataError(e.to_string()))?;

                // The mupdf bindings expose the info dictionary only; XMP
                // `dc:title` stays unset for this engine.
                Ok(DocumentMetadata {
                    info_title: Some(info_title).filter(|t| !t.trim().is_empty()),
                    xmp_title: None,
                })
            })
        })
        .await?
    }

    async fn page(&self, page_number: usize) -> DocumentResult<Box<dyn EnginePage>> {
        if page_number == 0 || page_number > self.page_count {
            return Err(DocumentError::PageNotFound(page_number, self.page_count));
        }

        let doc = self.handle()?;
        let index = page_number - 1;
        let bounds_doc = Arc::clone(&doc);

        let (width, height) = tokio::task::spawn_blocking(move || {
            bounds_doc.with_doc(|d| {
                let page = d.load_page(index as i32)?;
                let bounds = page.bounds()?;
                Ok((bounds.x1 - bounds.x0, bounds.y1 - bounds.y0))
            })
        })
        .await??;

        Ok(Box::new(MupdfPage {
            doc,
            index,
            width,
            height,
        }))
    }

    async fn cleanup(&self) {
        if let Some(doc) = self.inner.lock().take() {
            tracing::trace!("Released MuPDF document {}", doc.id());
        }
    }
}

struct MupdfPage {
    doc: Arc<SafeDocument>,
    index: usize,
    /// Page size in points
    width: f32,
    height: f32,
}

#[async_trait]
impl EnginePage for MupdfPage {
    fn page_number(&self) -> usize {
        self.index + 1
    }

    fn viewport(&self, scale: f32) -> Viewport {
        Viewport {
            width: self.width * scale,
            height: self.height * scale,
        }
    }

    async fn render(&self, request: &PageRenderRequest) -> DocumentResult<RgbaImage> {
        let doc = Arc::clone(&self.doc);
        let index = self.index;
        let request = *request;

        tokio::task::spawn_blocking(move || {
            doc.with_doc(|d| {
                let page = d.load_page(index as i32)?;

                let mut matrix = Matrix::new_scale(request.css_scale, request.css_scale);
                if let Some(density) = request.transform {
                    matrix.concat(Matrix::new_scale(density, density));
                }

                // Opaque output, like a canvas created with `alpha: false`
                let pixmap = page
                    .to_pixmap(&matrix, &Colorspace::device_rgb(), false, true)
                    .map_err(|e| DocumentError::RenderError(e.to_string()))?;

                pixmap_to_rgba(&pixmap)
            })
        })
        .await?
    }

    async fn text_content(&self) -> DocumentResult<Vec<String>> {
        let doc = Arc::clone(&self.doc);
        let index = self.index;

        tokio::task::spawn_blocking(move || {
            doc.with_doc(|d| {
                let page = d.load_page(index as i32)?;
                extract_text_lines(&page)
            })
        })
        .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::rasterize;

    /// One 200x100pt page with a single line of Helvetica text
    fn fixture_pdf() -> Vec<u8> {
        let content = "BT /F1 24 Tf 20 40 Td (Hello Vetrina) Tj ET";
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 200 100] \
             /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
                .to_string(),
            format!("<< /Length {} >>\nstream\n{}\nendstream", content.len(), content),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
            "<< /Title (Fixture Title) >>".to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }

        let xref = pdf.len();
        pdf.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
        for offset in offsets {
            pdf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        pdf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R /Info 6 0 R >>\nstartxref\n{}\n%%EOF\n",
                objects.len() + 1,
                xref
            )
            .as_bytes(),
        );
        pdf
    }

    async fn open_fixture() -> Box<dyn EngineDocument> {
        MupdfEngine::new()
            .open(fixture_pdf(), "fixture.pdf")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_open_reads_pages_and_title() {
        let doc = open_fixture().await;
        assert_eq!(doc.page_count(), 1);

        let metadata = doc.metadata().await.unwrap();
        assert_eq!(metadata.info_title.as_deref(), Some("Fixture Title"));
        assert_eq!(metadata.xmp_title, None);
    }

    #[tokio::test]
    async fn test_open_rejects_non_pdf() {
        let result = MupdfEngine::new().open(b"not a pdf".to_vec(), "x.pdf").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_page_out_of_range() {
        let doc = open_fixture().await;
        assert!(doc.page(0).await.is_err());
        assert!(doc.page(2).await.is_err());
    }

    #[tokio::test]
    async fn test_rasterize_at_display_density() {
        let doc = open_fixture().await;
        let page = doc.page(1).await.unwrap();

        let viewport = page.viewport(0.5);
        assert_eq!((viewport.width, viewport.height), (100.0, 50.0));

        let surface = rasterize(page.as_ref(), 0.5, Some(2.0)).await.unwrap();
        assert_eq!((surface.display_width(), surface.display_height()), (100, 50));
        assert_eq!((surface.width(), surface.height()), (200, 100));
    }

    #[tokio::test]
    async fn test_render_is_opaque_with_ink() {
        let doc = open_fixture().await;
        let page = doc.page(1).await.unwrap();

        let request = PageRenderRequest {
            css_scale: 1.0,
            transform: None,
            width: 200,
            height: 100,
        };
        let pixels = page.render(&request).await.unwrap();

        assert!(pixels.width().abs_diff(200) <= 1);
        assert!(pixels.height().abs_diff(100) <= 1);
        assert!(pixels.pixels().all(|p| p[3] == 255));
        assert_eq!(pixels.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert!(pixels.pixels().any(|p| p[0] < 128));
    }

    #[tokio::test]
    async fn test_text_content_and_cleanup() {
        let doc = open_fixture().await;
        let page = doc.page(1).await.unwrap();

        let lines = page.text_content().await.unwrap();
        assert_eq!(lines, vec!["Hello Vetrina"]);

        doc.cleanup().await;
        assert!(doc.metadata().await.is_err());
        assert!(doc.page(1).await.is_err());
    }
}
