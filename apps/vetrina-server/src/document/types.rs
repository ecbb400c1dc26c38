//! Core document types
//!
//! Descriptors, resolved items and raster surfaces shared by the resolver,
//! the list renderer and the HTTP layer.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::error::Result;

/// Base path documents are served under
pub const DEFAULT_BASE_PATH: &str = "documents";

/// A document to preview: the file name and the URL it is fetched from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDescriptor {
    pub file_name: String,
    pub url: String,
}

impl DocumentDescriptor {
    /// Descriptor under the default `documents/` base path
    pub fn new(file_name: impl Into<String>) -> Self {
        Self::with_base(DEFAULT_BASE_PATH, file_name)
    }

    /// Descriptor under a custom base path
    pub fn with_base(base_path: &str, file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let url = document_url(base_path, &file_name);
        Self { file_name, url }
    }

    /// Build descriptors in input order; duplicates are kept
    pub fn from_file_names<I, S>(base_path: &str, names: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .map(|name| Self::with_base(base_path, name))
            .collect()
    }
}

/// Sub-delimiters a URI component keeps as-is
const COMPONENT_SAFE: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// `<base>/<percent-encoded file name>`
///
/// Encodes like a URI component: only the unreserved set and `!'()*` are left
/// alone, so a slash inside a file name is never treated as a path separator.
pub fn document_url(base_path: &str, file_name: &str) -> String {
    let base = base_path.trim_end_matches('/');
    let mut encoded = urlencoding::encode(file_name).into_owned();
    for (escaped, literal) in COMPONENT_SAFE {
        encoded = encoded.replace(escaped, literal);
    }
    format!("{}/{}", base, encoded)
}

/// Parse the serialized file list supplied by the host page.
///
/// Anything that is not a JSON array of strings yields an empty list.
pub fn parse_file_list(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Option<Vec<String>>>(raw) {
        Ok(files) => files.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Ignoring malformed document list: {}", e);
            Vec::new()
        }
    }
}

/// Title-related metadata read from a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMetadata {
    /// `Title` entry of the info dictionary
    pub info_title: Option<String>,
    /// `dc:title` from the XMP metadata stream
    pub xmp_title: Option<String>,
}

impl DocumentMetadata {
    /// Info dictionary title, falling back to the XMP title. Empty strings
    /// count as missing.
    pub fn title(&self) -> Option<String> {
        let non_empty = |t: &Option<String>| t.as_ref().filter(|s| !s.is_empty()).cloned();
        non_empty(&self.info_title).or_else(|| non_empty(&self.xmp_title))
    }
}

/// Page size at a given scale, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Request handed to an engine page when rasterizing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRenderRequest {
    /// Logical zoom applied to the page
    pub css_scale: f32,
    /// Extra uniform scale for high-density output, `None` at density 1
    pub transform: Option<f32>,
    /// Backing buffer width in physical pixels
    pub width: u32,
    /// Backing buffer height in physical pixels
    pub height: u32,
}

/// A rendered page image sized for the display density
#[derive(Debug, Clone)]
pub struct RasterSurface {
    pixels: RgbaImage,
    display_width: u32,
    display_height: u32,
    density: f32,
}

impl RasterSurface {
    pub fn new(pixels: RgbaImage, display_width: u32, display_height: u32, density: f32) -> Self {
        Self {
            pixels,
            display_width,
            display_height,
            density,
        }
    }

    /// Backing buffer width in physical pixels
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Backing buffer height in physical pixels
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn display_width(&self) -> u32 {
        self.display_width
    }

    pub fn display_height(&self) -> u32 {
        self.display_height
    }

    /// Clamped density factor the surface was rendered with
    pub fn density(&self) -> f32 {
        self.density
    }

    /// Encode the backing buffer as PNG
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.pixels
            .write_to(&mut Cursor::new(&mut output), image::ImageFormat::Png)?;
        Ok(output)
    }

    /// PNG data URI for inline mounting
    pub fn to_data_uri(&self) -> Result<String> {
        Ok(format!("data:image/png;base64,{}", BASE64.encode(self.encode_png()?)))
    }
}

/// Outcome of resolving one descriptor
///
/// `title` and `thumbnail` are `None` when extraction failed or no engine was
/// available. The thumbnail only ever moves from absent to present.
#[derive(Debug, Clone)]
pub struct ResolvedItem {
    pub descriptor: DocumentDescriptor,
    pub title: Option<String>,
    pub thumbnail: Option<Arc<RasterSurface>>,
}

impl ResolvedItem {
    /// Item with nothing resolved
    pub fn unresolved(descriptor: DocumentDescriptor) -> Self {
        Self {
            descriptor,
            title: None,
            thumbnail: None,
        }
    }

    pub fn has_thumbnail(&self) -> bool {
        self.thumbnail.is_some()
    }

    /// Fill a missing thumbnail. Returns `false` and leaves the item untouched
    /// if a thumbnail is already present.
    pub fn merge_thumbnail(&mut self, surface: Arc<RasterSurface>) -> bool {
        if self.thumbnail.is_some() {
            return false;
        }
        self.thumbnail = Some(surface);
        true
    }
}

/// Curated display titles keyed by exact file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualTitles {
    titles: HashMap<String, String>,
}

impl ManualTitles {
    /// Empty table
    pub fn empty() -> Self {
        Self {
            titles: HashMap::new(),
        }
    }

    /// Add or replace entries
    pub fn with_overrides<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.titles
            .extend(overrides.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.titles.get(file_name).map(String::as_str)
    }

    /// manual override > extracted title (non-empty) > file name
    pub fn display_title(&self, file_name: &str, extracted: Option<&str>) -> String {
        self.get(file_name)
            .or(extracted.filter(|t| !t.is_empty()))
            .unwrap_or(file_name)
            .to_string()
    }
}

impl Default for ManualTitles {
    fn default() -> Self {
        Self::empty().with_overrides([
            ("1.pdf", "Il cemento in Italia — Una storia lunga 150 anni"),
            (
                "2.pdf",
                "Riduzione del Cr VI con triossido di antimonio Sb2O3 e Solfato Ferroso FeSO4",
            ),
            (
                "3.pdf",
                "Formazione e tecniche per il controllo dell'anidride solforosa e di altri composti solforati nei sistemi di forni per cemento",
            ),
        ])
    }
}
