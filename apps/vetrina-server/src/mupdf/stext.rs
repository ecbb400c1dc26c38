//! Text and pixel helpers for MuPDF pages

use image::RgbaImage;
use mupdf::{Page, Pixmap, TextPageOptions};

use crate::document::{DocumentError, Result};

/// Plain text of a page, one item per line in reading order.
///
/// Lines without any characters are skipped.
pub fn extract_text_lines(page: &Page) -> Result<Vec<String>> {
    let text_page = page
        .to_text_page(TextPageOptions::empty())
        .map_err(|e| DocumentError::TextExtractionError(e.to_string()))?;

    let mut lines = Vec::new();
    for block in text_page.blocks() {
        for line in block.lines() {
            let text: String = line.chars().filter_map(|ch| ch.char()).collect();
            if !text.is_empty() {
                lines.push(text);
            }
        }
    }

    Ok(lines)
}

/// Copy a pixmap into an opaque RGBA buffer.
///
/// Handles gray, RGB and RGBA sample layouts; missing alpha becomes 255.
pub fn pixmap_to_rgba(pixmap: &Pixmap) -> Result<RgbaImage> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize;
    let stride = pixmap.stride() as usize;

    let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = y * stride + x * n;
            let sample = |i: usize| samples.get(offset + i).copied();
            let (r, g, b) = if n >= 3 {
                (
                    sample(0).unwrap_or(0),
                    sample(1).unwrap_or(0),
                    sample(2).unwrap_or(0),
                )
            } else {
                let v = sample(0).unwrap_or(0);
                (v, v, v)
            };
            let a = if n == 4 || n == 2 {
                sample(n - 1).unwrap_or(255)
            } else {
                255
            };
            rgba.extend_from_slice(&[r, g, b, a]);
        }
    }

    RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| DocumentError::ImageError("Failed to create image buffer".to_string()))
}
