//! Page rasterizer
//!
//! Turns one engine page into a [`RasterSurface`] at a logical scale. The
//! backing buffer is multiplied by the device pixel ratio, clamped to [1, 2]
//! to bound memory on very dense displays; the display size stays at the
//! logical size.

use image::imageops::{self, FilterType};

use crate::document::{DocumentError, EnginePage, PageRenderRequest, RasterSurface, Result};

/// Logical scale for the first resolution pass
pub const FIRST_PASS_SCALE: f32 = 0.60;
/// Logical scale for the thumbnail upgrade pass
pub const UPGRADE_PASS_SCALE: f32 = 0.56;

const MIN_DENSITY: f32 = 1.0;
const MAX_DENSITY: f32 = 2.0;

/// Clamp a device pixel ratio to [1, 2]. Missing or non-finite values count
/// as 1.
pub fn clamp_density(device_pixel_ratio: Option<f32>) -> f32 {
    match device_pixel_ratio {
        Some(dpr) if dpr.is_finite() => dpr.clamp(MIN_DENSITY, MAX_DENSITY),
        _ => MIN_DENSITY,
    }
}

/// Build the render request for a page at `css_scale` and `density`.
///
/// Backing size is `floor(viewport * density)`, display size is
/// `floor(viewport)`.
pub fn plan_render(
    page: &dyn EnginePage,
    css_scale: f32,
    density: f32,
) -> Result<(PageRenderRequest, u32, u32)> {
    let viewport = page.viewport(css_scale);
    if !(viewport.width.is_finite() && viewport.height.is_finite()) {
        return Err(DocumentError::RenderError(format!(
            "page {} has no finite size",
            page.page_number()
        )));
    }

    let width = (viewport.width * density).floor() as u32;
    let height = (viewport.height * density).floor() as u32;
    if width == 0 || height == 0 {
        return Err(DocumentError::RenderError(format!(
            "page {} renders to an empty surface at scale {}",
            page.page_number(),
            css_scale
        )));
    }

    let request = PageRenderRequest {
        css_scale,
        transform: (density != 1.0).then_some(density),
        width,
        height,
    };

    Ok((
        request,
        viewport.width.floor() as u32,
        viewport.height.floor() as u32,
    ))
}

/// Rasterize a page.
///
/// `device_pixel_ratio` is the raw value from the environment; it is clamped
/// here.
pub async fn rasterize(
    page: &dyn EnginePage,
    css_scale: f32,
    device_pixel_ratio: Option<f32>,
) -> Result<RasterSurface> {
    let density = clamp_density(device_pixel_ratio);
    let (request, display_width, display_height) = plan_render(page, css_scale, density)?;

    let mut pixels = page.render(&request).await?;

    // Engines may round the pixmap size differently from the floor() above
    if pixels.width() != request.width || pixels.height() != request.height {
        pixels = imageops::resize(&pixels, request.width, request.height, FilterType::Triangle);
    }

    Ok(RasterSurface::new(pixels, display_width, display_height, density))
}
