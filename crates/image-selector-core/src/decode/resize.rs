//! Resizing for on-screen previews.
//!
//! The source raster is never resized in place; previews are new rasters.

use super::{FilterType, Raster};
use crate::{Result, SelectorError};

/// Resize a raster to exact dimensions.
///
/// # Errors
///
/// Returns `SelectorError::InvalidRegion` for a zero target dimension and
/// `SelectorError::UnsupportedFormat` if the pixel buffer is inconsistent.
pub fn resize(raster: &Raster, width: u32, height: u32, filter: FilterType) -> Result<Raster> {
    if width == 0 || height == 0 {
        return Err(SelectorError::InvalidRegion(format!(
            "cannot resize to {}x{}",
            width, height
        )));
    }

    if raster.width == width && raster.height == height {
        return Ok(raster.clone());
    }

    let rgb_image = raster.to_rgb_image().ok_or_else(|| {
        SelectorError::UnsupportedFormat("pixel buffer does not match dimensions".to_string())
    })?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());
    Ok(Raster::from_rgb_image(resized))
}

/// Resize a raster by a uniform display scale factor.
///
/// Output dimensions are truncated like a canvas would size the image,
/// with a minimum of one pixel per side.
pub fn resize_by_scale(raster: &Raster, scale: f64, filter: FilterType) -> Result<Raster> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(SelectorError::InvalidRegion(format!(
            "display scale must be positive, got {}",
            scale
        )));
    }
    let (width, height) = scaled_dimensions(raster.width, raster.height, scale);
    resize(raster, width, height, filter)
}

/// Dimensions of a `width` x `height` raster shown at `scale`.
pub fn scaled_dimensions(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let w = ((width as f64) * scale) as u32;
    let h = ((height as f64) * scale) as u32;
    (w.max(1), h.max(1))
}
