//! Cropping a source rectangle out of a raster.
//!
//! Crop coordinates are whole source pixels, i.e. exactly what a recorded
//! region stores. The source raster is never modified.

use super::SourceRect;
use crate::decode::Raster;
use crate::{Result, SelectorError};

/// Copy the pixels inside `rect` into a new raster.
///
/// # Errors
///
/// Returns `SelectorError::InvalidRegion` if `rect` is empty or extends
/// beyond the raster. Regions produced by the recorder always fit the raster
/// they were recorded on.
pub fn crop(raster: &Raster, rect: SourceRect) -> Result<Raster> {
    if !rect.fits_within(raster.width, raster.height) {
        return Err(SelectorError::InvalidRegion(format!(
            "crop ({}, {})-({}, {}) does not fit a {}x{} raster",
            rect.x_min, rect.y_min, rect.x_max, rect.y_max, raster.width, raster.height
        )));
    }

    // Fast path: full crop returns a clone
    if rect.width() == raster.width && rect.height() == raster.height {
        return Ok(raster.clone());
    }

    let out_width = rect.width() as usize;
    let out_height = rect.height() as usize;
    let src_width = raster.width as usize;
    let row_bytes = out_width * 3;

    let mut output = Vec::with_capacity(out_width * out_height * 3);

    // Copy pixel data row by row
    for y in 0..out_height {
        let src_y = rect.y_min as usize + y;
        let start = (src_y * src_width + rect.x_min as usize) * 3;
        output.extend_from_slice(&raster.pixels[start..start + row_bytes]);
    }

    Ok(Raster {
        width: out_width as u32,
        height: out_height as u32,
        pixels: output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test raster where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> Raster {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        Raster::new(width, height, pixels)
    }

    #[test]
    fn test_full_crop() {
        let img = test_image(100, 100);
        let result = crop(&img, SourceRect::new(0, 0, 100, 100)).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_center_crop() {
        let img = test_image(10, 10);
        let result = crop(&img, SourceRect::new(2, 2, 8, 8)).unwrap();

        assert_eq!((result.width, result.height), (6, 6));
        // Value at (2, 2) = 2 * 10 + 2 = 22
        assert_eq!(result.pixels[0], 22);
        // Last pixel is (7, 7) = 77
        assert_eq!(result.pixel(5, 5), Some([77, 77, 77]));
    }

    #[test]
    fn test_rectangular_crop() {
        let img = test_image(600, 400);
        let result = crop(&img, SourceRect::new(100, 100, 500, 300)).unwrap();
        assert_eq!((result.width, result.height), (400, 200));
        assert_eq!(result.pixels.len(), 400 * 200 * 3);
        assert_eq!(result.pixel(0, 0), img.pixel(100, 100));
        assert_eq!(result.pixel(399, 199), img.pixel(499, 299));
    }

    #[test]
    fn test_crop_out_of_bounds() {
        let img = test_image(10, 10);
        let result = crop(&img, SourceRect::new(5, 5, 11, 8));
        assert!(matches!(result, Err(SelectorError::InvalidRegion(_))));
    }

    #[test]
    fn test_crop_empty() {
        let img = test_image(10, 10);
        let result = crop(&img, SourceRect::new(5, 5, 5, 8));
        assert!(matches!(result, Err(SelectorError::InvalidRegion(_))));
    }

    #[test]
    fn test_single_pixel_crop() {
        let img = test_image(4, 4);
        let result = crop(&img, SourceRect::new(3, 3, 4, 4)).unwrap();
        assert_eq!((result.width, result.height), (1, 1));
        assert_eq!(result.pixels, vec![15, 15, 15]);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
