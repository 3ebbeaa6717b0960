//! Raster decoding for document loading.
//!
//! This module provides functionality for:
//! - Decoding raster inputs (JPEG, PNG, BMP, GIF) into RGB rasters
//! - Applying EXIF orientation to JPEG inputs
//! - Resizing rasters for on-screen previews
//!
//! PDF inputs are turned into rasters by [`crate::loader`] with help from a
//! [`crate::pdf::PdfProvider`]; the resulting raster type is the same.

mod raster;
mod resize;
mod types;

pub use raster::{decode_raster, extract_orientation};
pub use resize::{resize, resize_by_scale, scaled_dimensions};
pub use types::{FilterType, Orientation, Raster};
