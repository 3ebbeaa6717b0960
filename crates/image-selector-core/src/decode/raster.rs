//! Raster decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageFormat, ImageReader};

use super::{Orientation, Raster};
use crate::{Result, SelectorError};

/// Decode raster bytes (JPEG, PNG, BMP, GIF) into an upright RGB raster.
///
/// The format is sniffed from the content, not the file name. JPEG inputs
/// have their EXIF orientation applied so the raster matches what viewers
/// show; other formats are taken as stored.
///
/// # Errors
///
/// Returns `SelectorError::UnsupportedFormat` if the decoder rejects the bytes.
pub fn decode_raster(bytes: &[u8]) -> Result<Raster> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| SelectorError::UnsupportedFormat(e.to_string()))?;

    let format = reader.format();
    let img = reader
        .decode()
        .map_err(|e| SelectorError::UnsupportedFormat(e.to_string()))?;

    let img = if format == Some(ImageFormat::Jpeg) {
        apply_orientation(img, extract_orientation(bytes))
    } else {
        img
    };

    Ok(Raster::from_dynamic(img))
}

/// Read the EXIF orientation tag, `Normal` when absent or unreadable.
pub fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
