//! OCR provider using the system tesseract executable via rusty-tesseract.

use std::collections::HashMap;

use rusty_tesseract::{Args, Image};

use super::{OcrError, OcrProvider};
use crate::decode::Raster;

/// Tesseract OCR, verified to be installed at construction.
pub struct TesseractOcr {
    version: String,
}

impl TesseractOcr {
    /// Check that a tesseract executable is on the PATH.
    pub fn detect() -> Result<Self, OcrError> {
        let version = rusty_tesseract::get_tesseract_version()
            .map_err(|e| OcrError::Unavailable(format!("tesseract not found: {}", e)))?;
        log::info!("Using tesseract {}", version.trim());
        Ok(Self {
            version: version.trim().to_string(),
        })
    }
}

impl OcrProvider for TesseractOcr {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, raster: &Raster, languages: &str) -> Result<String, OcrError> {
        let dynamic = raster
            .to_dynamic()
            .ok_or_else(|| OcrError::Recognition("pixel buffer does not match dimensions".into()))?;

        let image = Image::from_dynamic_image(&dynamic).map_err(|e| {
            OcrError::Recognition(format!("Failed to create tesseract image: {}", e))
        })?;

        let args = Args {
            lang: languages.to_string(),
            config_variables: HashMap::new(),
            dpi: Some(150),
            psm: Some(3), // Fully automatic page segmentation
            oem: Some(3), // Default OCR Engine Mode
        };

        log::debug!(
            "Running tesseract {} ({}) on {}x{} crop",
            self.version,
            languages,
            raster.width,
            raster.height
        );
        rusty_tesseract::image_to_string(&image, &args)
            .map_err(|e| OcrError::Recognition(e.to_string()))
    }
}
