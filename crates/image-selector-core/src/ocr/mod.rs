//! OCR provider seam.
//!
//! Export only needs "recognized text for this crop". Providers report a
//! missing engine (`Unavailable`) separately from a failed recognition so the
//! export pipeline can pick the right placeholder text.

#[cfg(feature = "tesseract")]
mod tesseract;

use thiserror::Error;

use crate::decode::Raster;

#[cfg(feature = "tesseract")]
pub use self::tesseract::TesseractOcr;

/// Errors reported by an OCR provider.
#[derive(Debug, Error)]
pub enum OcrError {
    /// The OCR engine is not installed.
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),

    /// The engine ran but recognition failed.
    #[error("OCR failed: {0}")]
    Recognition(String),
}

/// Recognizes text in a raster.
pub trait OcrProvider {
    /// Name used in log messages.
    fn name(&self) -> &str;

    /// Recognize text using a tesseract-style language string such as `deu+eng`.
    fn recognize(&self, raster: &Raster, languages: &str) -> Result<String, OcrError>;
}

/// Probe for the default OCR engine, if one is compiled in and installed.
pub fn detect() -> Option<Box<dyn OcrProvider>> {
    #[cfg(feature = "tesseract")]
    {
        match TesseractOcr::detect() {
            Ok(provider) => return Some(Box::new(provider)),
            Err(e) => log::warn!("OCR disabled: {}", e),
        }
    }
    #[cfg(not(feature = "tesseract"))]
    log::warn!("OCR disabled: built without the `tesseract` feature");
    None
}
