//! PDF provider seam.
//!
//! The loader only needs two things from a PDF: the first embedded raster of
//! page 1, or a render of page 1. Providers distinguish "the PDF library is
//! not installed" from "this file is broken" so the loader can report
//! `MissingDependency` and `PdfProcessingError` separately.

#[cfg(feature = "pdfium")]
mod pdfium;

use std::path::Path;

use thiserror::Error;

use crate::decode::Raster;

#[cfg(feature = "pdfium")]
pub use self::pdfium::PdfiumProvider;

/// Errors reported by a PDF provider.
#[derive(Debug, Error)]
pub enum PdfError {
    /// The PDF library itself is not available.
    #[error("PDF provider unavailable: {0}")]
    Unavailable(String),

    /// The file could not be opened or rendered.
    #[error("Invalid PDF: {0}")]
    Invalid(String),
}

/// An opened PDF document.
pub trait PdfPages {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// First raster image embedded on page 1, if any.
    fn first_embedded_image(&self) -> Result<Option<Raster>, PdfError>;

    /// Render page `page_index` at `scale` times its nominal 72 DPI size.
    fn render_page(&self, page_index: usize, scale: f32) -> Result<Raster, PdfError>;
}

/// Opens PDF files.
pub trait PdfProvider {
    /// Name used in log and error messages.
    fn name(&self) -> &str;

    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn PdfPages + 'a>, PdfError>;
}

/// Bind the default PDF provider, if one is compiled in and installed.
pub fn detect() -> Option<Box<dyn PdfProvider>> {
    #[cfg(feature = "pdfium")]
    {
        match PdfiumProvider::bind() {
            Ok(provider) => return Some(Box::new(provider)),
            Err(e) => log::warn!("PDF support disabled: {}", e),
        }
    }
    #[cfg(not(feature = "pdfium"))]
    log::warn!("PDF support disabled: built without the `pdfium` feature");
    None
}
