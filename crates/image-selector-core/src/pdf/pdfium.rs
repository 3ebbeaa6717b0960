//! PDF provider backed by a dynamically bound PDFium library.

use std::path::Path;

use pdfium_render::prelude::*;

use super::{PdfError, PdfPages, PdfProvider};
use crate::decode::Raster;

/// PDFium bindings, resolved once at startup.
pub struct PdfiumProvider {
    pdfium: Pdfium,
}

impl PdfiumProvider {
    /// Bind to libpdfium.
    ///
    /// Searches the current directory first, then the system library paths.
    pub fn bind() -> Result<Self, PdfError> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| {
                PdfError::Unavailable(format!(
                    "PDFium library not found, install libpdfium to open PDF files: {:?}",
                    e
                ))
            })?;
        log::info!("PDFium bound, PDF input enabled");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl PdfProvider for PdfiumProvider {
    fn name(&self) -> &str {
        "pdfium"
    }

    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn PdfPages + 'a>, PdfError> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| PdfError::Invalid(format!("{:?}", e)))?;
        Ok(Box::new(PdfiumPages { document }))
    }
}

struct PdfiumPages<'a> {
    document: PdfDocument<'a>,
}

impl PdfiumPages<'_> {
    fn page(&self, page_index: usize) -> Result<PdfPage<'_>, PdfError> {
        let index = PdfPageIndex::try_from(page_index)
            .map_err(|_| PdfError::Invalid(format!("page index {} out of range", page_index)))?;
        self.document
            .pages()
            .get(index)
            .map_err(|e| PdfError::Invalid(format!("{:?}", e)))
    }
}

impl PdfPages for PdfiumPages<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn first_embedded_image(&self) -> Result<Option<Raster>, PdfError> {
        let page = self.page(0)?;
        let image = page
            .objects()
            .iter()
            .find_map(|object| object.as_image_object().map(|image| image.get_raw_image()));

        match image {
            Some(Ok(image)) => Ok(Some(Raster::from_dynamic(image))),
            Some(Err(e)) => Err(PdfError::Invalid(format!(
                "embedded image could not be decoded: {:?}",
                e
            ))),
            None => Ok(None),
        }
    }

    fn render_page(&self, page_index: usize, scale: f32) -> Result<Raster, PdfError> {
        let page = self.page(page_index)?;
        let config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| PdfError::Invalid(format!("{:?}", e)))?;
        Ok(Raster::from_dynamic(bitmap.as_image()))
    }
}
