//! Document loading: turns an input path into a source raster.
//!
//! Raster inputs are decoded directly. PDF inputs go through the PDF provider:
//! the first image embedded on page 1 is used if there is one, otherwise page
//! 1 is rendered. Either way the result is cached as PNG under `tmp/`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::decode::{decode_raster, Raster};
use crate::encode::write_png;
use crate::pdf::PdfProvider;
use crate::{Result, SelectorError};

/// Raster extensions accepted for direct decoding.
pub const RASTER_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

/// How a document is turned into a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderKind {
    Raster,
    Pdf,
}

impl LoaderKind {
    /// Classify a path by its (case-insensitive) extension.
    ///
    /// # Errors
    ///
    /// Returns `SelectorError::UnsupportedFormat` for anything that is neither
    /// a known raster extension nor `pdf`.
    pub fn classify(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if ext == "pdf" {
            Ok(LoaderKind::Pdf)
        } else if RASTER_EXTENSIONS.contains(&ext.as_str()) {
            Ok(LoaderKind::Raster)
        } else {
            Err(SelectorError::UnsupportedFormat(format!(
                "{} (supported: {}, pdf)",
                path.display(),
                RASTER_EXTENSIONS.join(", ")
            )))
        }
    }
}

/// Where a PDF raster came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PdfSource {
    Extracted,
    Rendered,
}

impl PdfSource {
    fn suffix(self) -> &'static str {
        match self {
            PdfSource::Extracted => "extracted",
            PdfSource::Rendered => "rendered",
        }
    }
}

/// A successfully loaded source raster.
#[derive(Debug, Clone)]
pub struct LoadedRaster {
    pub kind: LoaderKind,
    pub raster: Raster,
    /// PNG cache written for PDF inputs.
    pub cache_path: Option<PathBuf>,
}

/// Loads documents, using the PDF provider found at startup if any.
pub struct DocumentLoader {
    tmp_dir: PathBuf,
    pdf: Option<Box<dyn PdfProvider>>,
    pdf_render_scale: f32,
}

impl DocumentLoader {
    pub fn new(config: &Config, pdf: Option<Box<dyn PdfProvider>>) -> Self {
        Self {
            tmp_dir: config.working_dir.join(crate::config::TMP_DIR_NAME),
            pdf,
            pdf_render_scale: config.pdf_render_scale,
        }
    }

    /// Whether PDF inputs can be loaded at all.
    pub fn supports_pdf(&self) -> bool {
        self.pdf.is_some()
    }

    /// Load the raster for `path` (already resolved against the working dir).
    ///
    /// # Errors
    ///
    /// - `UnsupportedFormat` for unknown extensions or undecodable raster bytes
    /// - `MissingDependency` when `path` is a PDF and no PDF provider exists
    /// - `PdfProcessingError` when the PDF cannot be opened or has no page 1
    /// - `Io` when the file cannot be read or the cache cannot be written
    pub fn load(&self, path: &Path) -> Result<LoadedRaster> {
        match LoaderKind::classify(path)? {
            LoaderKind::Raster => self.load_raster(path),
            LoaderKind::Pdf => self.load_pdf(path),
        }
    }

    fn load_raster(&self, path: &Path) -> Result<LoadedRaster> {
        let bytes = fs::read(path)?;
        let raster = decode_raster(&bytes)?;
        log::info!(
            "Loaded {} ({}x{})",
            path.display(),
            raster.width,
            raster.height
        );
        Ok(LoadedRaster {
            kind: LoaderKind::Raster,
            raster,
            cache_path: None,
        })
    }

    fn load_pdf(&self, path: &Path) -> Result<LoadedRaster> {
        let provider = self.pdf.as_deref().ok_or_else(|| {
            SelectorError::MissingDependency(
                "PDF support is not available, install the PDFium library".to_string(),
            )
        })?;

        let document = provider
            .open(path)
            .map_err(|e| SelectorError::pdf(path, e))?;
        if document.page_count() == 0 {
            return Err(SelectorError::PdfProcessingError {
                path: path.to_path_buf(),
                reason: "document has no pages".to_string(),
            });
        }

        let embedded = document
            .first_embedded_image()
            .map_err(|e| SelectorError::pdf(path, e))?
            .filter(|raster| !raster.is_empty());
        let (raster, source) = match embedded {
            Some(raster) => (raster, PdfSource::Extracted),
            None => {
                let raster = document
                    .render_page(0, self.pdf_render_scale)
                    .map_err(|e| SelectorError::pdf(path, e))?;
                (raster, PdfSource::Rendered)
            }
        };

        if raster.is_empty() {
            return Err(SelectorError::PdfProcessingError {
                path: path.to_path_buf(),
                reason: "page 1 rendered to an empty image".to_string(),
            });
        }

        let cache_path = self.cache_path(path, source);
        fs::create_dir_all(&self.tmp_dir)?;
        write_png(&raster, &cache_path, false)?;
        log::info!(
            "Loaded {} via {} ({}x{}), cached as {}",
            path.display(),
            provider.name(),
            raster.width,
            raster.height,
            cache_path.display()
        );

        Ok(LoadedRaster {
            kind: LoaderKind::Pdf,
            raster,
            cache_path: Some(cache_path),
        })
    }

    fn cache_path(&self, path: &Path, source: PdfSource) -> PathBuf {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        self.tmp_dir
            .join(format!("{}_{}.png", stem, source.suffix()))
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::pdf::{PdfError, PdfPages};

    /// Solid-color page of `width` x `height` points.
    pub(crate) fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Raster {
        let pixels = rgb
            .iter()
            .copied()
            .cycle()
            .take((width * height * 3) as usize)
            .collect();
        Raster::new(width, height, pixels)
    }

    /// In-memory PDF provider. `opens` counts calls to `open`.
    #[derive(Clone, Default)]
    pub(crate) struct FakePdf {
        pub pages: usize,
        pub embedded: Option<Raster>,
        pub page_size: (u32, u32),
        pub broken: bool,
        pub opens: Rc<Cell<usize>>,
    }

    impl FakePdf {
        pub(crate) fn page_only(width: u32, height: u32) -> Self {
            Self {
                pages: 1,
                page_size: (width, height),
                ..Self::default()
            }
        }
    }

    struct FakePages(FakePdf);

    impl PdfPages for FakePages {
        fn page_count(&self) -> usize {
            self.0.pages
        }

        fn first_embedded_image(&self) -> std::result::Result<Option<Raster>, PdfError> {
            Ok(self.0.embedded.clone())
        }

        fn render_page(
            &self,
            _page_index: usize,
            scale: f32,
        ) -> std::result::Result<Raster, PdfError> {
            let (w, h) = self.0.page_size;
            let w = (w as f32 * scale) as u32;
            let h = (h as f32 * scale) as u32;
            Ok(solid(w, h, [255, 255, 255]))
        }
    }

    impl PdfProvider for FakePdf {
        fn name(&self) -> &str {
            "fake"
        }

        fn open<'a>(
            &'a self,
            _path: &Path,
        ) -> std::result::Result<Box<dyn PdfPages + 'a>, PdfError> {
            self.opens.set(self.opens.get() + 1);
            if self.broken {
                return Err(PdfError::Invalid("not a PDF".to_string()));
            }
            Ok(Box::new(FakePages(self.clone())))
        }
    }
}
