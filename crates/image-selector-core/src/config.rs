//! Session configuration and optional-provider capabilities.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::ocr::{self, OcrProvider};
use crate::pdf::{self, PdfProvider};

/// Default OCR languages: German plus English.
pub const DEFAULT_OCR_LANGUAGES: &str = "deu+eng";

/// PDF pages are rendered at twice their nominal 72 DPI size.
pub const DEFAULT_PDF_RENDER_SCALE: f32 = 2.0;

/// Fit-to-window never enlarges beyond this factor.
pub const DEFAULT_MAX_DISPLAY_SCALE: f64 = 1.25;

/// Name of the directory under the working directory that receives all
/// derived and exported files.
pub const TMP_DIR_NAME: &str = "tmp";

/// Configuration resolved once per session.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Root that relative document paths resolve against.
    pub working_dir: PathBuf,
    /// Tesseract language string used for text regions.
    pub ocr_languages: String,
    /// Scale for PDF page renders.
    pub pdf_render_scale: f32,
    /// Upper bound for fit-to-window scaling.
    pub max_display_scale: f64,
}

impl Config {
    /// Configuration with defaults rooted at `working_dir`.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            ocr_languages: DEFAULT_OCR_LANGUAGES.to_string(),
            pdf_render_scale: DEFAULT_PDF_RENDER_SCALE,
            max_display_scale: DEFAULT_MAX_DISPLAY_SCALE,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let working_dir = env::var("IMAGE_SELECTOR_WORKING_DIR")
            .map(PathBuf::from)
            .or_else(|_| env::current_dir())
            .unwrap_or_else(|_| PathBuf::from("."));

        Self {
            working_dir,
            ocr_languages: env::var("IMAGE_SELECTOR_OCR_LANGUAGES")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_OCR_LANGUAGES.to_string()),
            pdf_render_scale: env::var("IMAGE_SELECTOR_PDF_SCALE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|s: &f32| s.is_finite() && *s > 0.0)
                .unwrap_or(DEFAULT_PDF_RENDER_SCALE),
            max_display_scale: env::var("IMAGE_SELECTOR_MAX_DISPLAY_SCALE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|s: &f64| s.is_finite() && *s > 0.0)
                .unwrap_or(DEFAULT_MAX_DISPLAY_SCALE),
        }
    }

    /// `<working_dir>/tmp`, created if missing.
    pub fn tmp_dir(&self) -> std::io::Result<PathBuf> {
        let dir = self.working_dir.join(TMP_DIR_NAME);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Resolve `path` against the working directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Optional providers found at startup.
///
/// Probed once; `None` means the capability is absent for the whole session.
#[derive(Default)]
pub struct Capabilities {
    pub pdf: Option<Box<dyn PdfProvider>>,
    pub ocr: Option<Box<dyn OcrProvider>>,
}

impl Capabilities {
    /// Probe the compiled-in providers.
    pub fn detect() -> Self {
        let capabilities = Self {
            pdf: pdf::detect(),
            ocr: ocr::detect(),
        };
        log::info!("Detected capabilities: {:?}", capabilities);
        capabilities
    }

    /// No optional providers at all.
    pub fn none() -> Self {
        Self::default()
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("pdf", &self.pdf.as_ref().map(|p| p.name()))
            .field("ocr", &self.ocr.as_ref().map(|o| o.name()))
            .finish()
    }
}
