//! Error taxonomy for loading, recording and exporting regions.

use std::path::PathBuf;

use thiserror::Error;

use crate::encode::EncodeError;
use crate::export::RegionFailure;
use crate::pdf::PdfError;

/// Errors surfaced by session, recorder and export operations.
#[derive(Debug, Error)]
pub enum SelectorError {
    /// Extension or content is neither a supported raster format nor PDF.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The PDF exists but cannot be read or has nothing to render.
    #[error("PDF processing failed for {path}: {reason}")]
    PdfProcessingError { path: PathBuf, reason: String },

    /// An optional provider is not installed.
    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    /// The drawn rectangle collapsed or the mode is unknown.
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Unknown document: {}", .0.display())]
    UnknownDocument(PathBuf),

    #[error("No active document")]
    NoActiveDocument,

    /// Rotation deltas must be multiples of 90 degrees.
    #[error("Invalid rotation: {0} degrees")]
    InvalidRotation(i32),

    /// One or more regions could not be exported.
    #[error("Export incomplete: {} region(s) failed", .0.len())]
    ExportPartialFailure(Vec<RegionFailure>),

    #[error("Encoding error: {0}")]
    Encode(#[from] EncodeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SelectorError {
    pub(crate) fn pdf(path: impl Into<PathBuf>, err: PdfError) -> Self {
        match err {
            PdfError::Unavailable(what) => SelectorError::MissingDependency(what),
            PdfError::Invalid(reason) => SelectorError::PdfProcessingError {
                path: path.into(),
                reason,
            },
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SelectorError>;
