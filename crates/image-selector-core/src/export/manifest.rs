//! Result of one export call.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::session::RegionMode;
use crate::SelectorError;

/// One region written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedRegion {
    /// Source path of the owning document.
    pub document: PathBuf,
    /// 1-based region number within the document.
    pub index: usize,
    pub mode: RegionMode,
    pub image_file: PathBuf,
    /// Companion OCR file, text mode only.
    pub text_file: Option<PathBuf>,
}

impl ExportedRegion {
    /// All files written for this region.
    pub fn files(&self) -> impl Iterator<Item = &PathBuf> {
        std::iter::once(&self.image_file).chain(self.text_file.iter())
    }
}

/// A region that could not be exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionFailure {
    pub document: PathBuf,
    pub index: usize,
    pub error: String,
}

/// Successes, warnings and failures of one export call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportManifest {
    /// `YYYYMMDD_HHMMSS`, shared by every file of this call.
    pub timestamp: String,
    pub output_dir: PathBuf,
    /// Number of documents in the exported session.
    pub document_count: usize,
    pub exported: Vec<ExportedRegion>,
    /// Degradations that did not prevent a region from being written.
    pub warnings: Vec<String>,
    pub failures: Vec<RegionFailure>,
}

impl ExportManifest {
    pub(crate) fn new(timestamp: String, output_dir: PathBuf, document_count: usize) -> Self {
        Self {
            timestamp,
            output_dir,
            document_count,
            exported: Vec::new(),
            warnings: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Number of files written (images plus text files).
    pub fn file_count(&self) -> usize {
        self.exported.iter().map(|r| r.files().count()).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// `ExportPartialFailure` listing every failed region, if any failed.
    pub fn failure_error(&self) -> Option<SelectorError> {
        if self.failures.is_empty() {
            None
        } else {
            Some(SelectorError::ExportPartialFailure(self.failures.clone()))
        }
    }
}
