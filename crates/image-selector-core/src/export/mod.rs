//! Export pipeline: saved regions become PNG crops and OCR text files.
//!
//! Documents are visited in session order and regions in recording order.
//! A failing region is recorded in the manifest and skipped; it never aborts
//! the rest of the export. Missing OCR degrades to placeholder text.

mod manifest;
mod naming;

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub use manifest::{ExportManifest, ExportedRegion, RegionFailure};
pub use naming::{base_name, timestamp_now, TIMESTAMP_FORMAT};

use naming::Candidate;

use crate::config::{Config, TMP_DIR_NAME};
use crate::decode::Raster;
use crate::encode::write_png;
use crate::ocr::{OcrError, OcrProvider};
use crate::session::{Document, Region, RegionMode, Session};
use crate::transform::{apply_rotation, crop};
use crate::{Result, SelectorError};

/// Text written when no OCR engine is installed.
pub const OCR_UNAVAILABLE_TEXT: &str =
    "[Tesseract nicht verfügbar - bitte tesseract-ocr mit den Sprachpaketen deu und eng installieren]";

/// Text written when OCR ran but found nothing.
pub const NO_TEXT_RECOGNIZED: &str = "[Kein Text erkannt]";

/// Writes regions of a session into `<working_dir>/tmp`.
pub struct Exporter {
    ocr: Option<Box<dyn OcrProvider>>,
    languages: String,
    output_dir: PathBuf,
}

impl Exporter {
    /// `ocr` is the OCR provider detected at startup, if any.
    pub fn new(config: &Config, ocr: Option<Box<dyn OcrProvider>>) -> Self {
        Self {
            ocr,
            languages: config.ocr_languages.clone(),
            output_dir: config.working_dir.join(TMP_DIR_NAME),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn supports_ocr(&self) -> bool {
        self.ocr.is_some()
    }

    /// Export every region of `session` with the current local time.
    pub fn export(&self, session: &Session) -> Result<ExportManifest> {
        self.export_with_timestamp(session, &timestamp_now())
    }

    /// Export every region of `session` using `timestamp` in all file names.
    ///
    /// # Errors
    ///
    /// Only fails if the output directory cannot be created. Per-region
    /// problems are reported in [`ExportManifest::failures`].
    pub fn export_with_timestamp(
        &self,
        session: &Session,
        timestamp: &str,
    ) -> Result<ExportManifest> {
        fs::create_dir_all(&self.output_dir)?;
        let mut manifest = ExportManifest::new(
            timestamp.to_string(),
            self.output_dir.clone(),
            session.documents().len(),
        );

        for document in session.documents() {
            for (i, region) in document.regions().iter().enumerate() {
                let number = i + 1;
                let result =
                    self.export_region(document, number, region, timestamp, &mut manifest.warnings);
                match result {
                    Ok(exported) => manifest.exported.push(exported),
                    Err(e) => {
                        log::warn!(
                            "Export of region {} from {} failed: {}",
                            number,
                            document.display_name(),
                            e
                        );
                        manifest.failures.push(RegionFailure {
                            document: document.source_path().to_path_buf(),
                            index: number,
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        log::info!(
            "Exported {} of {} regions from {} document(s) to {}",
            manifest.exported.len(),
            session.region_count(),
            manifest.document_count,
            self.output_dir.display()
        );
        Ok(manifest)
    }

    fn export_region(
        &self,
        document: &Document,
        number: usize,
        region: &Region,
        timestamp: &str,
        warnings: &mut Vec<String>,
    ) -> Result<ExportedRegion> {
        let cropped = crop(document.raster(), region.rect)?;
        // Show the region the way it was framed
        let output = apply_rotation(&cropped, region.rotation);

        // OCR runs before any file is claimed
        let text = match region.mode {
            RegionMode::Text => Some(self.recognize(&output, document, number, warnings)),
            RegionMode::Photo => None,
        };

        let base = base_name(&document.stem(), timestamp, number, region.mode);
        let candidate = self.write_files(&output, &base, region.mode, |image_file| {
            format!(
                "Textbereich {}\nBildquelle: {}\nOriginal: {}\n\n{}\n",
                number,
                image_file.display(),
                document.source_path().display(),
                text.as_deref().unwrap_or_default()
            )
        })?;

        Ok(ExportedRegion {
            document: document.source_path().to_path_buf(),
            index: number,
            mode: region.mode,
            image_file: candidate.image_file,
            text_file: candidate.text_file,
        })
    }

    /// Write `raster` and, for text regions, the text file under the first
    /// free name derived from `base`.
    ///
    /// The text file is claimed before the PNG is written. A failed attempt
    /// removes whatever it created, so no file is left that the manifest does
    /// not list.
    fn write_files(
        &self,
        raster: &Raster,
        base: &str,
        mode: RegionMode,
        text_contents: impl Fn(&Path) -> String,
    ) -> Result<Candidate> {
        for attempt in 0.. {
            let candidate = Candidate::new(&self.output_dir, base, attempt, mode);
            if candidate.is_taken() {
                continue;
            }

            let text_file = match &candidate.text_file {
                Some(path) => match OpenOptions::new().write(true).create_new(true).open(path) {
                    Ok(file) => Some((path, file)),
                    Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                    Err(e) => return Err(e.into()),
                },
                None => None,
            };

            match write_png(raster, &candidate.image_file, true) {
                Ok(()) => log::info!("Wrote {}", candidate.image_file.display()),
                // Lost a race against another writer: try the next suffix
                Err(SelectorError::Io(e)) if e.kind() == ErrorKind::AlreadyExists => {
                    if let Some((path, _)) = &text_file {
                        discard(path);
                    }
                    continue;
                }
                Err(e) => {
                    discard(&candidate.image_file);
                    if let Some((path, _)) = &text_file {
                        discard(path);
                    }
                    return Err(e);
                }
            }

            if let Some((path, mut file)) = text_file {
                let contents = text_contents(&candidate.image_file);
                if let Err(e) = file.write_all(contents.as_bytes()) {
                    discard(&candidate.image_file);
                    discard(path);
                    return Err(e.into());
                }
                log::info!("Wrote {}", path.display());
            }
            return Ok(candidate);
        }
        Err(SelectorError::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free file name for {}", base),
        )))
    }

    fn recognize(
        &self,
        raster: &Raster,
        document: &Document,
        number: usize,
        warnings: &mut Vec<String>,
    ) -> String {
        let Some(ocr) = self.ocr.as_deref() else {
            warnings.push(format!(
                "{} region {}: OCR not available, placeholder text written",
                document.display_name(),
                number
            ));
            return OCR_UNAVAILABLE_TEXT.to_string();
        };

        match ocr.recognize(raster, &self.languages) {
            Ok(text) if text.trim().is_empty() => NO_TEXT_RECOGNIZED.to_string(),
            Ok(text) => text.trim().to_string(),
            Err(OcrError::Unavailable(reason)) => {
                log::warn!("{} unavailable: {}", ocr.name(), reason);
                warnings.push(format!(
                    "{} region {}: OCR not available ({}), placeholder text written",
                    document.display_name(),
                    number,
                    reason
                ));
                OCR_UNAVAILABLE_TEXT.to_string()
            }
            Err(OcrError::Recognition(reason)) => {
                log::warn!(
                    "{} failed on {} region {}: {}",
                    ocr.name(),
                    document.display_name(),
                    number,
                    reason
                );
                warnings.push(format!(
                    "{} region {}: OCR failed: {}",
                    document.display_name(),
                    number,
                    reason
                ));
                format!("[OCR-Fehler: {}]", reason)
            }
        }
    }
}

/// Remove a file this export created, ignoring one that is already gone.
fn discard(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => log::debug!("Removed {}", path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => log::warn!("Could not remove {}: {}", path.display(), e),
    }
}
