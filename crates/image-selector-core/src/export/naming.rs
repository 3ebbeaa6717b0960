//! Export file naming.
//!
//! Base name: `<stem>_<timestamp>_region<nn>_<mode>`. When files with that
//! name already exist, `_1`, `_2`, ... is appended until a free name is found.

use std::path::{Path, PathBuf};

use crate::session::RegionMode;

/// Timestamp format shared by all files of one export call.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Current local time in [`TIMESTAMP_FORMAT`].
pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Base name for region `number` (1-based) of the document with file `stem`.
pub fn base_name(stem: &str, timestamp: &str, number: usize, mode: RegionMode) -> String {
    format!("{}_{}_region{:02}_{}", stem, timestamp, number, mode.as_str())
}

/// Output paths for one naming attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub image_file: PathBuf,
    pub text_file: Option<PathBuf>,
}

impl Candidate {
    /// Paths for `base` with disambiguating `attempt` (0 = no suffix).
    pub(crate) fn new(dir: &Path, base: &str, attempt: usize, mode: RegionMode) -> Self {
        let name = if attempt == 0 {
            base.to_string()
        } else {
            format!("{}_{}", base, attempt)
        };
        Self {
            image_file: dir.join(format!("{}.png", name)),
            text_file: (mode == RegionMode::Text).then(|| dir.join(format!("{}.txt", name))),
        }
    }

    /// True if any of the candidate's files already exists.
    pub(crate) fn is_taken(&self) -> bool {
        self.image_file.exists() || self.text_file.as_deref().is_some_and(Path::exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name() {
        assert_eq!(
            base_name("scan", "20240131_235959", 1, RegionMode::Photo),
            "scan_20240131_235959_region01_foto"
        );
        assert_eq!(
            base_name("doc2", "20240131_235959", 12, RegionMode::Text),
            "doc2_20240131_235959_region12_text"
        );
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = timestamp_now();
        assert_eq!(ts.len(), 15);
        assert_eq!(ts.as_bytes()[8], b'_');
        assert!(ts
            .chars()
            .enumerate()
            .all(|(i, c)| i == 8 || c.is_ascii_digit()));
    }

    #[test]
    fn test_candidate_paths() {
        let dir = Path::new("/out");
        let first = Candidate::new(dir, "a_region01_text", 0, RegionMode::Text);
        assert_eq!(first.image_file, PathBuf::from("/out/a_region01_text.png"));
        assert_eq!(
            first.text_file,
            Some(PathBuf::from("/out/a_region01_text.txt"))
        );

        let second = Candidate::new(dir, "a_region01_foto", 2, RegionMode::Photo);
        assert_eq!(second.image_file, PathBuf::from("/out/a_region01_foto_2.png"));
        assert_eq!(second.text_file, None);
    }

    #[test]
    fn test_candidate_taken_by_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let candidate = Candidate::new(dir.path(), "x", 0, RegionMode::Text);
        assert!(!candidate.is_taken());

        std::fs::write(dir.path().join("x.txt"), "old").unwrap();
        assert!(candidate.is_taken());
        // The same name is free for a photo region
        assert!(!Candidate::new(dir.path(), "x", 0, RegionMode::Photo).is_taken());
    }
}
