//! Session store: the documents open in one run and which one is active.
//!
//! Documents are keyed by their path resolved against the working directory
//! and kept in insertion order, which is also the export order. There is no
//! removal; documents live as long as the session.

mod document;
mod recorder;

use std::path::Path;

pub use document::{Document, Region, RegionMode};
pub use recorder::record;

use crate::config::Config;
use crate::export::ExportManifest;
use crate::loader::{DocumentLoader, LoaderKind};
use crate::pdf::PdfProvider;
use crate::transform::{DisplayRect, Rotation, Viewport};
use crate::{Result, SelectorError};

/// Explicitly constructed session state, owned by the caller.
pub struct Session {
    config: Config,
    loader: DocumentLoader,
    documents: Vec<Document>,
    active: Option<usize>,
}

impl Session {
    /// Empty session. `pdf` is the PDF provider detected at startup, if any.
    pub fn new(config: Config, pdf: Option<Box<dyn PdfProvider>>) -> Self {
        let loader = DocumentLoader::new(&config, pdf);
        Self {
            config,
            loader,
            documents: Vec::new(),
            active: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn loader(&self) -> &DocumentLoader {
        &self.loader
    }

    /// Documents in insertion order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn active(&self) -> Option<&Document> {
        self.active.map(|i| &self.documents[i])
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Total number of recorded regions across all documents.
    pub fn region_count(&self) -> usize {
        self.documents.iter().map(|d| d.regions().len()).sum()
    }

    /// True if any document has regions that were not exported yet.
    pub fn is_dirty(&self) -> bool {
        self.documents.iter().any(Document::is_dirty)
    }

    /// Record the regions `manifest` reports as written.
    ///
    /// Failed regions stay unexported.
    pub fn mark_exported(&mut self, manifest: &ExportManifest) {
        for exported in &manifest.exported {
            if let Some(document) = self
                .documents
                .iter_mut()
                .find(|d| d.source_path() == exported.document)
            {
                document.mark_exported(exported.index);
            }
        }
    }

    /// Index of the document keyed by `path`, if loaded.
    pub fn find(&self, path: impl AsRef<Path>) -> Option<usize> {
        let key = self.config.resolve(path.as_ref());
        self.documents.iter().position(|d| d.source_path() == key)
    }

    /// Load `path` unless already present, and make it the active document.
    ///
    /// Adding a path that is already loaded only switches to it.
    ///
    /// # Errors
    ///
    /// Any loader error; the session is left unchanged.
    pub fn add_document(&mut self, path: impl AsRef<Path>) -> Result<&Document> {
        let key = self.config.resolve(path.as_ref());
        let index = match self.documents.iter().position(|d| d.source_path() == key) {
            Some(index) => {
                log::debug!("{} already open, switching", key.display());
                index
            }
            None => {
                let loaded = self.loader.load(&key)?;
                self.documents.push(Document::new(key, loaded));
                self.documents.len() - 1
            }
        };
        self.active = Some(index);
        Ok(&self.documents[index])
    }

    /// Make the already loaded document at `path` active.
    ///
    /// # Errors
    ///
    /// Returns `SelectorError::UnknownDocument` if `path` is not loaded.
    pub fn switch_active(&mut self, path: impl AsRef<Path>) -> Result<&Document> {
        let index = self
            .find(path.as_ref())
            .ok_or_else(|| SelectorError::UnknownDocument(self.config.resolve(path.as_ref())))?;
        self.active = Some(index);
        Ok(&self.documents[index])
    }

    /// Status line for the document at `index`: `▶ name [n Bereiche]` when
    /// active, two spaces instead of the marker otherwise.
    pub fn status_label(&self, index: usize) -> Option<String> {
        let document = self.documents.get(index)?;
        let marker = if self.active == Some(index) {
            "▶"
        } else {
            " "
        };
        let kind = match document.kind() {
            LoaderKind::Pdf => " (PDF)",
            LoaderKind::Raster => "",
        };
        Some(format!(
            "{} {}{} [{} Bereiche]",
            marker,
            document.display_name(),
            kind,
            document.regions().len()
        ))
    }

    /// Status lines for all documents in order.
    pub fn status_list(&self) -> Vec<String> {
        (0..self.documents.len())
            .filter_map(|i| self.status_label(i))
            .collect()
    }

    /// Rotate the document at `path` by `delta` degrees clockwise.
    ///
    /// Recorded regions are untouched.
    ///
    /// # Errors
    ///
    /// `UnknownDocument` or `InvalidRotation`.
    pub fn rotate(&mut self, path: impl AsRef<Path>, delta: i32) -> Result<Rotation> {
        let index = self
            .find(path.as_ref())
            .ok_or_else(|| SelectorError::UnknownDocument(self.config.resolve(path.as_ref())))?;
        self.rotate_at(index, delta)
    }

    /// Rotate the active document by `delta` degrees clockwise.
    pub fn rotate_active(&mut self, delta: i32) -> Result<Rotation> {
        let index = self.active.ok_or(SelectorError::NoActiveDocument)?;
        self.rotate_at(index, delta)
    }

    fn rotate_at(&mut self, index: usize, delta: i32) -> Result<Rotation> {
        let document = &mut self.documents[index];
        let rotation = document.rotate_by(delta)?;
        log::info!(
            "Rotated {} to {} degrees",
            document.display_name(),
            rotation.degrees()
        );
        Ok(rotation)
    }

    /// Set the active document's viewport as reported by the UI.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        viewport.validate()?;
        self.active_mut()?.set_viewport(viewport);
        Ok(())
    }

    /// Fit the active document into a canvas of the given size.
    pub fn fit_active(&mut self, canvas_width: u32, canvas_height: u32) -> Result<Viewport> {
        let max_scale = self.config.max_display_scale;
        self.active_mut()?
            .fit_to_canvas(canvas_width, canvas_height, max_scale)
    }

    /// Record a drawn rectangle on the active document.
    ///
    /// # Errors
    ///
    /// `NoActiveDocument` on an empty session, `InvalidRegion` when the
    /// rectangle collapses.
    pub fn record_region(
        &mut self,
        display_rect: DisplayRect,
        mode: RegionMode,
    ) -> Result<Region> {
        record(self.active_mut()?, display_rect, mode)
    }

    fn active_mut(&mut self) -> Result<&mut Document> {
        let index = self.active.ok_or(SelectorError::NoActiveDocument)?;
        Ok(&mut self.documents[index])
    }

    #[cfg(test)]
    pub(crate) fn documents_mut(&mut self) -> &mut [Document] {
        &mut self.documents
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use std::path::PathBuf;

    use proptest::prelude::*;

    use super::*;
    use crate::decode::Raster;
    use crate::loader::{LoadedRaster, LoaderKind};

    fn session_with(width: u32, height: u32) -> Session {
        let mut session = Session::new(Config::new("/work"), None);
        let loaded = LoadedRaster {
            kind: LoaderKind::Raster,
            raster: Raster::new(width, height, vec![0; (width * height * 3) as usize]),
            cache_path: None,
        };
        session
            .documents
            .push(Document::new(PathBuf::from("/work/doc.png"), loaded));
        session.active = Some(0);
        session
    }

    fn delta_strategy() -> impl Strategy<Value = i32> {
        prop_oneof![Just(90), Just(-90), Just(180), Just(270), Just(-180)]
    }

    fn rect_strategy() -> impl Strategy<Value = DisplayRect> {
        (0.0f64..60.0, 0.0f64..60.0, 1.0f64..60.0, 1.0f64..60.0)
            .prop_map(|(x, y, w, h)| DisplayRect::new(x, y, x + w, y + h))
    }

    proptest! {
        /// Rotating any number of times never changes recorded regions.
        #[test]
        fn prop_rotation_does_not_mutate_history(
            steps in prop::collection::vec((delta_strategy(), rect_strategy()), 1..12),
            trailing in prop::collection::vec(delta_strategy(), 0..8),
        ) {
            let mut session = session_with(64, 48);
            let mut expected = Vec::new();

            for (delta, rect) in steps {
                session.rotate_active(delta).unwrap();
                if let Ok(region) = session.record_region(rect, RegionMode::Photo) {
                    expected.push(region);
                }
            }

            for delta in trailing {
                session.rotate_active(delta).unwrap();
            }
            // Back to 0 degrees
            let back = -(session.active().unwrap().rotation().degrees() as i32);
            session.rotate_active(back).unwrap();

            let doc = session.active().unwrap();
            prop_assert_eq!(doc.rotation(), Rotation::Deg0);
            prop_assert_eq!(doc.regions(), expected.as_slice());
        }

        /// Recorded regions always lie inside the raster with positive area.
        #[test]
        fn prop_recorded_regions_fit_raster(
            delta in delta_strategy(),
            rect in rect_strategy(),
        ) {
            let mut session = session_with(50, 30);
            session.rotate_active(delta).unwrap();
            match session.record_region(rect, RegionMode::Text) {
                Ok(region) => prop_assert!(region.rect.fits_within(50, 30)),
                Err(e) => {
                    prop_assert!(matches!(e, SelectorError::InvalidRegion(_)));
                    prop_assert_eq!(session.region_count(), 0);
                }
            }
        }
    }
}
