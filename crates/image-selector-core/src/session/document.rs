//! Documents and the regions recorded on them.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::decode::{resize_by_scale, FilterType, Raster};
use crate::loader::{LoadedRaster, LoaderKind};
use crate::transform::{apply_rotation, fit_scale, Rotation, SourceRect, Transform, Viewport};
use crate::{Result, SelectorError};

/// What a region is exported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionMode {
    /// Cropped image only.
    #[serde(rename = "foto", alias = "photo")]
    Photo,
    /// Cropped image plus recognized text.
    #[serde(rename = "text")]
    Text,
}

impl RegionMode {
    /// Name used in export file names.
    pub fn as_str(self) -> &'static str {
        match self {
            RegionMode::Photo => "foto",
            RegionMode::Text => "text",
        }
    }
}

impl fmt::Display for RegionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegionMode {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "foto" | "photo" => Ok(RegionMode::Photo),
            "text" => Ok(RegionMode::Text),
            other => Err(SelectorError::InvalidRegion(format!(
                "unknown region mode '{}' (expected foto or text)",
                other
            ))),
        }
    }
}

/// A saved rectangle in source-raster pixels.
///
/// Immutable once recorded. `rotation` is the document rotation that was
/// active when the rectangle was drawn; export rotates the crop by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub rect: SourceRect,
    pub mode: RegionMode,
    pub rotation: Rotation,
}

impl Region {
    /// List entry for the region with 1-based `number`, e.g. `2. TEXT (400x200)`.
    pub fn label(&self, number: usize) -> String {
        format!(
            "{}. {} ({}x{})",
            number,
            self.mode.as_str().to_uppercase(),
            self.rect.width(),
            self.rect.height()
        )
    }
}

/// One loaded input plus its display state and recorded regions.
#[derive(Debug, Clone)]
pub struct Document {
    source_path: PathBuf,
    kind: LoaderKind,
    cache_path: Option<PathBuf>,
    raster: Raster,
    rotation: Rotation,
    viewport: Viewport,
    regions: Vec<Region>,
    /// 1-based numbers of regions that were written by an export.
    exported: BTreeSet<usize>,
}

impl Document {
    pub(crate) fn new(source_path: PathBuf, loaded: LoadedRaster) -> Self {
        Self {
            source_path,
            kind: loaded.kind,
            cache_path: loaded.cache_path,
            raster: loaded.raster,
            rotation: Rotation::Deg0,
            viewport: Viewport::default(),
            regions: Vec::new(),
            exported: BTreeSet::new(),
        }
    }

    /// Resolved input path; the document's key within a session.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// File name of the input, for status lines.
    pub fn display_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source_path.display().to_string())
    }

    /// File stem of the input, used as the export base name.
    pub fn stem(&self) -> String {
        self.source_path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string())
    }

    pub fn kind(&self) -> LoaderKind {
        self.kind
    }

    /// PNG written for PDF inputs.
    pub fn cache_path(&self) -> Option<&Path> {
        self.cache_path.as_deref()
    }

    /// The unrotated source raster.
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Regions in recording order; position + 1 is the region number.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// True if some region has not been written by an export yet.
    pub fn is_dirty(&self) -> bool {
        (1..=self.regions.len()).any(|n| !self.exported.contains(&n))
    }

    /// Region list entries for the UI.
    pub fn region_labels(&self) -> Vec<String> {
        self.regions
            .iter()
            .enumerate()
            .map(|(i, region)| region.label(i + 1))
            .collect()
    }

    /// Transform descriptor for the current rotation and viewport.
    pub fn transform(&self) -> Transform {
        Transform::new(
            self.rotation,
            self.viewport,
            self.raster.width,
            self.raster.height,
        )
    }

    /// Dimensions of the raster as displayed at the current rotation.
    pub fn display_dimensions(&self) -> (u32, u32) {
        self.rotation
            .display_dimensions(self.raster.width, self.raster.height)
    }

    /// Preview raster: rotated, then scaled by the viewport scale.
    pub fn display_raster(&self) -> Result<Raster> {
        let rotated = apply_rotation(&self.raster, self.rotation);
        if (self.viewport.scale - 1.0).abs() < f64::EPSILON {
            return Ok(rotated);
        }
        resize_by_scale(&rotated, self.viewport.scale, FilterType::Bilinear)
    }

    pub(crate) fn rotate_by(&mut self, delta: i32) -> Result<Rotation> {
        self.rotation = self.rotation.rotated_by(delta)?;
        Ok(self.rotation)
    }

    pub(crate) fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Fit the displayed raster into a canvas, keeping pan at the origin.
    ///
    /// An empty canvas is rejected and leaves the viewport unchanged.
    pub(crate) fn fit_to_canvas(
        &mut self,
        canvas_width: u32,
        canvas_height: u32,
        max_scale: f64,
    ) -> Result<Viewport> {
        let (w, h) = self.display_dimensions();
        let scale = fit_scale(w, h, canvas_width, canvas_height, max_scale);
        let viewport = Viewport::with_scale(scale);
        viewport.validate()?;
        self.viewport = viewport;
        Ok(viewport)
    }

    pub(crate) fn push_region(&mut self, region: Region) {
        self.regions.push(region);
    }

    /// Record that region `number` (1-based) was written.
    pub(crate) fn mark_exported(&mut self, number: usize) {
        if (1..=self.regions.len()).contains(&number) {
            self.exported.insert(number);
        }
    }

    #[cfg(test)]
    pub(crate) fn regions_mut(&mut self) -> &mut Vec<Region> {
        &mut self.regions
    }
}
