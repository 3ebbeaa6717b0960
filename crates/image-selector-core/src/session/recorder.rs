//! Region recording: drawn display rectangles become source-pixel regions.

use super::{Document, Region, RegionMode};
use crate::transform::DisplayRect;
use crate::Result;

/// Convert `display_rect` with the document's current transform and append
/// the result to its region list.
///
/// The region remembers the rotation in effect now; later rotations of the
/// document never touch it.
///
/// # Errors
///
/// Returns `SelectorError::InvalidRegion` when the rectangle collapses to
/// zero area after clamping and rounding. The region list is unchanged then.
pub fn record(
    document: &mut Document,
    display_rect: DisplayRect,
    mode: RegionMode,
) -> Result<Region> {
    let rect = document.transform().display_to_source(display_rect)?;
    let region = Region {
        rect,
        mode,
        rotation: document.rotation(),
    };
    document.push_region(region);
    log::debug!(
        "Recorded region {} on {}: ({}, {})-({}, {}) {} at {} degrees",
        document.regions().len(),
        document.display_name(),
        rect.x_min,
        rect.y_min,
        rect.x_max,
        rect.y_max,
        mode,
        region.rotation.degrees()
    );
    Ok(region)
}
