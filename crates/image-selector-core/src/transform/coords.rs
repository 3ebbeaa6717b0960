//! Mapping between display space and source space.
//!
//! # Coordinate System
//!
//! - Source space: pixel edges of the original, unrotated raster. A raster of
//!   `W x H` pixels spans `[0, W] x [0, H]`.
//! - Display space: what the operator sees. The raster is rotated clockwise by
//!   the document's rotation, multiplied by the viewport scale and offset by
//!   the viewport pan (the on-canvas position of the image's top-left corner).
//!
//! Converting a drawn rectangle undoes those steps in reverse order: pan,
//! then scale, then rotation. Rectangles are axis-aligned in both spaces
//! because all rotations are quarter turns.

use serde::{Deserialize, Serialize};

use super::Rotation;
use crate::{Result, SelectorError};

/// A rectangle in display space, as dragged by the operator.
///
/// Corners may be given in any order; accessors return normalized edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl DisplayRect {
    /// Rectangle spanned by two opposite corners.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    pub fn width(&self) -> f64 {
        (self.x2 - self.x1).abs()
    }

    pub fn height(&self) -> f64 {
        (self.y2 - self.y1).abs()
    }

    fn is_finite(&self) -> bool {
        self.x1.is_finite() && self.y1.is_finite() && self.x2.is_finite() && self.y2.is_finite()
    }
}

/// A rectangle in source-raster pixels.
///
/// Invariant when produced by [`Transform::display_to_source`]:
/// `x_min < x_max`, `y_min < y_max`, and the rectangle lies inside the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRect {
    pub x_min: u32,
    pub y_min: u32,
    pub x_max: u32,
    pub y_max: u32,
}

impl SourceRect {
    pub fn new(x_min: u32, y_min: u32, x_max: u32, y_max: u32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn width(&self) -> u32 {
        self.x_max.saturating_sub(self.x_min)
    }

    pub fn height(&self) -> u32 {
        self.y_max.saturating_sub(self.y_min)
    }

    /// True if the rectangle has positive area and fits a `width` x `height` raster.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x_min < self.x_max
            && self.y_min < self.y_max
            && self.x_max <= width
            && self.y_max <= height
    }
}

/// Display scale and pan of a document on the operator's canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Display pixels per source pixel.
    pub scale: f64,
    /// Canvas x of the displayed image's left edge.
    pub pan_x: f64,
    /// Canvas y of the displayed image's top edge.
    pub pan_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl Viewport {
    pub fn with_scale(scale: f64) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(SelectorError::InvalidRegion(format!(
                "display scale must be positive, got {}",
                self.scale
            )));
        }
        if !self.pan_x.is_finite() || !self.pan_y.is_finite() {
            return Err(SelectorError::InvalidRegion(
                "display pan must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Scale that fits a raster into a canvas, capped at `max_scale`.
///
/// `width` and `height` are the displayed (rotated) dimensions. A degenerate
/// raster yields 1.0.
pub fn fit_scale(
    width: u32,
    height: u32,
    canvas_width: u32,
    canvas_height: u32,
    max_scale: f64,
) -> f64 {
    if width == 0 || height == 0 {
        return 1.0;
    }
    let scale_x = canvas_width as f64 / width as f64;
    let scale_y = canvas_height as f64 / height as f64;
    scale_x.min(scale_y).min(max_scale)
}

/// Per-document transform descriptor.
///
/// Derived on demand from the document's rotation and viewport; never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub rotation: Rotation,
    pub viewport: Viewport,
    /// Width of the unrotated source raster.
    pub source_width: u32,
    /// Height of the unrotated source raster.
    pub source_height: u32,
}

impl Transform {
    pub fn new(
        rotation: Rotation,
        viewport: Viewport,
        source_width: u32,
        source_height: u32,
    ) -> Self {
        Self {
            rotation,
            viewport,
            source_width,
            source_height,
        }
    }

    /// Convert a drawn rectangle into source-raster pixels.
    ///
    /// The result is clamped to the raster and rounded to whole pixel edges.
    ///
    /// # Errors
    ///
    /// Returns `SelectorError::InvalidRegion` if the viewport is degenerate,
    /// the rectangle is not finite, or nothing of positive area remains
    /// after clamping and rounding.
    pub fn display_to_source(&self, rect: DisplayRect) -> Result<SourceRect> {
        self.viewport.validate()?;
        if !rect.is_finite() {
            return Err(SelectorError::InvalidRegion(
                "rectangle coordinates must be finite".to_string(),
            ));
        }

        let (ax, ay) = self.display_point_to_source(rect.x1, rect.y1);
        let (bx, by) = self.display_point_to_source(rect.x2, rect.y2);

        let w = self.source_width as f64;
        let h = self.source_height as f64;
        let x_min = ax.min(bx).clamp(0.0, w).round() as u32;
        let x_max = ax.max(bx).clamp(0.0, w).round() as u32;
        let y_min = ay.min(by).clamp(0.0, h).round() as u32;
        let y_max = ay.max(by).clamp(0.0, h).round() as u32;

        if x_max <= x_min || y_max <= y_min {
            return Err(SelectorError::InvalidRegion(format!(
                "rectangle collapses to {}x{} source pixels",
                x_max.saturating_sub(x_min),
                y_max.saturating_sub(y_min)
            )));
        }

        Ok(SourceRect::new(x_min, y_min, x_max, y_max))
    }

    /// Convert a source rectangle into display space, e.g. to draw an overlay.
    pub fn source_to_display(&self, rect: SourceRect) -> DisplayRect {
        let (ax, ay) = self.source_point_to_display(rect.x_min as f64, rect.y_min as f64);
        let (bx, by) = self.source_point_to_display(rect.x_max as f64, rect.y_max as f64);
        DisplayRect::new(ax, ay, bx, by)
    }

    fn display_point_to_source(&self, x: f64, y: f64) -> (f64, f64) {
        let Viewport {
            scale,
            pan_x,
            pan_y,
        } = self.viewport;
        // Undo pan and scale: rotated-raster coordinates
        let rx = (x - pan_x) / scale;
        let ry = (y - pan_y) / scale;

        let w = self.source_width as f64;
        let h = self.source_height as f64;
        match self.rotation {
            Rotation::Deg0 => (rx, ry),
            Rotation::Deg90 => (ry, h - rx),
            Rotation::Deg180 => (w - rx, h - ry),
            Rotation::Deg270 => (w - ry, rx),
        }
    }

    fn source_point_to_display(&self, sx: f64, sy: f64) -> (f64, f64) {
        let w = self.source_width as f64;
        let h = self.source_height as f64;
        let (rx, ry) = match self.rotation {
            Rotation::Deg0 => (sx, sy),
            Rotation::Deg90 => (h - sy, sx),
            Rotation::Deg180 => (w - sx, h - sy),
            Rotation::Deg270 => (sy, w - sx),
        };
        let Viewport {
            scale,
            pan_x,
            pan_y,
        } = self.viewport;
        (rx * scale + pan_x, ry * scale + pan_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform(rotation: Rotation, scale: f64) -> Transform {
        Transform::new(rotation, Viewport::with_scale(scale), 1000, 600)
    }

    #[test]
    fn test_identity_mapping() {
        let t = transform(Rotation::Deg0, 1.0);
        let src = t
            .display_to_source(DisplayRect::new(100.0, 100.0, 500.0, 300.0))
            .unwrap();
        assert_eq!(src, SourceRect::new(100, 100, 500, 300));
    }

    #[test]
    fn test_scale_is_undone() {
        let t = transform(Rotation::Deg0, 0.5);
        let src = t
            .display_to_source(DisplayRect::new(50.0, 50.0, 250.0, 150.0))
            .unwrap();
        assert_eq!(src, SourceRect::new(100, 100, 500, 300));
    }

    #[test]
    fn test_pan_is_undone() {
        let viewport = Viewport {
            scale: 2.0,
            pan_x: 10.0,
            pan_y: 20.0,
        };
        let t = Transform::new(Rotation::Deg0, viewport, 1000, 600);
        let src = t
            .display_to_source(DisplayRect::new(210.0, 220.0, 1010.0, 620.0))
            .unwrap();
        assert_eq!(src, SourceRect::new(100, 100, 500, 300));
    }

    #[test]
    fn test_corner_order_is_irrelevant() {
        let t = transform(Rotation::Deg0, 1.0);
        let a = t
            .display_to_source(DisplayRect::new(500.0, 300.0, 100.0, 100.0))
            .unwrap();
        assert_eq!(a, SourceRect::new(100, 100, 500, 300));
    }

    #[test]
    fn test_rotation_90() {
        // Displayed image is 600 wide, 1000 tall. The top-left display
        // corner shows the source's bottom-left corner.
        let t = transform(Rotation::Deg90, 1.0);
        let src = t
            .display_to_source(DisplayRect::new(0.0, 0.0, 100.0, 50.0))
            .unwrap();
        assert_eq!(src, SourceRect::new(0, 500, 50, 600));
    }

    #[test]
    fn test_rotation_180() {
        let t = transform(Rotation::Deg180, 1.0);
        let src = t
            .display_to_source(DisplayRect::new(0.0, 0.0, 100.0, 50.0))
            .unwrap();
        assert_eq!(src, SourceRect::new(900, 550, 1000, 600));
    }

    #[test]
    fn test_rotation_270() {
        // The top-left display corner shows the source's top-right corner.
        let t = transform(Rotation::Deg270, 1.0);
        let src = t
            .display_to_source(DisplayRect::new(0.0, 0.0, 100.0, 50.0))
            .unwrap();
        assert_eq!(src, SourceRect::new(950, 0, 1000, 100));
    }

    #[test]
    fn test_clamps_to_raster() {
        let t = transform(Rotation::Deg0, 1.0);
        let src = t
            .display_to_source(DisplayRect::new(-50.0, -10.0, 2000.0, 300.0))
            .unwrap();
        assert_eq!(src, SourceRect::new(0, 0, 1000, 300));
    }

    #[test]
    fn test_outside_raster_is_invalid() {
        let t = transform(Rotation::Deg0, 1.0);
        let result = t.display_to_source(DisplayRect::new(1200.0, 10.0, 1300.0, 50.0));
        assert!(matches!(result, Err(SelectorError::InvalidRegion(_))));
    }

    #[test]
    fn test_zero_area_is_invalid() {
        let t = transform(Rotation::Deg0, 1.0);
        let result = t.display_to_source(DisplayRect::new(10.0, 10.0, 10.0, 80.0));
        assert!(matches!(result, Err(SelectorError::InvalidRegion(_))));

        // Sub-pixel after undoing a large zoom
        let t = transform(Rotation::Deg0, 10.0);
        let result = t.display_to_source(DisplayRect::new(100.0, 100.0, 103.0, 200.0));
        assert!(matches!(result, Err(SelectorError::InvalidRegion(_))));
    }

    #[test]
    fn test_non_finite_is_invalid() {
        let t = transform(Rotation::Deg0, 1.0);
        let result = t.display_to_source(DisplayRect::new(f64::NAN, 0.0, 10.0, 10.0));
        assert!(matches!(result, Err(SelectorError::InvalidRegion(_))));
    }

    #[test]
    fn test_degenerate_viewport_is_invalid() {
        let t = transform(Rotation::Deg0, 0.0);
        let result = t.display_to_source(DisplayRect::new(0.0, 0.0, 10.0, 10.0));
        assert!(matches!(result, Err(SelectorError::InvalidRegion(_))));
    }

    #[test]
    fn test_source_to_display_rotation_90() {
        let t = transform(Rotation::Deg90, 1.0);
        let display = t.source_to_display(SourceRect::new(0, 500, 50, 600));
        assert_eq!(display, DisplayRect::new(0.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn test_fit_scale() {
        // Canvas larger than image: capped at the maximum
        assert_eq!(fit_scale(100, 100, 1000, 1000, 1.25), 1.25);
        // Width-bound
        assert_eq!(fit_scale(2000, 1000, 1000, 1000, 1.25), 0.5);
        // Height-bound
        assert_eq!(fit_scale(1000, 4000, 1000, 1000, 1.25), 0.25);
        // Degenerate raster
        assert_eq!(fit_scale(0, 100, 1000, 1000, 1.25), 1.0);
    }

    #[test]
    fn test_source_rect_fits_within() {
        assert!(SourceRect::new(0, 0, 10, 10).fits_within(10, 10));
        assert!(!SourceRect::new(0, 0, 11, 10).fits_within(10, 10));
        assert!(!SourceRect::new(5, 0, 5, 10).fits_within(10, 10));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
