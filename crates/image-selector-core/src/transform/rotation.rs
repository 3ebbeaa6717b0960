//! Quarter-turn rotation state and lossless raster rotation.
//!
//! Rotations are clockwise, matching the operator's "rotate right" action.
//! Only multiples of 90 degrees exist, so rotating a raster is a pure pixel
//! permutation with no interpolation.

use serde::{Deserialize, Serialize};

use crate::decode::Raster;
use crate::{Result, SelectorError};

/// Clockwise display rotation of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// All rotation states in clockwise order.
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Rotation angle in degrees (0, 90, 180 or 270).
    pub fn degrees(self) -> u32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Rotation for an angle in degrees, normalized modulo 360.
    ///
    /// # Errors
    ///
    /// Returns `SelectorError::InvalidRotation` unless `degrees` is a
    /// multiple of 90.
    pub fn from_degrees(degrees: i32) -> Result<Self> {
        if degrees % 90 != 0 {
            return Err(SelectorError::InvalidRotation(degrees));
        }
        Ok(match degrees.rem_euclid(360) {
            0 => Rotation::Deg0,
            90 => Rotation::Deg90,
            180 => Rotation::Deg180,
            _ => Rotation::Deg270,
        })
    }

    /// This rotation followed by `delta` degrees (positive = clockwise).
    pub fn rotated_by(self, delta: i32) -> Result<Self> {
        if delta % 90 != 0 {
            return Err(SelectorError::InvalidRotation(delta));
        }
        Self::from_degrees(self.degrees() as i32 + delta.rem_euclid(360))
    }

    /// Returns true for 90 and 270 degrees, which swap width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    /// Dimensions of a `width` x `height` raster displayed at this rotation.
    pub fn display_dimensions(self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }
}

impl From<Rotation> for u32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl TryFrom<u32> for Rotation {
    type Error = SelectorError;

    fn try_from(degrees: u32) -> Result<Self> {
        if degrees >= 360 {
            return Err(SelectorError::InvalidRotation(degrees as i32));
        }
        Rotation::from_degrees(degrees as i32)
    }
}

/// Rotate a raster clockwise by `rotation`.
///
/// Returns a new raster; the input is left untouched.
pub fn apply_rotation(raster: &Raster, rotation: Rotation) -> Raster {
    if rotation == Rotation::Deg0 {
        return raster.clone();
    }

    let (src_w, src_h) = (raster.width as usize, raster.height as usize);
    let (dst_w, dst_h) = rotation.display_dimensions(raster.width, raster.height);
    let (dst_w, dst_h) = (dst_w as usize, dst_h as usize);

    let mut output = vec![0u8; dst_w * dst_h * 3];

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            // Inverse mapping from destination pixel to source pixel
            let (src_x, src_y) = match rotation {
                Rotation::Deg0 => (dst_x, dst_y),
                Rotation::Deg90 => (dst_y, src_h - 1 - dst_x),
                Rotation::Deg180 => (src_w - 1 - dst_x, src_h - 1 - dst_y),
                Rotation::Deg270 => (src_w - 1 - dst_y, dst_x),
            };

            let src_idx = (src_y * src_w + src_x) * 3;
            let dst_idx = (dst_y * dst_w + dst_x) * 3;
            output[dst_idx..dst_idx + 3].copy_from_slice(&raster.pixels[src_idx..src_idx + 3]);
        }
    }

    Raster {
        width: dst_w as u32,
        height: dst_h as u32,
        pixels: output,
    }
}
