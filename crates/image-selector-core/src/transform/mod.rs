//! Geometry: rotation state, display/source coordinate mapping and cropping.
//!
//! All functions here are pure. Nothing in this module touches the
//! filesystem or mutates a raster in place.
//!
//! # Coordinate System
//!
//! - Rotations are quarter turns, positive = clockwise
//! - Source coordinates are whole pixels of the original, unrotated raster
//! - Origin is the top-left corner in both display and source space

mod coords;
mod crop;
mod rotation;

pub use coords::{fit_scale, DisplayRect, SourceRect, Transform, Viewport};
pub use crop::crop;
pub use rotation::{apply_rotation, Rotation};
