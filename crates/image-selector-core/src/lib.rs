//! Image Selector Core - region selection and export engine
//!
//! This crate tracks the documents an operator has open, maps rectangles drawn
//! on screen back to source-image pixels, and exports the saved regions as
//! cropped PNGs with optional OCR text.
//!
//! - [`session`]: open documents, active document, rotation and recorded regions
//! - [`transform`]: display/source coordinate mapping, cropping and rotation
//! - [`loader`]: raster and PDF inputs, PDF results cached under `tmp/`
//! - [`export`]: crops, OCR text files and collision-free file names
//! - [`pdf`] / [`ocr`]: provider seams for the optional PDF and OCR engines

pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod export;
pub mod loader;
pub mod ocr;
pub mod pdf;
pub mod session;
pub mod transform;

pub use config::{Capabilities, Config};
pub use error::{Result, SelectorError};
pub use export::{ExportManifest, ExportedRegion, Exporter, RegionFailure};
pub use loader::{DocumentLoader, LoaderKind};
pub use session::{Document, Region, RegionMode, Session};
pub use transform::{DisplayRect, Rotation, SourceRect, Viewport};
