//! Image encoding for derived and exported rasters.
//!
//! Every file this crate writes is PNG, regardless of the source encoding:
//! - PDF page renders and extracted PDF images cached under `tmp/`
//! - Cropped regions written by the export pipeline

mod png;

pub use png::{encode_png, write_png, EncodeError};
