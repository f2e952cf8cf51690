//! Export encoding for rasterkit.
//!
//! This module provides functionality for:
//! - Encoding rendered buffers to JPEG, PNG and WEBP (GIF and BMP best effort)
//! - Describing the result as an [`OutputArtifact`] with MIME type, extension
//!   and a suggested download filename
//!
//! # Examples
//!
//! ```ignore
//! use rasterkit_core::encode::{encode, ContainerFormat};
//!
//! let artifact = encode(&buffer, ContainerFormat::Jpeg, 92).unwrap();
//! println!("{}: {} bytes", artifact.suggested_filename, artifact.len());
//! ```

mod artifact;
mod encoder;
mod format;

pub use artifact::{
    dimension_filename, preset_filename, slugify, OutputArtifact, DEFAULT_FILENAME_PREFIX,
};
pub use encoder::{encode, encode_bytes, EncodeError};
pub use format::ContainerFormat;
