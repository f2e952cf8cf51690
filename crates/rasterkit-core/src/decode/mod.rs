//! Source decoding for rasterkit.
//!
//! This module provides functionality for:
//! - Rejecting files outside the MIME allow-list before any decode attempt
//! - Decoding JPEG, PNG, WEBP and GIF bytes into an RGBA source raster
//! - Applying EXIF orientation so natural dimensions match the displayed image
//!
//! # Examples
//!
//! ```ignore
//! use rasterkit_core::decode::{decode_source, DEFAULT_ACCEPTED_MIME_TYPES};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let source = decode_source(&bytes, "image/jpeg", DEFAULT_ACCEPTED_MIME_TYPES).unwrap();
//! println!("Decoded {}x{} image", source.natural_width(), source.natural_height());
//! ```

mod source;
mod types;

pub use source::{decode_source, extract_orientation, ImageSource};
pub use types::{
    is_accepted, normalize_mime, DecodeError, Orientation, DEFAULT_ACCEPTED_MIME_TYPES,
};
