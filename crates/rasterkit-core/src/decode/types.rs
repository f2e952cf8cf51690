//! Core types for source decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// MIME types accepted by default when a file is selected.
pub const DEFAULT_ACCEPTED_MIME_TYPES: &[&str] =
    &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Error types for source decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file was rejected by the MIME allow-list before any decode attempt.
    #[error("Unsupported file type '{0}'. Please select a JPG, PNG, WEBP or GIF image.")]
    InvalidFileType(String),

    /// The bytes could not be read as an image.
    #[error("Could not read the image: {0}")]
    DecodeFailure(String),
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl Orientation {
    /// Returns true if this orientation swaps width and height dimensions.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// Normalize a MIME type as reported by the browser.
///
/// Strips parameters (`image/png; charset=...`), surrounding whitespace and
/// case. `image/jpg` is folded into `image/jpeg` since some platforms report it.
pub fn normalize_mime(mime: &str) -> String {
    let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    match essence.as_str() {
        "image/jpg" | "image/pjpeg" => "image/jpeg".to_string(),
        _ => essence,
    }
}

/// Check a MIME type against an allow-list.
pub fn is_accepted<S: AsRef<str>>(mime: &str, accepted: &[S]) -> bool {
    let mime = normalize_mime(mime);
    accepted
        .iter()
        .any(|allowed| normalize_mime(allowed.as_ref()) == mime)
}
