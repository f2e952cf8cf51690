//! Container formats offered for export.

use std::fmt;
use std::str::FromStr;

use image::ImageFormat;
use serde::{Deserialize, Serialize};

use super::EncodeError;

/// An image file format a raster can be exported as.
///
/// JPEG, PNG and WEBP are guaranteed. GIF and BMP are best effort, and TIFF is
/// listed for completeness but has no encoder compiled in, so exporting it
/// fails with [`EncodeError::UnsupportedFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerFormat {
    #[default]
    Jpeg,
    Png,
    Webp,
    Gif,
    Bmp,
    Tiff,
}

impl ContainerFormat {
    /// Every format, in the order the UI lists them.
    pub const ALL: [ContainerFormat; 6] = [
        ContainerFormat::Jpeg,
        ContainerFormat::Png,
        ContainerFormat::Webp,
        ContainerFormat::Gif,
        ContainerFormat::Bmp,
        ContainerFormat::Tiff,
    ];

    pub fn mime_type(self) -> &'static str {
        match self {
            ContainerFormat::Jpeg => "image/jpeg",
            ContainerFormat::Png => "image/png",
            ContainerFormat::Webp => "image/webp",
            ContainerFormat::Gif => "image/gif",
            ContainerFormat::Bmp => "image/bmp",
            ContainerFormat::Tiff => "image/tiff",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ContainerFormat::Jpeg => "jpg",
            ContainerFormat::Png => "png",
            ContainerFormat::Webp => "webp",
            ContainerFormat::Gif => "gif",
            ContainerFormat::Bmp => "bmp",
            ContainerFormat::Tiff => "tiff",
        }
    }

    /// Whether the quality setting has any effect on the encoded bytes.
    pub fn uses_quality(self) -> bool {
        matches!(self, ContainerFormat::Jpeg | ContainerFormat::Webp)
    }

    /// Whether export to this format is part of the guaranteed set.
    pub fn is_guaranteed(self) -> bool {
        matches!(
            self,
            ContainerFormat::Jpeg | ContainerFormat::Png | ContainerFormat::Webp
        )
    }

    pub(crate) fn image_format(self) -> ImageFormat {
        match self {
            ContainerFormat::Jpeg => ImageFormat::Jpeg,
            ContainerFormat::Png => ImageFormat::Png,
            ContainerFormat::Webp => ImageFormat::WebP,
            ContainerFormat::Gif => ImageFormat::Gif,
            ContainerFormat::Bmp => ImageFormat::Bmp,
            ContainerFormat::Tiff => ImageFormat::Tiff,
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContainerFormat::Jpeg => "JPEG",
            ContainerFormat::Png => "PNG",
            ContainerFormat::Webp => "WEBP",
            ContainerFormat::Gif => "GIF",
            ContainerFormat::Bmp => "BMP",
            ContainerFormat::Tiff => "TIFF",
        })
    }
}

impl FromStr for ContainerFormat {
    type Err = EncodeError;

    /// Accepts format names, extensions and MIME types, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let name = lower
            .strip_prefix("image/")
            .or_else(|| lower.strip_prefix('.'))
            .unwrap_or(&lower);

        match name {
            "jpeg" | "jpg" => Ok(ContainerFormat::Jpeg),
            "png" => Ok(ContainerFormat::Png),
            "webp" => Ok(ContainerFormat::Webp),
            "gif" => Ok(ContainerFormat::Gif),
            "bmp" => Ok(ContainerFormat::Bmp),
            "tiff" | "tif" => Ok(ContainerFormat::Tiff),
            _ => Err(EncodeError::UnsupportedFormat(s.trim().to_string())),
        }
    }
}
