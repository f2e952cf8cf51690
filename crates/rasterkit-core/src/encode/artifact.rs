//! Export artifacts and their filenames.

use serde::Serialize;

use super::ContainerFormat;

/// Filename prefix used when nothing better is known.
pub const DEFAULT_FILENAME_PREFIX: &str = "image";

/// An encoded image, ready to be handed to the download trigger.
///
/// A fresh artifact is produced by every export; nothing is cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputArtifact {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub format: ContainerFormat,
    pub mime_type: String,
    pub file_extension: String,
    pub suggested_filename: String,
}

impl OutputArtifact {
    pub fn new(bytes: Vec<u8>, format: ContainerFormat, suggested_filename: String) -> Self {
        Self {
            bytes,
            format,
            mime_type: format.mime_type().to_string(),
            file_extension: format.extension().to_string(),
            suggested_filename,
        }
    }

    /// Replace the suggested filename.
    pub fn with_filename(mut self, suggested_filename: String) -> Self {
        self.suggested_filename = suggested_filename;
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// `"<prefix>-<width>x<height>.<ext>"`
pub fn dimension_filename(prefix: &str, width: u32, height: u32, format: ContainerFormat) -> String {
    let prefix = slugify(prefix);
    let prefix = if prefix.is_empty() {
        DEFAULT_FILENAME_PREFIX.to_string()
    } else {
        prefix
    };
    format!("{}-{}x{}.{}", prefix, width, height, format.extension())
}

/// `"<platform>-<format>.<ext>"` for exports sized by a preset.
pub fn preset_filename(platform: &str, preset: &str, format: ContainerFormat) -> String {
    format!("{}-{}.{}", slugify(platform), slugify(preset), format.extension())
}

/// Lowercase, with every run of non-alphanumeric characters collapsed to `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
