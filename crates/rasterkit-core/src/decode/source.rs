//! Decoded source images.
//!
//! An [`ImageSource`] can only be obtained from a completed decode, so any
//! code that takes one is guaranteed to run after the decode finished.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader, RgbaImage};

use super::types::{is_accepted, normalize_mime};
use super::{DecodeError, Orientation};

/// The decoded source raster and its intrinsic dimensions.
///
/// Dimensions are fixed at creation and always positive. The pixel data is
/// owned exclusively by the source and can be released early with
/// [`ImageSource::release`].
#[derive(Debug, Clone)]
pub struct ImageSource {
    natural_width: u32,
    natural_height: u32,
    pixels: Option<RgbaImage>,
    mime: String,
    file_name: Option<String>,
}

impl ImageSource {
    /// Wrap an already decoded RGBA raster.
    ///
    /// Returns `DecodeError::DecodeFailure` for a zero-area raster.
    pub fn from_rgba(pixels: RgbaImage, mime: &str) -> Result<Self, DecodeError> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(DecodeError::DecodeFailure(format!(
                "image has no pixels ({}x{})",
                width, height
            )));
        }
        Ok(Self {
            natural_width: width,
            natural_height: height,
            pixels: Some(pixels),
            mime: normalize_mime(mime),
            file_name: None,
        })
    }

    /// Attach the original file name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn natural_width(&self) -> u32 {
        self.natural_width
    }

    pub fn natural_height(&self) -> u32 {
        self.natural_height
    }

    /// `(natural_width, natural_height)`
    pub fn dimensions(&self) -> (u32, u32) {
        (self.natural_width, self.natural_height)
    }

    /// `natural_width / natural_height`
    pub fn aspect_ratio(&self) -> f64 {
        self.natural_width as f64 / self.natural_height as f64
    }

    /// The normalized MIME type the source was accepted as.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// File name without its extension, if one was attached.
    pub fn file_stem(&self) -> Option<&str> {
        let name = self.file_name.as_deref()?;
        let stem = match name.rfind('.') {
            Some(0) | None => name,
            Some(idx) => &name[..idx],
        };
        (!stem.is_empty()).then_some(stem)
    }

    /// Borrow the pixel data, or `None` once it has been released.
    pub fn pixels(&self) -> Option<&RgbaImage> {
        self.pixels.as_ref()
    }

    /// Drop the pixel data while keeping the dimensions for display.
    pub fn release(&mut self) {
        self.pixels = None;
    }

    pub fn is_released(&self) -> bool {
        self.pixels.is_none()
    }
}

/// Decode a user-selected file into an [`ImageSource`].
///
/// The MIME type is checked against `accepted` before the bytes are touched.
/// EXIF orientation is applied so the natural dimensions match what a browser
/// would display.
///
/// # Errors
///
/// * `DecodeError::InvalidFileType` if `mime` is not in the allow-list
/// * `DecodeError::DecodeFailure` if the bytes are not a readable image
pub fn decode_source<S: AsRef<str>>(
    bytes: &[u8],
    mime: &str,
    accepted: &[S],
) -> Result<ImageSource, DecodeError> {
    if !is_accepted(mime, accepted) {
        log::warn!("rejected file with MIME type '{}'", mime);
        return Err(DecodeError::InvalidFileType(mime.to_string()));
    }

    if bytes.is_empty() {
        return Err(DecodeError::DecodeFailure("file is empty".to_string()));
    }

    let orientation = extract_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::DecodeFailure(e.to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| DecodeError::DecodeFailure(e.to_string()))?;

    if orientation.swaps_dimensions() {
        log::debug!(
            "orientation {:?} turns stored {}x{} upright as {}x{}",
            orientation,
            img.width(),
            img.height(),
            img.height(),
            img.width()
        );
    }
    let rgba = apply_orientation(img, orientation).into_rgba8();
    let source = ImageSource::from_rgba(rgba, mime)?;

    log::info!(
        "decoded {} source {}x{} (orientation {:?})",
        source.mime(),
        source.natural_width(),
        source.natural_height(),
        orientation
    );

    Ok(source)
}

/// Read the EXIF orientation tag, defaulting to `Normal` when absent.
pub fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
