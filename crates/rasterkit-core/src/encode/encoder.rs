//! Raster encoding for export.
//!
//! This module encodes rendered RGBA buffers using the `image` crate's
//! encoders. JPEG and WEBP honour the quality setting; PNG ignores it.
//!
//! The pure-Rust WebP encoder only writes lossless files, so below quality
//! 100 the colour channels are first reduced to fewer levels, which the
//! lossless coder then stores in fewer bytes. Alpha is never quantized.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageError};
use thiserror::Error;

use super::artifact::{dimension_filename, OutputArtifact, DEFAULT_FILENAME_PREFIX};
use super::ContainerFormat;
use crate::pipeline::RasterBuffer;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The platform encoder cannot produce the requested container format.
    #[error("Exporting as {0} is not supported here. Try JPEG, PNG or WEBP.")]
    UnsupportedFormat(String),

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The encoder failed for any other reason.
    #[error("Encoding failed: {0}")]
    EncodeFailure(String),
}

/// Encode `buffer` as `format` and wrap it as a downloadable artifact.
///
/// `quality` is in 0..=100 and clamped to 1..=100 for JPEG and WEBP; other
/// formats ignore it. The suggested filename is `"image-<W>x<H>.<ext>"`.
///
/// # Quality Guidelines
///
/// * 90-100: High quality (a 2D canvas defaults to 92)
/// * 60-80: Medium quality, acceptable for web/social media
/// * Below 60: Low quality, visible artifacts
///
/// # Example
///
/// ```
/// use image::RgbaImage;
/// use rasterkit_core::encode::{encode, ContainerFormat};
///
/// let buffer = RgbaImage::new(100, 100);
/// let artifact = encode(&buffer, ContainerFormat::Png, 90).unwrap();
/// assert_eq!(artifact.suggested_filename, "image-100x100.png");
/// ```
pub fn encode(
    buffer: &RasterBuffer,
    format: ContainerFormat,
    quality: u8,
) -> Result<OutputArtifact, EncodeError> {
    let (width, height) = buffer.dimensions();
    let bytes = encode_bytes(buffer, format, quality)?;
    Ok(OutputArtifact::new(
        bytes,
        format,
        dimension_filename(DEFAULT_FILENAME_PREFIX, width, height, format),
    ))
}

/// Encode `buffer` as `format`, returning only the bytes.
pub fn encode_bytes(
    buffer: &RasterBuffer,
    format: ContainerFormat,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = buffer.dimensions();
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let mut out = Cursor::new(Vec::new());

    let result = match format {
        ContainerFormat::Jpeg => {
            let rgb = flatten_onto_black(buffer);
            JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100)).write_image(
                &rgb,
                width,
                height,
                ExtendedColorType::Rgb8,
            )
        }
        ContainerFormat::Png => PngEncoder::new_with_quality(
            &mut out,
            CompressionType::Default,
            PngFilter::Adaptive,
        )
        .write_image(buffer.as_raw(), width, height, ExtendedColorType::Rgba8),
        ContainerFormat::Webp => {
            let levels = webp_levels(quality);
            let encoder = WebPEncoder::new_lossless(&mut out);
            if levels < 256 {
                let mut raw = buffer.as_raw().clone();
                quantize_rgb(&mut raw, levels);
                encoder.write_image(&raw, width, height, ExtendedColorType::Rgba8)
            } else {
                encoder.write_image(buffer.as_raw(), width, height, ExtendedColorType::Rgba8)
            }
        }
        ContainerFormat::Gif | ContainerFormat::Bmp | ContainerFormat::Tiff => {
            buffer.write_to(&mut out, format.image_format())
        }
    };

    result.map_err(|e| match e {
        ImageError::Unsupported(_) => EncodeError::UnsupportedFormat(format.to_string()),
        other => EncodeError::EncodeFailure(other.to_string()),
    })?;

    let bytes = out.into_inner();
    log::debug!(
        "encoded {}x{} as {} (quality {}): {} bytes",
        width,
        height,
        format,
        quality,
        bytes.len()
    );
    Ok(bytes)
}

/// Levels kept per colour channel for a WebP quality.
///
/// Quadratic in quality, so the top of the range stays close to lossless
/// while low settings get very coarse: 100 keeps all 256, 92 keeps 217 and 1
/// keeps 2.
fn webp_levels(quality: u8) -> u16 {
    let q = u32::from(quality.clamp(1, 100));
    if q == 100 {
        return 256;
    }
    (2 + (q * q * 254 + 5_000) / 10_000) as u16
}

/// Snap R, G and B of every RGBA pixel to `levels` evenly spaced values.
fn quantize_rgb(raw: &mut [u8], levels: u16) {
    let step = 255.0 / f32::from(levels - 1);
    for pixel in raw.chunks_exact_mut(4) {
        for channel in &mut pixel[..3] {
            let bucket = (f32::from(*channel) / step).round();
            *channel = (bucket * step).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Drop the alpha channel the way a canvas JPEG export does: transparent
/// pixels are composited onto black.
fn flatten_onto_black(buffer: &RasterBuffer) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(buffer.as_raw().len() / 4 * 3);
    for pixel in buffer.pixels() {
        let [r, g, b, a] = pixel.0;
        if a == 255 {
            rgb.extend_from_slice(&[r, g, b]);
        } else {
            let a = a as u32;
            rgb.extend_from_slice(&[
                ((r as u32 * a + 127) / 255) as u8,
                ((g as u32 * a + 127) / 255) as u8,
                ((b as u32 * a + 127) / 255) as u8,
            ]);
        }
    }
    rgb
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use image::RgbaImage;
    use proptest::prelude::*;

    fn buffer_strategy() -> impl Strategy<Value = RgbaImage> {
        (1u32..=24, 1u32..=24).prop_flat_map(|(w, h)| {
            let size = (w * h * 4) as usize;
            prop::collection::vec(any::<u8>(), size..=size)
                .prop_map(move |raw| RgbaImage::from_raw(w, h, raw).unwrap())
        })
    }

    proptest! {
        /// Property: PNG output never depends on quality.
        #[test]
        fn prop_png_quality_is_noop(buffer in buffer_strategy(), q1 in 0u8..=100, q2 in 0u8..=100) {
            let a = encode_bytes(&buffer, ContainerFormat::Png, q1).unwrap();
            let b = encode_bytes(&buffer, ContainerFormat::Png, q2).unwrap();
            prop_assert_eq!(a, b);
        }

        /// Property: Guaranteed formats always encode valid buffers.
        #[test]
        fn prop_guaranteed_formats_encode(buffer in buffer_strategy(), quality in 0u8..=100) {
            for format in [ContainerFormat::Jpeg, ContainerFormat::Png, ContainerFormat::Webp] {
                let result = encode_bytes(&buffer, format, quality);
                prop_assert!(result.is_ok(), "{} failed: {:?}", format, result.err());
            }
        }

        /// Property: Lower WebP quality never keeps more colour levels.
        #[test]
        fn prop_webp_levels_monotonic(q in 1u8..100) {
            prop_assert!(webp_levels(q) <= webp_levels(q + 1));
        }

        /// Property: Same input always produces same output (deterministic).
        #[test]
        fn prop_jpeg_deterministic(buffer in buffer_strategy(), quality in 1u8..=100) {
            let a = encode_bytes(&buffer, ContainerFormat::Jpeg, quality).unwrap();
            let b = encode_bytes(&buffer, ContainerFormat::Jpeg, quality).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
