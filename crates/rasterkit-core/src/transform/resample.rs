//! Cover-resize using the `image` crate's resampling filters.
//!
//! All functions return new buffers without modifying the input.

use image::imageops;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::fit::cover_fit;

/// Resampling filter used when scaling the source.
///
/// Exports always resample smoothly, so there is no nearest-neighbor option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resampling {
    /// Bilinear (triangle) filter, fastest.
    Bilinear,
    /// Catmull-Rom cubic filter.
    CatmullRom,
    /// Lanczos3 windowed sinc, highest quality.
    #[default]
    Lanczos3,
}

impl Resampling {
    /// Convert to the image crate's filter type.
    pub fn to_image_filter(self) -> imageops::FilterType {
        match self {
            Resampling::Bilinear => imageops::FilterType::Triangle,
            Resampling::CatmullRom => imageops::FilterType::CatmullRom,
            Resampling::Lanczos3 => imageops::FilterType::Lanczos3,
        }
    }
}

/// Scale `image` to cover a `width x height` box, centered, with the overflow
/// clipped. Both dimensions must be non-zero.
///
/// Same-size requests return an exact copy.
pub fn cover_resize(image: &RgbaImage, width: u32, height: u32, filter: Resampling) -> RgbaImage {
    let (src_w, src_h) = image.dimensions();

    if (src_w, src_h) == (width, height) {
        return image.clone();
    }

    let (x, y, w, h) = cover_fit((src_w, src_h), (width, height))
        .source_window()
        .to_pixels(src_w, src_h);

    log::debug!(
        "cover resize {}x{} -> {}x{} via source window {}x{}+{}+{}",
        src_w,
        src_h,
        width,
        height,
        w,
        h,
        x,
        y
    );

    let window = imageops::crop_imm(image, x, y, w, h).to_image();
    if (w, h) == (width, height) {
        return window;
    }
    imageops::resize(&window, width, height, filter.to_image_filter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn create_test_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([
                ((x * 255) / width.max(1)) as u8,
                ((y * 255) / height.max(1)) as u8,
                128,
                255,
            ])
        })
    }

    #[test]
    fn test_filter_conversion() {
        assert!(matches!(
            Resampling::Bilinear.to_image_filter(),
            imageops::FilterType::Triangle
        ));
        assert!(matches!(
            Resampling::CatmullRom.to_image_filter(),
            imageops::FilterType::CatmullRom
        ));
        assert!(matches!(
            Resampling::Lanczos3.to_image_filter(),
            imageops::FilterType::Lanczos3
        ));
        assert_eq!(Resampling::default(), Resampling::Lanczos3);
    }

    #[test]
    fn test_same_size_is_exact_copy() {
        let img = create_test_image(40, 20);
        assert_eq!(cover_resize(&img, 40, 20, Resampling::Lanczos3), img);
    }

    #[test]
    fn test_pure_crop_when_scale_is_one() {
        let img = create_test_image(60, 30);
        let out = cover_resize(&img, 30, 30, Resampling::Lanczos3);
        assert_eq!(out.dimensions(), (30, 30));
        // Window starts 15px in, no resampling at scale 1
        assert_eq!(out.get_pixel(0, 0), img.get_pixel(15, 0));
        assert_eq!(out.get_pixel(29, 29), img.get_pixel(44, 29));
    }

    #[test]
    fn test_downscale_dimensions() {
        let img = create_test_image(200, 100);
        for filter in [Resampling::Bilinear, Resampling::CatmullRom, Resampling::Lanczos3] {
            let out = cover_resize(&img, 50, 50, filter);
            assert_eq!(out.dimensions(), (50, 50));
        }
    }

    #[test]
    fn test_upscale_dimensions() {
        let img = create_test_image(10, 20);
        let out = cover_resize(&img, 64, 48, Resampling::Lanczos3);
        assert_eq!(out.dimensions(), (64, 48));
    }

    #[test]
    fn test_opaque_input_stays_opaque() {
        let img = create_test_image(37, 91);
        let out = cover_resize(&img, 50, 20, Resampling::Lanczos3);
        assert!(out.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn test_resampling_serde_names() {
        let json = serde_json::to_string(&Resampling::CatmullRom).unwrap();
        assert_eq!(json, "\"catmull-rom\"");
        let parsed: Resampling = serde_json::from_str("\"lanczos3\"").unwrap();
        assert_eq!(parsed, Resampling::Lanczos3);
    }
}
