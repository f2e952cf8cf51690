//! Photometric filter chain.
//!
//! Applies the four filter settings to RGBA pixel data.
//!
//! ## Filter Order
//! 1. Brightness
//! 2. Contrast
//! 3. Saturation
//! 4. Grayscale
//!
//! Each step uses the CSS filter-effects formula for the matching filter
//! function, and the result is clamped to [0, 1] between steps, so the chain
//! produces the same pixels as `ctx.filter = "brightness() contrast()
//! saturate() grayscale()"` on a 2D canvas. Alpha is never touched.

use image::RgbaImage;

use crate::plan::FilterSettings;

/// A filter chain with its per-step factors and color matrices precomputed,
/// applied to each pixel in a single pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterChain {
    brightness: Option<f32>,
    contrast: Option<f32>,
    saturation: Option<[[f32; 3]; 3]>,
    grayscale: Option<[[f32; 3]; 3]>,
}

impl FilterChain {
    /// Build the chain, dropping steps that are a no-op.
    pub fn new(settings: &FilterSettings) -> Self {
        let settings = settings.clamped();
        let brightness = settings.brightness / 100.0;
        let contrast = settings.contrast / 100.0;
        let saturation = settings.saturation / 100.0;
        let grayscale = settings.grayscale / 100.0;

        Self {
            brightness: (brightness != 1.0).then_some(brightness),
            contrast: (contrast != 1.0).then_some(contrast),
            saturation: (saturation != 1.0).then(|| saturate_matrix(saturation)),
            grayscale: (grayscale != 0.0).then(|| grayscale_matrix(grayscale)),
        }
    }

    /// True when no step would change a pixel.
    pub fn is_identity(&self) -> bool {
        self.brightness.is_none()
            && self.contrast.is_none()
            && self.saturation.is_none()
            && self.grayscale.is_none()
    }

    /// Run the chain on one RGB triple in [0, 1].
    #[inline]
    pub fn apply_rgb(&self, rgb: [f32; 3]) -> [f32; 3] {
        let mut c = rgb;

        if let Some(b) = self.brightness {
            c = c.map(|v| (v * b).clamp(0.0, 1.0));
        }
        if let Some(k) = self.contrast {
            c = c.map(|v| ((v - 0.5) * k + 0.5).clamp(0.0, 1.0));
        }
        if let Some(m) = &self.saturation {
            c = apply_matrix(m, c);
        }
        if let Some(m) = &self.grayscale {
            c = apply_matrix(m, c);
        }

        c
    }

    /// Apply the chain to every pixel in place.
    pub fn apply(&self, image: &mut RgbaImage) {
        if self.is_identity() {
            return;
        }

        for pixel in image.pixels_mut() {
            let [r, g, b, _] = pixel.0;
            let out = self.apply_rgb([to_unit(r), to_unit(g), to_unit(b)]);
            pixel.0[0] = to_byte(out[0]);
            pixel.0[1] = to_byte(out[1]);
            pixel.0[2] = to_byte(out[2]);
        }
    }
}

/// Apply filter settings to an image in place.
///
/// Default settings leave the buffer untouched.
pub fn apply_filters(image: &mut RgbaImage, settings: &FilterSettings) {
    FilterChain::new(settings).apply(image);
}

#[inline]
fn to_unit(v: u8) -> f32 {
    v as f32 / 255.0
}

#[inline]
fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[inline]
fn apply_matrix(m: &[[f32; 3]; 3], c: [f32; 3]) -> [f32; 3] {
    let mut out = [0.0f32; 3];
    for (row, value) in m.iter().zip(out.iter_mut()) {
        *value = (row[0] * c[0] + row[1] * c[1] + row[2] * c[2]).clamp(0.0, 1.0);
    }
    out
}

/// `saturate(s)` color matrix.
///
/// Formula (Filter Effects Level 1):
/// ```text
/// | 0.213+0.787s  0.715-0.715s  0.072-0.072s |
/// | 0.213-0.213s  0.715+0.285s  0.072-0.072s |
/// | 0.213-0.213s  0.715-0.715s  0.072+0.928s |
/// ```
fn saturate_matrix(s: f32) -> [[f32; 3]; 3] {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

/// `grayscale(amount)` color matrix, a blend toward Rec. 709 luma.
fn grayscale_matrix(amount: f32) -> [[f32; 3]; 3] {
    let s = 1.0 - amount;
    [
        [0.2126 + 0.7874 * s, 0.7152 - 0.7152 * s, 0.0722 - 0.0722 * s],
        [0.2126 - 0.2126 * s, 0.7152 + 0.2848 * s, 0.0722 - 0.0722 * s],
        [0.2126 - 0.2126 * s, 0.7152 - 0.7152 * s, 0.0722 + 0.9278 * s],
    ]
}
