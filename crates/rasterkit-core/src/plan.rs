//! Transform plans and dimension editing.
//!
//! A [`TransformPlan`] describes everything the pipeline needs for one render:
//! the output box, the aspect lock, the rotation and the filter settings.
//! Editing accepts invalid intermediate states (a cleared width box becomes 0);
//! the plan is only rejected when it is validated for rendering.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::ImageSource;
use crate::transform::compute_rotated_bounds;

/// Rotation limits in degrees.
pub const MIN_ROTATION: f64 = -180.0;
pub const MAX_ROTATION: f64 = 180.0;

/// Largest output side a plan may render, in pixels.
pub const MAX_DIMENSION: u32 = 16_384;

/// Largest pixel count of any buffer a render allocates, including the
/// enlarged box a rotated render is resized into.
pub const MAX_PIXELS: u64 = 268_435_456;

/// Errors raised when a plan is checked before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// A target dimension is not positive.
    #[error("Invalid output size {width}x{height}: width and height must be greater than zero")]
    InvalidPlan { width: u32, height: u32 },

    /// The output, or the box it is rotated out of, exceeds the render limits.
    #[error(
        "Output size {width}x{height} is too large: each side must be at most {max_side} pixels and the rotated canvas at most {max_pixels} pixels",
        max_side = MAX_DIMENSION,
        max_pixels = MAX_PIXELS
    )]
    TooLarge { width: u32, height: u32 },
}

/// Which output dimension an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Width,
    Height,
}

/// How the source is fitted into the output box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CropStrategy {
    /// Scale to cover the whole box, center, and clip the overflow.
    #[default]
    FitCentered,
}

/// Photometric filter parameters, all percentages where 100 is a no-op
/// (0 for grayscale).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Brightness (0 to 200)
    pub brightness: f32,
    /// Contrast (0 to 200)
    pub contrast: f32,
    /// Saturation (0 to 200)
    pub saturation: f32,
    /// Grayscale blend (0 to 100)
    pub grayscale: f32,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            grayscale: 0.0,
        }
    }
}

impl FilterSettings {
    pub fn new(brightness: f32, contrast: f32, saturation: f32, grayscale: f32) -> Self {
        Self {
            brightness,
            contrast,
            saturation,
            grayscale,
        }
        .clamped()
    }

    /// Clamp every parameter into its valid range. NaN falls back to the default.
    pub fn clamped(self) -> Self {
        let defaults = Self::default();
        Self {
            brightness: clamp_or(self.brightness, 0.0, 200.0, defaults.brightness),
            contrast: clamp_or(self.contrast, 0.0, 200.0, defaults.contrast),
            saturation: clamp_or(self.saturation, 0.0, 200.0, defaults.saturation),
            grayscale: clamp_or(self.grayscale, 0.0, 100.0, defaults.grayscale),
        }
    }

    /// True when the chain would leave every pixel untouched.
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

/// Compute the paired dimension for an aspect-locked edit.
///
/// Width edits produce `round(value / aspect_ratio)`, height edits produce
/// `round(value * aspect_ratio)`. The result is never below 1 so a positive
/// edit cannot produce an unrenderable plan.
pub fn coupled_dimension(edited: Dimension, value: u32, aspect_ratio: f64) -> u32 {
    let other = match edited {
        Dimension::Width => value as f64 / aspect_ratio,
        Dimension::Height => value as f64 * aspect_ratio,
    };
    (other.round().min(u32::MAX as f64) as u32).max(1)
}

/// Parse the raw text of a dimension input.
///
/// Non-numeric and non-positive input becomes 0, which the plan accepts while
/// editing and rejects at render time.
pub fn parse_dimension(text: &str) -> u32 {
    let trimmed = text.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return clamp_dimension(value);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 1.0 => {
            value.trunc().min(u32::MAX as f64) as u32
        }
        _ => 0,
    }
}

fn clamp_dimension(value: i64) -> u32 {
    if value <= 0 {
        0
    } else {
        u32::try_from(value).unwrap_or(u32::MAX)
    }
}

/// Complete description of the requested edits for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformPlan {
    target_width: u32,
    target_height: u32,
    maintain_aspect: bool,
    rotation_degrees: f64,
    filters: FilterSettings,
    crop_strategy: CropStrategy,
    natural_width: u32,
    natural_height: u32,
}

impl TransformPlan {
    /// Default plan for a source with the given natural dimensions.
    ///
    /// Zero dimensions are accepted here; the aspect ratio then falls back to 1.
    pub fn new(natural_width: u32, natural_height: u32) -> Self {
        Self {
            target_width: natural_width,
            target_height: natural_height,
            maintain_aspect: true,
            rotation_degrees: 0.0,
            filters: FilterSettings::default(),
            crop_strategy: CropStrategy::FitCentered,
            natural_width,
            natural_height,
        }
    }

    /// Default plan for a decoded source.
    pub fn for_source(source: &ImageSource) -> Self {
        Self::new(source.natural_width(), source.natural_height())
    }

    pub fn target_width(&self) -> u32 {
        self.target_width
    }

    pub fn target_height(&self) -> u32 {
        self.target_height
    }

    /// `(target_width, target_height)`
    pub fn target_dimensions(&self) -> (u32, u32) {
        (self.target_width, self.target_height)
    }

    pub fn maintain_aspect(&self) -> bool {
        self.maintain_aspect
    }

    pub fn rotation_degrees(&self) -> f64 {
        self.rotation_degrees
    }

    pub fn filters(&self) -> &FilterSettings {
        &self.filters
    }

    pub fn crop_strategy(&self) -> CropStrategy {
        self.crop_strategy
    }

    /// Aspect ratio of the source, captured when the plan was created.
    pub fn aspect_ratio(&self) -> f64 {
        if self.natural_width == 0 || self.natural_height == 0 {
            return 1.0;
        }
        self.natural_width as f64 / self.natural_height as f64
    }

    /// Edit one dimension.
    ///
    /// Non-positive values are stored as 0 and leave the paired dimension alone.
    /// With the aspect lock on, a positive value recomputes the other dimension
    /// from the source aspect ratio (never from the current target, to avoid drift).
    pub fn set_dimension(&mut self, dim: Dimension, value: i64) {
        let value = clamp_dimension(value);
        match dim {
            Dimension::Width => self.target_width = value,
            Dimension::Height => self.target_height = value,
        }

        if self.maintain_aspect && value > 0 {
            let other = coupled_dimension(dim, value, self.aspect_ratio());
            match dim {
                Dimension::Width => self.target_height = other,
                Dimension::Height => self.target_width = other,
            }
        }
    }

    /// Edit one dimension from the raw text of its input box.
    pub fn set_dimension_text(&mut self, dim: Dimension, text: &str) {
        self.set_dimension(dim, parse_dimension(text) as i64);
    }

    /// Toggle the aspect lock. Turning it on re-couples the height to the width.
    pub fn set_maintain_aspect(&mut self, maintain: bool) {
        self.maintain_aspect = maintain;
        if maintain && self.target_width > 0 {
            self.target_height =
                coupled_dimension(Dimension::Width, self.target_width, self.aspect_ratio());
        }
    }

    /// Set the rotation, clamped to [-180, 180]. NaN resets to 0.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation_degrees = if degrees.is_nan() {
            0.0
        } else {
            degrees.clamp(MIN_ROTATION, MAX_ROTATION)
        };
    }

    /// Replace the filter settings, clamping each parameter.
    pub fn set_filters(&mut self, filters: FilterSettings) {
        self.filters = filters.clamped();
    }

    /// Apply a preset size. Presets are authoritative: both dimensions are set
    /// exactly and the aspect lock is released.
    pub fn apply_preset(&mut self, width: u32, height: u32) {
        self.maintain_aspect = false;
        self.target_width = width;
        self.target_height = height;
    }

    /// Return to the defaults for the current source.
    pub fn reset(&mut self) {
        *self = Self::new(self.natural_width, self.natural_height);
    }

    /// Check that the plan can be rendered: both sides positive and every
    /// buffer the render allocates within [`MAX_DIMENSION`] and [`MAX_PIXELS`].
    pub fn validate(&self) -> Result<(), PlanError> {
        let (width, height) = (self.target_width, self.target_height);
        if width == 0 || height == 0 {
            return Err(PlanError::InvalidPlan { width, height });
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(PlanError::TooLarge { width, height });
        }
        let (box_w, box_h) = compute_rotated_bounds(width, height, self.rotation_degrees);
        if u64::from(box_w) * u64::from(box_h) > MAX_PIXELS {
            return Err(PlanError::TooLarge { width, height });
        }
        Ok(())
    }

    /// True when rendering would copy the source unchanged.
    pub fn is_identity(&self) -> bool {
        self.target_width == self.natural_width
            && self.target_height == self.natural_height
            && self.rotation_degrees == 0.0
            && self.filters.is_identity()
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
