//! The raster pipeline: source + plan in, output raster out.
//!
//! Rendering is a single synchronous pass over an already decoded
//! [`ImageSource`]. Since a source only exists once its decode completed,
//! drawing can never start before decoding finished.

use image::RgbaImage;
use thiserror::Error;

use crate::decode::ImageSource;
use crate::filters::FilterChain;
use crate::plan::{CropStrategy, PlanError, TransformPlan};
use crate::transform::{compute_rotated_bounds, cover_resize, rotate_into_frame, Resampling};

/// In-memory RGBA pixel grid produced by the pipeline.
pub type RasterBuffer = RgbaImage;

/// Errors that can occur while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The plan has a non-positive target dimension.
    #[error(transparent)]
    InvalidPlan(#[from] PlanError),

    /// The source pixel data is no longer available.
    #[error("Source image is no longer available ({width}x{height})")]
    SourceUnavailable { width: u32, height: u32 },
}

/// Render `source` through `plan` with the default (Lanczos3) resampling.
///
/// # Errors
///
/// * `RenderError::InvalidPlan` if a target dimension is 0 or the output is
///   larger than [`MAX_DIMENSION`](crate::plan::MAX_DIMENSION) and
///   [`MAX_PIXELS`](crate::plan::MAX_PIXELS) allow, before anything is allocated
/// * `RenderError::SourceUnavailable` if the source pixels were released
pub fn render(source: &ImageSource, plan: &TransformPlan) -> Result<RasterBuffer, RenderError> {
    render_with(source, plan, Resampling::default())
}

/// Render with an explicit resampling filter.
pub fn render_with(
    source: &ImageSource,
    plan: &TransformPlan,
    filter: Resampling,
) -> Result<RasterBuffer, RenderError> {
    plan.validate()?;

    let pixels = source.pixels().ok_or(RenderError::SourceUnavailable {
        width: source.natural_width(),
        height: source.natural_height(),
    })?;

    let (width, height) = plan.target_dimensions();
    let angle = plan.rotation_degrees();

    log::debug!(
        "render {}x{} -> {}x{} rotation={} filter={:?}",
        source.natural_width(),
        source.natural_height(),
        width,
        height,
        angle,
        filter
    );

    let mut output = match plan.crop_strategy() {
        CropStrategy::FitCentered => {
            let (box_w, box_h) = compute_rotated_bounds(width, height, angle);
            let cover = cover_resize(pixels, box_w, box_h, filter);
            if (box_w, box_h) == (width, height) && angle == 0.0 {
                cover
            } else {
                rotate_into_frame(&cover, angle, width, height, filter)
            }
        }
    };

    FilterChain::new(plan.filters()).apply(&mut output);

    Ok(output)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use image::Rgba;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        /// Property: For any box and rotation, every output pixel is covered.
        #[test]
        fn prop_cover_fit_leaves_no_gaps(
            (src_w, src_h) in (1u32..=48, 1u32..=48),
            (dst_w, dst_h) in (1u32..=40, 1u32..=40),
            angle in -180.0f64..=180.0,
        ) {
            let img = RgbaImage::from_fn(src_w, src_h, |x, y| Rgba([x as u8, y as u8, 7, 255]));
            let source = ImageSource::from_rgba(img, "image/png").unwrap();
            let mut plan = TransformPlan::for_source(&source);
            plan.apply_preset(dst_w, dst_h);
            plan.set_rotation(angle);

            let out = render_with(&source, &plan, Resampling::Bilinear).unwrap();
            prop_assert_eq!(out.dimensions(), (dst_w, dst_h));
            prop_assert!(out.pixels().all(|p| p.0[3] == 255));
        }
    }
}
