//! Rotation inside a fixed output frame.
//!
//! The output frame never changes size: content is rotated about the frame
//! center and anything falling outside is clipped. To keep every output pixel
//! covered, the source is first cover-resized into the frame's bounding box in
//! the rotated coordinate system (see [`compute_rotated_bounds`]) and then
//! sampled through the inverse rotation.
//!
//! # Algorithm
//!
//! Angles are in degrees, positive = clockwise on screen (y axis down), the
//! 2D canvas convention. For each output pixel center `(dx, dy)` relative to
//! the frame center, the source position is:
//! ```text
//! src_x =  dx * cos(θ) + dy * sin(θ) + src_cx
//! src_y = -dx * sin(θ) + dy * cos(θ) + src_cy
//! ```

use image::{imageops, Rgba, RgbaImage};

use super::resample::Resampling;

/// Threshold below which an angle is treated as exact.
const ANGLE_EPSILON: f64 = 0.001;

/// A rotation angle snapped to the cases that have an exact pixel permutation.
#[derive(Debug, Clone, Copy, PartialEq)]
enum RightAngle {
    None,
    Cw90,
    Half,
    Ccw90,
    Arbitrary(f64),
}

fn classify(angle_degrees: f64) -> RightAngle {
    // Normalize into (-180, 180]
    let mut a = angle_degrees % 360.0;
    if a <= -180.0 {
        a += 360.0;
    } else if a > 180.0 {
        a -= 360.0;
    }

    if a.abs() < ANGLE_EPSILON {
        RightAngle::None
    } else if (a - 90.0).abs() < ANGLE_EPSILON {
        RightAngle::Cw90
    } else if (a + 90.0).abs() < ANGLE_EPSILON {
        RightAngle::Ccw90
    } else if (a.abs() - 180.0).abs() < ANGLE_EPSILON {
        RightAngle::Half
    } else {
        RightAngle::Arbitrary(a)
    }
}

/// Compute the bounding box of a `width x height` rectangle rotated by
/// `angle_degrees`.
///
/// Non-right angles round up, so a source of this size always covers the
/// rotated rectangle completely.
///
/// # Example
///
/// ```
/// use rasterkit_core::transform::compute_rotated_bounds;
///
/// // 90-degree rotation swaps dimensions
/// assert_eq!(compute_rotated_bounds(100, 50, 90.0), (50, 100));
///
/// // No rotation preserves dimensions
/// assert_eq!(compute_rotated_bounds(100, 50, 0.0), (100, 50));
/// ```
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    match classify(angle_degrees) {
        RightAngle::None | RightAngle::Half => (width, height),
        RightAngle::Cw90 | RightAngle::Ccw90 => (height, width),
        RightAngle::Arbitrary(a) => {
            let angle_rad = a.to_radians();
            let cos = angle_rad.cos().abs();
            let sin = angle_rad.sin().abs();

            let w = width as f64;
            let h = height as f64;

            // new_w = |w*cos| + |h*sin|, new_h = |w*sin| + |h*cos|
            // Tolerance keeps float noise from adding a whole pixel
            let new_w = (w * cos + h * sin - 1e-9).ceil() as u32;
            let new_h = (w * sin + h * cos - 1e-9).ceil() as u32;

            (new_w.max(1), new_h.max(1))
        }
    }
}

/// Rotate `cover` by `angle_degrees` into a `width x height` frame.
///
/// `cover` must be the cover-resized source for
/// `compute_rotated_bounds(width, height, angle_degrees)`. Right angles use an
/// exact pixel permutation; other angles are interpolated with `filter`
/// (bilinear for [`Resampling::Bilinear`], Lanczos3 otherwise).
pub fn rotate_into_frame(
    cover: &RgbaImage,
    angle_degrees: f64,
    width: u32,
    height: u32,
    filter: Resampling,
) -> RgbaImage {
    let rotated = match classify(angle_degrees) {
        RightAngle::None => cover.clone(),
        RightAngle::Cw90 => imageops::rotate90(cover),
        RightAngle::Half => imageops::rotate180(cover),
        RightAngle::Ccw90 => imageops::rotate270(cover),
        RightAngle::Arbitrary(a) => return rotate_arbitrary(cover, a, width, height, filter),
    };

    if rotated.dimensions() == (width, height) {
        rotated
    } else {
        // Cover box was not built for this frame; center-crop what we have
        let x = rotated.width().saturating_sub(width) / 2;
        let y = rotated.height().saturating_sub(height) / 2;
        let mut frame = RgbaImage::new(width, height);
        imageops::replace(&mut frame, &rotated, -(x as i64), -(y as i64));
        frame
    }
}

fn rotate_arbitrary(
    cover: &RgbaImage,
    angle_degrees: f64,
    width: u32,
    height: u32,
    filter: Resampling,
) -> RgbaImage {
    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let src_cx = cover.width() as f64 / 2.0;
    let src_cy = cover.height() as f64 / 2.0;
    let dst_cx = width as f64 / 2.0;
    let dst_cy = height as f64 / 2.0;

    let mut output = RgbaImage::new(width, height);

    for (dst_x, dst_y, out) in output.enumerate_pixels_mut() {
        // Pixel centers, relative to the frame center
        let dx = dst_x as f64 + 0.5 - dst_cx;
        let dy = dst_y as f64 + 0.5 - dst_cy;

        // Back to pixel-index space of the cover image
        let src_x = dx * cos + dy * sin + src_cx - 0.5;
        let src_y = -dx * sin + dy * cos + src_cy - 0.5;

        *out = match filter {
            Resampling::Bilinear => sample_bilinear(cover, src_x, src_y),
            Resampling::CatmullRom | Resampling::Lanczos3 => sample_lanczos3(cover, src_x, src_y),
        };
    }

    output
}

/// Read a pixel as `[f64; 4]`, clamping coordinates to the image edge.
#[inline]
fn get_pixel_clamped(image: &RgbaImage, px: i64, py: i64) -> [f64; 4] {
    let x = px.clamp(0, image.width() as i64 - 1) as u32;
    let y = py.clamp(0, image.height() as i64 - 1) as u32;
    image.get_pixel(x, y).0.map(|c| c as f64)
}

/// Bilinear interpolation over the 4 nearest pixels, edge-clamped.
fn sample_bilinear(image: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let p00 = get_pixel_clamped(image, x0, y0);
    let p10 = get_pixel_clamped(image, x0 + 1, y0);
    let p01 = get_pixel_clamped(image, x0, y0 + 1);
    let p11 = get_pixel_clamped(image, x0 + 1, y0 + 1);

    let mut result = [0u8; 4];
    for i in 0..4 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }
    Rgba(result)
}

/// Lanczos3 interpolation over a 6x6 neighborhood, edge-clamped.
fn sample_lanczos3(image: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 4];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;
            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);

            let pixel = get_pixel_clamped(image, px, py);
            for i in 0..4 {
                sum[i] += pixel[i] * weight;
            }
            weight_sum += weight;
        }
    }

    if weight_sum.abs() < f64::EPSILON {
        return sample_bilinear(image, x, y);
    }

    let mut result = [0u8; 4];
    for i in 0..4 {
        result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
    }
    Rgba(result)
}

/// Lanczos kernel: `sinc(x) * sinc(x/a)` for `|x| < a`, else 0.
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::cover_resize;

    fn test_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            let v = ((x + y) * 8) as u8;
            Rgba([v, v, 255 - v, 255])
        })
    }

    fn render_rotated(src: &RgbaImage, angle: f64, w: u32, h: u32, filter: Resampling) -> RgbaImage {
        let (bw, bh) = compute_rotated_bounds(w, h, angle);
        let cover = cover_resize(src, bw, bh, filter);
        rotate_into_frame(&cover, angle, w, h, filter)
    }

    #[test]
    fn test_bounds_fast_paths() {
        assert_eq!(compute_rotated_bounds(100, 50, 0.0), (100, 50));
        assert_eq!(compute_rotated_bounds(100, 50, 90.0), (50, 100));
        assert_eq!(compute_rotated_bounds(100, 50, -90.0), (50, 100));
        assert_eq!(compute_rotated_bounds(100, 50, 180.0), (100, 50));
        assert_eq!(compute_rotated_bounds(100, 50, -180.0), (100, 50));
        assert_eq!(compute_rotated_bounds(100, 50, 270.0), (50, 100));
        assert_eq!(compute_rotated_bounds(100, 50, 720.0), (100, 50));
        assert_eq!(compute_rotated_bounds(100, 50, 0.0001), (100, 50));
    }

    #[test]
    fn test_45_degree_bounds() {
        let (w, h) = compute_rotated_bounds(100, 100, 45.0);
        // Diagonal of 100x100 square is ~141.4, rounded up
        assert_eq!((w, h), (142, 142));
    }

    #[test]
    fn test_opposite_rotations_same_bounds() {
        assert_eq!(
            compute_rotated_bounds(100, 80, 30.0),
            compute_rotated_bounds(100, 80, -30.0)
        );
    }

    #[test]
    fn test_bounds_never_zero() {
        for angle in [1.0, 15.0, 45.0, 89.0, 90.0, 135.0, 179.0, 180.0, -45.0] {
            let (w, h) = compute_rotated_bounds(1, 1, angle);
            assert!(w > 0 && h > 0, "angle {}", angle);
        }
    }

    #[test]
    fn test_classify_normalizes() {
        assert_eq!(classify(0.0), RightAngle::None);
        assert_eq!(classify(360.0), RightAngle::None);
        assert_eq!(classify(90.0), RightAngle::Cw90);
        assert_eq!(classify(-270.0), RightAngle::Cw90);
        assert_eq!(classify(-90.0), RightAngle::Ccw90);
        assert_eq!(classify(180.0), RightAngle::Half);
        assert_eq!(classify(-180.0), RightAngle::Half);
        assert_eq!(classify(30.0), RightAngle::Arbitrary(30.0));
        assert_eq!(classify(390.0), RightAngle::Arbitrary(30.0));
    }

    #[test]
    fn test_frame_size_is_fixed() {
        let src = test_image(60, 40);
        for angle in [0.0, 15.0, 45.0, 90.0, -90.0, 137.0, 180.0, -180.0] {
            let out = render_rotated(&src, angle, 50, 30, Resampling::Lanczos3);
            assert_eq!(out.dimensions(), (50, 30), "angle {}", angle);
        }
    }

    #[test]
    fn test_rotation_leaves_no_transparent_pixels() {
        let src = test_image(64, 32);
        for angle in [7.5, 30.0, 45.0, 90.0, -60.0, 135.0, 179.0] {
            for filter in [Resampling::Bilinear, Resampling::Lanczos3] {
                let out = render_rotated(&src, angle, 40, 20, filter);
                assert!(
                    out.pixels().all(|p| p.0[3] == 255),
                    "transparent pixel at angle {} with {:?}",
                    angle,
                    filter
                );
            }
        }
    }

    #[test]
    fn test_90_degrees_is_clockwise() {
        // Left column red, rest blue
        let src = RgbaImage::from_fn(4, 2, |x, _| {
            if x == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        let out = rotate_into_frame(&src, 90.0, 2, 4, Resampling::Bilinear);
        // Clockwise: the left column ends up along the top edge
        assert_eq!(out.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(out.get_pixel(1, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(out.get_pixel(0, 3), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_arbitrary_angle_near_right_angle_matches_direction() {
        // A nearly 90-degree arbitrary rotation should agree with the exact path
        let src = RgbaImage::from_fn(20, 10, |x, _| {
            if x < 10 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        let exact = rotate_into_frame(&src, 90.0, 10, 20, Resampling::Bilinear);
        let approx = rotate_arbitrary(&src, 89.99, 10, 20, Resampling::Bilinear);
        assert_eq!(exact.get_pixel(5, 2), approx.get_pixel(5, 2));
        assert_eq!(exact.get_pixel(5, 17), approx.get_pixel(5, 17));
    }

    #[test]
    fn test_center_preserved() {
        let size = 21;
        let mut src = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 255]));
        for y in 9..=11 {
            for x in 9..=11 {
                src.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }
        let out = rotate_into_frame(&src, 33.0, size, size, Resampling::Bilinear);
        assert!(out.get_pixel(10, 10).0[0] > 200);
    }

    #[test]
    fn test_lanczos_weight() {
        assert!((lanczos_weight(0.0, 3.0) - 1.0).abs() < f64::EPSILON);
        assert!(lanczos_weight(3.0, 3.0).abs() < f64::EPSILON);
        assert!((lanczos_weight(1.5, 3.0) - lanczos_weight(-1.5, 3.0)).abs() < 1e-10);
    }

    #[test]
    fn test_tiny_cover_image() {
        let src = RgbaImage::from_pixel(1, 1, Rgba([9, 9, 9, 255]));
        let out = rotate_into_frame(&src, 45.0, 1, 1, Resampling::Lanczos3);
        assert_eq!(out.get_pixel(0, 0), &Rgba([9, 9, 9, 255]));
    }
}
