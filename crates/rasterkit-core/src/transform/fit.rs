//! Cover-fit geometry.
//!
//! Pure calculation functions: given source and target dimensions, work out
//! how the source is scaled and positioned so that it fills the whole target
//! box, with the overflow centered and clipped.

/// Placement of a source image that covers a target box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFit {
    /// Uniform scale applied to the source.
    pub scale: f64,
    /// Source width after scaling.
    pub scaled_width: f64,
    /// Source height after scaling.
    pub scaled_height: f64,
    /// Left edge of the scaled source inside the box (zero or negative).
    pub offset_x: f64,
    /// Top edge of the scaled source inside the box (zero or negative).
    pub offset_y: f64,
}

/// Region of the source, in source pixels, that ends up visible in the box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceWindow {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SourceWindow {
    /// Snap the window to whole pixels inside a `width x height` source.
    ///
    /// The window is kept centered on the same point and is at least 1x1.
    /// When the clipped overflow is an odd number of pixels it cannot split
    /// evenly: the start is rounded, so the left (or top) side loses the extra
    /// pixel and each side differs from [`CoverFit::clip_per_side`] by half a
    /// pixel.
    pub fn to_pixels(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let w = (self.width.round() as u32).clamp(1, width);
        let h = (self.height.round() as u32).clamp(1, height);
        let x = ((width - w) as f64 / 2.0).round() as u32;
        let y = ((height - h) as f64 / 2.0).round() as u32;
        (x, y, w, h)
    }
}

impl CoverFit {
    /// Amount clipped from each side of the scaled source, `(horizontal, vertical)`.
    pub fn clip_per_side(&self) -> (f64, f64) {
        (-self.offset_x, -self.offset_y)
    }

    /// The visible source region.
    pub fn source_window(&self) -> SourceWindow {
        SourceWindow {
            x: -self.offset_x / self.scale,
            y: -self.offset_y / self.scale,
            width: (self.scaled_width + 2.0 * self.offset_x) / self.scale,
            height: (self.scaled_height + 2.0 * self.offset_y) / self.scale,
        }
    }
}

/// Compute the cover placement of `source` inside `target`.
///
/// If the source is relatively wider than the box, its height is matched and
/// the excess width is clipped equally on both sides; otherwise its width is
/// matched and the excess height is clipped. Both inputs must be non-zero.
///
/// # Example
///
/// ```
/// use rasterkit_core::transform::cover_fit;
///
/// // 1920x1080 into a 1080x1080 square: 420px clipped on each side
/// let fit = cover_fit((1920, 1080), (1080, 1080));
/// assert_eq!(fit.clip_per_side(), (420.0, 0.0));
/// ```
pub fn cover_fit(source: (u32, u32), target: (u32, u32)) -> CoverFit {
    let (src_w, src_h) = (source.0 as f64, source.1 as f64);
    let (dst_w, dst_h) = (target.0 as f64, target.1 as f64);

    let src_aspect = src_w / src_h;
    let dst_aspect = dst_w / dst_h;

    let scale = if src_aspect > dst_aspect {
        // Source is wider: match height, clip width
        dst_h / src_h
    } else {
        // Source is taller (or equal): match width, clip height
        dst_w / src_w
    };

    let scaled_width = src_w * scale;
    let scaled_height = src_h * scale;

    CoverFit {
        scale,
        scaled_width,
        scaled_height,
        offset_x: (dst_w - scaled_width) / 2.0,
        offset_y: (dst_h - scaled_height) / 2.0,
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
