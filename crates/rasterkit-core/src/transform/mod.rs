//! Geometric transforms: cover fit, resampling and rotation.
//!
//! # Transform Order
//!
//! When a plan is rendered, geometry is resolved in this order:
//! 1. Bounding box of the output frame in the rotated coordinate system
//! 2. Cover-resize of the source into that box (centered, overflow clipped)
//! 3. Rotation about the frame center into the fixed-size output frame
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise on screen
//! - Origin is the top-left corner, y axis pointing down

mod fit;
mod resample;
mod rotation;

pub use fit::{cover_fit, CoverFit, SourceWindow};
pub use resample::{cover_resize, Resampling};
pub use rotation::{compute_rotated_bounds, rotate_into_frame};
