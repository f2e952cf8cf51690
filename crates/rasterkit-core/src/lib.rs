//! Rasterkit Core - client-side image transform pipeline
//!
//! This crate provides the image processing behind the Rasterkit editor:
//! decoding a selected file, describing the edit as a [`TransformPlan`],
//! rendering it (cover-fit resize, rotation, color filters) and encoding the
//! result for download. [`EditorSession`] ties the stages together.

pub mod config;
pub mod decode;
pub mod encode;
pub mod filters;
pub mod pipeline;
pub mod plan;
pub mod presets;
pub mod session;
pub mod transform;

pub use config::{ConfigError, SessionConfig};
pub use decode::{decode_source, DecodeError, ImageSource};
pub use encode::{encode, ContainerFormat, EncodeError, OutputArtifact};
pub use filters::apply_filters;
pub use pipeline::{render, render_with, RasterBuffer, RenderError};
pub use plan::{
    coupled_dimension, Dimension, FilterSettings, PlanError, TransformPlan, MAX_DIMENSION,
    MAX_PIXELS,
};
pub use presets::{Preset, PresetCatalog, PresetError};
pub use session::{EditorSession, ExportJob, SessionError, SessionView};
pub use transform::{compute_rotated_bounds, cover_fit, Resampling};
