//! Editing session controller.
//!
//! One [`EditorSession`] owns the loaded source and its transform plan, and
//! every user interaction is an explicit transition on it. The UI never
//! toggles visibility on its own: it reads [`EditorSession::view`] after each
//! transition and renders from that.
//!
//! Failures are contained: a rejected file, an invalid plan or a failed encode
//! leaves the source and plan exactly as they were before the operation.

use serde::Serialize;
use thiserror::Error;

use crate::config::SessionConfig;
use crate::decode::{decode_source, DecodeError, ImageSource};
use crate::encode::{
    dimension_filename, encode_bytes, preset_filename, ContainerFormat, EncodeError,
    OutputArtifact,
};
use crate::pipeline::{render_with, RenderError};
use crate::plan::{Dimension, FilterSettings, TransformPlan};
use crate::presets::{PresetCatalog, PresetError};
use crate::transform::Resampling;

/// Errors surfaced to the user by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Preset(#[from] PresetError),

    /// An edit or export was requested with no image loaded.
    #[error("Please select an image first.")]
    NoSource,

    /// A second export was requested while one is still running.
    #[error("An export is already in progress.")]
    ExportInProgress,
}

/// The preset currently sizing the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivePreset {
    pub platform: String,
    pub format: String,
    pub label: String,
}

/// Snapshot of everything the UI needs to draw itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub has_source: bool,
    pub can_export: bool,
    pub export_in_flight: bool,
    pub file_name: Option<String>,
    pub source_width: Option<u32>,
    pub source_height: Option<u32>,
    pub target_width: Option<u32>,
    pub target_height: Option<u32>,
    pub maintain_aspect: bool,
    pub rotation_degrees: f64,
    pub filters: FilterSettings,
    pub active_preset: Option<ActivePreset>,
    /// Why export is currently impossible, if a plan exists but is invalid.
    pub plan_error: Option<String>,
}

/// A claimed export cycle, returned by [`EditorSession::begin_export`].
///
/// The session reports `export_in_flight` until the job is passed to
/// [`EditorSession::finish_export`].
#[derive(Debug)]
pub struct ExportJob {
    plan: TransformPlan,
    format: ContainerFormat,
    quality: u8,
    filename: String,
}

impl ExportJob {
    pub fn format(&self) -> ContainerFormat {
        self.format
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// Releases the export slot when dropped, including on unwind.
struct ExportSlot<'a>(&'a mut bool);

impl Drop for ExportSlot<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Controller for one editing session.
#[derive(Debug)]
pub struct EditorSession {
    config: SessionConfig,
    catalog: PresetCatalog,
    source: Option<ImageSource>,
    plan: Option<TransformPlan>,
    active_preset: Option<ActivePreset>,
    export_in_flight: bool,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl EditorSession {
    /// A session with the built-in preset catalog.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_catalog(config, PresetCatalog::builtin())
    }

    pub fn with_catalog(config: SessionConfig, catalog: PresetCatalog) -> Self {
        Self {
            config,
            catalog,
            source: None,
            plan: None,
            active_preset: None,
            export_in_flight: false,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn catalog(&self) -> &PresetCatalog {
        &self.catalog
    }

    pub fn source(&self) -> Option<&ImageSource> {
        self.source.as_ref()
    }

    pub fn plan(&self) -> Option<&TransformPlan> {
        self.plan.as_ref()
    }

    pub fn active_preset(&self) -> Option<&ActivePreset> {
        self.active_preset.as_ref()
    }

    pub fn is_export_in_flight(&self) -> bool {
        self.export_in_flight
    }

    /// Decode a selected file and make it the current source.
    ///
    /// The plan is reset to the new source's defaults. On failure the previous
    /// source and plan are kept.
    pub fn load(
        &mut self,
        bytes: &[u8],
        mime: &str,
        file_name: Option<&str>,
    ) -> Result<(), SessionError> {
        let accepted = self.config.accepted_mime_types.as_slice();
        let mut source = decode_source(bytes, mime, accepted)?;
        if let Some(name) = file_name {
            source = source.with_file_name(name);
        }
        self.replace_source(source);
        Ok(())
    }

    /// Make an already decoded image the current source.
    pub fn replace_source(&mut self, source: ImageSource) {
        log::info!(
            "loaded source {}x{} ({})",
            source.natural_width(),
            source.natural_height(),
            source.mime()
        );
        self.plan = Some(TransformPlan::for_source(&source));
        self.source = Some(source);
        self.active_preset = None;
    }

    /// Drop the current source and its plan.
    pub fn remove(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.release();
        }
        self.plan = None;
        self.active_preset = None;
    }

    fn plan_mut(&mut self) -> Result<&mut TransformPlan, SessionError> {
        self.plan.as_mut().ok_or(SessionError::NoSource)
    }

    /// Edit a target dimension. Clears any active preset.
    pub fn set_dimension(&mut self, dim: Dimension, value: i64) -> Result<(), SessionError> {
        self.plan_mut()?.set_dimension(dim, value);
        self.active_preset = None;
        Ok(())
    }

    /// Edit a target dimension from the raw text of its input box.
    pub fn set_dimension_text(&mut self, dim: Dimension, text: &str) -> Result<(), SessionError> {
        self.plan_mut()?.set_dimension_text(dim, text);
        self.active_preset = None;
        Ok(())
    }

    pub fn set_maintain_aspect(&mut self, maintain: bool) -> Result<(), SessionError> {
        let plan = self.plan_mut()?;
        let before = plan.target_dimensions();
        plan.set_maintain_aspect(maintain);
        if plan.target_dimensions() != before {
            self.active_preset = None;
        }
        Ok(())
    }

    pub fn set_rotation(&mut self, degrees: f64) -> Result<(), SessionError> {
        self.plan_mut()?.set_rotation(degrees);
        Ok(())
    }

    pub fn set_filters(&mut self, filters: FilterSettings) -> Result<(), SessionError> {
        self.plan_mut()?.set_filters(filters);
        Ok(())
    }

    /// Size the output from a catalog preset.
    pub fn apply_preset(&mut self, platform: &str, format: &str) -> Result<(), SessionError> {
        if self.plan.is_none() {
            return Err(SessionError::NoSource);
        }
        let preset = self.catalog.lookup(platform, format)?.clone();
        self.plan_mut()?.apply_preset(preset.width, preset.height);
        self.active_preset = Some(ActivePreset {
            platform: platform.to_string(),
            format: format.to_string(),
            label: preset.label,
        });
        Ok(())
    }

    /// Return the plan to the defaults for the current source.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.plan_mut()?.reset();
        self.active_preset = None;
        Ok(())
    }

    /// Render and encode the current plan.
    ///
    /// `None` picks the configured default format or quality. Only one export
    /// runs at a time; the session is never modified by a failed export.
    pub fn export(
        &mut self,
        format: Option<ContainerFormat>,
        quality: Option<u8>,
    ) -> Result<OutputArtifact, SessionError> {
        let job = self.begin_export(format, quality)?;
        self.finish_export(job)
    }

    /// Claim the export slot and snapshot the plan.
    ///
    /// Together with [`finish_export`](Self::finish_export) this splits
    /// [`export`](Self::export) in two, so an async host can redraw its busy
    /// state in between. Edits made before the job finishes do not affect it.
    pub fn begin_export(
        &mut self,
        format: Option<ContainerFormat>,
        quality: Option<u8>,
    ) -> Result<ExportJob, SessionError> {
        if self.export_in_flight {
            log::warn!("export requested while another is in flight");
            return Err(SessionError::ExportInProgress);
        }

        let source = self.source.as_ref().ok_or(SessionError::NoSource)?;
        let plan = self.plan.as_ref().ok_or(SessionError::NoSource)?;
        plan.validate().map_err(RenderError::from)?;

        let format = format.unwrap_or(self.config.default_format);
        let quality = quality.unwrap_or(self.config.default_quality).min(100);
        if !format.uses_quality() {
            log::debug!("{} export ignores quality {}", format, quality);
        }
        let filename = self.export_filename(source, plan, format);

        let job = ExportJob {
            plan: plan.clone(),
            format,
            quality,
            filename,
        };
        self.export_in_flight = true;
        Ok(job)
    }

    /// Run a claimed export and release the slot, whatever the outcome.
    pub fn finish_export(&mut self, job: ExportJob) -> Result<OutputArtifact, SessionError> {
        let _slot = ExportSlot(&mut self.export_in_flight);
        let result = run_export(self.source.as_ref(), self.config.resampling, &job);

        match &result {
            Ok(artifact) => log::info!(
                "exported {} ({} bytes)",
                artifact.suggested_filename,
                artifact.len()
            ),
            Err(e) => log::warn!("export of {} failed: {}", job.filename, e),
        }
        result
    }

    fn export_filename(
        &self,
        source: &ImageSource,
        plan: &TransformPlan,
        format: ContainerFormat,
    ) -> String {
        if let Some(preset) = &self.active_preset {
            return preset_filename(&preset.platform, &preset.format, format);
        }
        let prefix = match source.file_stem() {
            Some(stem) if self.config.prefix_from_file_name => stem,
            _ => self.config.filename_prefix.as_str(),
        };
        dimension_filename(prefix, plan.target_width(), plan.target_height(), format)
    }

    /// Derive the UI state from the session.
    pub fn view(&self) -> SessionView {
        let plan_error = self
            .plan
            .as_ref()
            .and_then(|plan| plan.validate().err())
            .map(|e| e.to_string());

        SessionView {
            has_source: self.source.is_some(),
            can_export: self.source.is_some()
                && self.plan.is_some()
                && plan_error.is_none()
                && !self.export_in_flight,
            export_in_flight: self.export_in_flight,
            file_name: self
                .source
                .as_ref()
                .and_then(|s| s.file_name().map(str::to_string)),
            source_width: self.source.as_ref().map(ImageSource::natural_width),
            source_height: self.source.as_ref().map(ImageSource::natural_height),
            target_width: self.plan.as_ref().map(TransformPlan::target_width),
            target_height: self.plan.as_ref().map(TransformPlan::target_height),
            maintain_aspect: self.plan.as_ref().map_or(true, TransformPlan::maintain_aspect),
            rotation_degrees: self.plan.as_ref().map_or(0.0, TransformPlan::rotation_degrees),
            filters: self
                .plan
                .as_ref()
                .map(|p| *p.filters())
                .unwrap_or_default(),
            active_preset: self.active_preset.clone(),
            plan_error,
        }
    }
}

fn run_export(
    source: Option<&ImageSource>,
    resampling: Resampling,
    job: &ExportJob,
) -> Result<OutputArtifact, SessionError> {
    let source = source.ok_or(SessionError::NoSource)?;
    let buffer = render_with(source, &job.plan, resampling)?;
    let bytes = encode_bytes(&buffer, job.format, job.quality)?;
    Ok(OutputArtifact::new(bytes, job.format, job.filename.clone()))
}
