//! Editing session bindings.
//!
//! [`JsEditorSession`] wraps the core session controller. The UI calls one
//! method per user interaction, then redraws from `view()`.
//!
//! # Example
//!
//! ```typescript
//! const session = new JsEditorSession();
//! session.load(new Uint8Array(await file.arrayBuffer()), file.type, file.name);
//! session.setWidth('1000');
//! session.applyPreset('instagram', 'post');
//! const artifact = session.export('png', 92);
//! const blob = new Blob([artifact.bytes], { type: artifact.mimeType });
//! ```

use crate::to_js_object;
use crate::types::JsOutputArtifact;
use rasterkit_core::{
    ContainerFormat, Dimension, EditorSession, EncodeError, ExportJob, FilterSettings,
    PresetCatalog, SessionConfig, SessionError,
};
use wasm_bindgen::prelude::*;

fn to_js_error(e: SessionError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Parse an optional format name such as `"png"`, `"jpg"` or `"image/webp"`.
fn parse_format(format: Option<String>) -> Result<Option<ContainerFormat>, EncodeError> {
    format
        .filter(|f| !f.trim().is_empty())
        .map(|f| f.parse())
        .transpose()
}

/// An export claimed by `beginExport`, to be passed to `finishExport`.
#[wasm_bindgen]
pub struct JsExportJob {
    inner: ExportJob,
}

#[wasm_bindgen]
impl JsExportJob {
    #[wasm_bindgen(getter = suggestedFilename)]
    pub fn suggested_filename(&self) -> String {
        self.inner.filename().to_string()
    }

    #[wasm_bindgen(getter = mimeType)]
    pub fn mime_type(&self) -> String {
        self.inner.format().mime_type().to_string()
    }
}

/// The editing session for one page.
#[wasm_bindgen]
pub struct JsEditorSession {
    inner: EditorSession,
}

#[wasm_bindgen]
impl JsEditorSession {
    /// A session with the default configuration and built-in presets.
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsEditorSession {
        JsEditorSession {
            inner: EditorSession::default(),
        }
    }

    /// A session from a configuration object and an optional preset catalog.
    ///
    /// Both use the same JSON shapes as the core crate; missing config fields
    /// take their defaults and an absent catalog means the built-in one.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue, catalog: JsValue) -> Result<JsEditorSession, JsValue> {
        let config: SessionConfig = if config.is_undefined() || config.is_null() {
            SessionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid configuration: {}", e)))?
        };
        config
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let catalog: PresetCatalog = if catalog.is_undefined() || catalog.is_null() {
            PresetCatalog::builtin()
        } else {
            serde_wasm_bindgen::from_value(catalog)
                .map_err(|e| JsValue::from_str(&format!("Invalid preset catalog: {}", e)))?
        };
        catalog
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(JsEditorSession {
            inner: EditorSession::with_catalog(config, catalog),
        })
    }

    /// Decode a selected file. On failure the previous image stays loaded.
    pub fn load(
        &mut self,
        bytes: &[u8],
        mime: &str,
        file_name: Option<String>,
    ) -> Result<(), JsValue> {
        self.inner
            .load(bytes, mime, file_name.as_deref())
            .map_err(to_js_error)
    }

    pub fn remove(&mut self) {
        self.inner.remove();
    }

    /// Width input changed; `text` is the raw input value.
    #[wasm_bindgen(js_name = setWidth)]
    pub fn set_width(&mut self, text: &str) -> Result<(), JsValue> {
        self.inner
            .set_dimension_text(Dimension::Width, text)
            .map_err(to_js_error)
    }

    /// Height input changed; `text` is the raw input value.
    #[wasm_bindgen(js_name = setHeight)]
    pub fn set_height(&mut self, text: &str) -> Result<(), JsValue> {
        self.inner
            .set_dimension_text(Dimension::Height, text)
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = setMaintainAspect)]
    pub fn set_maintain_aspect(&mut self, maintain: bool) -> Result<(), JsValue> {
        self.inner
            .set_maintain_aspect(maintain)
            .map_err(to_js_error)
    }

    /// Rotation in degrees, clockwise, clamped to [-180, 180].
    #[wasm_bindgen(js_name = setRotation)]
    pub fn set_rotation(&mut self, degrees: f64) -> Result<(), JsValue> {
        self.inner.set_rotation(degrees).map_err(to_js_error)
    }

    /// `{brightness, contrast, saturation, grayscale}` in percent. Missing
    /// fields take their neutral values.
    #[wasm_bindgen(js_name = setFilters)]
    pub fn set_filters(&mut self, filters: JsValue) -> Result<(), JsValue> {
        let filters: FilterSettings = serde_wasm_bindgen::from_value(filters)
            .map_err(|e| JsValue::from_str(&format!("Invalid filters: {}", e)))?;
        self.inner.set_filters(filters).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = applyPreset)]
    pub fn apply_preset(&mut self, platform: &str, format: &str) -> Result<(), JsValue> {
        self.inner
            .apply_preset(platform, format)
            .map_err(to_js_error)
    }

    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.inner.reset().map_err(to_js_error)
    }

    /// Render and encode the current edit.
    ///
    /// Omitted arguments use the configured default format and quality.
    pub fn export(
        &mut self,
        format: Option<String>,
        quality: Option<u8>,
    ) -> Result<JsOutputArtifact, JsValue> {
        let format = parse_format(format).map_err(|e| to_js_error(e.into()))?;
        self.inner
            .export(format, quality)
            .map(JsOutputArtifact::from)
            .map_err(to_js_error)
    }

    /// Claim the export slot without rendering yet.
    ///
    /// `view().exportInFlight` stays true until the job is handed to
    /// `finishExport`, so the UI can show its busy state first:
    ///
    /// ```typescript
    /// const job = session.beginExport('jpeg', 80);
    /// render(session.view());
    /// await new Promise(requestAnimationFrame);
    /// const artifact = session.finishExport(job);
    /// ```
    #[wasm_bindgen(js_name = beginExport)]
    pub fn begin_export(
        &mut self,
        format: Option<String>,
        quality: Option<u8>,
    ) -> Result<JsExportJob, JsValue> {
        let format = parse_format(format).map_err(|e| to_js_error(e.into()))?;
        self.inner
            .begin_export(format, quality)
            .map(|inner| JsExportJob { inner })
            .map_err(to_js_error)
    }

    /// Render and encode a claimed job, releasing the export slot.
    #[wasm_bindgen(js_name = finishExport)]
    pub fn finish_export(&mut self, job: JsExportJob) -> Result<JsOutputArtifact, JsValue> {
        self.inner
            .finish_export(job.inner)
            .map(JsOutputArtifact::from)
            .map_err(to_js_error)
    }

    /// Current UI state as a plain object.
    pub fn view(&self) -> Result<JsValue, JsValue> {
        to_js_object(&self.inner.view())
    }
}

impl Default for JsEditorSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!(parse_format(None).unwrap(), None);
        assert_eq!(parse_format(Some(String::new())).unwrap(), None);
        assert_eq!(
            parse_format(Some("png".into())).unwrap(),
            Some(ContainerFormat::Png)
        );
        assert_eq!(
            parse_format(Some("image/jpeg".into())).unwrap(),
            Some(ContainerFormat::Jpeg)
        );
        assert!(matches!(
            parse_format(Some("heic".into())),
            Err(EncodeError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = JsEditorSession::new();
        assert!(!session.inner.view().has_source);
    }
}

/// WASM-specific tests that require JsValue.
///
/// Run with `wasm-pack test`.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([40, 80, 120, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[wasm_bindgen_test]
    fn test_load_and_export() {
        let mut session = JsEditorSession::new();
        session
            .load(&png_bytes(40, 20), "image/png", Some("photo.png".into()))
            .unwrap();
        session.set_width("20").unwrap();

        let artifact = session.export(Some("png".into()), None).unwrap();
        assert_eq!(artifact.suggested_filename(), "image-20x10.png");
        assert_eq!(artifact.mime_type(), "image/png");
        assert!(artifact.bytes().length() > 0);
    }

    #[wasm_bindgen_test]
    fn test_rejected_file_type() {
        let mut session = JsEditorSession::new();
        let err = session.load(b"%PDF", "application/pdf", None).unwrap_err();
        assert!(err.as_string().unwrap().contains("application/pdf"));
    }

    #[wasm_bindgen_test]
    fn test_edit_without_source() {
        let mut session = JsEditorSession::new();
        assert!(session.set_width("100").is_err());
        assert!(session.export(None, None).is_err());
    }

    #[wasm_bindgen_test]
    fn test_unknown_format() {
        let mut session = JsEditorSession::new();
        session.load(&png_bytes(4, 4), "image/png", None).unwrap();
        assert!(session.export(Some("heic".into()), None).is_err());
    }

    #[wasm_bindgen_test]
    fn test_with_config_defaults() {
        let session = JsEditorSession::with_config(JsValue::UNDEFINED, JsValue::NULL).unwrap();
        assert_eq!(session.inner.config(), &SessionConfig::default());
    }

    #[wasm_bindgen_test]
    fn test_with_config_rejects_zero_size_preset() {
        let preset = js_sys::Object::new();
        js_sys::Reflect::set(&preset, &"width".into(), &JsValue::from_f64(0.0)).unwrap();
        js_sys::Reflect::set(&preset, &"height".into(), &JsValue::from_f64(500.0)).unwrap();
        js_sys::Reflect::set(&preset, &"label".into(), &"Broken".into()).unwrap();
        let formats = js_sys::Object::new();
        js_sys::Reflect::set(&formats, &"header".into(), &preset).unwrap();
        let catalog = js_sys::Object::new();
        js_sys::Reflect::set(&catalog, &"mastodon".into(), &formats).unwrap();

        let err = JsEditorSession::with_config(JsValue::UNDEFINED, catalog.into())
            .err()
            .unwrap();
        assert!(err.as_string().unwrap().contains("mastodon/header"));
    }

    #[wasm_bindgen_test]
    fn test_split_export_reports_in_flight() {
        let mut session = JsEditorSession::new();
        session.load(&png_bytes(8, 4), "image/png", None).unwrap();

        let job = session.begin_export(Some("png".into()), None).unwrap();
        assert_eq!(job.suggested_filename(), "image-8x4.png");
        let view = session.view().unwrap();
        let busy = js_sys::Reflect::get(&view, &"exportInFlight".into()).unwrap();
        assert_eq!(busy.as_bool(), Some(true));
        assert!(session.export(None, None).is_err());

        let artifact = session.finish_export(job).unwrap();
        assert_eq!(artifact.mime_type(), "image/png");
        let view = session.view().unwrap();
        let busy = js_sys::Reflect::get(&view, &"exportInFlight".into()).unwrap();
        assert_eq!(busy.as_bool(), Some(false));
    }

    #[wasm_bindgen_test]
    fn test_set_filters_partial_object() {
        let mut session = JsEditorSession::new();
        session.load(&png_bytes(4, 4), "image/png", None).unwrap();

        let filters = js_sys::Object::new();
        js_sys::Reflect::set(&filters, &"grayscale".into(), &JsValue::from_f64(100.0)).unwrap();
        session.set_filters(filters.into()).unwrap();

        let applied = session.inner.plan().unwrap().filters();
        assert_eq!(applied.grayscale, 100.0);
        assert_eq!(applied.brightness, 100.0);
    }

    #[wasm_bindgen_test]
    fn test_view_is_plain_object() {
        let mut session = JsEditorSession::new();
        session.load(&png_bytes(8, 6), "image/png", None).unwrap();
        let view = session.view().unwrap();
        let has_source = js_sys::Reflect::get(&view, &"hasSource".into()).unwrap();
        assert_eq!(has_source.as_bool(), Some(true));
        let width = js_sys::Reflect::get(&view, &"targetWidth".into()).unwrap();
        assert_eq!(width.as_f64(), Some(8.0));
    }
}
