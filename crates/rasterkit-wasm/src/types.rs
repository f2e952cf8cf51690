//! WASM-compatible wrapper types.

use crate::to_js_object;
use rasterkit_core::{ContainerFormat, OutputArtifact};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// An encoded export, ready for a download link.
///
/// Every export produces a new artifact. `bytes` copies the encoded file into
/// JavaScript memory; wrap it in a `Blob` with `mimeType` to download it.
#[wasm_bindgen]
pub struct JsOutputArtifact {
    inner: OutputArtifact,
}

#[wasm_bindgen]
impl JsOutputArtifact {
    /// Encoded file contents
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(self.inner.bytes.as_slice())
    }

    #[wasm_bindgen(getter = byteLength)]
    pub fn byte_length(&self) -> usize {
        self.inner.len()
    }

    #[wasm_bindgen(getter = mimeType)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type.clone()
    }

    #[wasm_bindgen(getter = fileExtension)]
    pub fn file_extension(&self) -> String {
        self.inner.file_extension.clone()
    }

    #[wasm_bindgen(getter = suggestedFilename)]
    pub fn suggested_filename(&self) -> String {
        self.inner.suggested_filename.clone()
    }
}

impl From<OutputArtifact> for JsOutputArtifact {
    fn from(inner: OutputArtifact) -> Self {
        Self { inner }
    }
}

/// One entry of the export format picker.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormatInfo {
    name: String,
    mime_type: &'static str,
    extension: &'static str,
    guaranteed: bool,
    uses_quality: bool,
}

fn format_infos() -> Vec<FormatInfo> {
    ContainerFormat::ALL
        .iter()
        .map(|&format| FormatInfo {
            name: format.to_string(),
            mime_type: format.mime_type(),
            extension: format.extension(),
            guaranteed: format.is_guaranteed(),
            uses_quality: format.uses_quality(),
        })
        .collect()
}

/// Export formats as `[{name, mimeType, extension, guaranteed, usesQuality}]`.
///
/// Formats that are not guaranteed may fail to export.
#[wasm_bindgen(js_name = exportFormats)]
pub fn export_formats() -> Result<JsValue, JsValue> {
    to_js_object(&format_infos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_infos() {
        let infos = format_infos();
        assert_eq!(infos.len(), 6);
        assert_eq!(infos[0].name, "JPEG");
        assert!(infos[0].uses_quality);
        assert_eq!(infos.iter().filter(|f| f.uses_quality).count(), 2);
        assert_eq!(infos.iter().filter(|f| f.guaranteed).count(), 3);
        assert!(!infos.iter().any(|f| f.extension == "tiff" && f.guaranteed));
    }

    #[test]
    fn test_artifact_getters() {
        let artifact = JsOutputArtifact::from(OutputArtifact::new(
            vec![0u8; 12],
            ContainerFormat::Png,
            "image-4x3.png".to_string(),
        ));
        assert_eq!(artifact.byte_length(), 12);
        assert_eq!(artifact.mime_type(), "image/png");
        assert_eq!(artifact.file_extension(), "png");
        assert_eq!(artifact.suggested_filename(), "image-4x3.png");
    }
}
