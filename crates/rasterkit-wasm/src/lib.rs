//! Rasterkit WASM - WebAssembly bindings for Rasterkit
//!
//! This crate exposes the rasterkit-core editing session to JavaScript and
//! TypeScript applications.
//!
//! # Module Structure
//!
//! - `session` - The editing session (load, edit, export, view)
//! - `types` - WASM-compatible wrapper types for export artifacts
//! - `presets` - Preset catalog and aspect-coupling helpers
//! - `logger` - Forwards pipeline logs to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditorSession, presetCatalog } from '@rasterkit/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const session = new JsEditorSession();
//! session.load(new Uint8Array(await file.arrayBuffer()), file.type, file.name);
//! console.log(session.view());
//! ```

use serde::Serialize;
use wasm_bindgen::prelude::*;

mod logger;
mod presets;
mod session;
mod types;

// Re-export public types
pub use logger::set_log_level;
pub use presets::{coupled_dimension, preset_catalog};
pub use session::{JsEditorSession, JsExportJob};
pub use types::{export_formats, JsOutputArtifact};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install(log::LevelFilter::Info);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Convert to a plain JS object (maps become objects, `None` becomes `null`).
pub(crate) fn to_js_object<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
