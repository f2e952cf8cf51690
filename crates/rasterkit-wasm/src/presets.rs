//! Preset catalog and sizing helpers for the UI.

use crate::to_js_object;
use rasterkit_core::{coupled_dimension as core_coupled, Dimension, PresetCatalog};
use wasm_bindgen::prelude::*;

/// The built-in preset catalog as
/// `{platform: {format: {width, height, label}}}`.
#[wasm_bindgen(js_name = presetCatalog)]
pub fn preset_catalog() -> Result<JsValue, JsValue> {
    to_js_object(&PresetCatalog::builtin())
}

/// The paired dimension for an aspect-locked edit.
///
/// `edited_width` selects whether `value` is a width (height is returned) or a
/// height (width is returned).
#[wasm_bindgen(js_name = coupledDimension)]
pub fn coupled_dimension(edited_width: bool, value: u32, aspect_ratio: f64) -> u32 {
    let edited = if edited_width {
        Dimension::Width
    } else {
        Dimension::Height
    };
    core_coupled(edited, value, aspect_ratio)
}
