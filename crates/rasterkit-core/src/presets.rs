//! Social-platform size presets.
//!
//! The catalog is plain configuration data: platform name → preset name →
//! `{width, height, label}`. A built-in catalog ships with the crate and
//! catalogs of the same shape can be loaded from JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plan::MAX_DIMENSION;

/// Errors raised by catalog lookups and loading.
#[derive(Debug, Error)]
pub enum PresetError {
    #[error("Unknown preset '{platform}/{format}'")]
    UnknownPreset { platform: String, format: String },

    #[error("Invalid preset catalog: {0}")]
    InvalidCatalog(String),
}

/// A named target size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub width: u32,
    pub height: u32,
    pub label: String,
}

impl Preset {
    pub fn new(width: u32, height: u32, label: impl Into<String>) -> Self {
        Self {
            width,
            height,
            label: label.into(),
        }
    }
}

/// Mapping of platform → preset name → size.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetCatalog {
    platforms: BTreeMap<String, BTreeMap<String, Preset>>,
}

impl PresetCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Self {
        const BUILTIN: &[(&str, &str, u32, u32, &str)] = &[
            ("instagram", "post", 1080, 1080, "Instagram post"),
            ("instagram", "story", 1080, 1920, "Instagram story"),
            ("instagram", "landscape", 1080, 566, "Instagram landscape"),
            ("instagram", "portrait", 1080, 1350, "Instagram portrait"),
            ("facebook", "post", 1200, 630, "Facebook post"),
            ("facebook", "cover", 820, 312, "Facebook cover"),
            ("facebook", "story", 1080, 1920, "Facebook story"),
            ("twitter", "post", 1600, 900, "X / Twitter post"),
            ("twitter", "header", 1500, 500, "X / Twitter header"),
            ("linkedin", "post", 1200, 627, "LinkedIn post"),
            ("linkedin", "banner", 1584, 396, "LinkedIn banner"),
            ("youtube", "thumbnail", 1280, 720, "YouTube thumbnail"),
            ("youtube", "banner", 2560, 1440, "YouTube channel banner"),
            ("pinterest", "pin", 1000, 1500, "Pinterest pin"),
        ];

        let mut catalog = Self::new();
        for &(platform, format, width, height, label) in BUILTIN {
            catalog.insert(platform, format, Preset::new(width, height, label));
        }
        catalog
    }

    /// Load a catalog from JSON of the form
    /// `{"instagram": {"post": {"width": 1080, "height": 1080, "label": "..."}}}`.
    ///
    /// Every preset must have positive dimensions.
    pub fn from_json(json: &str) -> Result<Self, PresetError> {
        let catalog: Self =
            serde_json::from_str(json).map_err(|e| PresetError::InvalidCatalog(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Serialize the catalog to JSON.
    pub fn to_json(&self) -> Result<String, PresetError> {
        serde_json::to_string(self).map_err(|e| PresetError::InvalidCatalog(e.to_string()))
    }

    /// Check that every preset has a renderable size.
    ///
    /// [`PresetCatalog::from_json`] calls this; catalogs deserialized any
    /// other way should be checked before use.
    pub fn validate(&self) -> Result<(), PresetError> {
        for (platform, format, preset) in self.iter() {
            if preset.width == 0 || preset.height == 0 {
                return Err(PresetError::InvalidCatalog(format!(
                    "{}/{} has a zero dimension ({}x{})",
                    platform, format, preset.width, preset.height
                )));
            }
            if preset.width > MAX_DIMENSION || preset.height > MAX_DIMENSION {
                return Err(PresetError::InvalidCatalog(format!(
                    "{}/{} is larger than {} pixels per side ({}x{})",
                    platform, format, MAX_DIMENSION, preset.width, preset.height
                )));
            }
        }
        Ok(())
    }

    /// Add or replace a preset.
    pub fn insert(&mut self, platform: &str, format: &str, preset: Preset) {
        self.platforms
            .entry(platform.to_string())
            .or_default()
            .insert(format.to_string(), preset);
    }

    pub fn get(&self, platform: &str, format: &str) -> Option<&Preset> {
        self.platforms.get(platform)?.get(format)
    }

    /// Like [`PresetCatalog::get`], but an unknown pair is an error.
    pub fn lookup(&self, platform: &str, format: &str) -> Result<&Preset, PresetError> {
        self.get(platform, format)
            .ok_or_else(|| PresetError::UnknownPreset {
                platform: platform.to_string(),
                format: format.to_string(),
            })
    }

    pub fn platforms(&self) -> impl Iterator<Item = &str> {
        self.platforms.keys().map(String::as_str)
    }

    /// Presets of one platform, by name.
    pub fn formats(&self, platform: &str) -> impl Iterator<Item = (&str, &Preset)> {
        self.platforms
            .get(platform)
            .into_iter()
            .flat_map(|formats| formats.iter().map(|(name, preset)| (name.as_str(), preset)))
    }

    /// Every `(platform, format, preset)` triple.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &Preset)> {
        self.platforms.iter().flat_map(|(platform, formats)| {
            formats
                .iter()
                .map(move |(format, preset)| (platform.as_str(), format.as_str(), preset))
        })
    }

    pub fn len(&self) -> usize {
        self.platforms.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_instagram_post() {
        let catalog = PresetCatalog::builtin();
        let preset = catalog.get("instagram", "post").unwrap();
        assert_eq!((preset.width, preset.height), (1080, 1080));
        assert_eq!(preset.label, "Instagram post");
    }

    #[test]
    fn test_builtin_is_valid() {
        let catalog = PresetCatalog::builtin();
        assert_eq!(catalog.len(), 14);
        assert!(catalog.validate().is_ok());
        assert!(catalog.platforms().any(|p| p == "pinterest"));
    }

    #[test]
    fn test_lookup_unknown() {
        let catalog = PresetCatalog::builtin();
        let err = catalog.lookup("myspace", "banner").unwrap_err();
        assert_eq!(err.to_string(), "Unknown preset 'myspace/banner'");
        assert!(catalog.lookup("instagram", "reel").is_err());
    }

    #[test]
    fn test_formats_of_platform() {
        let catalog = PresetCatalog::builtin();
        let names: Vec<_> = catalog.formats("twitter").map(|(name, _)| name).collect();
        assert_eq!(names, vec!["header", "post"]);
        assert_eq!(catalog.formats("nope").count(), 0);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "mastodon": {
                "header": {"width": 1500, "height": 500, "label": "Mastodon header"}
            }
        }"#;
        let catalog = PresetCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("mastodon", "header").unwrap().width, 1500);
    }

    #[test]
    fn test_from_json_rejects_zero_dimension() {
        let json = r#"{"x": {"y": {"width": 0, "height": 5, "label": "broken"}}}"#;
        assert!(matches!(
            PresetCatalog::from_json(json),
            Err(PresetError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_validate_rejects_inserted_presets() {
        let mut catalog = PresetCatalog::new();
        catalog.insert("banner", "wide", Preset::new(1500, 500, "Banner"));
        assert!(catalog.validate().is_ok());

        catalog.insert("banner", "flat", Preset::new(1500, 0, "Flat"));
        let err = catalog.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid preset catalog: banner/flat has a zero dimension (1500x0)"
        );

        let mut catalog = PresetCatalog::new();
        catalog.insert("poster", "huge", Preset::new(MAX_DIMENSION + 1, 10, "Huge"));
        assert!(matches!(catalog.validate(), Err(PresetError::InvalidCatalog(_))));
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(PresetCatalog::from_json("[1, 2]").is_err());
        assert!(PresetCatalog::from_json("{").is_err());
    }

    #[test]
    fn test_json_shape_round_trip() {
        let catalog = PresetCatalog::builtin();
        let json = catalog.to_json().unwrap();
        assert!(json.starts_with("{\"facebook\":{"));
        assert_eq!(PresetCatalog::from_json(&json).unwrap(), catalog);
    }

    #[test]
    fn test_insert_replaces() {
        let mut catalog = PresetCatalog::new();
        assert!(catalog.is_empty());
        catalog.insert("a", "b", Preset::new(1, 2, "first"));
        catalog.insert("a", "b", Preset::new(3, 4, "second"));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("a", "b").unwrap().label, "second");
    }
}
