//! Serializable customization profile for frontend communication.
//!
//! A [`CustomizationProfile`] captures the garment customization in a format
//! that can be serialized to JSON and exchanged with a form frontend. It is a
//! transport format only: nothing is persisted across sessions.
//!
//! # Example
//!
//! ```
//! use tryon_renderer::{CustomizationProfile, PatternKind, PatternSettings};
//!
//! // Build a profile
//! let profile = CustomizationProfile::new()
//!     .with_base_color("#3366ff")
//!     .with_pattern(PatternSettings {
//!         kind: PatternKind::Grid,
//!         palette: vec!["#ff0000".into(), "#00ff00".into()],
//!         enabled: true,
//!     });
//!
//! // Serialize to JSON for the frontend
//! let json = profile.to_json().unwrap();
//!
//! // Deserialize on the way back
//! let restored = CustomizationProfile::from_json(&json).unwrap();
//! assert_eq!(restored, profile);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layer::logo::DEFAULT_LOGO_SIZE;
use crate::layer::text::DEFAULT_FONT_SIZE;
use crate::layer::{LogoPlacement, PatternKind, TextPlacement};

// ============================================================================
// Layer Settings (Serializable)
// ============================================================================

/// Serializable settings for the pattern layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct PatternSettings {
    pub kind: PatternKind,

    /// Palette colors as `#rrggbb`.
    #[serde(default)]
    pub palette: Vec<String>,

    /// Whether this layer is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Serializable settings for the text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct TextSettings {
    pub content: String,

    /// Text color as `#rrggbb`.
    pub color: String,

    pub placement: TextPlacement,

    pub font_size: f32,

    pub offset_x: f32,
    pub offset_y: f32,

    /// Whether this layer is enabled.
    pub enabled: bool,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            content: String::new(),
            color: "#000000".to_string(),
            placement: TextPlacement::default(),
            font_size: DEFAULT_FONT_SIZE,
            offset_x: 0.0,
            offset_y: 0.0,
            enabled: true,
        }
    }
}

/// Serializable settings for the logo layer.
///
/// The image itself is uploaded separately; these settings position it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct LogoSettings {
    pub placement: LogoPlacement,

    pub width: f32,

    /// Ignored when `lock_aspect` is set; the image's aspect ratio decides.
    pub height: f32,

    /// Derive the height from the width and the image's aspect ratio.
    pub lock_aspect: bool,

    /// Opacity in 0.0-1.0.
    pub opacity: f32,

    pub offset_x: f32,
    pub offset_y: f32,

    /// Whether this layer is enabled.
    pub enabled: bool,
}

impl Default for LogoSettings {
    fn default() -> Self {
        Self {
            placement: LogoPlacement::default(),
            width: DEFAULT_LOGO_SIZE.0,
            height: DEFAULT_LOGO_SIZE.1,
            lock_aspect: false,
            opacity: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            enabled: true,
        }
    }
}

fn default_true() -> bool {
    true
}

// ============================================================================
// CustomizationProfile
// ============================================================================

/// A serializable profile containing all customization settings.
///
/// # JSON Format
///
/// ```json
/// {
///   "baseColor": "#ffffff",
///   "pattern": {
///     "kind": "splatter",
///     "palette": ["#aa3311", "#2255cc"],
///     "enabled": true
///   },
///   "text": {
///     "content": "HELLO",
///     "color": "#000000",
///     "placement": "front",
///     "fontSize": 30.0,
///     "offsetX": 0.0,
///     "offsetY": 0.0,
///     "enabled": true
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct CustomizationProfile {
    /// Base color of the active garment as `#rrggbb`. `None` leaves it unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_color: Option<String>,

    /// Pattern layer settings. `None` means no pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<PatternSettings>,

    /// Text layer settings. `None` means no text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextSettings>,

    /// Logo layer settings. `None` removes the logo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<LogoSettings>,
}

impl CustomizationProfile {
    /// Creates an empty profile with no layers configured.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_color(mut self, hex: impl Into<String>) -> Self {
        self.base_color = Some(hex.into());
        self
    }

    pub fn with_pattern(mut self, settings: PatternSettings) -> Self {
        self.pattern = Some(settings);
        self
    }

    pub fn with_text(mut self, settings: TextSettings) -> Self {
        self.text = Some(settings);
        self
    }

    pub fn with_logo(mut self, settings: LogoSettings) -> Self {
        self.logo = Some(settings);
        self
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(json_error)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(json_error)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(json_error)
    }

    /// JSON schema of the profile format.
    #[cfg(feature = "jsonschema")]
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(CustomizationProfile)
    }
}

fn json_error(err: serde_json::Error) -> Error {
    Error::invalid_input(format!("invalid profile: {err}"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_serialization_roundtrip() {
        let profile = CustomizationProfile::new()
            .with_base_color("#ff8800")
            .with_text(TextSettings {
                content: "HELLO".into(),
                placement: TextPlacement::Many,
                enabled: false,
                ..Default::default()
            });

        let json = profile.to_json().unwrap();
        let restored = CustomizationProfile::from_json(&json).unwrap();

        assert_eq!(restored.base_color.as_deref(), Some("#ff8800"));
        let text = restored.text.as_ref().unwrap();
        assert_eq!(text.placement, TextPlacement::Many);
        assert!(!text.enabled);
        assert!(restored.pattern.is_none());
        assert!(restored.logo.is_none());
    }

    #[test]
    fn profile_json_format() {
        let profile = CustomizationProfile::new()
            .with_text(TextSettings::default())
            .with_logo(LogoSettings::default());

        let json = profile.to_json_pretty().unwrap();

        // Verify camelCase serialization
        assert!(json.contains("\"fontSize\""));
        assert!(json.contains("\"offsetX\""));
        assert!(json.contains("\"lockAspect\": false"));
        assert!(json.contains("\"placement\": \"front\""));
        assert!(!json.contains("baseColor"));
    }

    #[test]
    fn partial_text_settings_fill_defaults() {
        let json = r#"{ "text": { "content": "HI", "placement": "back" } }"#;
        let profile = CustomizationProfile::from_json(json).unwrap();
        let text = profile.text.unwrap();

        assert_eq!(text.color, "#000000");
        assert_eq!(text.font_size, 30.0);
        assert!(text.enabled);
    }

    #[test]
    fn pattern_kind_serialization() {
        let json = r##"{ "pattern": { "kind": "gradient", "palette": ["#000000"] } }"##;
        let profile = CustomizationProfile::from_json(json).unwrap();
        let pattern = profile.pattern.unwrap();
        assert_eq!(pattern.kind, PatternKind::Gradient);
        assert!(pattern.enabled);
    }

    #[test]
    fn empty_profile_deserializes() {
        let profile = CustomizationProfile::from_json("{}").unwrap();
        assert_eq!(profile, CustomizationProfile::default());
    }

    #[test]
    fn malformed_json_is_invalid_input() {
        let err = CustomizationProfile::from_json("{ \"pattern\": 3 }").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
