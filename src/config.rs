//! Engine configuration.
//!
//! Both structs serialize as camelCase JSON and fill missing fields from
//! their defaults, so a frontend only needs to send what it overrides.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::quantize::{QuantizeMode, DEFAULT_CLUSTERS};

// ============================================================================
// Tracking
// ============================================================================

/// Tuning for the pose-to-transform mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct TrackingConfig {
    /// Lerp factor applied once per rendered frame (0-1).
    pub smoothing: f32,

    /// Width of the visible scene in world units. Positions clamp to half of it.
    pub viewport_width: f32,

    /// Height of the visible scene in world units.
    pub viewport_height: f32,

    /// Maps normalized torso width to the overlay's X scale.
    pub width_scale: f32,

    /// Consecutive incomplete frames tolerated before tracking is lost.
    pub max_lost_frames: u32,

    /// Mean yaw magnitude (radians) above which the overlay is turned by π.
    pub turn_threshold: f32,

    /// Transform the overlay snaps to on reset.
    pub rest_position: [f32; 3],
    pub rest_scale: [f32; 3],
    pub rest_rotation_y: f32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.6,
            viewport_width: 10.0,
            viewport_height: 8.0,
            width_scale: 8.0,
            max_lost_frames: 30,
            turn_threshold: 1.2,
            rest_position: [0.0, 2.0, 0.0],
            rest_scale: [1.0, 1.0, 1.0],
            rest_rotation_y: 0.0,
        }
    }
}

impl TrackingConfig {
    /// Checks the values the mapper relies on.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(Error::invalid_input(format!(
                "smoothing must be within 0-1, got {}",
                self.smoothing
            )));
        }
        if self.viewport_width <= 0.0 || self.viewport_height <= 0.0 {
            return Err(Error::invalid_input("viewport dimensions must be positive"));
        }
        Ok(())
    }
}

// ============================================================================
// Studio
// ============================================================================

/// Top-level configuration for [`TryOnStudio`](crate::TryOnStudio).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudioConfig {
    pub tracking: TrackingConfig,

    /// Colors pulled from an uploaded texture source.
    pub palette_size: usize,

    pub quantize_mode: QuantizeMode,

    /// Renderer object the pose transform is applied to.
    pub overlay_object: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            tracking: TrackingConfig::default(),
            palette_size: DEFAULT_CLUSTERS,
            quantize_mode: QuantizeMode::default(),
            overlay_object: "overlay".to_string(),
        }
    }
}

impl StudioConfig {
    /// Parses and validates a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::invalid_input(format!("invalid studio config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::invalid_input(format!("failed to serialize config: {e}")))
    }

    pub fn validate(&self) -> Result<()> {
        if self.palette_size == 0 {
            return Err(Error::invalid_input("palette size must be at least 1"));
        }
        self.tracking.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config = StudioConfig::from_json("{}").unwrap();
        assert_eq!(config, StudioConfig::default());
        assert_eq!(config.tracking.max_lost_frames, 30);
        assert_eq!(config.palette_size, 5);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let json = r#"{ "tracking": { "smoothing": 0.25 }, "quantizeMode": { "mode": "refined", "iterations": 4 } }"#;
        let config = StudioConfig::from_json(json).unwrap();

        assert_eq!(config.tracking.smoothing, 0.25);
        assert_eq!(config.tracking.viewport_width, 10.0);
        assert_eq!(config.quantize_mode, QuantizeMode::Refined { iterations: 4 });
    }

    #[test]
    fn json_roundtrip() {
        let config = StudioConfig {
            overlay_object: "shirt".into(),
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        assert!(json.contains("overlayObject"));
        assert_eq!(StudioConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(StudioConfig::from_json(r#"{ "paletteSize": 0 }"#).is_err());
        assert!(StudioConfig::from_json(r#"{ "tracking": { "smoothing": 1.5 } }"#).is_err());
        assert!(StudioConfig::from_json("not json").is_err());
    }
}
