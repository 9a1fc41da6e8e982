//! Runtime settings
//!
//! Loaded from a JSON file by the host; every field has a default so partial
//! files are accepted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::ARENA_RADIUS;
use crate::error::ConfigError;
use crate::sim::EdgeMode;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 200,
            QualityPreset::Medium => 800,
            QualityPreset::High => 3000,
        }
    }

    /// Whether the player leaves thrust particles
    pub fn thrust_trail(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Particle effects (debris, thrust)
    pub particles: bool,

    // === Arena ===
    pub arena_radius: f32,
    pub edge_mode: EdgeMode,
    /// RNG seed for the run
    pub seed: u64,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,

            arena_radius: ARENA_RADIUS,
            edge_mode: EdgeMode::Bounce,
            seed: 0x4859_5045_5248_4558,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective particle cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{err}; using default settings");
                Self::default()
            }
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.arena_radius.is_finite() && self.arena_radius > 0.0) {
            return Err(ConfigError::OutOfRange {
                name: "arena_radius",
                value: self.arena_radius,
                expected: "a positive finite number",
            });
        }
        for (name, value) in [
            ("master_volume", self.master_volume),
            ("sfx_volume", self.sfx_volume),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    name,
                    value,
                    expected: "0.0 - 1.0",
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "edge_mode": "Portal", "quality": "High" }"#)
            .expect("valid settings");
        assert_eq!(settings.edge_mode, EdgeMode::Portal);
        assert_eq!(settings.quality, QualityPreset::High);
        assert_eq!(settings.arena_radius, ARENA_RADIUS);
        assert!(settings.particles);
    }

    #[test]
    fn test_out_of_range_volume_rejected() {
        let err = Settings::from_json(r#"{ "sfx_volume": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                name: "sfx_volume",
                ..
            }
        ));
    }

    #[test]
    fn test_bad_arena_radius_rejected() {
        assert!(Settings::from_json(r#"{ "arena_radius": -10.0 }"#).is_err());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_particles_disabled_caps_to_zero() {
        let settings = Settings {
            particles: false,
            ..Settings::from_preset(QualityPreset::High)
        };
        assert_eq!(settings.max_particles(), 0);
        assert_eq!(
            Settings::from_preset(QualityPreset::Low).max_particles(),
            QualityPreset::Low.max_particles()
        );
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings::default();
        let json = settings.to_json().expect("serializable");
        let parsed = Settings::from_json(&json).expect("parses back");
        assert_eq!(parsed.seed, settings.seed);
        assert_eq!(parsed.quality.as_str(), "Medium");
    }

    #[test]
    fn test_quality_parse() {
        assert_eq!(QualityPreset::parse("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default("/nonexistent/hyper-hexagon.json");
        assert_eq!(settings.quality, QualityPreset::Medium);
    }
}
