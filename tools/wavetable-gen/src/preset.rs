//! TOML presets
//!
//! A preset stores any subset of the generation parameters:
//!
//! ```toml
//! steps = 12
//! events = 5
//! combine = 40        # percent
//! shape = "sine_saw"
//! format = "wt"
//! seed = 1234
//! ```
//!
//! Missing fields fall back to the defaults; command-line flags override both.

use anyhow::{Context, Result};
use nether_wavetable::{ExportFormat, GenerationParams, ShapeFamily};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Preset {
    #[serde(default)]
    pub steps: Option<usize>,
    #[serde(default)]
    pub events: Option<usize>,
    /// Combine chance in percent (0-100)
    #[serde(default)]
    pub combine: Option<u32>,
    #[serde(default)]
    pub shape: Option<ShapeFamily>,
    #[serde(default)]
    pub format: Option<ExportFormat>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Preset {
    /// Load preset from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read preset: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse preset: {}", path.display()))
    }

    /// Parse preset from string
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Fields set in `overrides` replace ours
    pub fn merge(self, overrides: Preset) -> Preset {
        Preset {
            steps: overrides.steps.or(self.steps),
            events: overrides.events.or(self.events),
            combine: overrides.combine.or(self.combine),
            shape: overrides.shape.or(self.shape),
            format: overrides.format.or(self.format),
            seed: overrides.seed.or(self.seed),
        }
    }

    /// Fill unset fields from the defaults
    ///
    /// The result is not validated.
    pub fn to_params(&self) -> GenerationParams {
        let defaults = GenerationParams::default();
        GenerationParams {
            steps: self.steps.unwrap_or(defaults.steps),
            events: self.events.unwrap_or(defaults.events),
            combine_chance: self
                .combine
                .map_or(defaults.combine_chance, |pct| pct as f64 / 100.0),
            shape: self.shape.unwrap_or(defaults.shape),
            format: self.format.unwrap_or(defaults.format),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nether_wavetable::Shape;

    #[test]
    fn test_preset_empty() {
        let preset = Preset::parse("").unwrap();
        assert_eq!(preset, Preset::default());
        assert_eq!(preset.to_params(), GenerationParams::default());
    }

    #[test]
    fn test_preset_full() {
        let preset = Preset::parse(
            r#"
steps = 12
events = 5
combine = 40
shape = "sine_saw"
format = "wt"
seed = 99
"#,
        )
        .unwrap();

        assert_eq!(preset.seed, Some(99));
        let params = preset.to_params();
        assert_eq!(params.steps, 12);
        assert_eq!(params.events, 5);
        assert_eq!(params.combine_chance, 0.4);
        assert_eq!(
            params.shape,
            ShapeFamily::Composite {
                attack: Shape::Sine,
                decay: Shape::Saw
            }
        );
        assert_eq!(params.format, ExportFormat::Wt);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_preset_rejects_bad_shape() {
        assert!(Preset::parse(r#"shape = "shark_random""#).is_err());
        assert!(Preset::parse(r#"format = "mp3""#).is_err());
    }

    #[test]
    fn test_preset_rejects_unknown_field() {
        assert!(Preset::parse("stepz = 4").is_err());
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let base = Preset {
            steps: Some(8),
            events: Some(3),
            shape: Some(ShapeFamily::Single(Shape::Pulse)),
            ..Default::default()
        };
        let flags = Preset {
            events: Some(2),
            combine: Some(50),
            ..Default::default()
        };
        let merged = base.merge(flags);
        assert_eq!(merged.steps, Some(8));
        assert_eq!(merged.events, Some(2));
        assert_eq!(merged.combine, Some(50));
        assert_eq!(merged.shape, Some(ShapeFamily::Single(Shape::Pulse)));
    }
}
