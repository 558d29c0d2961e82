//! Generation parameters
//!
//! The five user-facing knobs of a generation, their valid ranges, and
//! validation. Callers are expected to validate (or clamp) before generating;
//! the pipeline itself assumes in-range values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shapes::ShapeFamily;

/// Fewest steps per frame
pub const MIN_STEPS: usize = 4;
/// Most steps per frame
pub const MAX_STEPS: usize = 32;
/// Most events per pattern (also never more than the step count)
pub const MAX_EVENTS: usize = 24;

/// Invalid generation parameter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("step count {0} out of range (4-32)")]
    Steps(usize),
    #[error("event count {events} out of range (1-{max})")]
    Events { events: usize, max: usize },
    #[error("combine chance {0} out of range (0.0-1.0)")]
    CombineChance(f64),
    #[error("unknown shape: {0:?}")]
    UnknownShape(String),
    #[error("invalid composite shape: {0:?} (use two of sine, triangle, saw, reversesaw, pulse joined by '_')")]
    InvalidComposite(String),
    #[error("unknown export format: {0:?} (use wav or wt)")]
    UnknownFormat(String),
}

/// Output container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// 16-bit PCM WAV
    #[default]
    Wav,
    /// Float32 `vawt` wavetable
    Wt,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Wav => "wav",
            ExportFormat::Wt => "wt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wav" => Ok(ExportFormat::Wav),
            "wt" => Ok(ExportFormat::Wt),
            _ => Err(ParamError::UnknownFormat(s.to_string())),
        }
    }
}

/// Everything a single generation needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Steps per frame (4-32)
    pub steps: usize,
    /// Events per pattern (1 to min(24, steps))
    pub events: usize,
    /// Probability of merging two adjacent events (0.0-1.0)
    pub combine_chance: f64,
    pub shape: ShapeFamily,
    pub format: ExportFormat,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            steps: 16,
            events: 4,
            combine_chance: 0.0,
            shape: ShapeFamily::default(),
            format: ExportFormat::default(),
        }
    }
}

impl GenerationParams {
    /// Largest valid event count for this step count
    pub fn max_events(&self) -> usize {
        MAX_EVENTS.min(self.steps)
    }

    /// Check every field against its range
    pub fn validate(&self) -> Result<(), ParamError> {
        if !(MIN_STEPS..=MAX_STEPS).contains(&self.steps) {
            return Err(ParamError::Steps(self.steps));
        }
        let max = self.max_events();
        if !(1..=max).contains(&self.events) {
            return Err(ParamError::Events {
                events: self.events,
                max,
            });
        }
        if !(0.0..=1.0).contains(&self.combine_chance) {
            return Err(ParamError::CombineChance(self.combine_chance));
        }
        Ok(())
    }

    /// Pull every numeric field into range, like a slider would
    pub fn clamped(mut self) -> Self {
        self.steps = self.steps.clamp(MIN_STEPS, MAX_STEPS);
        self.events = self.events.clamp(1, self.max_events());
        self.combine_chance = if self.combine_chance.is_nan() {
            0.0
        } else {
            self.combine_chance.clamp(0.0, 1.0)
        };
        self
    }

    /// Combine chance as a whole percentage
    pub fn combine_percent(&self) -> u32 {
        (self.combine_chance * 100.0).round() as u32
    }
}
