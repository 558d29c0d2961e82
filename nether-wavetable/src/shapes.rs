//! Event waveform shapes
//!
//! Every shape maps a span phase `t` in 0.0..=1.0 to a unipolar value in
//! 0.0..=1.0. The renderer maps that into the bipolar sample range.
//!
//! A [`ShapeFamily`] is either a single [`Shape`] or a composite of two shapes,
//! where the first shape supplies the attack half of a span and the second the
//! decay half.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::params::ParamError;

/// Length of the precomputed random shape table
pub const RANDOM_SHAPE_LEN: usize = 512;

/// One random control point is drawn every this many table samples
pub const CONTROL_POINT_SPACING: usize = 4;

/// Basic event shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Positive half of a sine cycle
    Sine,
    /// Linear rise then linear fall
    Triangle,
    /// Linear ramp up
    Saw,
    /// Linear ramp down
    ReverseSaw,
    /// Held high for the whole span
    Pulse,
    /// Quarter-sine rise then linear fall
    Shark,
    /// Stretched read of the generation's [`RandomShapeTable`]
    Random,
}

impl Shape {
    /// Every shape, in listing order
    pub const ALL: [Shape; 7] = [
        Shape::Sine,
        Shape::Triangle,
        Shape::Saw,
        Shape::ReverseSaw,
        Shape::Pulse,
        Shape::Shark,
        Shape::Random,
    ];

    /// Lowercase name used in parameters and filenames
    pub fn name(self) -> &'static str {
        match self {
            Shape::Sine => "sine",
            Shape::Triangle => "triangle",
            Shape::Saw => "saw",
            Shape::ReverseSaw => "reversesaw",
            Shape::Pulse => "pulse",
            Shape::Shark => "shark",
            Shape::Random => "random",
        }
    }

    /// Look up a shape by its name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|shape| shape.name() == name)
    }

    /// Whether this shape may appear as one half of a composite
    pub fn is_composable(self) -> bool {
        !matches!(self, Shape::Shark | Shape::Random)
    }

    /// Evaluate the full shape over a span
    ///
    /// `Random` reads from `table`; without one it renders 0.0.
    pub fn evaluate(self, t: f32, table: Option<&RandomShapeTable>) -> f32 {
        match self {
            Shape::Sine => (t * PI).sin(),
            Shape::Triangle => 1.0 - (t * 2.0 - 1.0).abs(),
            Shape::Saw => t,
            Shape::ReverseSaw => 1.0 - t,
            Shape::Pulse => {
                if t < 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Shape::Shark => {
                if t <= 0.5 {
                    (t * 2.0 * PI / 2.0).sin()
                } else {
                    1.0 - (t - 0.5) * 2.0
                }
            }
            Shape::Random => table.map_or(0.0, |table| table.sample(t)),
        }
    }

    /// Attack form used for the first half of a composite span
    ///
    /// `u` runs 0.0..=1.0 across the half.
    pub fn rising(self, u: f32) -> f32 {
        match self {
            Shape::Sine | Shape::Shark => (u * PI / 2.0).sin(),
            Shape::Triangle | Shape::Saw => u,
            Shape::ReverseSaw | Shape::Pulse => 1.0,
            Shape::Random => 0.0,
        }
    }

    /// Decay form used for the second half of a composite span
    pub fn falling(self, u: f32) -> f32 {
        match self {
            Shape::Sine => (u * PI / 2.0).cos(),
            Shape::Triangle | Shape::Saw | Shape::ReverseSaw | Shape::Shark => 1.0 - u,
            Shape::Pulse => {
                if u < 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Shape::Random => 0.0,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape selection for a whole generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ShapeFamily {
    Single(Shape),
    /// Attack half from `attack`, decay half from `decay` (written `attack_decay`)
    Composite { attack: Shape, decay: Shape },
}

impl ShapeFamily {
    /// Unipolar value of this family at span phase `t`
    pub fn sample(&self, t: f32, table: Option<&RandomShapeTable>) -> f32 {
        match *self {
            ShapeFamily::Single(shape) => shape.evaluate(t, table),
            ShapeFamily::Composite { attack, decay } => composite_sample(attack, decay, t),
        }
    }

    /// Whether rendering needs a [`RandomShapeTable`]
    pub fn uses_random_table(&self) -> bool {
        matches!(self, ShapeFamily::Single(Shape::Random))
    }

    /// All accepted family names: single shapes, then every composite pairing
    pub fn all_names() -> Vec<String> {
        let mut names: Vec<String> = Shape::ALL.iter().map(|s| s.name().to_string()).collect();
        let composable: Vec<Shape> = Shape::ALL.into_iter().filter(|s| s.is_composable()).collect();
        for attack in &composable {
            for decay in &composable {
                names.push(format!("{}_{}", attack, decay));
            }
        }
        names
    }
}

fn composite_sample(attack: Shape, decay: Shape, t: f32) -> f32 {
    if t < 0.5 {
        attack.rising(t * 2.0)
    } else {
        decay.falling(t * 2.0 - 1.0)
    }
}

impl Default for ShapeFamily {
    fn default() -> Self {
        ShapeFamily::Single(Shape::Sine)
    }
}

impl fmt::Display for ShapeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeFamily::Single(shape) => write!(f, "{}", shape),
            ShapeFamily::Composite { attack, decay } => write!(f, "{}_{}", attack, decay),
        }
    }
}

impl FromStr for ShapeFamily {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let parts: Vec<&str> = name.split('_').collect();

        match parts.as_slice() {
            [single] => Shape::from_name(single)
                .map(ShapeFamily::Single)
                .ok_or_else(|| ParamError::UnknownShape(s.to_string())),
            [attack, decay] => {
                let attack = Shape::from_name(attack)
                    .ok_or_else(|| ParamError::UnknownShape(s.to_string()))?;
                let decay = Shape::from_name(decay)
                    .ok_or_else(|| ParamError::UnknownShape(s.to_string()))?;
                if !attack.is_composable() || !decay.is_composable() {
                    return Err(ParamError::InvalidComposite(s.to_string()));
                }
                Ok(ShapeFamily::Composite { attack, decay })
            }
            _ => Err(ParamError::InvalidComposite(s.to_string())),
        }
    }
}

impl TryFrom<String> for ShapeFamily {
    type Error = ParamError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShapeFamily> for String {
    fn from(family: ShapeFamily) -> Self {
        family.to_string()
    }
}

/// Smoothed unipolar noise read by the `random` shape
///
/// Built once per generation and shared read-only by every event.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomShapeTable {
    samples: Vec<f32>,
}

impl RandomShapeTable {
    /// Build a table of `length` samples
    ///
    /// A random control point is drawn every [`CONTROL_POINT_SPACING`] samples
    /// and the samples between them are linearly interpolated. The first and last
    /// `length / 8` samples are ramped toward 0 so the table loops cleanly.
    pub fn build<R: Rng + ?Sized>(rng: &mut R, length: usize) -> Self {
        let control_count = length / CONTROL_POINT_SPACING + 2;
        let controls: Vec<f32> = (0..control_count).map(|_| rng.random::<f32>()).collect();

        let mut samples: Vec<f32> = (0..length)
            .map(|i| {
                let segment = i / CONTROL_POINT_SPACING;
                let frac = (i % CONTROL_POINT_SPACING) as f32 / CONTROL_POINT_SPACING as f32;
                controls[segment] * (1.0 - frac) + controls[segment + 1] * frac
            })
            .collect();

        let fade = length / 8;
        for i in 0..fade {
            let gain = i as f32 / fade as f32;
            samples[i] *= gain;
            samples[length - 1 - i] *= gain;
        }

        Self { samples }
    }

    /// Wrap existing samples (mostly useful for tests)
    pub fn from_samples(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    /// Read the table stretched over a span, `t` in 0.0..=1.0
    pub fn sample(&self, t: f32) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let last = self.samples.len() - 1;
        let idx = ((t * last as f32).floor().max(0.0) as usize).min(last);
        self.samples[idx]
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }
}
