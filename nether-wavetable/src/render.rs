//! Key-frame rendering
//!
//! Turns an ordered pattern into one frame of bipolar samples. Silent steps sit
//! at the -1.0 floor; every event span is filled with the selected shape.
//!
//! Amplitude is applied in the unipolar domain before the bipolar mapping:
//! `clamp(shape * amplitude * 2 - 1, -1, 1)`. A quiet frame therefore keeps its
//! floor at -1.0 and its peak at `2 * amplitude - 1`.

use std::ops::Range;

use rand::Rng;

use crate::pattern::Pattern;
use crate::shapes::{RandomShapeTable, ShapeFamily};
use crate::steps::step_offsets;

/// Per-frame amplitudes are drawn from inside this range, both ends excluded
pub const AMPLITUDE_RANGE: Range<f32> = 0.25..1.0;

/// Sample value for silence
pub const SILENCE_FLOOR: f32 = -1.0;

/// A frame rendered directly from a pattern
#[derive(Debug, Clone, PartialEq)]
pub struct KeyFrame {
    pub samples: Vec<f32>,
    /// Amplitude the frame was rendered with
    pub amplitude: f32,
}

/// Draw one key-frame amplitude from the open interval `(0.25, 1.0)`
pub fn random_amplitude<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    loop {
        let amplitude = rng.random_range(AMPLITUDE_RANGE);
        if amplitude > AMPLITUDE_RANGE.start {
            return amplitude;
        }
    }
}

/// Map a unipolar shape value to an output sample at the given amplitude
#[inline]
pub fn to_bipolar(value: f32, amplitude: f32) -> f32 {
    (value * amplitude * 2.0 - 1.0).clamp(-1.0, 1.0)
}

/// Render one pattern into a key frame
///
/// # Arguments
/// * `pattern` - Ordered pattern (one marker per entry of `step_sizes`)
/// * `step_sizes` - Sample width of every step
/// * `family` - Shape used for every event
/// * `table` - Random shape table, required for the `random` family
/// * `amplitude` - Frame amplitude in 0.0..=1.0
pub fn render(
    pattern: &Pattern,
    step_sizes: &[usize],
    family: &ShapeFamily,
    table: Option<&RandomShapeTable>,
    amplitude: f32,
) -> KeyFrame {
    let offsets = step_offsets(step_sizes);
    let frame_len = offsets.last().copied().unwrap_or(0);
    let mut samples = vec![SILENCE_FLOOR; frame_len];

    for span in pattern.spans() {
        let end_step = (span.start_step + span.step_count).min(step_sizes.len());
        if span.start_step >= end_step {
            continue;
        }
        let start = offsets[span.start_step];
        let end = offsets[end_step];
        render_span(&mut samples[start..end], family, table, amplitude);
    }

    KeyFrame { samples, amplitude }
}

/// Fill one event span with the shape
fn render_span(out: &mut [f32], family: &ShapeFamily, table: Option<&RandomShapeTable>, amplitude: f32) {
    let duration = out.len();
    for (i, sample) in out.iter_mut().enumerate() {
        let t = if duration == 1 {
            1.0
        } else {
            i as f32 / (duration - 1) as f32
        };
        *sample = to_bipolar(family.sample(t, table), amplitude);
    }
}
