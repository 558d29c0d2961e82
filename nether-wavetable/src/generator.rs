//! Pipeline driver
//!
//! [`Generator`] owns the random source and runs every stage in order:
//! partition, random shape table, unique patterns, combine, dedupe, similarity
//! ordering, key-frame rendering and interpolation. The seed is kept so a table
//! can be regenerated exactly.

use rand::SeedableRng;
use rand_pcg::Pcg64;
use tracing::{debug, info};

use crate::formats::{FormatError, encode_wav, encode_wt};
use crate::interpolate::{Frame, expand, flatten};
use crate::ordering::order_by_similarity;
use crate::params::{ExportFormat, GenerationParams};
use crate::pattern::{apply_combine, dedupe, generate_unique_patterns};
use crate::render::{random_amplitude, render};
use crate::shapes::{RANDOM_SHAPE_LEN, RandomShapeTable};
use crate::steps::partition;
use crate::{FRAME_COUNT, MAX_UNIQUE_FRAMES, SAMPLE_RATE, SAMPLES_PER_FRAME};

/// A finished wavetable
#[derive(Debug, Clone, PartialEq)]
pub struct Wavetable {
    pub frames: Vec<Frame>,
    /// Number of distinct key frames before interpolation
    pub key_frame_count: usize,
    pub samples_per_frame: usize,
}

impl Wavetable {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Frames copied straight from a rendered pattern
    pub fn key_frames(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter().filter(|f| f.is_key())
    }

    /// All frames as one sample buffer
    pub fn flatten(&self) -> Vec<f32> {
        flatten(&self.frames)
    }
}

/// Encoded wavetable plus the filename it should be saved under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Seeded wavetable generator
#[derive(Debug, Clone)]
pub struct Generator {
    params: GenerationParams,
    seed: u64,
    rng: Pcg64,
}

impl Generator {
    /// Generator seeded from the thread RNG
    pub fn new(params: GenerationParams) -> Self {
        Self::with_seed(params, rand::random::<u64>())
    }

    /// Generator with a fixed seed; the same seed and params give the same output
    pub fn with_seed(params: GenerationParams, seed: u64) -> Self {
        Self {
            params,
            seed,
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Run the pipeline once
    ///
    /// Parameters are assumed valid (see [`GenerationParams::validate`]). Each
    /// call continues the same random stream, so repeated calls give different
    /// tables.
    pub fn generate(&mut self) -> Wavetable {
        let params = &self.params;
        let rng = &mut self.rng;

        let step_sizes = partition(SAMPLES_PER_FRAME, params.steps);
        let table = params
            .shape
            .uses_random_table()
            .then(|| RandomShapeTable::build(rng, RANDOM_SHAPE_LEN));

        let raw = generate_unique_patterns(rng, FRAME_COUNT, params.steps, params.events);
        let combined = apply_combine(rng, &raw, params.combine_chance);
        let unique = dedupe(combined, MAX_UNIQUE_FRAMES);
        let ordered = order_by_similarity(unique);

        let key_frames: Vec<_> = ordered
            .iter()
            .map(|pattern| {
                let amplitude = random_amplitude(rng);
                render(pattern, &step_sizes, &params.shape, table.as_ref(), amplitude)
            })
            .collect();
        debug!(count = key_frames.len(), shape = %params.shape, "Rendered key frames");

        let frames = expand(&key_frames, FRAME_COUNT);
        info!(
            seed = self.seed,
            key_frames = key_frames.len(),
            frames = frames.len(),
            "Generated wavetable"
        );

        Wavetable {
            frames,
            key_frame_count: key_frames.len(),
            samples_per_frame: SAMPLES_PER_FRAME,
        }
    }

    /// Run the pipeline and encode the result in the configured format
    pub fn export(&mut self) -> Result<Export, FormatError> {
        let wavetable = self.generate();
        let samples = wavetable.flatten();

        let bytes = match self.params.format {
            ExportFormat::Wav => encode_wav(&samples, SAMPLE_RATE)?,
            ExportFormat::Wt => encode_wt(&samples, wavetable.samples_per_frame, wavetable.frame_count())?,
        };
        let filename = export_filename(&self.params, wavetable.samples_per_frame, wavetable.frame_count());
        debug!(bytes = bytes.len(), %filename, "Encoded wavetable");

        Ok(Export { bytes, filename })
    }
}

/// Suggested filename recording the parameters a table was built from
///
/// e.g. `WT_16st_4ev_triangle_25pc_2048x256.wav`
pub fn export_filename(params: &GenerationParams, samples_per_frame: usize, frame_count: usize) -> String {
    format!(
        "WT_{}st_{}ev_{}_{}pc_{}x{}.{}",
        params.steps,
        params.events,
        params.shape,
        params.combine_percent(),
        samples_per_frame,
        frame_count,
        params.format.extension()
    )
}
