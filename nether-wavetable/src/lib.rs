//! Nether-Wavetable: rhythmic wavetable synthesis for Nethercore
//!
//! Builds a 256-frame wavetable from a rhythmic description: how many steps a
//! frame is split into, how many of them fire, how often neighbouring hits merge,
//! and which waveform fills each hit.
//!
//! **This is a pure library** - it never touches the filesystem. Callers receive
//! encoded bytes plus a suggested filename (see `wavetable-gen` for the CLI).
//!
//! # Pipeline
//!
//! ```text
//! partition ─► unique patterns ─► combine ─► dedupe (≤64) ─► similarity order
//!      │                                                           │
//!      └──────────────► render key frames ◄────────────────────────┘
//!                              │
//!                  interpolate to 256 frames ─► flatten ─► WAV / WT
//! ```
//!
//! # Output
//!
//! | Constant | Value |
//! |----------|-------|
//! | Samples per frame | 2048 |
//! | Frames | 256 |
//! | Max key frames | 64 |
//! | WAV sample rate | 44100 Hz |
//!
//! # Usage
//!
//! ```
//! use nether_wavetable::{ExportFormat, GenerationParams, Generator};
//!
//! let params = GenerationParams {
//!     steps: 8,
//!     events: 2,
//!     combine_chance: 0.25,
//!     shape: "sine_saw".parse().unwrap(),
//!     format: ExportFormat::Wt,
//! };
//! params.validate().unwrap();
//!
//! let export = Generator::with_seed(params, 1234).export().unwrap();
//! assert_eq!(export.filename, "WT_8st_2ev_sine_saw_25pc_2048x256.wt");
//! assert_eq!(&export.bytes[0..4], b"vawt");
//! ```

pub mod formats;
mod generator;
mod interpolate;
mod ordering;
mod params;
mod pattern;
mod render;
mod shapes;
mod steps;

pub use formats::FormatError;
pub use generator::{Export, Generator, Wavetable, export_filename};
pub use interpolate::{Frame, FrameSource, blend, expand, flatten, gap_lengths};
pub use ordering::{distance_matrix, most_central, nearest_neighbour_tour, order_by_similarity};
pub use params::{ExportFormat, GenerationParams, MAX_EVENTS, MAX_STEPS, MIN_STEPS, ParamError};
pub use pattern::{
    MAX_PATTERN_STEPS, Pattern, PatternKey, Span, StepKind, apply_combine, binomial, dedupe,
    generate_unique_patterns,
};
pub use render::{AMPLITUDE_RANGE, KeyFrame, SILENCE_FLOOR, random_amplitude, render, to_bipolar};
pub use shapes::{CONTROL_POINT_SPACING, RANDOM_SHAPE_LEN, RandomShapeTable, Shape, ShapeFamily};
pub use steps::{partition, step_offsets};

/// Samples in every frame
pub const SAMPLES_PER_FRAME: usize = 2048;

/// Frames in a finished wavetable
pub const FRAME_COUNT: usize = 256;

/// Most distinct key frames kept after deduplication
pub const MAX_UNIQUE_FRAMES: usize = 64;

/// Sample rate written to WAV exports
pub const SAMPLE_RATE: u32 = 44100;
