//! Inspect command - report the layout of a .wav or .wt wavetable

use anyhow::{Context, Result, bail};
use clap::Args;
use nether_wavetable::SAMPLES_PER_FRAME;
use nether_wavetable::formats::{decode_wav, decode_wt};
use std::path::{Path, PathBuf};

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Wavetable file (.wav or .wt)
    pub input: PathBuf,
}

/// What an inspected file holds
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub format: &'static str,
    pub sample_count: usize,
    pub samples_per_frame: usize,
    pub frames: usize,
    /// Largest absolute sample, normalized to 0.0..=1.0
    pub peak: f32,
}

/// Execute the inspect command
pub fn execute(args: InspectArgs) -> Result<()> {
    let summary = inspect(&args.input)?;
    tracing::info!("{}:", args.input.display());
    tracing::info!("  format: {}", summary.format);
    tracing::info!("  samples: {}", summary.sample_count);
    tracing::info!(
        "  frames: {} x {} samples",
        summary.frames,
        summary.samples_per_frame
    );
    tracing::info!("  peak: {:.3}", summary.peak);
    Ok(())
}

/// Decode a wavetable file by extension
pub fn inspect(path: &Path) -> Result<Summary> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "wav" => inspect_wav(path),
        "wt" => inspect_wt(path),
        _ => bail!("Unsupported wavetable format: {:?} (use .wav or .wt)", path),
    }
}

fn inspect_wav(path: &Path) -> Result<Summary> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to load WAV: {:?}", path))?;
    let spec = reader.spec();
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        bail!(
            "Unsupported WAV: {:?} {}-bit (expected 16-bit PCM)",
            spec.sample_format,
            spec.bits_per_sample
        );
    }
    if spec.channels != 1 {
        bail!("Unsupported channel count: {}", spec.channels);
    }

    let samples: Vec<i16> = reader
        .samples::<i16>()
        .collect::<Result<_, _>>()
        .with_context(|| format!("Failed to read WAV samples: {:?}", path))?;

    // Files from other tools may carry extra chunks; only check our own layout strictly
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    match decode_wav(&bytes) {
        Ok((header, _)) => tracing::debug!(?header, "Canonical 44-byte header"),
        Err(e) => tracing::warn!("Non-canonical WAV header: {}", e),
    }

    let peak = samples
        .iter()
        .map(|&s| (s as i32).unsigned_abs())
        .max()
        .unwrap_or(0) as f32
        / i16::MAX as f32;

    Ok(summarize("wav", samples.len(), SAMPLES_PER_FRAME, peak.min(1.0)))
}

fn inspect_wt(path: &Path) -> Result<Summary> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let (header, samples) =
        decode_wt(&bytes).with_context(|| format!("Failed to decode WT: {:?}", path))?;

    let peak = samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()));
    Ok(summarize("wt", samples.len(), header.wave_size as usize, peak))
}

fn summarize(format: &'static str, sample_count: usize, samples_per_frame: usize, peak: f32) -> Summary {
    let frames = match samples_per_frame {
        0 => 0,
        spf => sample_count / spf,
    };
    Summary {
        format,
        sample_count,
        samples_per_frame,
        frames,
        peak,
    }
}
