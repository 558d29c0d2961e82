//! Generate command - build a wavetable and write it to disk

use anyhow::{Context, Result};
use clap::Args;
use nether_wavetable::{ExportFormat, Generator, ShapeFamily};
use std::path::{Path, PathBuf};

use crate::preset::Preset;

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// TOML preset to start from (flags override its values)
    #[arg(short, long)]
    pub preset: Option<PathBuf>,

    /// Steps per frame (4-32)
    #[arg(long)]
    pub steps: Option<usize>,

    /// Events per pattern (1 to min(24, steps))
    #[arg(long)]
    pub events: Option<usize>,

    /// Chance of merging adjacent events, in percent
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    pub combine: Option<u32>,

    /// Shape family (see `wavetable-gen shapes`)
    #[arg(long)]
    pub shape: Option<ShapeFamily>,

    /// Output format: wav or wt
    #[arg(short, long)]
    pub format: Option<ExportFormat>,

    /// Seed for a reproducible table (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file, or directory to write the suggested filename into
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl GenerateArgs {
    fn flags(&self) -> Preset {
        Preset {
            steps: self.steps,
            events: self.events,
            combine: self.combine,
            shape: self.shape,
            format: self.format,
            seed: self.seed,
        }
    }
}

/// Execute the generate command
///
/// Returns the path written.
pub fn execute(args: GenerateArgs) -> Result<PathBuf> {
    let preset = match &args.preset {
        Some(path) => Preset::load(path)?,
        None => Preset::default(),
    };
    let settings = preset.merge(args.flags());

    let params = settings.to_params();
    params.validate().context("Invalid generation parameters")?;

    let mut generator = match settings.seed {
        Some(seed) => Generator::with_seed(params, seed),
        None => Generator::new(params),
    };
    tracing::info!(
        "Generating {} ({} steps, {} events, {}% combine), seed {}",
        generator.params().shape,
        generator.params().steps,
        generator.params().events,
        generator.params().combine_percent(),
        generator.seed()
    );

    let export = generator.export().context("Failed to encode wavetable")?;
    let path = resolve_output(args.output.as_deref(), &export.filename);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    std::fs::write(&path, &export.bytes)
        .with_context(|| format!("Failed to write wavetable: {}", path.display()))?;

    tracing::info!("Wrote {} ({} bytes)", path.display(), export.bytes.len());
    Ok(path)
}

/// Where to write: a directory gets the suggested filename appended
fn resolve_output(output: Option<&Path>, filename: &str) -> PathBuf {
    match output {
        None => PathBuf::from(filename),
        Some(path) if path.is_dir() => path.join(filename),
        Some(path) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_output_default() {
        assert_eq!(resolve_output(None, "WT_a.wav"), PathBuf::from("WT_a.wav"));
    }

    #[test]
    fn test_resolve_output_dir_and_file() {
        let dir = std::env::temp_dir();
        assert_eq!(resolve_output(Some(&dir), "WT_a.wav"), dir.join("WT_a.wav"));

        let file = dir.join("does-not-exist").join("custom.wt");
        assert_eq!(resolve_output(Some(&file), "WT_a.wt"), file);
    }
}
