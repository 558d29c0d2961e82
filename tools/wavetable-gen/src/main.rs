//! wavetable-gen - Nethercore rhythmic wavetable generator
//!
//! # Commands
//!
//! - `wavetable-gen generate` - Build a 256-frame wavetable and write .wav or .wt
//! - `wavetable-gen inspect` - Report the layout of an existing wavetable file
//! - `wavetable-gen shapes` - List accepted shape names
//!
//! # Usage
//!
//! ```bash
//! # 16 steps, 4 hits, triangle bursts, into ./out/
//! wavetable-gen generate --steps 16 --events 4 --shape triangle -o out/
//!
//! # Reproducible float wavetable from a preset, overriding the shape
//! wavetable-gen generate --preset bouncy.toml --shape sine_saw --format wt --seed 7
//!
//! wavetable-gen inspect out/WT_16st_4ev_triangle_0pc_2048x256.wav
//! ```
//!
//! Logging follows `RUST_LOG`; `-v` turns on per-stage debug output.

mod generate;
mod inspect;
mod preset;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nether_wavetable::ShapeFamily;

#[derive(Parser)]
#[command(name = "wavetable-gen")]
#[command(about = "Nethercore rhythmic wavetable generator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a wavetable and write it to disk
    Generate(generate::GenerateArgs),

    /// Report the layout of a .wav or .wt wavetable
    Inspect(inspect::InspectArgs),

    /// List accepted shape names
    Shapes,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match cli.command {
        Commands::Generate(args) => {
            generate::execute(args)?;
        }
        Commands::Inspect(args) => inspect::execute(args)?,
        Commands::Shapes => {
            for name in ShapeFamily::all_names() {
                println!("{}", name);
            }
        }
    }

    Ok(())
}
