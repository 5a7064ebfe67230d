//! Nocturne - terminal demo and snapshot tool for the particle engine
//!
//! Usage:
//!   nocturne run [--config <effects.toml>]
//!   nocturne snapshot --out night.png [--frames 120] [--size 320x180]

mod app;
mod panes;
mod snapshot;
mod terminal;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use nocturne_engine::{EngineConfig, ParticleKind};

#[derive(Parser)]
#[command(name = "nocturne")]
#[command(about = "Nocturne - ambient particle effects in your terminal")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the live terminal demo (fireflies and stars side by side)
    Run {
        /// Path to an effect tuning file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Render frames offscreen and save the final one as a PNG
    Snapshot {
        /// Output image path
        #[arg(long, default_value = "nocturne.png")]
        out: PathBuf,

        /// Rendered frames to simulate before capturing
        #[arg(long, default_value_t = 120)]
        frames: u32,

        /// Surface size in pixels, e.g. 320x180
        #[arg(long, default_value = "320x180")]
        size: String,

        /// Which effect to render
        #[arg(long, value_enum, default_value_t = Effect::Lifecycle)]
        effect: Effect,

        /// RNG seed for a reproducible capture
        #[arg(long, default_value_t = 1)]
        seed: u32,

        /// Path to an effect tuning file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Effect {
    /// Wandering fireflies
    Ambient,
    /// Fading star field
    Lifecycle,
}

impl From<Effect> for ParticleKind {
    fn from(effect: Effect) -> Self {
        match effect {
            Effect::Ambient => ParticleKind::Ambient,
            Effect::Lifecycle => ParticleKind::Lifecycle,
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            EngineConfig::parse(&text).context("Failed to parse config")
        }
        None => Ok(EngineConfig::default()),
    }
}

fn parse_size(size: &str) -> Result<(u32, u32)> {
    let Some((w, h)) = size.split_once('x') else {
        bail!("Size must look like 320x180, got {size}");
    };
    let width: u32 = w.parse().context("Bad width")?;
    let height: u32 = h.parse().context("Bad height")?;
    if width == 0 || height == 0 {
        bail!("Size must be non-zero, got {size}");
    }
    Ok((width, height))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Run { config } => {
            let config = load_config(config.as_ref())?;
            println!("Controls:");
            println!("  p        - Pause / resume");
            println!("  q / Esc  - Quit");
            app::run(config)
        }
        Command::Snapshot {
            out,
            frames,
            size,
            effect,
            seed,
            config,
        } => {
            let config = load_config(config.as_ref())?;
            let (width, height) = parse_size(&size)?;
            snapshot::run(&out, frames, width, height, effect.into(), seed, config)?;
            println!("Wrote {}", out.display());
            Ok(())
        }
    }
}
