//! Parallax CLI
//!
//! Validate scroll scenes and replay them against a headless stage.

mod config;
mod report;
mod stage;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use parallax_animation::{KeyframeDescriptor, Scene};
use parallax_platform::headless::HeadlessPlatform;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::StageConfig;

#[derive(Parser)]
#[command(name = "parallax")]
#[command(about = "Scroll-driven parallax scenes - layout checks and offline replay")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a scene and print its layout
    Check {
        /// Scene descriptor (JSON array of keyframes)
        scene: PathBuf,

        /// Stage file with viewport, timer and nodes
        #[arg(short, long)]
        stage: Option<PathBuf>,
    },

    /// Scroll through a scene and print every style write as a JSON line
    Simulate {
        /// Scene descriptor (JSON array of keyframes)
        scene: PathBuf,

        /// Stage file with viewport, timer and nodes
        #[arg(short, long)]
        stage: Option<PathBuf>,

        /// Scroll offset to stop at
        #[arg(long)]
        to: f64,

        /// Scroll distance per frame
        #[arg(long, default_value = "10")]
        step: f64,

        /// Scroll back to the top afterwards
        #[arg(long)]
        back: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Check { scene, stage } => {
            let scene = load_scene(&scene, stage.as_deref())?;
            report::print_layout(&scene, &mut out)?;
        }
        Commands::Simulate {
            scene,
            stage,
            to,
            step,
            back,
        } => {
            anyhow::ensure!(step > 0.0, "--step must be positive, got {step}");
            anyhow::ensure!(to >= 0.0, "--to must not be negative, got {to}");

            let mut scene = load_scene(&scene, stage.as_deref())?;
            let path = report::scroll_path(to, step, back);
            let written = report::simulate(&mut scene, &path, &mut out)?;
            info!(frames = path.len(), written, "simulation finished");
        }
    }

    out.flush()?;
    Ok(())
}

/// Read the scene descriptor and build it on the configured stage
fn load_scene(scene_path: &Path, stage_path: Option<&Path>) -> Result<Scene<HeadlessPlatform>> {
    let content = fs::read_to_string(scene_path)
        .with_context(|| format!("Failed to read {}", scene_path.display()))?;
    let descriptors: Vec<KeyframeDescriptor> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", scene_path.display()))?;

    let config = match stage_path {
        Some(path) => StageConfig::load(path)?,
        None => StageConfig::default(),
    };
    let platform = if config.has_nodes() {
        config.build_platform()?
    } else {
        stage::synthesize(config.viewport(), &descriptors)?
    };

    Scene::<HeadlessPlatform>::builder(descriptors)
        .tick_period(config.tick_period())
        .build(platform)
        .with_context(|| format!("Failed to build scene from {}", scene_path.display()))
}
