#![deny(clippy::all, clippy::pedantic)]
//! # Locomotion Runtime
//!
//! Entry point for the `locomotion` binary.
//!
//! `run` drives a walker or hopper environment on the planar physics backend
//! with a fixed policy and logs every episode. `terrain` generates a ramp
//! course and prints its first row as JSON. Logs go to stderr and honour
//! `RUST_LOG` (default `info`).

mod app;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run episodes with a fixed policy
    Run(RunArgs),
    /// Generate a terrain course and print its first row as JSON
    Terrain(TerrainArgs),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum EnvKind {
    Walker,
    Hopper,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Policy {
    /// Always command zero torque
    Zero,
    /// Sample actions uniformly from the action space
    Random,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[arg(long, value_enum, default_value_t = EnvKind::Walker)]
    pub env: EnvKind,

    /// Seeds both the environment and the random policy
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    #[arg(long, default_value_t = 1)]
    pub episodes: usize,

    /// Episode time limit
    #[arg(long, default_value_t = 1000)]
    pub max_steps: usize,

    #[arg(long, value_enum, default_value_t = Policy::Zero)]
    pub policy: Policy,

    /// JSON environment config; missing fields keep their defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Hopper terrain slopes, comma separated
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub slopes: Vec<f32>,

    /// Directory holding `walker2d.json` and `hopper.json`
    #[arg(long)]
    pub assets: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct TerrainArgs {
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Slopes, comma separated
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub slopes: Vec<f32>,

    /// JSON terrain config; missing fields keep their defaults
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Run(args) => app::run(&args).map(|_| ()),
        Command::Terrain(args) => {
            let row = app::terrain_row(&args)?;
            println!("{}", serde_json::to_string(&row)?);
            Ok(())
        }
    }
}
