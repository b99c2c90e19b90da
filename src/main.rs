//! gazecast - gaze-driven pointer input for head-mounted displays
//!
//! Headless command line front end.

use anyhow::Result;
use clap::{Parser, Subcommand};
use gazecast::headless::{self, ReplayConfig};
use gazecast_pointer::GazePointerConfig;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Gaze pointer replay and tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a scripted head-pose timeline against a scene and log pointer events
    Replay {
        /// Scene description (TOML)
        #[arg(long)]
        scene: PathBuf,

        /// Scripted input timeline (JSON)
        #[arg(long)]
        script: PathBuf,

        /// Pointer configuration (TOML); defaults when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output event log (JSONL)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Simulation rate
        #[arg(long, default_value_t = 60)]
        ticks_per_second: u32,

        /// Stop after this many ticks even if the script continues
        #[arg(long)]
        max_ticks: Option<u64>,

        /// Eye height above the scene origin
        #[arg(long, default_value_t = 0.0)]
        head_height: f32,
    },
    /// Validate a pointer configuration file and print the effective settings
    CheckConfig {
        /// Pointer configuration (TOML)
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting gazecast v{}", env!("CARGO_PKG_VERSION"));

    match Cli::parse().command {
        Command::Replay {
            scene,
            script,
            config,
            output,
            ticks_per_second,
            max_ticks,
            head_height,
        } => {
            let cfg = ReplayConfig {
                pointer_config: config,
                output,
                ticks_per_second,
                max_ticks,
                head_height,
                ..ReplayConfig::new(scene, script)
            };
            let summary = headless::run(&cfg)?;
            println!(
                "{} ticks, {} events ({} clicks, {} submits)",
                summary.ticks, summary.events, summary.clicks, summary.submits
            );
        }
        Command::CheckConfig { path } => {
            let config = GazePointerConfig::load_strict(&path)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
