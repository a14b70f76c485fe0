use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::info;
use simplelog::{Config as LogConfig, LevelFilter, WriteLogger};

use slither::game::{CAMPAIGN_MIN_GRID, GameConfig, Level, campaign, classic};
use slither::modes::PlayMode;

#[derive(Parser)]
#[command(name = "slither")]
#[command(version, about = "Classic grid snake for the terminal")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "classic")]
    mode: Mode,

    /// Grid width in cells
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Starting snake length
    #[arg(long)]
    length: Option<usize>,

    /// Simulation speed in ticks per second
    #[arg(long)]
    speed: Option<u32>,

    /// Wrap around the border instead of dying on it (classic mode)
    #[arg(long)]
    wrap: bool,

    /// Fixed RNG seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// YAML config file; explicit flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Append debug logs to this file (the terminal belongs to the board)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// One endless board with a single respawning apple
    Classic,
    /// Six stages with poison and reverse items and rising length goals
    Campaign,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        WriteLogger::init(LevelFilter::Debug, LogConfig::default(), file)
            .context("failed to initialize logger")?;
    }

    let config = resolve_config(&cli)?;
    let levels = build_levels(&cli, &config)?;

    info!(
        "starting on a {}x{} grid, {} level(s)",
        config.grid_width,
        config.grid_height,
        levels.len()
    );

    let mut play_mode = PlayMode::new(&config, levels);
    play_mode.run().await
}

/// Merge the config file (if any), defaults, and explicit CLI overrides
fn resolve_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if let Some(width) = cli.width {
        config.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.grid_height = height;
    }
    if let Some(length) = cli.length {
        config.initial_snake_length = length;
    }
    if let Some(speed) = cli.speed {
        config.speed = speed;
    }
    if cli.wrap {
        config.walls = false;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    if config.grid_width < 4 || config.grid_height < 4 {
        bail!("the grid must be at least 4x4");
    }
    if config.speed == 0 || config.speed > 60 {
        bail!("speed must be between 1 and 60 ticks per second");
    }
    if config.initial_snake_length == 0 || config.initial_snake_length > config.grid_width / 2 {
        bail!(
            "the starting snake must fit within half the grid width (1 to {})",
            config.grid_width / 2
        );
    }

    Ok(config)
}

fn build_levels(cli: &Cli, config: &GameConfig) -> Result<Vec<Level>> {
    match cli.mode {
        Mode::Classic => Ok(classic(config)),
        Mode::Campaign => {
            if config.grid_width < CAMPAIGN_MIN_GRID || config.grid_height < CAMPAIGN_MIN_GRID {
                bail!(
                    "campaign item layouts need at least a {}x{} grid",
                    CAMPAIGN_MIN_GRID,
                    CAMPAIGN_MIN_GRID
                );
            }
            Ok(campaign())
        }
    }
}
