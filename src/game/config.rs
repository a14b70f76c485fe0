use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Parameters for a classic game, and the defaults campaign levels inherit
///
/// Loadable from a YAML file; any field left out keeps its default, so a
/// config file only needs to name what it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid in cells
    pub grid_width: usize,
    /// Height of the game grid in cells
    pub grid_height: usize,
    /// Starting length of the snake
    pub initial_snake_length: usize,
    /// Whether the border is fatal; when false the board wraps around
    pub walls: bool,
    /// Simulation rate in ticks per second
    pub speed: u32,
    /// Fixed RNG seed for reproducible sessions
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            initial_snake_length: 3,
            walls: true,
            speed: 10,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a config with custom grid dimensions
    pub fn new(grid_width: usize, grid_height: usize) -> Self {
        Self {
            grid_width,
            grid_height,
            ..Default::default()
        }
    }

    /// Create a small 10x10 config, handy for tests
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Parse a config from YAML text
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml_ng::from_str(text).context("invalid game config")
    }

    /// Load a config from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&text)
    }
}
