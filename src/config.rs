use crate::state::{DEFAULT_HEIGHT, DEFAULT_WIDTH, INITIAL_DIRECTION, INITIAL_HEAD, INITIAL_SNAKE_LENGTH};

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "snake.toml";
const APP_NAME: &str = "snake";

pub const DEFAULT_TICK_MS: u64 = 100;
pub const MAX_GRID_SIDE: i32 = 1000;
pub const MAX_TICK_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Grid width in cells
    pub width: i32,
    /// Grid height in cells
    pub height: i32,
    /// Milliseconds between game ticks
    pub tick_ms: u64,
    /// Where the high score lives. Defaults to the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tick_ms: DEFAULT_TICK_MS,
            store_path: None,
        }
    }
}

impl AppConfig {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    /// Loads `snake.toml` from the working directory, then the user config
    /// directory. Falls back to defaults when neither exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            log::info!("Loaded config from {}", path.display());
            return Self::parse(&content);
        }

        for path in Self::search_paths() {
            if let Ok(content) = std::fs::read_to_string(&path) {
                log::info!("Loaded config from {}", path.display());
                return Self::parse(&content)
                    .with_context(|| format!("Invalid config file {}", path.display()));
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// The grid must hold the starting snake plus the cell it is about to enter.
    pub fn validate(&self) -> Result<()> {
        let (dx, dy) = INITIAL_DIRECTION.delta();
        let tail_offset = INITIAL_SNAKE_LENGTH as i32 - 1;
        let cells = [
            (INITIAL_HEAD.x + dx, INITIAL_HEAD.y + dy),
            (INITIAL_HEAD.x - dx * tail_offset, INITIAL_HEAD.y - dy * tail_offset),
        ];

        for (x, y) in cells {
            ensure!(
                x >= 0 && x < self.width && y >= 0 && y < self.height,
                "Grid {}x{} is too small for the starting snake",
                self.width,
                self.height
            );
        }
        ensure!(
            self.width <= MAX_GRID_SIDE && self.height <= MAX_GRID_SIDE,
            "Grid {}x{} exceeds the {} cell limit per side",
            self.width,
            self.height,
            MAX_GRID_SIDE
        );
        ensure!(
            self.tick_ms > 0 && self.tick_ms <= MAX_TICK_MS,
            "tick_ms must be between 1 and {}",
            MAX_TICK_MS
        );

        Ok(())
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join(APP_NAME).join("config.toml"));
        }
        paths
    }
}
