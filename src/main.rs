mod config;
mod game;
mod input;
mod logger;
mod snake;
mod state;
mod store;
mod term;
mod ticker;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::AppConfig;
use crate::store::{default_store_path, FileStore, KeyValueStore, MemoryStore};

#[derive(Parser)]
#[command(name = "snake")]
#[command(version, about = "Terminal snake with a persisted high score")]
struct Cli {
    /// Config file (defaults to ./snake.toml, then the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<i32>,

    /// Grid height
    #[arg(long)]
    height: Option<i32>,

    /// Milliseconds between game ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// High score store file
    #[arg(long)]
    store: Option<PathBuf>,

    /// Log file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_ms = tick_ms;
        }
        if let Some(store) = &self.store {
            config.store_path = Some(store.clone());
        }
    }
}

fn open_store(config: &AppConfig) -> Box<dyn KeyValueStore> {
    let path = match &config.store_path {
        Some(path) => Ok(path.clone()),
        None => default_store_path(),
    };

    match path {
        Ok(path) => {
            let store = FileStore::open(path);
            log::info!("Using store at {}", store.path().display());
            Box::new(store)
        }
        Err(e) => {
            log::warn!("{:#}; the high score will not be saved", e);
            Box::new(MemoryStore::default())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_file = logger::init(cli.log_file.as_deref())?;
    log::info!("Starting snake, logging to {}", log_file.display());

    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_to(&mut config);
    config.validate()?;

    let store = open_store(&config);
    let mut game = game::SnakeGame::new(&config, store)?;
    game.run()?;

    log::info!("Exiting snake");
    Ok(())
}
