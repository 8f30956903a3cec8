//! Key-value persistence for the high score and the menu flags.
//!
//! Values are plain strings so the store stays a simple get/set-by-key map.
//! The default backing is a JSON object on disk, under the platform data
//! directory (`~/.local/share/snake/store.json` on Linux).

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "snake";
const STORE_FILE: &str = "store.json";

pub const HIGH_SCORE_KEY: &str = "highScore";
pub const NEW_GAME_KEY: &str = "newGame";
pub const SCORE_KEY: &str = "score";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// JSON-file store. Every `set` rewrites the whole file.
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store; a corrupt one
    /// is logged and treated as empty so a bad file never blocks the game.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(values) => {
                    log::info!("Loaded store from {}", path.display());
                    values
                }
                Err(e) => {
                    log::warn!("Failed to parse store file {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(_) => {
                log::debug!("No store file at {}, starting fresh", path.display());
                BTreeMap::new()
            }
        };

        FileStore { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write store file {}", self.path.display()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

#[derive(Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Default store location in the platform data directory.
pub fn default_store_path() -> Result<PathBuf> {
    let base = dirs::data_dir().context("Could not determine data directory")?;
    Ok(base.join(APP_NAME).join(STORE_FILE))
}

/// Missing, unreadable or non-numeric values all count as 0.
pub fn load_high_score(store: &dyn KeyValueStore) -> u32 {
    match store.get(HIGH_SCORE_KEY) {
        Ok(Some(value)) => value.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring malformed high score {:?}", value);
            0
        }),
        Ok(None) => 0,
        Err(e) => {
            log::warn!("Failed to read high score: {:#}", e);
            0
        }
    }
}

pub fn save_high_score(store: &mut dyn KeyValueStore, high_score: u32) -> Result<()> {
    store.set(HIGH_SCORE_KEY, &high_score.to_string())
}

/// How the player left the menu.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionStart {
    NewGame,
    Continue,
}

/// Records the menu choice. A new game also zeroes the stored score.
pub fn record_session_start(store: &mut dyn KeyValueStore, start: SessionStart) -> Result<()> {
    match start {
        SessionStart::NewGame => {
            store.set(NEW_GAME_KEY, "true")?;
            store.set(SCORE_KEY, "0")
        }
        SessionStart::Continue => store.set(NEW_GAME_KEY, "false"),
    }
}
