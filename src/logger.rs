//! File-based logging using simplelog
//!
//! The terminal is in raw mode while playing, so log lines go to
//! `snake.log` in the platform cache directory (`~/.cache/snake/` on Linux),
//! or to an explicit path from the command line.

use anyhow::{Context, Result};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::{Path, PathBuf};

const LOG_FILE: &str = "snake.log";

fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("snake"))
        .and_then(|dir| std::fs::create_dir_all(&dir).ok().map(|_| dir.join(LOG_FILE)))
        .unwrap_or_else(|| PathBuf::from(LOG_FILE))
}

fn level_from_env(value: Option<&str>) -> LevelFilter {
    match value.map(|v| v.to_lowercase()).as_deref() {
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Initialize file-based logging. The level comes from `RUST_LOG`.
/// Returns the path of the log file.
pub fn init(path: Option<&Path>) -> Result<PathBuf> {
    let log_file = path.map(Path::to_path_buf).unwrap_or_else(default_log_path);
    let level = level_from_env(std::env::var("RUST_LOG").ok().as_deref());

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_time_offset_to_local()
        .unwrap_or_else(|c| c)
        .build();

    let file = File::create(&log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;
    WriteLogger::init(level, config, file).context("Failed to initialize logger")?;

    Ok(log_file)
}
