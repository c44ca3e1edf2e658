use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::dispatch::PoolsConfig;
use crate::player::SqliteStore;

/// Environment variable overriding the database path.
pub const DATABASE_ENV: &str = "DUGOUT_DATABASE";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  /// SQLite database path (defaults to $XDG_DATA_HOME/dugout/players.db)
  pub database: Option<PathBuf>,
  #[serde(default)]
  pub cache: CacheConfig,
  #[serde(default)]
  pub pools: PoolsConfig,
  #[serde(default)]
  pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// Simulated latency added to every single-player store fetch
  #[serde(default = "default_fetch_delay_ms")]
  pub fetch_delay_ms: u64,
}

fn default_fetch_delay_ms() -> u64 {
  2000
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      fetch_delay_ms: default_fetch_delay_ms(),
    }
  }
}

impl CacheConfig {
  pub fn fetch_delay(&self) -> Duration {
    Duration::from_millis(self.fetch_delay_ms)
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
  /// Write logs to daily files in this directory instead of stderr
  pub directory: Option<PathBuf>,
  /// Filter used when RUST_LOG is unset
  #[serde(default = "default_log_filter")]
  pub filter: String,
}

fn default_log_filter() -> String {
  "info".to_string()
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      directory: None,
      filter: default_log_filter(),
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./dugout.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/dugout/config.yaml
  ///
  /// Without any file the built-in defaults apply.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("dugout.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("dugout").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
    // An empty file is valid and means "all defaults"
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(contents)
  }

  /// Resolve the database path.
  ///
  /// Checks DUGOUT_DATABASE first, then the config file, then the default location.
  pub fn database_path(&self) -> Result<PathBuf> {
    if let Ok(path) = std::env::var(DATABASE_ENV) {
      if !path.trim().is_empty() {
        return Ok(PathBuf::from(path));
      }
    }

    self
      .database
      .clone()
      .or_else(SqliteStore::default_path)
      .ok_or_else(|| eyre!("Could not determine data directory"))
  }
}
