use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cache::{CacheStore, Expiry};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub cache: CacheConfig,
  pub anilist: AnilistConfig,
  pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  /// Defaults to ~/.anime_list_apis
  pub directory: Option<PathBuf>,
  /// Seconds a cached record stays valid; negative means forever
  pub ttl_seconds: i64,
  /// Counted additions between automatic writes of the cache file
  pub write_after: usize,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      directory: None,
      ttl_seconds: 6000,
      write_after: 20,
    }
  }
}

impl CacheConfig {
  pub fn directory(&self) -> Result<PathBuf> {
    match &self.directory {
      Some(directory) => Ok(directory.clone()),
      None => dirs::home_dir()
        .map(|home| home.join(".anime_list_apis"))
        .ok_or_else(|| eyre!("Could not determine home directory for the cache")),
    }
  }

  pub fn open_store(&self) -> Result<CacheStore> {
    Ok(
      CacheStore::open(self.directory()?)?
        .with_expiry(Expiry::from_seconds(self.ttl_seconds))
        .with_write_after(self.write_after),
    )
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnilistConfig {
  pub endpoint: String,
  /// Pause after every request
  pub rate_limit_pause_ms: u64,
  /// Wait before the single retry of a rate-limited request
  pub rate_limit_backoff_secs: u64,
}

impl Default for AnilistConfig {
  fn default() -> Self {
    Self {
      endpoint: "https://graphql.anilist.co".to_string(),
      rate_limit_pause_ms: 500,
      rate_limit_backoff_secs: 60,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
  /// Also write a daily rolling log file here
  pub directory: Option<PathBuf>,
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./medialist.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/medialist/config.yaml
  ///
  /// Without any file the defaults are used.
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
    let local = PathBuf::from("medialist.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("medialist").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn write(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, contents).unwrap();
    path
  }

  #[test]
  fn test_partial_file_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "cache:\n  ttl_seconds: -1\nanilist:\n  rate_limit_pause_ms: 0\n");
    let config = Config::load(Some(&path)).unwrap();

    assert_eq!(config.cache.ttl_seconds, -1);
    assert_eq!(config.cache.write_after, 20);
    assert_eq!(config.anilist.rate_limit_pause_ms, 0);
    assert_eq!(config.anilist.endpoint, "https://graphql.anilist.co");
    assert!(config.log.directory.is_none());
  }

  #[test]
  fn test_missing_explicit_file_is_error() {
    let dir = TempDir::new().unwrap();
    let err = Config::load(Some(&dir.path().join("nope.yaml"))).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
  }

  #[test]
  fn test_invalid_yaml_is_error() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "cache:\n  write_after: many\n");
    assert!(Config::load(Some(&path)).is_err());
  }

  #[test]
  fn test_open_store_in_configured_directory() {
    let dir = TempDir::new().unwrap();
    let cache = CacheConfig {
      directory: Some(dir.path().join("cache")),
      ..CacheConfig::default()
    };
    let store = cache.open_store().unwrap();
    assert_eq!(store.path(), dir.path().join("cache").join("cache.json"));
  }
}
