use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default API endpoint, the public staging deployment.
pub const DEFAULT_BASE_URL: &str = "http://staging.quran.com:3000/api/v3";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub api: ApiConfig,
  pub cache: CacheConfig,
  /// Chapter ids evicted from the cache before mirroring starts.
  pub purge_chapters: Vec<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  pub base_url: String,
  /// Per-request timeout in seconds.
  pub timeout_secs: u64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
      timeout_secs: DEFAULT_TIMEOUT_SECS,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  /// Database location (default: $XDG_DATA_HOME/mushaf/cache.db)
  pub path: Option<PathBuf>,
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./mushaf.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/mushaf/config.yaml
  ///
  /// Built-in defaults apply when no file is found.
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
    let local = PathBuf::from("mushaf.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("mushaf").join("config.yaml");
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

  #[test]
  fn test_defaults_fill_omitted_fields() {
    let config: Config = serde_yaml::from_str("api:\n  timeout_secs: 5\n").unwrap();

    assert_eq!(config.api.timeout_secs, 5);
    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    assert!(config.cache.path.is_none());
    assert!(config.purge_chapters.is_empty());
  }

  #[test]
  fn test_full_config_parses() {
    let config: Config = serde_yaml::from_str(
      "api:\n  base_url: http://localhost:3000/api/v3\n  timeout_secs: 30\n\
       cache:\n  path: /tmp/mushaf.db\npurge_chapters: [1, 114]\n",
    )
    .unwrap();

    assert_eq!(config.api.base_url, "http://localhost:3000/api/v3");
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.cache.path.as_deref(), Some(Path::new("/tmp/mushaf.db")));
    assert_eq!(config.purge_chapters, vec![1, 114]);
  }
}
