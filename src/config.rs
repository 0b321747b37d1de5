//! Startup configuration
//!
//! Loads `config.ron` from the platform config directory, falling back to
//! built-in defaults when the file is missing or broken.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::{is_valid_grid_size, MAX_GRID_SIZE, MIN_GRID_SIZE};

/// Config file name inside the config directory
pub const CONFIG_FILE: &str = "config.ron";

/// Startup settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Grid edge length of the first board
    pub grid_size: u32,
    /// Move limit of the first board (0 = unlimited)
    pub max_moves: u32,
    /// How long a mismatched pair stays face up, in milliseconds
    pub reveal_delay_ms: u64,
    /// Fixed shuffle seed; random when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 4,
            max_moves: 0,
            reveal_delay_ms: 1000,
            seed: None,
        }
    }
}

/// Config loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

impl GameConfig {
    /// Parse a RON document. Out-of-range grid sizes are clamped.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let mut config: GameConfig = ron::from_str(text)?;
        if !is_valid_grid_size(config.grid_size) {
            let clamped = config.grid_size.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE);
            log::warn!("Config grid_size {} out of range, using {}", config.grid_size, clamped);
            config.grid_size = clamped;
        }
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Read a config file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    /// Load the user config, or defaults if there is none
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            log::info!("No config at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("Config loaded from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }
}

/// Path of the user config file
pub fn config_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "pairflip", "Pairflip") {
        proj_dirs.config_dir().join(CONFIG_FILE)
    } else {
        PathBuf::from(".").join(CONFIG_FILE)
    }
}

/// Write the default config to `path` as an editable template
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let io_err = |source: io::Error| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let text = GameConfig::default().to_ron_string()?;
    fs::write(path, text).map_err(io_err)?;

    log::info!("Default config written to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = GameConfig::from_ron_str("(max_moves: 12)").unwrap();
        assert_eq!(config.max_moves, 12);
        assert_eq!(config.grid_size, 4);
        assert_eq!(config.reveal_delay_ms, 1000);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_full_config() {
        let text = "(grid_size: 6, max_moves: 20, reveal_delay_ms: 250, seed: Some(8))";
        let config = GameConfig::from_ron_str(text).unwrap();
        assert_eq!(
            config,
            GameConfig {
                grid_size: 6,
                max_moves: 20,
                reveal_delay_ms: 250,
                seed: Some(8),
            }
        );
    }

    #[test]
    fn test_grid_size_clamped() {
        assert_eq!(GameConfig::from_ron_str("(grid_size: 40)").unwrap().grid_size, 10);
        assert_eq!(GameConfig::from_ron_str("(grid_size: 0)").unwrap().grid_size, 2);
    }

    #[test]
    fn test_bad_config_is_error() {
        assert!(matches!(
            GameConfig::from_ron_str("(grid_size: \"big\")"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_template_parses_back() {
        let text = GameConfig::default().to_ron_string().unwrap();
        assert_eq!(GameConfig::from_ron_str(&text).unwrap(), GameConfig::default());
    }

    #[test]
    fn test_write_and_load_template() {
        let path = std::env::temp_dir()
            .join(format!("pairflip-config-{}", std::process::id()))
            .join(CONFIG_FILE);

        write_default_config(&path).unwrap();
        assert_eq!(GameConfig::load_from(&path).unwrap(), GameConfig::default());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = Path::new("/nonexistent/pairflip/config.ron");
        assert!(matches!(GameConfig::load_from(path), Err(ConfigError::Io { .. })));
    }
}
