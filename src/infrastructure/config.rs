use crate::domain::{config::MonitorConfig, error::{MonitorError, MonitorResult}};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create new configuration manager
    pub fn new() -> MonitorResult<Self> {
        Ok(Self {
            config_path: Self::default_config_path()?,
        })
    }

    /// Manager reading and writing a specific path
    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Load configuration, falling back to defaults when no file exists
    pub fn load_config(&self) -> MonitorResult<MonitorConfig> {
        if self.config_path.exists() {
            Self::load_from_path(&self.config_path)
        } else {
            Ok(MonitorConfig::default())
        }
    }

    /// Save configuration, creating the directory if needed
    pub fn save_config(&self, config: &MonitorConfig) -> MonitorResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| MonitorError::Config {
                message: format!("Failed to create config directory: {}", e),
            })?;
        }
        Self::save_to_path(&self.config_path, config)
    }

    /// Load configuration from specific path
    pub fn load_from_path(path: &Path) -> MonitorResult<MonitorConfig> {
        let content = fs::read_to_string(path).map_err(|e| MonitorError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| MonitorError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    /// Save configuration to specific path
    pub fn save_to_path(path: &Path, config: &MonitorConfig) -> MonitorResult<()> {
        let content = toml::to_string_pretty(config).map_err(|e| MonitorError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, content).map_err(|e| MonitorError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })
    }

    fn default_config_path() -> MonitorResult<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| MonitorError::Config {
            message: "Could not determine home directory".to_string(),
        })?;

        Ok(home.join(".config").join("portmon").join("config.toml"))
    }

    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("config.toml"));

        let config = manager.load_config().unwrap();
        assert_eq!(config.framing.idle_threshold_ms, 100);
        assert_eq!(config.default_baud_rate, 9600);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("nested").join("config.toml"));

        let mut config = MonitorConfig::default();
        config.framing.idle_threshold_ms = 250;
        config.default_baud_rate = 115200;
        manager.save_config(&config).unwrap();

        let reloaded = manager.load_config().unwrap();
        assert_eq!(reloaded.framing.idle_threshold_ms, 250);
        assert_eq!(reloaded.default_baud_rate, 115200);
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "not [valid toml").unwrap();

        let result = ConfigManager::load_from_path(&path);
        assert!(matches!(result, Err(MonitorError::Config { .. })));
    }
}
