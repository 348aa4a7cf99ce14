//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;
use crate::plugins::DispatchConfig;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub dispatch: DispatchConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
    /// Reply with a notice when a user lacks the power level for a command
    pub notify_forbidden: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StorageConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LoggingConfig {
    pub level: String,
}

/// Identity used by the console adapter
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ConsoleConfig {
    pub room_id: String,
    pub user_id: String,
    pub power_level: i64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "roombot".to_string(),
            prefix: "!".to_string(),
            notify_forbidden: true,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/plugin_data.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            room_id: "!console:localhost".to_string(),
            user_id: "@console:localhost".to_string(),
            power_level: 100,
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.prefix.trim().is_empty() {
            return Err(ConfigError::MissingField("bot.prefix".to_string()));
        }
        if self.dispatch.fuzzy_threshold > 100 {
            return Err(ConfigError::InvalidValue(format!(
                "dispatch.fuzzy-threshold must be 0-100, got {}",
                self.dispatch.fuzzy_threshold
            )));
        }
        Ok(())
    }

    /// Override fields from `BOT_PREFIX` and `BOT_STORAGE_PATH`
    pub fn apply_env(&mut self) {
        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            if !prefix.trim().is_empty() {
                self.bot.prefix = prefix;
            }
        }

        if let Ok(path) = std::env::var("BOT_STORAGE_PATH") {
            self.storage.path = PathBuf::from(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Config::from_yaml("bot:\n  prefix: \"?\"\ndispatch:\n  fuzzy-threshold: 75\n").unwrap();

        assert_eq!(config.bot.prefix, "?");
        assert_eq!(config.bot.name, "roombot");
        assert_eq!(config.dispatch.fuzzy_threshold, 75);
        assert_eq!(config.dispatch.timer_interval_secs, 30);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_default_round_trips_through_yaml() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        let config = Config::from_yaml(&yaml).unwrap();

        assert_eq!(config.dispatch, DispatchConfig::default());
        assert_eq!(config.console.power_level, 100);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let err = Config::from_yaml("dispatch:\n  fuzzy-threshold: 150\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let err = Config::from_yaml("bot:\n  prefix: \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }
}
