mod defaults;
mod types;

pub use types::*;

use crate::error::ConfigError;
use defaults::*;
use std::path::Path;
use tracing::debug;

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            data_dir: default_data_dir(),
            gemini: GeminiConfig::default(),
            retry: RetryConfig::default(),
            plan: PlanConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file when it exists, otherwise fall back to built-in defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No config file at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gemini.timeout_sec == 0 {
            return Err(ConfigError::InvalidValue {
                field: "gemini.timeout_sec",
                reason: "must be at least 1 second".to_string(),
            });
        }

        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_attempts",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.plan.min_exercises_per_day == 0 {
            return Err(ConfigError::InvalidValue {
                field: "plan.min_exercises_per_day",
                reason: "a generated day must keep at least one exercise".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gemini.timeout_sec, 30);
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config = serde_yaml::from_str("data_dir: /tmp/fit\n").unwrap();
        assert_eq!(config.data_dir, std::path::PathBuf::from("/tmp/fit"));
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.plan.missed_day_streak_threshold, 2);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config: Config = serde_yaml::from_str("gemini:\n  timeout_sec: 0\n").unwrap();
        assert!(config.validate().is_err());
    }
}
