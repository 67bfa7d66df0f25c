//! Configuration management
//!
//! Settings come from environment variables with sensible defaults; command
//! line flags override them.
//!
//! # Environment Variables
//!
//! - `GUARDIAN_SETTINGS_PATH`: settings file, relative to the project
//!   directory unless absolute - default: ".claude/settings.json"
//! - `GUARDIAN_LOG_LEVEL`: logging level - default: "info"
//! - `GUARDIAN_LOG_JSON`: emit JSON log lines (true|false) - default: "false"

use crate::settings::DEFAULT_SETTINGS_PATH;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Valid options: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardianConfig {
    pub settings_path: PathBuf,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for GuardianConfig {
    fn default() -> Self {
        let settings_path = env::var("GUARDIAN_SETTINGS_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));

        let log_level = env::var("GUARDIAN_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let log_json = env::var("GUARDIAN_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            settings_path,
            log_level,
            log_json,
        }
    }
}

impl GuardianConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.log_level.clone()));
        }

        if self.settings_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "settings path must not be empty".to_string(),
            ));
        }

        if self.settings_path.file_name().is_none() {
            return Err(ConfigError::ValidationFailed(format!(
                "settings path {} does not name a file",
                self.settings_path.display()
            )));
        }

        Ok(())
    }

    /// Settings file location for a project rooted at `project_dir`.
    pub fn settings_path_for(&self, project_dir: &Path) -> PathBuf {
        if self.settings_path.is_absolute() {
            self.settings_path.clone()
        } else {
            project_dir.join(&self.settings_path)
        }
    }
}

impl fmt::Display for GuardianConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Permission Guardian Configuration:")?;
        writeln!(f, "  Settings Path: {}", self.settings_path.display())?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        write!(f, "  JSON Logs: {}", self.log_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        env::remove_var("GUARDIAN_SETTINGS_PATH");
        env::remove_var("GUARDIAN_LOG_LEVEL");
        env::remove_var("GUARDIAN_LOG_JSON");
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = GuardianConfig::default();

        assert_eq!(config.settings_path, PathBuf::from(".claude/settings.json"));
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var("GUARDIAN_SETTINGS_PATH", "/etc/agent/settings.json");
        env::set_var("GUARDIAN_LOG_LEVEL", "DEBUG");
        env::set_var("GUARDIAN_LOG_JSON", "true");

        let config = GuardianConfig::default();
        clear_env();

        assert_eq!(
            config.settings_path,
            PathBuf::from("/etc/agent/settings.json")
        );
        assert_eq!(config.log_level, "debug");
        assert!(config.log_json);
    }

    #[test]
    #[serial]
    fn test_blank_settings_path_falls_back() {
        clear_env();
        env::set_var("GUARDIAN_SETTINGS_PATH", "  ");
        let config = GuardianConfig::default();
        clear_env();

        assert_eq!(config.settings_path, PathBuf::from(".claude/settings.json"));
    }

    #[test]
    fn test_invalid_log_level() {
        let config = GuardianConfig {
            settings_path: PathBuf::from("settings.json"),
            log_level: "loud".to_string(),
            log_json: false,
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidLogLevel("loud".to_string()))
        );
    }

    #[test]
    fn test_settings_path_must_name_file() {
        let config = GuardianConfig {
            settings_path: PathBuf::from("/"),
            log_level: "info".to_string(),
            log_json: false,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_settings_path_for() {
        let relative = GuardianConfig {
            settings_path: PathBuf::from(".claude/settings.json"),
            log_level: "info".to_string(),
            log_json: false,
        };
        assert_eq!(
            relative.settings_path_for(Path::new("/work/app")),
            PathBuf::from("/work/app/.claude/settings.json")
        );

        let absolute = GuardianConfig {
            settings_path: PathBuf::from("/tmp/s.json"),
            ..relative
        };
        assert_eq!(
            absolute.settings_path_for(Path::new("/work/app")),
            PathBuf::from("/tmp/s.json")
        );
    }

    #[test]
    fn test_display() {
        let config = GuardianConfig {
            settings_path: PathBuf::from(".claude/settings.json"),
            log_level: "warn".to_string(),
            log_json: true,
        };
        let text = config.to_string();
        assert!(text.contains("Settings Path: .claude/settings.json"));
        assert!(text.contains("Log Level: warn"));
    }
}
