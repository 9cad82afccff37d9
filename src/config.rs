use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::planner::Classifier;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

pub const DEFAULT_EMPTY_MEAL: &str = "<empty>";
pub const DEFAULT_VARIABLE_MEAL: &str = "<variable>";

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Path to the SQLite database
    pub database_path: ConfigValue<PathBuf>,
    /// Placeholder for a slot with nothing planned
    pub empty_meal: ConfigValue<String>,
    /// Placeholder for a slot still to be decided
    pub variable_meal: ConfigValue<String>,
    /// Whether a shift may overwrite "to be decided" slots
    pub variable_overridable: ConfigValue<bool>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    database_path: Option<PathBuf>,
    empty_meal: Option<String>,
    variable_meal: Option<String>,
    variable_overridable: Option<bool>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let default_db_path = Self::default_data_dir().join("menu.db");

        // Start with defaults
        let mut database_path = ConfigValue::new(default_db_path, ConfigSource::Default);
        let mut empty_meal = ConfigValue::new(DEFAULT_EMPTY_MEAL.to_string(), ConfigSource::Default);
        let mut variable_meal =
            ConfigValue::new(DEFAULT_VARIABLE_MEAL.to_string(), ConfigSource::Default);
        let mut variable_overridable = ConfigValue::new(true, ConfigSource::Default);
        let mut config_file = None;

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(db_path) = file_config.database_path {
                // Resolve relative paths against config file's directory
                let resolved_path = if db_path.is_relative() {
                    path.parent().map(|p| p.join(&db_path)).unwrap_or(db_path)
                } else {
                    db_path
                };
                database_path = ConfigValue::new(resolved_path, ConfigSource::File);
            }
            if let Some(empty) = file_config.empty_meal {
                empty_meal = ConfigValue::new(empty, ConfigSource::File);
            }
            if let Some(variable) = file_config.variable_meal {
                variable_meal = ConfigValue::new(variable, ConfigSource::File);
            }
            if let Some(overridable) = file_config.variable_overridable {
                variable_overridable = ConfigValue::new(overridable, ConfigSource::File);
            }
        }

        // Apply environment variable overrides
        if let Ok(db_path) = std::env::var("MENU_DATABASE_PATH") {
            database_path = ConfigValue::new(PathBuf::from(db_path), ConfigSource::Environment);
        }
        if let Ok(empty) = std::env::var("MENU_EMPTY_MEAL") {
            empty_meal = ConfigValue::new(empty, ConfigSource::Environment);
        }
        if let Ok(variable) = std::env::var("MENU_VARIABLE_MEAL") {
            variable_meal = ConfigValue::new(variable, ConfigSource::Environment);
        }
        if let Ok(raw) = std::env::var("MENU_VARIABLE_OVERRIDABLE") {
            let overridable = parse_bool(&raw).ok_or_else(|| {
                ConfigError::InvalidValue("MENU_VARIABLE_OVERRIDABLE".to_string(), raw.clone())
            })?;
            variable_overridable = ConfigValue::new(overridable, ConfigSource::Environment);
        }

        if empty_meal.value.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "empty_meal".to_string(),
                empty_meal.value,
            ));
        }
        if variable_meal.value.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "variable_meal".to_string(),
                variable_meal.value,
            ));
        }

        Ok(Self {
            database_path,
            empty_meal,
            variable_meal,
            variable_overridable,
            config_file,
        })
    }

    /// Classifier built from the configured placeholders.
    pub fn classifier(&self) -> Classifier {
        Classifier::new(&self.empty_meal.value, &self.variable_meal.value)
            .with_variable_overridable(self.variable_overridable.value)
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/todumenu/
    /// - macOS: ~/Library/Application Support/todumenu/
    /// - Windows: %APPDATA%/todumenu/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("todumenu")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/todumenu/
    /// - macOS: ~/Library/Application Support/todumenu/
    /// - Windows: %APPDATA%/todumenu/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("todumenu")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(String, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue(key, value) => {
                write!(f, "Invalid value for {}: '{}'", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
