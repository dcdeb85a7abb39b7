//! Runtime configuration.
//!
//! # Responsibility
//! - Collect storage, logging, export and attachment settings in one value.
//! - Read overrides from `REFLEKT_*` environment variables.
//!
//! # Invariants
//! - Malformed numeric overrides are errors, never silently ignored.

use crate::attachment::{CompressOptions, OutputFormat, DEFAULT_MAX_WIDTH, DEFAULT_QUALITY};
use crate::export::DEFAULT_EXPORT_PREFIX;
use crate::logging::default_log_level;
use crate::search::{SearchSession, DEFAULT_DEBOUNCE};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "REFLEKT_DB_PATH";
pub const ENV_LOG_DIR: &str = "REFLEKT_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "REFLEKT_LOG_LEVEL";
pub const ENV_EXPORT_PREFIX: &str = "REFLEKT_EXPORT_PREFIX";
pub const ENV_PREFERENCES_PATH: &str = "REFLEKT_PREFERENCES_PATH";
pub const ENV_SEARCH_DEBOUNCE_MS: &str = "REFLEKT_SEARCH_DEBOUNCE_MS";
pub const ENV_IMAGE_MAX_WIDTH: &str = "REFLEKT_IMAGE_MAX_WIDTH";
pub const ENV_IMAGE_QUALITY: &str = "REFLEKT_IMAGE_QUALITY";

const DEFAULT_DB_FILE: &str = "reflekt.sqlite3";
const DEFAULT_PREFERENCES_FILE: &str = "reflekt-preferences.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue {
                key,
                value,
                expected,
            } => write!(f, "invalid value `{value}` for {key}; expected {expected}"),
        }
    }
}

impl Error for ConfigError {}

/// Application settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// Absolute directory for rolling logs; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
    pub export_prefix: String,
    pub preferences_path: PathBuf,
    pub search_debounce: Duration,
    pub image_max_width: u32,
    pub image_quality: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            log_dir: None,
            log_level: default_log_level().to_string(),
            export_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
            preferences_path: PathBuf::from(DEFAULT_PREFERENCES_FILE),
            search_debounce: DEFAULT_DEBOUNCE,
            image_max_width: DEFAULT_MAX_WIDTH,
            image_quality: DEFAULT_QUALITY,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup`, which maps a variable name to a value.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(value);
        }
        if let Some(value) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = read(ENV_LOG_LEVEL) {
            config.log_level = value.trim().to_string();
        }
        if let Some(value) = read(ENV_EXPORT_PREFIX) {
            config.export_prefix = value.trim().to_string();
        }
        if let Some(value) = read(ENV_PREFERENCES_PATH) {
            config.preferences_path = PathBuf::from(value);
        }
        if let Some(value) = read(ENV_SEARCH_DEBOUNCE_MS) {
            let millis = parse_value::<u64>(ENV_SEARCH_DEBOUNCE_MS, &value, "milliseconds")?;
            config.search_debounce = Duration::from_millis(millis);
        }
        if let Some(value) = read(ENV_IMAGE_MAX_WIDTH) {
            let width = parse_value::<u32>(ENV_IMAGE_MAX_WIDTH, &value, "a positive pixel width")?;
            if width == 0 {
                return Err(invalid(ENV_IMAGE_MAX_WIDTH, &value, "a positive pixel width"));
            }
            config.image_max_width = width;
        }
        if let Some(value) = read(ENV_IMAGE_QUALITY) {
            let quality = parse_value::<f32>(ENV_IMAGE_QUALITY, &value, "a number in [0, 1]")?;
            if !(0.0..=1.0).contains(&quality) {
                return Err(invalid(ENV_IMAGE_QUALITY, &value, "a number in [0, 1]"));
            }
            config.image_quality = quality;
        }

        Ok(config)
    }

    /// Attachment compression settings derived from this config.
    pub fn compress_options(&self) -> CompressOptions {
        CompressOptions {
            max_width: self.image_max_width,
            quality: self.image_quality,
            preferred: OutputFormat::WebP,
        }
    }

    /// Search session using the configured debounce.
    pub fn search_session(&self) -> SearchSession {
        SearchSession::new(self.search_debounce)
    }
}

fn parse_value<T: std::str::FromStr>(
    key: &'static str,
    value: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| invalid(key, value, expected))
}

fn invalid(key: &'static str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        expected,
    }
}
