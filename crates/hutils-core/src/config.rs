//! Library-wide defaults, loadable from TOML.
//!
//! ```toml
//! [json]
//! ensure_ascii = true
//!
//! [pagination]
//! default_limit = 50
//! max_limit = 200
//!
//! [date_range]
//! max_delta_days = 31
//! prefix = "created_"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data_types::JsonOptions;
use crate::error::ConfigError;

/// Environment variable naming a TOML settings file.
pub const CONFIG_ENV: &str = "HUTILS_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub json: JsonOptions,
    pub pagination: PaginationSettings,
    pub date_range: DateRangeSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationSettings {
    pub default_offset: i64,
    pub default_limit: i64,
    pub max_limit: Option<i64>,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            default_offset: 0,
            default_limit: 20,
            max_limit: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateRangeSettings {
    pub max_delta_days: i64,
    /// Prepended to the `from` / `to` keys.
    pub prefix: String,
}

impl Default for DateRangeSettings {
    fn default() -> Self {
        Self {
            max_delta_days: 400,
            prefix: String::new(),
        }
    }
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_toml_str(&text)?;
        tracing::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load the file named by `HUTILS_CONFIG`, or fall back to defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.json.ensure_ascii);
        assert_eq!(settings.pagination.default_limit, 20);
        assert_eq!(settings.pagination.max_limit, None);
        assert_eq!(settings.date_range.max_delta_days, 400);
        assert_eq!(settings.date_range.prefix, "");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            [pagination]
            max_limit = 100

            [date_range]
            prefix = "created_"
            "#,
        )
        .unwrap();
        assert_eq!(settings.pagination.max_limit, Some(100));
        assert_eq!(settings.pagination.default_limit, 20);
        assert_eq!(settings.date_range.prefix, "created_");
        assert_eq!(settings.date_range.max_delta_days, 400);
        assert_eq!(settings.json, JsonOptions::default());
    }

    #[test]
    fn test_empty_toml() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = Settings::from_toml_str("[pagination]\ndefault_limit = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load("/nonexistent/hutils.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/hutils.toml"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("hutils.toml");
        std::fs::write(&path, "[json]\nsort_keys = true\n").unwrap();
        let settings = Settings::load(&path).unwrap();
        assert!(settings.json.sort_keys);
    }
}
