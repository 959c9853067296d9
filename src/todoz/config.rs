use crate::error::{Result, TodozError};
use crate::validation::{MAX_TEXT_LENGTH, MIN_TEXT_LENGTH, STORAGE_KEY, TodoConstraints};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Configuration for todoz, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodozConfig {
    /// Key the todo collection is stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Longest accepted todo text, in characters
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,

    /// Cap on the bytes the store may hold; unlimited when absent
    #[serde(default)]
    pub quota_bytes: Option<u64>,
}

fn default_storage_key() -> String {
    STORAGE_KEY.to_string()
}

fn default_max_text_length() -> usize {
    MAX_TEXT_LENGTH
}

impl Default for TodozConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            max_text_length: default_max_text_length(),
            quota_bytes: None,
        }
    }
}

impl TodozConfig {
    pub const KEYS: &'static [&'static str] = &["storage-key", "max-text-length", "quota-bytes"];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(TodozError::Io)?;
        let config: TodozConfig =
            serde_json::from_str(&content).map_err(TodozError::Serialization)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(TodozError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(TodozError::Serialization)?;
        fs::write(config_path, content).map_err(TodozError::Io)?;
        Ok(())
    }

    pub fn constraints(&self) -> TodoConstraints {
        TodoConstraints::with_max_text_length(self.max_text_length)
    }

    /// Current value of a setting, formatted for display.
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "storage-key" => Ok(self.storage_key.clone()),
            "max-text-length" => Ok(self.max_text_length.to_string()),
            "quota-bytes" => Ok(self
                .quota_bytes
                .map(|q| q.to_string())
                .unwrap_or_else(|| "none".to_string())),
            other => Err(unknown_key(other)),
        }
    }

    /// Parse and set a setting. `quota-bytes` accepts `none` to remove the cap.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        let mut next = self.clone();
        match key {
            "storage-key" => next.storage_key = value.to_string(),
            "max-text-length" => {
                next.max_text_length = value.parse().map_err(|_| {
                    TodozError::Config(format!("max-text-length must be a number, got {}", value))
                })?;
            }
            "quota-bytes" => {
                next.quota_bytes = if value.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(value.parse().map_err(|_| {
                        TodozError::Config(format!(
                            "quota-bytes must be a number or \"none\", got {}",
                            value
                        ))
                    })?)
                };
            }
            other => return Err(unknown_key(other)),
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(TodozError::Config("storage-key cannot be empty".into()));
        }
        if self
            .storage_key
            .chars()
            .any(|c| matches!(c, '/' | '\\') || c.is_control())
        {
            return Err(TodozError::Config(format!(
                "storage-key {:?} contains path separators",
                self.storage_key
            )));
        }
        if self.max_text_length < MIN_TEXT_LENGTH {
            return Err(TodozError::Config(format!(
                "max-text-length must be at least {}",
                MIN_TEXT_LENGTH
            )));
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> TodozError {
    TodozError::Config(format!(
        "Unknown config key: {} (expected one of: {})",
        key,
        TodozConfig::KEYS.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TodozConfig::default();
        assert_eq!(config.storage_key, "todos");
        assert_eq!(config.max_text_length, 500);
        assert_eq!(config.quota_bytes, None);
        assert_eq!(config.constraints(), TodoConstraints::default());
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = TodozConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config, TodozConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();

        let mut config = TodozConfig::default();
        config.set("max-text-length", "80").unwrap();
        config.set("quota-bytes", "4096").unwrap();
        config.save(temp_dir.path()).unwrap();

        let loaded = TodozConfig::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.max_text_length, 80);
        assert_eq!(loaded.quota_bytes, Some(4096));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILENAME),
            r#"{"storage_key": "work"}"#,
        )
        .unwrap();

        let loaded = TodozConfig::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.storage_key, "work");
        assert_eq!(loaded.max_text_length, 500);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = TodozConfig::default();
        assert!(config.set("max-text-length", "0").is_err());
        assert!(config.set("max-text-length", "lots").is_err());
        assert!(config.set("storage-key", "  ").is_err());
        assert!(config.set("storage-key", "../escape").is_err());
        assert!(config.set("colour", "blue").is_err());
        assert_eq!(config, TodozConfig::default());
    }

    #[test]
    fn test_quota_none_clears() {
        let mut config = TodozConfig::default();
        config.set("quota-bytes", "100").unwrap();
        assert_eq!(config.get("quota-bytes").unwrap(), "100");
        config.set("quota-bytes", "none").unwrap();
        assert_eq!(config.get("quota-bytes").unwrap(), "none");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILENAME),
            r#"{"max_text_length": 0}"#,
        )
        .unwrap();
        assert!(matches!(
            TodozConfig::load(temp_dir.path()),
            Err(TodozError::Config(_))
        ));
    }
}
