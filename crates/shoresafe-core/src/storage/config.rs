//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default timer form values (all-aboard, last tender, port mode)
//! - The alert ladder and countdown urgency thresholds
//! - The default buffer persona for new trips
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::timer::{PortMode, UrgencyThresholds, STANDARD_LEAD_MINUTES};
use crate::trip::BufferPersona;

/// Defaults for the create-timer form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Local wall-clock time, `HH:MM`.
    #[serde(default = "default_all_aboard")]
    pub default_all_aboard: String,
    #[serde(default = "default_last_tender")]
    pub default_last_tender: String,
    #[serde(default)]
    pub default_mode: PortMode,
}

/// Alert ladder and countdown thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    /// Lead times used when no trip narrows them down.
    #[serde(default = "default_lead_minutes")]
    pub lead_minutes: Vec<u32>,
    #[serde(default = "default_urgent_secs")]
    pub urgent_secs: i64,
    #[serde(default = "default_critical_secs")]
    pub critical_secs: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TripConfig {
    #[serde(default)]
    pub default_persona: BufferPersona,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub trip: TripConfig,
}

// Default functions
fn default_all_aboard() -> String {
    "17:30".into()
}
fn default_last_tender() -> String {
    "15:30".into()
}
fn default_lead_minutes() -> Vec<u32> {
    STANDARD_LEAD_MINUTES.to_vec()
}
fn default_urgent_secs() -> i64 {
    1800
}
fn default_critical_secs() -> i64 {
    900
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_all_aboard: default_all_aboard(),
            default_last_tender: default_last_tender(),
            default_mode: PortMode::Dock,
        }
    }
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            lead_minutes: default_lead_minutes(),
            urgent_secs: default_urgent_secs(),
            critical_secs: default_critical_secs(),
        }
    }
}

impl AlertsConfig {
    pub fn thresholds(&self) -> UrgencyThresholds {
        UrgencyThresholds {
            urgent_secs: self.urgent_secs,
            critical_secs: self.critical_secs,
        }
    }

    /// Configured ladder, sorted descending and ending with 0.
    pub fn lead_minutes(&self) -> Vec<u32> {
        let mut leads: Vec<u32> = self.lead_minutes.iter().copied().filter(|m| *m > 0).collect();
        leads.sort_unstable_by(|a, b| b.cmp(a));
        leads.dedup();
        leads.push(0);
        leads
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    let n = value
                        .parse::<i64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                    serde_json::Value::Number(n.into())
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the data directory, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key. The new value must have the same
    /// shape as the old one and must still deserialize.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }
}
