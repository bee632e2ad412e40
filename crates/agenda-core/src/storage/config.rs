//! TOML-based application configuration.
//!
//! Stores scheduling preferences:
//! - Workday window
//! - Default duration for new items
//! - Allocation horizon
//! - Non-working days and reserved daily blocks
//!
//! Configuration is stored at `~/.config/agenda/config.toml`.

use std::path::{Path, PathBuf};

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::item::{hhmm, DEFAULT_DURATION_MINUTES};
use crate::scheduler::{ReservedBlock, SchedulerConfig, DEFAULT_HORIZON_DAYS, MAX_HORIZON_DAYS};

/// Workday window configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkdayConfig {
    #[serde(default = "default_work_start", with = "hhmm")]
    pub start: NaiveTime,
    #[serde(default = "default_work_end", with = "hhmm")]
    pub end: NaiveTime,
}

/// Allocation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingConfig {
    /// Duration given to new items created without one.
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: u32,
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    #[serde(default)]
    pub non_working_days: Vec<Weekday>,
    #[serde(default)]
    pub reserved_blocks: Vec<ReservedBlock>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/agenda/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub workday: WorkdayConfig,
    #[serde(default)]
    pub scheduling: SchedulingConfig,
}

// Default functions
fn default_work_start() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN)
}
fn default_work_end() -> NaiveTime {
    NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN)
}
fn default_duration_minutes() -> u32 {
    DEFAULT_DURATION_MINUTES
}
fn default_horizon_days() -> u32 {
    DEFAULT_HORIZON_DAYS
}

impl Default for WorkdayConfig {
    fn default() -> Self {
        Self {
            start: default_work_start(),
            end: default_work_end(),
        }
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: default_duration_minutes(),
            horizon_days: default_horizon_days(),
            non_working_days: Vec::new(),
            reserved_blocks: Vec::new(),
        }
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
        let unknown = || ConfigError::InvalidValue {
            key: key.to_string(),
            message: "unknown config key".to_string(),
        };
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(invalid("config key is empty".to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Location of the configuration file.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing the defaults there if the file
    /// does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or created.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
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

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse
    /// as the key's type. The config is left unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.scheduler_config()?;
        *self = updated;
        Ok(())
    }

    /// Engine configuration derived from these preferences.
    ///
    /// # Errors
    /// Returns an error if the workday window is empty or the horizon is
    /// zero days.
    pub fn scheduler_config(&self) -> Result<SchedulerConfig, ConfigError> {
        if self.workday.start >= self.workday.end {
            return Err(ConfigError::InvalidValue {
                key: "workday".to_string(),
                message: format!(
                    "start ({}) must be before end ({})",
                    hhmm::format(self.workday.start),
                    hhmm::format(self.workday.end)
                ),
            });
        }
        if !(1..=MAX_HORIZON_DAYS).contains(&self.scheduling.horizon_days) {
            return Err(ConfigError::InvalidValue {
                key: "scheduling.horizon_days".to_string(),
                message: format!("must be between 1 and {MAX_HORIZON_DAYS}"),
            });
        }
        if self.scheduling.default_duration_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "scheduling.default_duration_minutes".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if let Some(block) = self
            .scheduling
            .reserved_blocks
            .iter()
            .find(|block| block.duration_minutes == 0)
        {
            return Err(ConfigError::InvalidValue {
                key: "scheduling.reserved_blocks".to_string(),
                message: format!("'{}' must last at least 1 minute", block.name),
            });
        }

        Ok(SchedulerConfig {
            work_start: self.workday.start,
            work_end: self.workday.end,
            horizon_days: self.scheduling.horizon_days,
            reserved_blocks: self.scheduling.reserved_blocks.clone(),
            non_working_days: self.scheduling.non_working_days.clone(),
        })
    }
}
