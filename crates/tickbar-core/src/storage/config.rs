//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default timer names
//! - Pomodoro cycle durations
//! - Notification and sound switches
//! - Point values for the productivity tracker
//!
//! Configuration is stored at `~/.config/tickbar/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::config_path;
use crate::error::{ConfigError, CoreError, Result};

/// Timer defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_timer_name")]
    pub default_name: String,
    #[serde(default = "default_stopwatch_name")]
    pub stopwatch_name: String,
    /// Minutes for `start-focus` without `--duration`.
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u64,
    /// Minutes for `start-break` without `--duration`.
    #[serde(default = "default_short_break")]
    pub break_minutes: u64,
}

/// Pomodoro cycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroConfig {
    #[serde(default = "default_focus_minutes")]
    pub work_minutes: u64,
    #[serde(default = "default_short_break")]
    pub short_break_minutes: u64,
    #[serde(default = "default_long_break")]
    pub long_break_minutes: u64,
    #[serde(default = "default_pomodoros_before_long_break")]
    pub pomodoros_before_long_break: u32,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Show a modal dialog when an alarm fires.
    #[serde(default = "default_true")]
    pub alarm_dialog: bool,
}

/// Sound configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_sound_dir")]
    pub dir: String,
}

/// Productivity tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductivityConfig {
    #[serde(default = "default_focus_points")]
    pub focus_points: u64,
    #[serde(default = "default_goal_points")]
    pub goal_points: u64,
    #[serde(default = "default_habit_points")]
    pub habit_points: u64,
    #[serde(default = "default_true")]
    pub achievement_notifications: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/tickbar/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub pomodoro: PomodoroConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub sounds: SoundsConfig,
    #[serde(default)]
    pub productivity: ProductivityConfig,
}

// Default functions
fn default_timer_name() -> String {
    "Timer".into()
}
fn default_stopwatch_name() -> String {
    "Stopwatch".into()
}
fn default_focus_minutes() -> u64 {
    25
}
fn default_short_break() -> u64 {
    5
}
fn default_long_break() -> u64 {
    15
}
fn default_pomodoros_before_long_break() -> u32 {
    4
}
fn default_true() -> bool {
    true
}
fn default_app_name() -> String {
    "Timer Manager".into()
}
fn default_sound_dir() -> String {
    "/usr/share/sounds/freedesktop/stereo".into()
}
fn default_focus_points() -> u64 {
    10
}
fn default_goal_points() -> u64 {
    20
}
fn default_habit_points() -> u64 {
    5
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_name: default_timer_name(),
            stopwatch_name: default_stopwatch_name(),
            focus_minutes: default_focus_minutes(),
            break_minutes: default_short_break(),
        }
    }
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_focus_minutes(),
            short_break_minutes: default_short_break(),
            long_break_minutes: default_long_break(),
            pomodoros_before_long_break: default_pomodoros_before_long_break(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            app_name: default_app_name(),
            alarm_dialog: true,
        }
    }
}

impl Default for SoundsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: default_sound_dir(),
        }
    }
}

impl Default for ProductivityConfig {
    fn default() -> Self {
        Self {
            focus_points: default_focus_points(),
            goal_points: default_goal_points(),
            habit_points: default_habit_points(),
            achievement_notifications: true,
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
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parents, leaf) = match key.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parents) = parents {
            for part in parents.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(format!("{e}")))?,
            ),
            serde_json::Value::Number(_) => {
                let n = value
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                serde_json::Value::Number(n.into())
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    /// Load from the default path, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                CoreError::from(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| {
            CoreError::from(ConfigError::SaveFailed {
                path: PathBuf::from(path),
                message,
            })
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| save_failed(e.to_string()))?;
        }
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
    /// Returns an error if the key is unknown or the value has the wrong type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("{e}; using default configuration");
                Self::default()
            }
        }
    }
}
