//! Whole-file JSON snapshots under one state root.
//!
//! Every subsystem owns one file. Reads never fail: a missing or unparsable
//! file yields the record's default, and missing keys are filled in by the
//! record's `#[serde(default)]`. Writes go to a temp file in the same
//! directory and are renamed over the target, so a concurrent reader sees
//! either the old or the new snapshot. Two writers still race: the last
//! rename wins.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{CoreError, Result};

pub const TIMER_FILE: &str = "timer-manager.json";
pub const ALARM_FILE: &str = "alarm-state.json";
pub const POMODORO_FILE: &str = "pomodoro.json";
pub const ACHIEVEMENTS_FILE: &str = "productivity/achievements.json";
pub const ANALYTICS_FILE: &str = "productivity/analytics.json";
pub const DAILY_STATS_FILE: &str = "productivity/daily_stats.json";
pub const GOALS_FILE: &str = "productivity/goals.json";
pub const HABITS_FILE: &str = "productivity/habits.json";
pub const NOTES_FILE: &str = "productivity/notes.json";

/// File-backed state store rooted at an injected directory.
#[derive(Debug, Clone)]
pub struct StateStore {
    root: PathBuf,
}

impl StateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open the store at the user's cache directory.
    pub fn open() -> Result<Self> {
        Ok(Self::new(super::cache_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Load a snapshot, falling back to `T::default()`.
    pub fn load<T>(&self, name: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let path = self.path(name);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return T::default(),
            Err(e) => {
                tracing::warn!("cannot read {}: {e}; using defaults", path.display());
                return T::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("corrupt state in {}: {e}; using defaults", path.display());
                T::default()
            }
        }
    }

    /// Atomically replace a snapshot.
    pub fn save<T>(&self, name: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let path = self.path(name);
        let dir = path.parent().unwrap_or(&self.root).to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| CoreError::io(&dir, e))?;

        let content = serde_json::to_string_pretty(value)?;
        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| CoreError::io(&dir, e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| CoreError::io(tmp.path(), e))?;
        tmp.flush().map_err(|e| CoreError::io(tmp.path(), e))?;
        tmp.persist(&path)
            .map_err(|e| CoreError::io(&path, e.error))?;

        tracing::debug!("saved {}", path.display());
        Ok(())
    }
}
