mod config;
mod store;

pub use config::{
    Config, NotificationsConfig, PomodoroConfig, ProductivityConfig, SoundsConfig, TimerConfig,
};
pub use store::{
    StateStore, ACHIEVEMENTS_FILE, ALARM_FILE, ANALYTICS_FILE, DAILY_STATS_FILE, GOALS_FILE,
    HABITS_FILE, NOTES_FILE, POMODORO_FILE, TIMER_FILE,
};

use std::path::PathBuf;

use crate::error::{CoreError, Result};

/// Returns the state root: `$TICKBAR_CACHE_DIR`, else `~/.cache/waybar`.
///
/// # Errors
/// Returns an error if no cache directory can be determined or if creating
/// it fails.
pub fn cache_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("TICKBAR_CACHE_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => dirs::cache_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".cache")))
            .ok_or_else(|| CoreError::DataDir("cannot determine cache directory".into()))?
            .join("waybar"),
    };

    std::fs::create_dir_all(&dir).map_err(|e| CoreError::io(&dir, e))?;
    Ok(dir)
}

/// Returns the config file path: `$TICKBAR_CONFIG`, else
/// `~/.config/tickbar/config.toml`.
pub fn config_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os("TICKBAR_CONFIG") {
        return Ok(PathBuf::from(path));
    }
    let base = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .ok_or_else(|| CoreError::DataDir("cannot determine config directory".into()))?;
    Ok(base.join("tickbar").join("config.toml"))
}
