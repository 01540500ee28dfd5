use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Name of the settings file, looked up in the working directory
pub const CONFIG_FILE: &str = "quicksave.json";

/// Key injected to ask the game for a fresh quicksave
pub const QUICKSAVE_KEY: &str = "F5";

/// How long the quicksave key is held down
pub const QUICKSAVE_KEY_HOLD: Duration = Duration::from_millis(200);

/// Settings for one watchdog run. Loaded once at startup, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory the game writes its save files into
    pub save_directory: PathBuf,
    /// Window title the game must hold for a tick to do anything
    pub process_name: String,
    /// Seconds between ticks
    pub poll_interval: f32,
    /// Whether to inject the quicksave key when the quicksave goes stale
    pub save_trigger_enabled: bool,
    /// Seconds of quicksave age before the trigger fires
    pub save_trigger_interval: f32,
    /// Whether to archive changed quicksaves as numbered saves
    pub archive_copy_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            save_directory: default_save_directory(),
            process_name: "Starfield".to_string(),
            poll_interval: 10.0,
            save_trigger_enabled: true,
            save_trigger_interval: 120.0,
            archive_copy_enabled: true,
        }
    }
}

impl Config {
    pub fn poll_duration(&self) -> Duration {
        Duration::from_secs_f32(self.poll_interval)
    }

    pub fn trigger_duration(&self) -> Duration {
        Duration::from_secs_f32(self.save_trigger_interval)
    }

    /// The save directory must already exist; refusing to start beats
    /// silently polling a path the game will never write to.
    pub fn validate(&self) -> Result<()> {
        if !self.save_directory.is_dir() {
            anyhow::bail!(
                "save_directory '{}' does not exist",
                self.save_directory.display()
            );
        }
        Ok(())
    }
}

fn default_save_directory() -> PathBuf {
    dirs::document_dir()
        .unwrap_or_default()
        .join("My Games")
        .join("Starfield")
        .join("Saves")
}

/// Load settings from `path`, writing defaults there first if it is missing.
pub fn load_or_init(path: &Path) -> Result<Config> {
    if path.exists() {
        info!("Loading {}... existing file found", path.display());
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        return Ok(config);
    }

    let config = Config::default();
    let pretty = serde_json::to_string_pretty(&config)?;
    std::fs::write(path, pretty)
        .with_context(|| format!("Failed to write default settings to {}", path.display()))?;

    let shown = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    info!(
        "Loading {}... wrote default settings to {} because no existing file was found",
        path.display(),
        shown.display()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.process_name, "Starfield");
        assert_eq!(config.poll_duration(), Duration::from_secs(10));
        assert_eq!(config.trigger_duration(), Duration::from_secs(120));
        assert!(config.save_trigger_enabled);
        assert!(config.archive_copy_enabled);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"process_name": "Skyrim", "poll_interval": 2.5}"#).unwrap();
        assert_eq!(config.process_name, "Skyrim");
        assert_eq!(config.poll_duration(), Duration::from_millis(2500));
        assert!(config.save_trigger_enabled);
    }

    #[test]
    fn test_load_or_init_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let written = load_or_init(&path).unwrap();
        assert!(path.exists());
        assert_eq!(written.process_name, "Starfield");

        // Second load reads the file back rather than rewriting it
        let reloaded = load_or_init(&path).unwrap();
        assert_eq!(reloaded.poll_interval, written.poll_interval);
    }

    #[test]
    fn test_validate_rejects_missing_directory() {
        let config = Config {
            save_directory: PathBuf::from("/definitely/not/a/real/saves/dir"),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
