//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Editor and timeline defaults.
    pub editor: EditorDefaults,

    /// Capture defaults.
    pub capture: CaptureDefaults,

    /// Remote video-processing service.
    pub service: ServiceConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Timeline and layout defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorDefaults {
    /// Lower bound for the derived timeline duration (seconds).
    pub min_timeline_secs: f64,

    /// Horizontal zoom of the timeline track.
    pub pixels_per_second: f64,

    /// Base width used by the content-aware aspect policy.
    pub base_width: f64,

    /// Height of the window-frame header, when shown.
    pub window_header_height: f64,

    /// Physics preset selected for new projects.
    pub default_preset: String,
}

/// Capture parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureDefaults {
    /// Maximum pointer sampling rate (Hz).
    pub pointer_sample_rate_hz: u32,

    /// Requested capture frame rate.
    pub fps: u32,
}

/// Connection settings for the video-processing service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL, e.g. `http://localhost:8000`.
    pub base_url: String,

    /// Delay between job status polls.
    pub poll_interval_ms: u64,

    /// Number of polls before a job is considered timed out.
    pub max_polls: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "cursorflow=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for EditorDefaults {
    fn default() -> Self {
        Self {
            min_timeline_secs: 10.0,
            pixels_per_second: 80.0,
            base_width: 1280.0,
            window_header_height: 40.0,
            default_preset: "smooth".to_string(),
        }
    }
}

impl Default for CaptureDefaults {
    fn default() -> Self {
        Self {
            pointer_sample_rate_hz: 60,
            fps: 60,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            poll_interval_ms: 1000,
            max_polls: 600,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &std::path::Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("cursorflow").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{"service":{"base_url":"http://media:9000"}}"#).unwrap();
        assert_eq!(parsed.service.base_url, "http://media:9000");
        assert_eq!(parsed.service.poll_interval_ms, 1000);
        assert!((parsed.editor.pixels_per_second - 80.0).abs() < 1e-9);
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join("cursorflow_test_config");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.editor.default_preset, "smooth");

        std::fs::remove_dir_all(&dir).ok();
    }
}
