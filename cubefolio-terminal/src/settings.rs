use cubefolio_core::SceneConfig;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading terminal settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Settings validation failed: {message}")]
    ValidationError { message: String },
}

/// Load a TOML `SceneConfig`. Missing keys fall back to defaults.
///
/// ```toml
/// start_screen = "home"
///
/// [snap]
/// duration_ms = 500
/// settle_delay_ms = 25
/// ```
pub fn load(path: &Path) -> Result<SceneConfig, SettingsError> {
    let content = fs::read_to_string(path).map_err(|e| SettingsError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config = parse(&content).map_err(|e| SettingsError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate(&config)?;
    Ok(config)
}

fn parse(content: &str) -> Result<SceneConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Checks:
/// - snap duration is positive and settle delay is not negative
/// - breathing smoothing is in (0, 1]
pub fn validate(config: &SceneConfig) -> Result<(), SettingsError> {
    if !(config.snap.duration_ms > 0.0) {
        return Err(SettingsError::ValidationError {
            message: format!("snap.duration_ms must be positive, got {}", config.snap.duration_ms),
        });
    }
    if !(config.snap.settle_delay_ms >= 0.0) {
        return Err(SettingsError::ValidationError {
            message: format!(
                "snap.settle_delay_ms must not be negative, got {}",
                config.snap.settle_delay_ms
            ),
        });
    }

    let smoothing = config.breathing.smoothing;
    if !(smoothing > 0.0 && smoothing <= 1.0) {
        return Err(SettingsError::ValidationError {
            message: format!("breathing.smoothing must be in (0, 1], got {}", smoothing),
        });
    }

    Ok(())
}
