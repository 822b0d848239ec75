use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use gamecam::{validate_zoom, CameraError, Color, Vec2};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path} at {json_path}: {source}")]
    Parse {
        path: PathBuf,
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid camera_zoom in config: {0}")]
    InvalidZoom(#[from] CameraError),
    #[error("zoom_step must be finite and greater than 1, got {0}")]
    InvalidZoomStep(f32),
    #[error("pan_speed must be finite and non-negative, got {0}")]
    InvalidPanSpeed(f32),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ViewerConfig {
    pub(crate) window_title: String,
    pub(crate) window_width: u32,
    pub(crate) window_height: u32,
    pub(crate) camera_center: Vec2,
    pub(crate) camera_zoom: Vec2,
    /// Display pixels per second.
    pub(crate) pan_speed: f32,
    /// Zoom multiplier per wheel notch or key press.
    pub(crate) zoom_step: f32,
    /// Relative to the assets directory.
    pub(crate) picture: Option<PathBuf>,
    pub(crate) clear_color: Color,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_title: "gamecam viewer".to_string(),
            window_width: 1280,
            window_height: 720,
            camera_center: Vec2::ZERO,
            camera_zoom: Vec2::new(32.0, 32.0),
            pan_speed: 480.0,
            zoom_step: 1.25,
            picture: None,
            clear_color: Color::rgb(20, 22, 28),
        }
    }
}

impl ViewerConfig {
    fn validate(self) -> Result<Self, ConfigError> {
        validate_zoom(self.camera_zoom)?;
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return Err(ConfigError::InvalidZoomStep(self.zoom_step));
        }
        if !(self.pan_speed.is_finite() && self.pan_speed >= 0.0) {
            return Err(ConfigError::InvalidPanSpeed(self.pan_speed));
        }
        Ok(self)
    }
}

/// Reads the viewer config, falling back to defaults when the file is absent.
pub(crate) fn load_config(path: &Path) -> Result<ViewerConfig, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "config_missing_using_defaults");
            return Ok(ViewerConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let config = parse_config(&raw, path)?;
    info!(path = %path.display(), "config_loaded");
    Ok(config)
}

fn parse_config(raw: &str, path: &Path) -> Result<ViewerConfig, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let config: ViewerConfig = serde_path_to_error::deserialize(&mut deserializer).map_err(
        |error| {
            let json_path = error.path().to_string();
            ConfigError::Parse {
                path: path.to_path_buf(),
                json_path,
                source: error.into_inner(),
            }
        },
    )?;
    config.validate()
}
