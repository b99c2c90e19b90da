//! Gaze pointer configuration (TOML).

use crate::activation::GazeEvent;
use crate::buttons::ControlButtons;
use gazecast_camera::Camera;
use gazecast_raycast::RaycasterConfig;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error;
use tracing::warn;

/// Errors raised while loading or validating a pointer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Wrap IO failures when reading the file.
    #[error("failed to read pointer config: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap TOML parsing issues.
    #[error("failed to parse pointer config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A field holds a value the pointer cannot run with.
    #[error("invalid pointer config: {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Activation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GazeConfig {
    /// Event produced by a completed gaze.
    pub input_event: GazeEvent,
    /// Buttons that trigger an activation immediately.
    pub control_buttons: ControlButtons,
    /// Seconds of steady gaze before the ring fills.
    pub time_to_gaze: f32,
    /// Interact even when gaze is switched off or the app lacks focus.
    pub always_enable: bool,
}

impl Default for GazeConfig {
    fn default() -> Self {
        Self {
            input_event: GazeEvent::Down,
            control_buttons: ControlButtons::TRIGGER_BUTTON,
            time_to_gaze: 1.5,
            always_enable: false,
        }
    }
}

/// Event camera optics and viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub depth: f32,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub target_display: i32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            near: 0.01,
            far: 1000.0,
            depth: 0.0,
            pixel_width: 1920,
            pixel_height: 1080,
            target_display: 0,
        }
    }
}

impl CameraConfig {
    /// Camera at the origin with these optics.
    pub fn to_camera(&self) -> Camera {
        Camera {
            fov: self.fov_degrees.to_radians(),
            near: self.near,
            far: self.far,
            depth: self.depth,
            pixel_width: self.pixel_width,
            pixel_height: self.pixel_height,
            target_display: self.target_display,
            ..Camera::default()
        }
    }
}

/// Complete gaze pointer configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GazePointerConfig {
    pub raycast: RaycasterConfig,
    pub gaze: GazeConfig,
    pub camera: CameraConfig,
}

impl GazePointerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate, returning errors to the caller.
    pub fn load_strict(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match Self::load_strict(path) {
            Ok(config) => config,
            Err(ConfigError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "Pointer config not found at {}. Using defaults",
                    path.display()
                );
                Self::default()
            }
            Err(err) => {
                warn!("{err} ({}). Using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Reject values the pointer cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cast = self.raycast.physics_cast_distance;
        if !(cast.is_finite() && cast > 0.0) {
            return Err(invalid(
                "raycast.physics_cast_distance",
                format!("must be positive and finite, got {cast}"),
            ));
        }
        let gaze = self.gaze.time_to_gaze;
        if !(gaze.is_finite() && gaze > 0.0) {
            return Err(invalid(
                "gaze.time_to_gaze",
                format!("must be positive and finite, got {gaze}"),
            ));
        }
        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(invalid(
                "camera.fov_degrees",
                format!("must be within (0, 180), got {}", camera.fov_degrees),
            ));
        }
        if !(camera.near > 0.0 && camera.far > camera.near && camera.far.is_finite()) {
            return Err(invalid(
                "camera.far",
                format!(
                    "clip planes must satisfy 0 < near < far, got near {} far {}",
                    camera.near, camera.far
                ),
            ));
        }
        if camera.pixel_width == 0 || camera.pixel_height == 0 {
            return Err(invalid(
                "camera.pixel_width",
                format!(
                    "viewport must be non-empty, got {}x{}",
                    camera.pixel_width, camera.pixel_height
                ),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
