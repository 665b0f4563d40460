//! Capture, effect, and display configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the video source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Camera device index or identifier.
    pub device_id: u32,
    /// Requested frame width in pixels. Devices may negotiate a
    /// different native resolution; the pipeline follows whatever the
    /// source actually delivers.
    pub width: u32,
    /// Requested frame height in pixels.
    pub height: u32,
    /// Capture and render rate in frames per second.
    pub fps: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            width: 1280,
            height: 720,
            fps: 60,
        }
    }
}

impl CaptureConfig {
    /// Creates a new configuration with the specified dimensions.
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.fps == 0 || self.fps > 240 {
            return Err(ConfigError::InvalidFrameRate);
        }
        Ok(())
    }
}

/// Configuration for the trail effect itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectConfig {
    /// Trail history duration in seconds. Values that exceed the frame
    /// pool are clamped at runtime and reported as capped.
    pub history_secs: f64,
    /// Number of history layers blended into each output frame.
    pub sample_count: u32,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            history_secs: 1.0,
            sample_count: 5,
        }
    }
}

impl EffectConfig {
    /// Validates the effect parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.history_secs.is_finite() || self.history_secs <= 0.0 {
            return Err(ConfigError::InvalidDuration);
        }
        if self.sample_count == 0 || self.sample_count > 64 {
            return Err(ConfigError::InvalidSampleCount);
        }
        Ok(())
    }
}

/// Configuration for the output surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Logical surface width in pixels.
    pub width: u32,
    /// Logical surface height in pixels.
    pub height: u32,
    /// Device pixel ratio applied to the backing buffer.
    pub scale_factor: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            scale_factor: 1.0,
        }
    }
}

impl DisplayConfig {
    /// Validates the display parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if !(0.5..=4.0).contains(&self.scale_factor) {
            return Err(ConfigError::InvalidScaleFactor);
        }
        Ok(())
    }
}

/// Output and session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Run continuously (true) or render a fixed number of frames (false).
    pub continuous: bool,
    /// Number of frames to render if not continuous.
    pub frame_count: u32,
    /// Metrics server port (0 to disable).
    pub metrics_port: u16,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            continuous: false,
            frame_count: 300,
            metrics_port: 9090,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid frame dimensions")]
    InvalidDimensions,
    #[error("invalid frame rate (must be 1-240 fps)")]
    InvalidFrameRate,
    #[error("invalid trail duration (must be a positive number of seconds)")]
    InvalidDuration,
    #[error("invalid sample count (must be 1-64)")]
    InvalidSampleCount,
    #[error("invalid scale factor (must be 0.5-4.0)")]
    InvalidScaleFactor,
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub effect: EffectConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: FileConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every configuration section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capture.validate()?;
        self.effect.validate()?;
        self.display.validate()?;
        Ok(())
    }
}
