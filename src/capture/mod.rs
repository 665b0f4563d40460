//! Video input and frame handling.
//!
//! This module provides abstractions for acquiring frames from a live
//! video source and for the configuration of the whole pipeline. The
//! source is treated as a stream of opaque RGBA bitmaps; everything
//! downstream works at whatever native resolution it delivers.

#[cfg(feature = "camera")]
mod camera;
mod config;
mod frame;
mod source;

#[cfg(feature = "camera")]
pub use camera::{list_cameras, CameraInfo, CameraSource};
pub use config::{
    CaptureConfig, ConfigError, DisplayConfig, EffectConfig, FileConfig, OutputConfig,
};
pub use frame::{Frame, BYTES_PER_PIXEL};
pub use source::{MockSource, SourceError, VideoSource};
