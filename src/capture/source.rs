//! Video source abstraction for frame acquisition.
//!
//! This module provides a trait-based abstraction over live video
//! input, allowing for both real camera devices and mock
//! implementations for testing.

use super::{CaptureConfig, Frame};
use thiserror::Error;

/// Errors that can occur during source operations.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("video device not found: {0}")]
    DeviceNotFound(String),
    #[error("failed to open video source: {0}")]
    OpenFailed(String),
    #[error("failed to configure video source: {0}")]
    ConfigFailed(String),
    #[error("failed to read frame: {0}")]
    ReadFailed(String),
    #[error("video source not open")]
    NotOpen,
}

/// Trait for live video sources.
///
/// This abstraction allows swapping between real camera hardware and
/// mock implementations for testing. Sources decode into a
/// caller-owned [`Frame`] so the steady-state capture path performs no
/// allocation.
pub trait VideoSource {
    /// Opens the source and starts the stream.
    ///
    /// The requested dimensions are advisory; devices may negotiate a
    /// different native resolution, reported by
    /// [`VideoSource::resolution`] once open.
    fn open(&mut self, config: &CaptureConfig) -> Result<(), SourceError>;

    /// Returns the native resolution of the open stream, or `None` if
    /// the source is not open.
    fn resolution(&self) -> Option<(u32, u32)>;

    /// Reads the next frame into `frame`, which must already be sized
    /// to the native resolution.
    fn read_into(&mut self, frame: &mut Frame) -> Result<(), SourceError>;

    /// Returns true while the source is open and delivering frames.
    ///
    /// A paused or ended stream reports false; the render loop keeps
    /// ticking but skips capture and compositing until this recovers.
    fn is_live(&self) -> bool;

    /// Closes the source and releases the device.
    fn close(&mut self);
}

/// Mock source for testing that generates a synthetic moving scene.
#[derive(Debug, Default)]
pub struct MockSource {
    config: Option<CaptureConfig>,
    sequence: u64,
    live: bool,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pauses or resumes the synthetic stream (for testing the render
    /// loop's idle path).
    pub fn set_live(&mut self, live: bool) {
        self.live = live;
        tracing::debug!(live, "mock source liveness changed");
    }
}

impl VideoSource for MockSource {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), SourceError> {
        config
            .validate()
            .map_err(|e| SourceError::ConfigFailed(e.to_string()))?;
        self.config = Some(config.clone());
        self.sequence = 0;
        self.live = true;
        tracing::info!(
            width = config.width,
            height = config.height,
            fps = config.fps,
            "mock source opened"
        );
        Ok(())
    }

    fn resolution(&self) -> Option<(u32, u32)> {
        self.config.as_ref().map(|c| (c.width, c.height))
    }

    fn read_into(&mut self, frame: &mut Frame) -> Result<(), SourceError> {
        let config = self.config.as_ref().ok_or(SourceError::NotOpen)?;
        if !self.live {
            return Err(SourceError::ReadFailed("source is paused".to_string()));
        }
        if frame.width() != config.width || frame.height() != config.height {
            return Err(SourceError::ReadFailed(format!(
                "frame buffer is {}x{}, source is {}x{}",
                frame.width(),
                frame.height(),
                config.width,
                config.height
            )));
        }

        self.sequence += 1;

        // Horizontally drifting gradient: motion is visible across
        // consecutive frames, and every frame is fully determined by
        // its sequence number.
        let width = config.width;
        let shift = self.sequence as u32;
        let pixels = frame.pixels_mut();
        for (i, px) in pixels.chunks_exact_mut(4).enumerate() {
            let x = i as u32 % width;
            let y = i as u32 / width;
            px[0] = ((x + shift) % 256) as u8;
            px[1] = (y % 256) as u8;
            px[2] = (shift % 256) as u8;
            px[3] = 255;
        }
        frame.set_sequence(self.sequence);
        Ok(())
    }

    fn is_live(&self) -> bool {
        self.config.is_some() && self.live
    }

    fn close(&mut self) {
        self.config = None;
        self.live = false;
        tracing::info!("mock source closed");
    }
}
