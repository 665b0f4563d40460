//! Camera capture backed by `nokhwa`.
//!
//! Requires the `camera` feature to be enabled.

use super::{CaptureConfig, Frame, SourceError, VideoSource};
use nokhwa::pixel_format::RgbAFormat;
use nokhwa::utils::{
    ApiBackend, CameraFormat, CameraIndex, RequestedFormat, RequestedFormatType, Resolution,
};

/// Information about an available camera device.
#[derive(Debug, Clone)]
pub struct CameraInfo {
    /// Human-readable camera name.
    pub name: String,
    /// Camera index (for opening).
    pub index: u32,
    /// Additional description (backend-specific).
    pub description: String,
}

/// Lists available cameras.
///
/// Returns an empty list if no cameras are detected (does not panic).
pub fn list_cameras() -> Vec<CameraInfo> {
    let cameras = match nokhwa::query(ApiBackend::Auto) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(error = %e, "camera query returned error, treating as empty");
            return Vec::new();
        }
    };

    let mut result = Vec::new();
    for cam in cameras {
        let index = match cam.index() {
            CameraIndex::Index(i) => *i,
            CameraIndex::String(_) => continue,
        };
        result.push(CameraInfo {
            name: cam.human_name().to_string(),
            index,
            description: cam.description().to_string(),
        });
    }

    tracing::debug!(count = result.len(), "enumerated cameras");
    result
}

/// Live camera device implementing [`VideoSource`].
///
/// Frames are decoded to RGBA straight into the caller's buffer. The
/// negotiated resolution may differ from the requested one; the rest
/// of the pipeline sizes itself from [`VideoSource::resolution`].
#[derive(Default)]
pub struct CameraSource {
    inner: Option<nokhwa::Camera>,
    resolution: Option<(u32, u32)>,
    sequence: u64,
}

impl CameraSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VideoSource for CameraSource {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), SourceError> {
        config
            .validate()
            .map_err(|e| SourceError::ConfigFailed(e.to_string()))?;

        let index = CameraIndex::Index(config.device_id);
        let requested_format =
            RequestedFormat::new::<RgbAFormat>(RequestedFormatType::Closest(CameraFormat::new(
                Resolution::new(config.width, config.height),
                nokhwa::utils::FrameFormat::MJPEG,
                config.fps,
            )));

        let mut camera = nokhwa::Camera::new(index, requested_format)
            .map_err(|e| SourceError::OpenFailed(e.to_string()))?;
        camera
            .open_stream()
            .map_err(|e| SourceError::OpenFailed(e.to_string()))?;

        let native = camera.resolution();
        tracing::info!(
            device_id = config.device_id,
            width = native.width(),
            height = native.height(),
            fps = camera.frame_rate(),
            "camera opened"
        );

        self.resolution = Some((native.width(), native.height()));
        self.sequence = 0;
        self.inner = Some(camera);
        Ok(())
    }

    fn resolution(&self) -> Option<(u32, u32)> {
        self.resolution
    }

    fn read_into(&mut self, frame: &mut Frame) -> Result<(), SourceError> {
        let camera = self.inner.as_mut().ok_or(SourceError::NotOpen)?;
        let (width, height) = self.resolution.ok_or(SourceError::NotOpen)?;
        if frame.width() != width || frame.height() != height {
            return Err(SourceError::ReadFailed(format!(
                "frame buffer is {}x{}, camera is {}x{}",
                frame.width(),
                frame.height(),
                width,
                height
            )));
        }

        camera
            .write_frame_to_buffer::<RgbAFormat>(frame.pixels_mut())
            .map_err(|e| SourceError::ReadFailed(e.to_string()))?;
        self.sequence += 1;
        frame.set_sequence(self.sequence);
        Ok(())
    }

    fn is_live(&self) -> bool {
        self.inner
            .as_ref()
            .map(|c| c.is_stream_open())
            .unwrap_or(false)
    }

    fn close(&mut self) {
        if let Some(mut camera) = self.inner.take() {
            if let Err(e) = camera.stop_stream() {
                tracing::warn!(error = %e, "failed to stop camera stream");
            }
            tracing::info!("camera closed");
        }
        self.resolution = None;
    }
}
