//! Metrics collection and registry.

use prometheus::{Encoder, Gauge, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

use crate::compose::EffectParams;
use crate::history::FrameStore;
use crate::runtime::RunStats;
use crate::surface::Surface;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of pipeline state for a metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Render loop ticks processed, idle ones included.
    pub ticks: u64,
    /// Frames captured into history.
    pub frames_captured: u64,
    /// Output frames composited.
    pub composites: u64,
    /// Ticks skipped because the source was not live.
    pub idle_ticks: u64,
    /// Frame reads that failed mid-stream.
    pub capture_failures: u64,
    /// Frames the trail window currently spans.
    pub effective_window: usize,
    /// History layers blended per output frame.
    pub sample_count: usize,
    /// Frames currently retained in history.
    pub history_fill: usize,
    /// History capacity in frames.
    pub history_capacity: usize,
    /// Output surface backing width in pixels.
    pub surface_width: u32,
    /// Output surface backing height in pixels.
    pub surface_height: u32,
    /// Wall time of the most recent composite, in seconds.
    pub last_composite_seconds: Option<f64>,
}

impl MetricsSnapshot {
    /// Builds a snapshot from the live pipeline pieces.
    pub fn from_state(
        stats: &RunStats,
        params: &EffectParams,
        store: &FrameStore,
        surface: &Surface,
    ) -> Self {
        Self {
            ticks: stats.ticks,
            frames_captured: stats.frames_captured,
            composites: stats.composites,
            idle_ticks: stats.idle_ticks,
            capture_failures: stats.capture_failures,
            effective_window: params.effective_window,
            sample_count: params.sample_count,
            history_fill: store.filled(),
            history_capacity: store.capacity(),
            surface_width: surface.width(),
            surface_height: surface.height(),
            last_composite_seconds: stats.last_composite.map(|d| d.as_secs_f64()),
        }
    }
}

/// Prometheus metrics registry for the trail pipeline.
pub struct MetricsRegistry {
    registry: Registry,

    // Loop counters
    ticks_total: IntCounter,
    frames_captured_total: IntCounter,
    composites_total: IntCounter,
    idle_ticks_total: IntCounter,
    capture_failures_total: IntCounter,

    // Effect gauges
    effective_window: IntGauge,
    sample_count: IntGauge,
    history_fill: IntGauge,
    history_capacity: IntGauge,

    // Surface gauges
    surface_width: IntGauge,
    surface_height: IntGauge,
    last_composite_seconds: Gauge,
}

impl MetricsRegistry {
    /// Creates a new registry with every pipeline metric registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        // Loop counters
        let ticks_total = IntCounter::new(
            "afterimage_ticks_total",
            "Render loop ticks processed, idle ones included",
        )?;
        let frames_captured_total = IntCounter::new(
            "afterimage_frames_captured_total",
            "Frames captured into history",
        )?;
        let composites_total = IntCounter::new(
            "afterimage_composites_total",
            "Output frames composited",
        )?;
        let idle_ticks_total = IntCounter::new(
            "afterimage_idle_ticks_total",
            "Ticks skipped because the source was not live",
        )?;
        let capture_failures_total = IntCounter::new(
            "afterimage_capture_failures_total",
            "Frame reads that failed mid-stream",
        )?;

        // Effect gauges
        let effective_window = IntGauge::new(
            "afterimage_effective_window_frames",
            "Frames the trail window currently spans",
        )?;
        let sample_count = IntGauge::new(
            "afterimage_sample_count",
            "History layers blended per output frame",
        )?;
        let history_fill = IntGauge::new(
            "afterimage_history_fill_frames",
            "Frames currently retained in history",
        )?;
        let history_capacity = IntGauge::new(
            "afterimage_history_capacity_frames",
            "History capacity in frames",
        )?;

        // Surface gauges
        let surface_width = IntGauge::new(
            "afterimage_surface_width_pixels",
            "Output surface backing width",
        )?;
        let surface_height = IntGauge::new(
            "afterimage_surface_height_pixels",
            "Output surface backing height",
        )?;
        let last_composite_seconds = Gauge::new(
            "afterimage_last_composite_seconds",
            "Wall time of the most recent composite",
        )?;

        registry.register(Box::new(ticks_total.clone()))?;
        registry.register(Box::new(frames_captured_total.clone()))?;
        registry.register(Box::new(composites_total.clone()))?;
        registry.register(Box::new(idle_ticks_total.clone()))?;
        registry.register(Box::new(capture_failures_total.clone()))?;
        registry.register(Box::new(effective_window.clone()))?;
        registry.register(Box::new(sample_count.clone()))?;
        registry.register(Box::new(history_fill.clone()))?;
        registry.register(Box::new(history_capacity.clone()))?;
        registry.register(Box::new(surface_width.clone()))?;
        registry.register(Box::new(surface_height.clone()))?;
        registry.register(Box::new(last_composite_seconds.clone()))?;

        Ok(Self {
            registry,
            ticks_total,
            frames_captured_total,
            composites_total,
            idle_ticks_total,
            capture_failures_total,
            effective_window,
            sample_count,
            history_fill,
            history_capacity,
            surface_width,
            surface_height,
            last_composite_seconds,
        })
    }

    /// Updates all metrics from a snapshot of pipeline state.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        // Counters only move forward; increment by the delta since the
        // previous snapshot.
        let current = self.ticks_total.get();
        if snapshot.ticks > current {
            self.ticks_total.inc_by(snapshot.ticks - current);
        }
        let current = self.frames_captured_total.get();
        if snapshot.frames_captured > current {
            self.frames_captured_total
                .inc_by(snapshot.frames_captured - current);
        }
        let current = self.composites_total.get();
        if snapshot.composites > current {
            self.composites_total.inc_by(snapshot.composites - current);
        }
        let current = self.idle_ticks_total.get();
        if snapshot.idle_ticks > current {
            self.idle_ticks_total.inc_by(snapshot.idle_ticks - current);
        }
        let current = self.capture_failures_total.get();
        if snapshot.capture_failures > current {
            self.capture_failures_total
                .inc_by(snapshot.capture_failures - current);
        }

        self.effective_window.set(snapshot.effective_window as i64);
        self.sample_count.set(snapshot.sample_count as i64);
        self.history_fill.set(snapshot.history_fill as i64);
        self.history_capacity.set(snapshot.history_capacity as i64);
        self.surface_width.set(snapshot.surface_width as i64);
        self.surface_height.set(snapshot.surface_height as i64);
        if let Some(seconds) = snapshot.last_composite_seconds {
            self.last_composite_seconds.set(seconds);
        }
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
