//! Prometheus metrics exporter for the trail pipeline.
//!
//! This module provides observability into the render loop by
//! exposing pipeline counters and gauges in Prometheus format via an
//! HTTP endpoint (enabled with the `metrics` feature).
//!
//! # Metrics Exposed
//!
//! ## Loop Counters
//! - `afterimage_ticks_total` - Render loop ticks, idle ones included
//! - `afterimage_frames_captured_total` - Frames captured into history
//! - `afterimage_composites_total` - Output frames composited
//! - `afterimage_idle_ticks_total` - Ticks skipped while the source was not live
//! - `afterimage_capture_failures_total` - Frame reads that failed mid-stream
//!
//! ## Effect Gauges
//! - `afterimage_effective_window_frames` - Frames the trail window spans
//! - `afterimage_sample_count` - History layers blended per output frame
//! - `afterimage_history_fill_frames` - Frames currently retained
//! - `afterimage_history_capacity_frames` - History capacity
//!
//! ## Surface Gauges
//! - `afterimage_surface_width_pixels` - Backing width
//! - `afterimage_surface_height_pixels` - Backing height
//! - `afterimage_last_composite_seconds` - Wall time of the latest composite
//!
//! # Example
//!
//! ```no_run
//! use afterimage::metrics::{MetricsRegistry, MetricsSnapshot};
//!
//! let registry = MetricsRegistry::new().expect("failed to create registry");
//!
//! let snapshot = MetricsSnapshot {
//!     ticks: 120,
//!     frames_captured: 118,
//!     composites: 118,
//!     idle_ticks: 2,
//!     capture_failures: 0,
//!     effective_window: 60,
//!     sample_count: 5,
//!     history_fill: 118,
//!     history_capacity: 180,
//!     surface_width: 1080,
//!     surface_height: 1920,
//!     last_composite_seconds: Some(0.004),
//! };
//!
//! registry.update(&snapshot);
//! ```

mod collector;
#[cfg(feature = "metrics")]
mod server;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
#[cfg(feature = "metrics")]
pub use server::{MetricsServer, MetricsServerConfig, ServerError};
