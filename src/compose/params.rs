//! Effect parameter resolution.
//!
//! Translates the user-facing controls (trail seconds, sample count)
//! into the frame counts the compositor consumes, clamping requests
//! that exceed what the frame pool can retain.

/// Resolved parameters consumed by the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectParams {
    /// Number of recent frames the trail may span.
    pub effective_window: usize,
    /// Number of history layers blended per output frame.
    pub sample_count: usize,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            effective_window: 60,
            sample_count: 5,
        }
    }
}

/// Outcome of a parameter update, for display next to the duration
/// control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DurationStatus {
    /// The requested duration fits in the pool.
    Applied {
        /// The requested duration in seconds.
        seconds: f64,
    },
    /// The request exceeded the pool and was clamped.
    Capped {
        /// The longest duration the pool can hold, in seconds.
        seconds: f64,
    },
}

impl DurationStatus {
    /// Returns the duration in effect, in seconds.
    pub fn seconds(&self) -> f64 {
        match self {
            Self::Applied { seconds } | Self::Capped { seconds } => *seconds,
        }
    }

    /// Returns true if the request was clamped.
    pub fn is_capped(&self) -> bool {
        matches!(self, Self::Capped { .. })
    }

    /// Returns the text shown next to the duration control.
    pub fn label(&self) -> String {
        match self {
            Self::Applied { seconds } => format!("{:.1}", seconds),
            Self::Capped { seconds } => format!("max {:.1}s", seconds),
        }
    }
}

/// Converts control values into [`EffectParams`].
///
/// The controller is idempotent: resolving the same inputs twice
/// leaves the parameters unchanged, so it can run every tick.
#[derive(Debug, Clone)]
pub struct ParamController {
    /// Captures per second used to convert seconds to frame counts.
    capture_rate_hz: u32,
    /// Upper bound on the window, the frame pool's capacity.
    max_window: usize,
}

impl ParamController {
    /// Creates a controller for the given capture rate and pool size.
    pub fn new(capture_rate_hz: u32, max_window: usize) -> Self {
        Self {
            capture_rate_hz: capture_rate_hz.max(1),
            max_window: max_window.max(1),
        }
    }

    /// Resolves control values into `params` and reports whether the
    /// duration had to be clamped.
    ///
    /// `duration_secs` is converted to a frame count by rounding
    /// `duration * rate` to the nearest whole frame; negative or
    /// non-finite durations resolve to an empty window. `sample_count`
    /// has a floor of one layer.
    pub fn update(
        &self,
        params: &mut EffectParams,
        duration_secs: f64,
        sample_count: u32,
    ) -> DurationStatus {
        let previous = *params;
        let duration_secs = duration_secs.max(0.0);
        let requested = (duration_secs * self.capture_rate_hz as f64).round() as usize;

        let status = if requested > self.max_window {
            params.effective_window = self.max_window;
            DurationStatus::Capped {
                seconds: self.max_window as f64 / self.capture_rate_hz as f64,
            }
        } else {
            params.effective_window = requested;
            DurationStatus::Applied {
                seconds: duration_secs,
            }
        };
        params.sample_count = sample_count.max(1) as usize;

        if *params != previous {
            tracing::debug!(
                effective_window = params.effective_window,
                sample_count = params.sample_count,
                capped = status.is_capped(),
                "effect parameters updated"
            );
        }
        status
    }
}
