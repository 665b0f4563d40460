//! User-facing control state.

use crate::compose::DurationStatus;

/// State of the on-screen controls: the trail duration and sample
/// count inputs, plus whether the panel itself is shown.
///
/// The panel holds *requested* values; the parameter controller turns
/// them into frame counts each tick and reports back the status shown
/// next to the duration control.
#[derive(Debug, Clone)]
pub struct ControlPanel {
    duration_secs: f64,
    sample_count: u32,
    visible: bool,
    status: DurationStatus,
}

impl ControlPanel {
    /// Creates a panel with the given initial control values.
    pub fn new(duration_secs: f64, sample_count: u32) -> Self {
        Self {
            duration_secs,
            sample_count,
            visible: true,
            status: DurationStatus::Applied {
                seconds: duration_secs,
            },
        }
    }

    /// Returns the requested trail duration in seconds.
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Returns the requested sample count.
    #[inline]
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Sets the requested trail duration in seconds.
    pub fn set_duration(&mut self, seconds: f64) {
        self.duration_secs = seconds;
    }

    /// Sets the requested sample count.
    pub fn set_sample_count(&mut self, count: u32) {
        self.sample_count = count;
    }

    /// Returns true while the panel is shown.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shows or hides the panel, returning the new state.
    pub fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        tracing::debug!(visible = self.visible, "controls panel toggled");
        self.visible
    }

    /// Records the most recent parameter resolution outcome.
    pub fn set_status(&mut self, status: DurationStatus) {
        self.status = status;
    }

    /// Returns the most recent parameter resolution outcome.
    #[inline]
    pub fn status(&self) -> DurationStatus {
        self.status
    }

    /// Returns the text shown next to the duration control.
    pub fn duration_label(&self) -> String {
        self.status.label()
    }
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new(1.0, 5)
    }
}
