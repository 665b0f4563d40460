//! Render loop orchestration.
//!
//! Wires the video source, frame history, parameter resolution, and
//! compositor into the per-tick sequence: resolve parameters, capture
//! the live frame into history, composite. One thread owns every
//! piece of pipeline state and ticks are strictly ordered, so a
//! composite always sees the capture that preceded it.

mod controls;

pub use controls::ControlPanel;

use crate::capture::{ConfigError, FileConfig, Frame, SourceError, VideoSource};
use crate::compose::{composite, EffectParams, ParamController};
use crate::history::{FrameStore, HistoryError};
use crate::surface::Surface;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors that stop the pipeline.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("video source error: {0}")]
    Source(#[from] SourceError),
    #[error("frame history error: {0}")]
    History(#[from] HistoryError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// What a single tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame was captured and composited.
    Rendered,
    /// The source is paused or ended; nothing was drawn.
    SourceIdle,
    /// The frame read failed; the previous output stands.
    CaptureFailed,
}

/// Counters accumulated over a session.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Ticks processed, including idle ones.
    pub ticks: u64,
    /// Frames captured into history.
    pub frames_captured: u64,
    /// Output frames composited.
    pub composites: u64,
    /// Ticks skipped because the source was not live.
    pub idle_ticks: u64,
    /// Frame reads that failed mid-stream.
    pub capture_failures: u64,
    /// Wall time of the most recent composite.
    pub last_composite: Option<Duration>,
}

/// The assembled trail pipeline, generic over its video source.
///
/// Owns the source, the frame history, the output surface, and the
/// control state. [`TrailRuntime::tick`] advances the pipeline one
/// frame; [`TrailRuntime::run`] drives ticks at the configured rate
/// until stopped.
pub struct TrailRuntime<S> {
    source: S,
    store: FrameStore,
    surface: Surface,
    controller: ParamController,
    params: EffectParams,
    controls: ControlPanel,
    live: Frame,
    stats: RunStats,
    tick_interval: Duration,
}

impl<S: VideoSource> TrailRuntime<S> {
    /// Opens the source and builds the pipeline around its native
    /// resolution.
    ///
    /// The frame store and the live-frame buffer are allocated here,
    /// once; nothing on the per-tick path allocates after this
    /// returns. Failure to open the source is fatal, there is no
    /// degraded mode without video input.
    pub fn start(mut source: S, config: &FileConfig) -> Result<Self, RuntimeError> {
        config.validate()?;
        source.open(&config.capture)?;
        let (width, height) = source.resolution().ok_or(SourceError::NotOpen)?;

        let mut store = FrameStore::new();
        store.initialize(width, height);
        let surface = Surface::new(
            config.display.width,
            config.display.height,
            config.display.scale_factor,
        );
        let controller = ParamController::new(config.capture.fps, store.capacity());
        let mut controls = ControlPanel::new(config.effect.history_secs, config.effect.sample_count);
        let mut params = EffectParams::default();
        let status = controller.update(&mut params, controls.duration_secs(), controls.sample_count());
        controls.set_status(status);

        let live = Frame::new(width, height);
        let tick_interval = Duration::from_secs_f64(1.0 / config.capture.fps as f64);

        tracing::info!(width, height, fps = config.capture.fps, "stream started");

        Ok(Self {
            source,
            store,
            surface,
            controller,
            params,
            controls,
            live,
            stats: RunStats::default(),
            tick_interval,
        })
    }

    /// Advances the pipeline one frame.
    ///
    /// A paused or ended source makes the tick a no-op that reports
    /// [`TickOutcome::SourceIdle`]; a failed frame read is logged and
    /// skipped. Both leave the previous output on the surface. History
    /// errors indicate a bug in the pipeline itself and propagate.
    pub fn tick(&mut self) -> Result<TickOutcome, RuntimeError> {
        self.stats.ticks += 1;

        if !self.source.is_live() {
            self.stats.idle_ticks += 1;
            tracing::trace!("source not live, tick skipped");
            return Ok(TickOutcome::SourceIdle);
        }

        let status = self.controller.update(
            &mut self.params,
            self.controls.duration_secs(),
            self.controls.sample_count(),
        );
        self.controls.set_status(status);

        if let Err(e) = self.source.read_into(&mut self.live) {
            self.stats.capture_failures += 1;
            tracing::warn!(error = %e, "frame read failed, tick skipped");
            return Ok(TickOutcome::CaptureFailed);
        }
        self.store.capture(&self.live)?;
        self.stats.frames_captured += 1;

        let started = Instant::now();
        composite(&self.store, &self.params, &self.live, &mut self.surface)?;
        self.stats.last_composite = Some(started.elapsed());
        self.stats.composites += 1;

        Ok(TickOutcome::Rendered)
    }

    /// Runs the render loop until `running` clears or the composite
    /// budget is spent.
    pub fn run(
        &mut self,
        running: &AtomicBool,
        frame_budget: Option<u64>,
    ) -> Result<RunStats, RuntimeError> {
        self.run_with(running, frame_budget, |_| {})
    }

    /// Runs the render loop, invoking `after_tick` with the runtime
    /// after every tick (for metrics publication or presentation).
    ///
    /// Ticks are paced to the configured capture rate. When a tick
    /// overruns its slot the schedule rebases instead of bursting to
    /// catch up. Idle ticks keep the loop alive, matching a paused
    /// source that may resume at any time.
    pub fn run_with<F>(
        &mut self,
        running: &AtomicBool,
        frame_budget: Option<u64>,
        mut after_tick: F,
    ) -> Result<RunStats, RuntimeError>
    where
        F: FnMut(&Self),
    {
        tracing::info!(
            interval_us = self.tick_interval.as_micros() as u64,
            frame_budget = ?frame_budget,
            "render loop started"
        );

        let mut next_tick = Instant::now();
        while running.load(Ordering::Relaxed) {
            if let Some(budget) = frame_budget {
                if self.stats.composites >= budget {
                    break;
                }
            }

            self.tick()?;
            after_tick(&*self);

            next_tick += self.tick_interval;
            let now = Instant::now();
            if next_tick > now {
                std::thread::sleep(next_tick - now);
            } else {
                next_tick = now;
            }
        }

        tracing::info!(
            ticks = self.stats.ticks,
            composites = self.stats.composites,
            idle_ticks = self.stats.idle_ticks,
            "render loop stopped"
        );
        Ok(self.stats.clone())
    }

    /// Applies a display resize or scale-factor change.
    ///
    /// Only the surface is touched; history keeps its native-resolution
    /// frames and the next composite re-fits them to the new size.
    pub fn handle_resize(&mut self, logical_width: u32, logical_height: u32, scale_factor: f32) {
        self.surface.resize(logical_width, logical_height, scale_factor);
    }

    /// Closes the source and returns the final session counters.
    pub fn shutdown(mut self) -> RunStats {
        self.source.close();
        tracing::info!(
            frames_captured = self.stats.frames_captured,
            composites = self.stats.composites,
            "stream closed"
        );
        self.stats
    }

    /// Returns the output surface.
    #[inline]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Returns the frame history.
    #[inline]
    pub fn store(&self) -> &FrameStore {
        &self.store
    }

    /// Returns the parameters currently in effect.
    #[inline]
    pub fn params(&self) -> &EffectParams {
        &self.params
    }

    /// Returns the session counters.
    #[inline]
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Returns the control panel state.
    #[inline]
    pub fn controls(&self) -> &ControlPanel {
        &self.controls
    }

    /// Returns the control panel for mutation, as the UI layer does
    /// when the user moves a slider.
    #[inline]
    pub fn controls_mut(&mut self) -> &mut ControlPanel {
        &mut self.controls
    }

    /// Returns the video source for mutation.
    #[inline]
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{CaptureConfig, MockSource};

    fn test_config() -> FileConfig {
        let mut config = FileConfig::default();
        config.capture = CaptureConfig::with_dimensions(16, 12);
        config.display.width = 8;
        config.display.height = 6;
        config
    }

    /// Source that is live but never delivers a frame.
    struct FailingSource;

    impl VideoSource for FailingSource {
        fn open(&mut self, _config: &CaptureConfig) -> Result<(), SourceError> {
            Ok(())
        }

        fn resolution(&self) -> Option<(u32, u32)> {
            Some((16, 12))
        }

        fn read_into(&mut self, _frame: &mut Frame) -> Result<(), SourceError> {
            Err(SourceError::ReadFailed("injected failure".to_string()))
        }

        fn is_live(&self) -> bool {
            true
        }

        fn close(&mut self) {}
    }

    #[test]
    fn test_start_sizes_pipeline_from_source() {
        let runtime = TrailRuntime::start(MockSource::new(), &test_config()).unwrap();

        assert_eq!(runtime.store().resolution(), Some((16, 12)));
        assert_eq!(runtime.store().capacity(), crate::history::MAX_FRAMES);
        assert_eq!(runtime.surface().width(), 8);
        assert_eq!(runtime.surface().height(), 6);
        assert_eq!(runtime.params().effective_window, 60);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = test_config();
        config.effect.sample_count = 0;

        assert!(matches!(
            TrailRuntime::start(MockSource::new(), &config),
            Err(RuntimeError::Config(_))
        ));
    }

    #[test]
    fn test_tick_captures_and_renders() {
        let mut runtime = TrailRuntime::start(MockSource::new(), &test_config()).unwrap();

        let outcome = runtime.tick().unwrap();

        assert_eq!(outcome, TickOutcome::Rendered);
        assert_eq!(runtime.stats().ticks, 1);
        assert_eq!(runtime.stats().frames_captured, 1);
        assert_eq!(runtime.stats().composites, 1);
        assert_eq!(runtime.store().filled(), 1);
        assert!(runtime.stats().last_composite.is_some());
    }

    #[test]
    fn test_paused_source_yields_idle_ticks() {
        let mut runtime = TrailRuntime::start(MockSource::new(), &test_config()).unwrap();
        runtime.source_mut().set_live(false);

        let outcome = runtime.tick().unwrap();

        assert_eq!(outcome, TickOutcome::SourceIdle);
        assert_eq!(runtime.stats().ticks, 1);
        assert_eq!(runtime.stats().idle_ticks, 1);
        assert_eq!(runtime.stats().composites, 0);
    }

    #[test]
    fn test_tick_recovers_after_pause() {
        let mut runtime = TrailRuntime::start(MockSource::new(), &test_config()).unwrap();

        runtime.tick().unwrap();
        runtime.source_mut().set_live(false);
        assert_eq!(runtime.tick().unwrap(), TickOutcome::SourceIdle);

        runtime.source_mut().set_live(true);
        assert_eq!(runtime.tick().unwrap(), TickOutcome::Rendered);
        assert_eq!(runtime.stats().composites, 2);
    }

    #[test]
    fn test_failed_read_skips_tick_without_stopping() {
        let mut runtime = TrailRuntime::start(FailingSource, &test_config()).unwrap();

        let outcome = runtime.tick().unwrap();

        assert_eq!(outcome, TickOutcome::CaptureFailed);
        assert_eq!(runtime.stats().capture_failures, 1);
        assert_eq!(runtime.stats().composites, 0);
        assert_eq!(runtime.store().filled(), 0);
    }

    #[test]
    fn test_run_honors_frame_budget() {
        let mut runtime = TrailRuntime::start(MockSource::new(), &test_config()).unwrap();
        let running = AtomicBool::new(true);

        let stats = runtime.run(&running, Some(3)).unwrap();

        assert_eq!(stats.composites, 3);
        assert_eq!(stats.ticks, 3);
    }

    #[test]
    fn test_run_exits_when_flag_cleared() {
        let mut runtime = TrailRuntime::start(MockSource::new(), &test_config()).unwrap();
        let running = AtomicBool::new(false);

        let stats = runtime.run(&running, None).unwrap();

        assert_eq!(stats.ticks, 0);
    }

    #[test]
    fn test_run_with_observes_every_tick() {
        let mut runtime = TrailRuntime::start(MockSource::new(), &test_config()).unwrap();
        let running = AtomicBool::new(true);
        let mut observed = 0u64;

        runtime
            .run_with(&running, Some(4), |rt| {
                observed += 1;
                assert_eq!(rt.stats().ticks, observed);
            })
            .unwrap();

        assert_eq!(observed, 4);
    }

    #[test]
    fn test_duration_change_applies_next_tick() {
        let mut runtime = TrailRuntime::start(MockSource::new(), &test_config()).unwrap();
        runtime.tick().unwrap();

        runtime.controls_mut().set_duration(10.0);
        runtime.tick().unwrap();

        assert!(runtime.controls().status().is_capped());
        assert_eq!(runtime.controls().duration_label(), "max 3.0s");
        assert_eq!(runtime.params().effective_window, 180);
    }

    #[test]
    fn test_resize_changes_surface_only() {
        let mut runtime = TrailRuntime::start(MockSource::new(), &test_config()).unwrap();
        runtime.tick().unwrap();

        runtime.handle_resize(4, 4, 2.0);

        assert_eq!(runtime.surface().width(), 8);
        assert_eq!(runtime.surface().height(), 8);
        assert_eq!(runtime.store().resolution(), Some((16, 12)));
        assert_eq!(runtime.tick().unwrap(), TickOutcome::Rendered);
    }

    #[test]
    fn test_shutdown_returns_final_stats() {
        let mut runtime = TrailRuntime::start(MockSource::new(), &test_config()).unwrap();
        runtime.tick().unwrap();
        runtime.tick().unwrap();

        let stats = runtime.shutdown();

        assert_eq!(stats.composites, 2);
    }
}
