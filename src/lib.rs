//! Afterimage
//!
//! A real-time temporal multi-exposure effect for live video: recent
//! frames are retained in a bounded history and layered under the live
//! frame at low opacity, so moving subjects smear into translucent
//! trails while static backgrounds stay solid.
//!
//! # Architecture
//!
//! The pipeline is an explicit per-tick data flow:
//!
//! ```text
//! capture → history ─┐
//!     │              ├→ compose → surface
//!     └─ live frame ─┘
//! ```
//!
//! driven by `runtime`, with `compose` parameters resolved from the
//! user controls on every tick.
//!
//! # Design Principles
//!
//! - **Bounded memory**: history is a pre-allocated ring; steady-state
//!   capture and compositing never allocate
//! - **Explicit state**: parameters, indices, and counters live in
//!   plain structs owned by the render loop
//! - **Single writer**: one thread owns the pipeline; capture and
//!   composite are strictly ordered within a tick
//! - **Platform at the edges**: cameras sit behind the `VideoSource`
//!   trait and the surface is a plain pixel buffer, so the core is
//!   testable without hardware or a window system
//!
//! # Example
//!
//! ```no_run
//! use afterimage::{
//!     capture::{CaptureConfig, Frame, MockSource, VideoSource},
//!     compose::{composite, EffectParams, ParamController},
//!     history::FrameStore,
//!     surface::Surface,
//! };
//!
//! // Open a source and size the pipeline from its resolution
//! let mut source = MockSource::new();
//! source.open(&CaptureConfig::default()).unwrap();
//! let (width, height) = source.resolution().unwrap();
//!
//! let mut store = FrameStore::new();
//! store.initialize(width, height);
//! let mut surface = Surface::new(1080, 1920, 1.0);
//! let mut live = Frame::new(width, height);
//!
//! // Resolve a one second trail with five layers
//! let controller = ParamController::new(60, store.capacity());
//! let mut params = EffectParams::default();
//! controller.update(&mut params, 1.0, 5);
//!
//! // Capture and composite a few frames
//! for _ in 0..10 {
//!     source.read_into(&mut live).unwrap();
//!     store.capture(&live).unwrap();
//!     composite(&store, &params, &live, &mut surface).unwrap();
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod capture;
pub mod compose;
pub mod history;
pub mod metrics;
pub mod runtime;
pub mod surface;

// Re-export commonly used types at crate root
pub use capture::{CaptureConfig, FileConfig, Frame, MockSource, VideoSource};
pub use compose::{composite, DurationStatus, EffectParams, ParamController};
pub use history::{FrameStore, MAX_FRAMES};
pub use runtime::{ControlPanel, RunStats, TickOutcome, TrailRuntime};
pub use surface::Surface;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
