//! Trail compositing.
//!
//! Each tick, a handful of history frames are sampled across the
//! trail window and layered under the live frame at a shared low
//! opacity, producing the multi-exposure look: static subjects render
//! solid, moving ones smear into translucent afterimages.

mod blit;
mod compositor;
mod params;

pub use blit::{cover_placement, draw_cover, CoverPlacement};
pub use compositor::{composite, sample_offsets};
pub use params::{DurationStatus, EffectParams, ParamController};
