//! Trail assembly: which history frames to draw, and at what opacity.

use super::blit::draw_cover;
use super::params::EffectParams;
use crate::capture::Frame;
use crate::history::{FrameStore, HistoryError};
use crate::surface::Surface;

/// Yields the window offsets of the history layers for one output
/// frame, oldest first.
///
/// Offsets index into the in-use window, where 0 is the oldest frame
/// and `total_in_use - 1` the newest. The first sample is pinned to
/// the oldest frame; each later sample `i` lands on `i * step` rounded
/// to the nearest whole frame, with `step` spreading the remaining
/// samples evenly across the window. Rounding may select the same
/// offset twice; such layers simply stack.
pub fn sample_offsets(total_in_use: usize, sample_count: usize) -> impl Iterator<Item = usize> {
    let last = total_in_use.saturating_sub(1);
    let step = if sample_count > 1 {
        last as f64 / (sample_count - 1) as f64
    } else {
        0.0
    };
    (0..sample_count).map(move |i| {
        if i == 0 {
            0
        } else {
            ((i as f64 * step).round() as usize).min(last)
        }
    })
}

/// Renders one output frame onto `surface`: sampled history layers
/// from oldest to newest, then the live frame, every layer at the
/// shared opacity `1 / (sample_count + 1)`.
///
/// At that opacity the history layers plus the live layer sum to full
/// coverage when they show the same scene, so a static subject looks
/// solid while anything moving leaves translucent copies behind.
///
/// With an empty store this is a no-op: the surface keeps its previous
/// contents rather than flashing black while the first frame arrives.
/// With exactly one retained frame only the live layer is drawn.
pub fn composite(
    store: &FrameStore,
    params: &EffectParams,
    live: &Frame,
    surface: &mut Surface,
) -> Result<(), HistoryError> {
    if store.filled() == 0 {
        return Ok(());
    }

    surface.clear();
    let alpha = 1.0 / (params.sample_count as f32 + 1.0);
    let total_in_use = store.filled().min(params.effective_window);

    if total_in_use > 1 {
        for offset in sample_offsets(total_in_use, params.sample_count) {
            let age = total_in_use - 1 - offset;
            draw_cover(surface, store.frame_at_age(age)?, alpha);
        }
    }
    draw_cover(surface, live, alpha);

    tracing::trace!(
        total_in_use,
        sample_count = params.sample_count,
        "composited output frame"
    );
    Ok(())
}
