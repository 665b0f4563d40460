//! Bounded frame history.
//!
//! The trail effect needs quick access to frames captured up to a few
//! seconds ago. This module holds them in a fixed-size ring that is
//! allocated once per stream and then recycled, so memory use stays
//! flat no matter how long the session runs.

mod store;

pub use store::{FrameStore, HistoryError, MAX_FRAMES};
