//! Fixed-capacity ring of captured frames.

use crate::capture::Frame;
use thiserror::Error;

/// Hard ceiling on history slots, independent of the requested trail
/// duration. At 60 captures per second this holds 3 seconds of video.
pub const MAX_FRAMES: usize = 180;

/// Errors from frame history operations.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("frame store not initialized")]
    NotInitialized,
    #[error("age {age} out of range ({available} frames available)")]
    AgeOutOfRange { age: usize, available: usize },
    #[error("frame is {frame_width}x{frame_height}, store slots are {slot_width}x{slot_height}")]
    SizeMismatch {
        frame_width: u32,
        frame_height: u32,
        slot_width: u32,
        slot_height: u32,
    },
}

/// Bounded pool of recent frames, ordered by age.
///
/// All slots are allocated up front when a stream starts, sized to the
/// source's native resolution. Capturing into a full store overwrites
/// the oldest slot; the steady-state write path never allocates.
///
/// Frames are addressed by *age*: age 0 is the most recently captured
/// frame, age `filled - 1` the oldest still retained.
pub struct FrameStore {
    /// Pre-allocated frame slots.
    slots: Vec<Frame>,
    /// Maximum number of retained frames.
    capacity: usize,
    /// Slot that receives the next capture.
    write_index: usize,
    /// Number of slots holding real data, saturates at `capacity`.
    filled: usize,
}

impl FrameStore {
    /// Creates an empty store with the standard capacity.
    ///
    /// Slots are not allocated until [`FrameStore::initialize`] runs
    /// with the stream's native resolution.
    pub fn new() -> Self {
        Self::with_capacity(MAX_FRAMES)
    }

    /// Creates an empty store with a custom capacity (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            capacity: capacity.max(1),
            write_index: 0,
            filled: 0,
        }
    }

    /// Allocates every slot at the given resolution and resets the
    /// ring to empty.
    ///
    /// Called once per stream start. Calling it again (for a new
    /// stream at a different resolution) discards all history.
    pub fn initialize(&mut self, width: u32, height: u32) {
        self.slots = (0..self.capacity).map(|_| Frame::new(width, height)).collect();
        self.write_index = 0;
        self.filled = 0;
        tracing::info!(
            capacity = self.capacity,
            width,
            height,
            "frame store initialized"
        );
    }

    /// Returns true once slots have been allocated.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Returns the slot resolution, or `None` before initialization.
    pub fn resolution(&self) -> Option<(u32, u32)> {
        self.slots.first().map(|f| (f.width(), f.height()))
    }

    /// Returns the maximum number of retained frames.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of frames currently retained.
    #[inline]
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Copies `source` into the current write slot and advances the
    /// ring, overwriting the oldest frame once the store is full.
    pub fn capture(&mut self, source: &Frame) -> Result<(), HistoryError> {
        if !self.is_initialized() {
            return Err(HistoryError::NotInitialized);
        }
        let slot = &mut self.slots[self.write_index];
        if !slot.same_dimensions(source) {
            return Err(HistoryError::SizeMismatch {
                frame_width: source.width(),
                frame_height: source.height(),
                slot_width: slot.width(),
                slot_height: slot.height(),
            });
        }

        slot.copy_from(source);
        self.write_index = (self.write_index + 1) % self.capacity;
        if self.filled < self.capacity {
            self.filled += 1;
        }

        tracing::trace!(
            sequence = source.sequence(),
            filled = self.filled,
            "frame captured into store"
        );
        Ok(())
    }

    /// Returns the retained frame that is `age` captures old.
    ///
    /// Age 0 is the most recent capture. Requests at or beyond
    /// [`FrameStore::filled`] fail rather than exposing stale slot
    /// contents.
    pub fn frame_at_age(&self, age: usize) -> Result<&Frame, HistoryError> {
        if !self.is_initialized() {
            return Err(HistoryError::NotInitialized);
        }
        if age >= self.filled {
            return Err(HistoryError::AgeOutOfRange {
                age,
                available: self.filled,
            });
        }
        let slot = (self.write_index + self.capacity - 1 - age) % self.capacity;
        Ok(&self.slots[slot])
    }
}

impl Default for FrameStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_sequence(sequence: u64) -> Frame {
        let mut frame = Frame::new(4, 4);
        frame.set_sequence(sequence);
        frame.fill([(sequence % 256) as u8, 0, 0, 255]);
        frame
    }

    #[test]
    fn test_uninitialized_store_errors() {
        let mut store = FrameStore::with_capacity(8);
        assert!(!store.is_initialized());
        assert!(matches!(
            store.capture(&frame_with_sequence(1)),
            Err(HistoryError::NotInitialized)
        ));
        assert!(matches!(
            store.frame_at_age(0),
            Err(HistoryError::NotInitialized)
        ));
    }

    #[test]
    fn test_empty_store_has_no_frames() {
        let mut store = FrameStore::with_capacity(8);
        store.initialize(4, 4);

        assert_eq!(store.filled(), 0);
        assert!(matches!(
            store.frame_at_age(0),
            Err(HistoryError::AgeOutOfRange { .. })
        ));
    }

    #[test]
    fn test_age_zero_is_newest() {
        let mut store = FrameStore::with_capacity(8);
        store.initialize(4, 4);

        for sequence in 1..=5 {
            store.capture(&frame_with_sequence(sequence)).unwrap();
        }

        assert_eq!(store.filled(), 5);
        assert_eq!(store.frame_at_age(0).unwrap().sequence(), 5);
        assert_eq!(store.frame_at_age(4).unwrap().sequence(), 1);
    }

    #[test]
    fn test_ages_are_consecutive() {
        let mut store = FrameStore::with_capacity(8);
        store.initialize(4, 4);

        for sequence in 1..=6 {
            store.capture(&frame_with_sequence(sequence)).unwrap();
        }

        for age in 0..6 {
            let frame = store.frame_at_age(age).unwrap();
            assert_eq!(frame.sequence(), 6 - age as u64);
        }
    }

    #[test]
    fn test_wraparound_overwrites_oldest() {
        let mut store = FrameStore::with_capacity(4);
        store.initialize(4, 4);

        for sequence in 1..=6 {
            store.capture(&frame_with_sequence(sequence)).unwrap();
        }

        // Capacity 4: sequences 1 and 2 have been overwritten.
        assert_eq!(store.filled(), 4);
        assert_eq!(store.frame_at_age(0).unwrap().sequence(), 6);
        assert_eq!(store.frame_at_age(3).unwrap().sequence(), 3);
        assert!(matches!(
            store.frame_at_age(4),
            Err(HistoryError::AgeOutOfRange { age: 4, .. })
        ));
    }

    #[test]
    fn test_filled_saturates_at_capacity() {
        let mut store = FrameStore::with_capacity(3);
        store.initialize(4, 4);

        for sequence in 1..=10 {
            store.capture(&frame_with_sequence(sequence)).unwrap();
            assert!(store.filled() <= 3);
        }
        assert_eq!(store.filled(), 3);
    }

    #[test]
    fn test_capture_copies_pixels() {
        let mut store = FrameStore::with_capacity(2);
        store.initialize(4, 4);

        let mut source = frame_with_sequence(1);
        store.capture(&source).unwrap();
        source.fill([99, 99, 99, 255]);

        // The stored frame kept the contents from capture time.
        assert_eq!(store.frame_at_age(0).unwrap().pixel_at(0, 0), [1, 0, 0, 255]);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let mut store = FrameStore::with_capacity(2);
        store.initialize(8, 8);

        assert!(matches!(
            store.capture(&frame_with_sequence(1)),
            Err(HistoryError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_reinitialize_discards_history() {
        let mut store = FrameStore::with_capacity(4);
        store.initialize(4, 4);
        store.capture(&frame_with_sequence(1)).unwrap();

        store.initialize(2, 2);
        assert_eq!(store.filled(), 0);
        assert_eq!(store.resolution(), Some((2, 2)));
    }
}
