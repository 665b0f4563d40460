//! Frame type representing one captured RGBA bitmap.

/// Bytes per pixel for RGBA frame data.
pub const BYTES_PER_PIXEL: usize = 4;

/// A single bitmap snapshot of the video source.
///
/// Pixel data is tightly packed RGBA, row-major, at the source's native
/// resolution. Frames are designed to be reused: pool slots overwrite
/// their contents in place via [`Frame::copy_from`] rather than being
/// reallocated.
#[derive(Clone)]
pub struct Frame {
    /// Raw RGBA pixel data, `width * height * 4` bytes.
    pixels: Vec<u8>,
    /// Frame width in pixels.
    width: u32,
    /// Frame height in pixels.
    height: u32,
    /// Monotonic sequence number assigned by the source.
    sequence: u64,
}

impl Frame {
    /// Creates a zeroed frame with the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0u8; width as usize * height as usize * BYTES_PER_PIXEL],
            width,
            height,
            sequence: 0,
        }
    }

    /// Creates a frame from existing pixel data.
    pub fn from_pixels(pixels: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        Self {
            pixels,
            width,
            height,
            sequence,
        }
    }

    /// Returns a reference to the raw pixel data.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns a mutable reference to the raw pixel data.
    ///
    /// Video sources decode directly into this buffer so that capture
    /// does not allocate.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Returns the frame width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the frame height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the sequence number.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Sets the sequence number.
    #[inline]
    pub fn set_sequence(&mut self, sequence: u64) {
        self.sequence = sequence;
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Returns the expected byte length of the pixel buffer.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.pixel_count() * BYTES_PER_PIXEL
    }

    /// Validates that the pixel buffer size matches the dimensions.
    pub fn is_valid(&self) -> bool {
        self.pixels.len() == self.byte_len()
    }

    /// Returns true if the frame has the same dimensions as `other`.
    #[inline]
    pub fn same_dimensions(&self, other: &Frame) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Overwrites this frame's contents with `source`'s pixels and
    /// sequence number.
    ///
    /// Both frames must have identical dimensions; callers check this
    /// before handing frames to slots.
    pub fn copy_from(&mut self, source: &Frame) {
        debug_assert!(self.same_dimensions(source));
        self.pixels.copy_from_slice(&source.pixels);
        self.sequence = source.sequence;
    }

    /// Fills every pixel with the given RGBA value.
    pub fn fill(&mut self, rgba: [u8; 4]) {
        for px in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Returns the RGBA value of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn pixel_at(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("sequence", &self.sequence)
            .field("pixel_bytes", &self.pixels.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let frame = Frame::new(640, 480);

        assert_eq!(frame.width(), 640);
        assert_eq!(frame.height(), 480);
        assert_eq!(frame.sequence(), 0);
        assert_eq!(frame.pixels().len(), 640 * 480 * 4);
        assert!(frame.is_valid());
    }

    #[test]
    fn test_frame_invalid_size() {
        let frame = Frame::from_pixels(vec![0u8; 100], 640, 480, 1);

        assert!(!frame.is_valid());
    }

    #[test]
    fn test_fill_and_pixel_at() {
        let mut frame = Frame::new(8, 8);
        frame.fill([10, 20, 30, 255]);

        assert_eq!(frame.pixel_at(0, 0), [10, 20, 30, 255]);
        assert_eq!(frame.pixel_at(7, 7), [10, 20, 30, 255]);
    }

    #[test]
    fn test_copy_from_overwrites_in_place() {
        let mut dst = Frame::new(4, 4);
        let mut src = Frame::new(4, 4);
        src.fill([1, 2, 3, 255]);
        src.set_sequence(9);

        dst.copy_from(&src);

        assert_eq!(dst.pixel_at(2, 2), [1, 2, 3, 255]);
        assert_eq!(dst.sequence(), 9);
    }

    #[test]
    fn test_copy_is_independent_of_source() {
        let mut dst = Frame::new(4, 4);
        let mut src = Frame::new(4, 4);
        src.fill([50, 50, 50, 255]);

        dst.copy_from(&src);
        src.fill([99, 99, 99, 255]);

        assert_eq!(dst.pixel_at(0, 0), [50, 50, 50, 255]);
    }
}
