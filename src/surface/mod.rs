//! Output surface.
//!
//! An opaque RGBA pixel buffer the compositor renders into. The
//! backing store is the logical size multiplied by the display's
//! scale factor, so output stays sharp on high-density screens while
//! layout math continues to use logical pixels.

use crate::capture::BYTES_PER_PIXEL;

/// Opaque RGBA render target.
///
/// The surface owns its backing buffer and reallocates only on
/// resize. Clearing resets every pixel to opaque black; layers are
/// then blended source-over, so output alpha stays 255 throughout.
pub struct Surface {
    /// Backing pixels, `width * height * 4` bytes.
    pixels: Vec<u8>,
    /// Backing width in physical pixels.
    width: u32,
    /// Backing height in physical pixels.
    height: u32,
    /// Logical width before scaling.
    logical_width: u32,
    /// Logical height before scaling.
    logical_height: u32,
    /// Physical pixels per logical pixel.
    scale_factor: f32,
}

impl Surface {
    /// Creates a surface for the given logical size and scale factor,
    /// cleared to opaque black.
    pub fn new(logical_width: u32, logical_height: u32, scale_factor: f32) -> Self {
        let mut surface = Self {
            pixels: Vec::new(),
            width: 0,
            height: 0,
            logical_width: 0,
            logical_height: 0,
            scale_factor: 1.0,
        };
        surface.resize(logical_width, logical_height, scale_factor);
        surface
    }

    /// Resizes the backing buffer for a new logical size or scale
    /// factor and clears it to opaque black.
    ///
    /// Non-finite or non-positive scale factors fall back to 1.0.
    pub fn resize(&mut self, logical_width: u32, logical_height: u32, scale_factor: f32) {
        let scale = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            1.0
        };
        let width = (logical_width as f32 * scale).round() as u32;
        let height = (logical_height as f32 * scale).round() as u32;

        self.pixels
            .resize(width as usize * height as usize * BYTES_PER_PIXEL, 0);
        self.width = width;
        self.height = height;
        self.logical_width = logical_width;
        self.logical_height = logical_height;
        self.scale_factor = scale;
        self.clear();

        tracing::info!(
            width,
            height,
            logical_width,
            logical_height,
            scale_factor = scale,
            "surface resized"
        );
    }

    /// Clears the surface to opaque black.
    pub fn clear(&mut self) {
        for px in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            px[3] = 255;
        }
    }

    /// Returns the backing width in physical pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the backing height in physical pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the logical width.
    #[inline]
    pub fn logical_width(&self) -> u32 {
        self.logical_width
    }

    /// Returns the logical height.
    #[inline]
    pub fn logical_height(&self) -> u32 {
        self.logical_height
    }

    /// Returns the scale factor in effect.
    #[inline]
    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    /// Returns the backing pixels, for presentation or inspection.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub(crate) fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Returns the RGBA value of the backing pixel at `(x, y)`.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backing_follows_scale_factor() {
        let surface = Surface::new(100, 200, 2.0);

        assert_eq!(surface.width(), 200);
        assert_eq!(surface.height(), 400);
        assert_eq!(surface.logical_width(), 100);
        assert_eq!(surface.logical_height(), 200);
        assert_eq!(surface.pixels().len(), 200 * 400 * 4);
    }

    #[test]
    fn test_fractional_scale_rounds() {
        let surface = Surface::new(100, 100, 1.5);

        assert_eq!(surface.width(), 150);
        assert_eq!(surface.height(), 150);
    }

    #[test]
    fn test_new_surface_is_opaque_black() {
        let surface = Surface::new(8, 8, 1.0);

        assert_eq!(surface.pixel_at(0, 0), [0, 0, 0, 255]);
        assert_eq!(surface.pixel_at(7, 7), [0, 0, 0, 255]);
    }

    #[test]
    fn test_resize_clears_contents() {
        let mut surface = Surface::new(4, 4, 1.0);
        surface.pixels_mut()[0] = 200;

        surface.resize(6, 6, 1.0);

        assert_eq!(surface.width(), 6);
        assert_eq!(surface.pixel_at(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_invalid_scale_falls_back() {
        let surface = Surface::new(10, 10, 0.0);

        assert_eq!(surface.scale_factor(), 1.0);
        assert_eq!(surface.width(), 10);
    }
}
