//! Cover-fit geometry and software blitting.
//!
//! Frames are drawn scaled to *cover* the surface: the image is
//! uniformly scaled until both surface dimensions are filled, centered,
//! and the overhang on the longer axis is cropped. Aspect ratio is
//! never distorted and the surface never shows letterbox bars.

use crate::capture::{Frame, BYTES_PER_PIXEL};
use crate::surface::Surface;

/// Placement of a frame scaled to cover a target, in target pixels.
///
/// `width` and `height` are the scaled image size; `x` and `y` are the
/// top-left corner and are zero or negative, since a covering image
/// overhangs the target on at most one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverPlacement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Computes the cover-fit placement of an `image_w` x `image_h` frame
/// on a `target_w` x `target_h` surface.
///
/// The scale is the larger of the horizontal and vertical ratios, and
/// the scaled image is centered on both axes.
pub fn cover_placement(target_w: u32, target_h: u32, image_w: u32, image_h: u32) -> CoverPlacement {
    let h_ratio = target_w as f32 / image_w as f32;
    let v_ratio = target_h as f32 / image_h as f32;
    let ratio = h_ratio.max(v_ratio);

    let width = image_w as f32 * ratio;
    let height = image_h as f32 * ratio;
    CoverPlacement {
        x: (target_w as f32 - width) / 2.0,
        y: (target_h as f32 - height) / 2.0,
        width,
        height,
    }
}

/// Draws `image` onto `target` with cover-fit scaling at the given
/// opacity (0.0 to 1.0).
///
/// Sampling is nearest-neighbor and blending is source-over against
/// the opaque surface. Out-of-range alpha is clamped; an alpha of zero
/// leaves the surface untouched.
pub fn draw_cover(target: &mut Surface, image: &Frame, alpha: f32) {
    if target.width() == 0 || target.height() == 0 || image.width() == 0 || image.height() == 0 {
        return;
    }
    let alpha = (alpha.clamp(0.0, 1.0) * 255.0).round() as u16;
    if alpha == 0 {
        return;
    }

    let placement = cover_placement(target.width(), target.height(), image.width(), image.height());
    // Source pixels per target pixel, the inverse of the cover scale.
    let inv_ratio = image.width() as f32 / placement.width;

    let iw = image.width() as usize;
    let ih = image.height() as usize;
    let tw = target.width() as usize;
    let th = target.height() as usize;
    let src = image.pixels();
    let dst = target.pixels_mut();

    for ty in 0..th {
        let sy = (((ty as f32 + 0.5) - placement.y) * inv_ratio) as usize;
        let sy = sy.min(ih - 1);
        let src_row = &src[sy * iw * BYTES_PER_PIXEL..][..iw * BYTES_PER_PIXEL];
        let dst_row = &mut dst[ty * tw * BYTES_PER_PIXEL..][..tw * BYTES_PER_PIXEL];

        for tx in 0..tw {
            let sx = (((tx as f32 + 0.5) - placement.x) * inv_ratio) as usize;
            let sx = sx.min(iw - 1);
            let s = &src_row[sx * BYTES_PER_PIXEL..sx * BYTES_PER_PIXEL + 4];
            let d = &mut dst_row[tx * BYTES_PER_PIXEL..tx * BYTES_PER_PIXEL + 4];
            d[0] = blend_channel(s[0], d[0], alpha);
            d[1] = blend_channel(s[1], d[1], alpha);
            d[2] = blend_channel(s[2], d[2], alpha);
            d[3] = blend_channel(s[3], d[3], alpha);
        }
    }
}

/// Blends one channel of `src` over `dst` at `alpha` (0-255), using a
/// fast `x/255` approximation that is exact at alpha 0 and 255.
#[inline]
fn blend_channel(src: u8, dst: u8, alpha: u16) -> u8 {
    let mixed = src as u16 * alpha + dst as u16 * (255 - alpha);
    ((mixed + 1 + (mixed >> 8)) >> 8) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(width: u32, height: u32, rgba: [u8; 4]) -> Frame {
        let mut frame = Frame::new(width, height);
        frame.fill(rgba);
        frame
    }

    #[test]
    fn test_placement_landscape_into_portrait() {
        let p = cover_placement(800, 1200, 1280, 720);

        // Vertical ratio (1200 / 720) wins; the sides are cropped.
        assert!((p.width - 2133.333).abs() < 0.01);
        assert!((p.height - 1200.0).abs() < 0.01);
        assert!((p.x - -666.667).abs() < 0.01);
        assert!(p.y.abs() < 0.01);
    }

    #[test]
    fn test_placement_portrait_into_landscape() {
        let p = cover_placement(1200, 800, 720, 1280);

        assert!((p.width - 1200.0).abs() < 0.01);
        assert!((p.height - 2133.333).abs() < 0.01);
        assert!(p.x.abs() < 0.01);
        assert!((p.y - -666.667).abs() < 0.01);
    }

    #[test]
    fn test_placement_exact_fit() {
        let p = cover_placement(640, 480, 640, 480);

        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, 0.0);
        assert_eq!(p.width, 640.0);
        assert_eq!(p.height, 480.0);
    }

    #[test]
    fn test_placement_upscales_small_image() {
        let p = cover_placement(100, 100, 50, 25);

        assert_eq!(p.width, 200.0);
        assert_eq!(p.height, 100.0);
        assert_eq!(p.x, -50.0);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn test_placement_covers_target() {
        let p = cover_placement(1080, 1920, 640, 480);

        assert!(p.width >= 1080.0);
        assert!(p.height >= 1920.0);
        assert!(p.x <= 0.0);
        assert!(p.y <= 0.0);
    }

    #[test]
    fn test_full_alpha_copies_source() {
        let mut surface = Surface::new(8, 8, 1.0);
        let image = solid_frame(8, 8, [200, 10, 60, 255]);

        draw_cover(&mut surface, &image, 1.0);

        assert_eq!(surface.pixel_at(0, 0), [200, 10, 60, 255]);
        assert_eq!(surface.pixel_at(7, 7), [200, 10, 60, 255]);
    }

    #[test]
    fn test_half_alpha_blends_toward_source() {
        let mut surface = Surface::new(4, 4, 1.0);
        let image = solid_frame(4, 4, [200, 10, 60, 255]);

        draw_cover(&mut surface, &image, 0.5);

        // Half of the source over the black surface.
        assert_eq!(surface.pixel_at(1, 1), [100, 5, 30, 255]);
    }

    #[test]
    fn test_zero_alpha_is_no_op() {
        let mut surface = Surface::new(4, 4, 1.0);
        draw_cover(&mut surface, &solid_frame(4, 4, [255, 255, 255, 255]), 1.0);

        draw_cover(&mut surface, &solid_frame(4, 4, [0, 128, 0, 255]), 0.0);

        assert_eq!(surface.pixel_at(0, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_crop_is_centered() {
        // Four columns, drawn onto a square surface: the outer two
        // columns are cropped away.
        let mut image = Frame::new(4, 2);
        {
            let px = image.pixels_mut();
            for y in 0..2usize {
                for x in 0..4usize {
                    let i = (y * 4 + x) * 4;
                    px[i] = 10 * (x as u8 + 1);
                    px[i + 3] = 255;
                }
            }
        }
        let mut surface = Surface::new(2, 2, 1.0);

        draw_cover(&mut surface, &image, 1.0);

        assert_eq!(surface.pixel_at(0, 0)[0], 20);
        assert_eq!(surface.pixel_at(1, 0)[0], 30);
    }

    #[test]
    fn test_blend_channel_endpoints_exact() {
        for dst in [0u8, 37, 128, 255] {
            assert_eq!(blend_channel(200, dst, 255), 200);
            assert_eq!(blend_channel(200, dst, 0), dst);
        }
    }

    #[test]
    fn test_blend_channel_midpoint() {
        assert_eq!(blend_channel(200, 0, 128), 100);
        assert_eq!(blend_channel(0, 200, 127), 100);
    }
}
