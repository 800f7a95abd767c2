// src/renderer/canvas.rs

use crate::peaks::Peak;
use crate::settings::{Color, Pen};
use image::{Rgba, RgbaImage};

/// Pixel buffer split at the midline into a top and a bottom half.
///
/// Rows `0..midline` belong to the top half, rows `midline..height` to the
/// bottom half.
pub struct Canvas {
    image: RgbaImage,
    midline: u32,
}

impl Canvas {
    pub fn new(width: u32, top_height: u32, bottom_height: u32, background: Color) -> Self {
        let mut image = RgbaImage::new(width, top_height.saturating_add(bottom_height));
        // a fresh buffer is already fully transparent
        if background.alpha() != 0 {
            for px in image.pixels_mut() {
                *px = background.0;
            }
        }
        Self {
            image,
            midline: top_height,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Draws one column: `peak.max` scaled into the top half, `peak.min`
    /// scaled into the bottom half, both anchored at the midline.
    pub fn draw_peak(&mut self, x: u32, peak: Peak, top_pen: &Pen, bottom_pen: &Pen) {
        let top_height = self.midline;
        let bottom_height = self.image.height() - self.midline;
        self.draw_bar(x, bar_extent(top_height, peak.max), top_pen);
        self.draw_bar(x, bar_extent(bottom_height, peak.min), bottom_pen);
    }

    /// Vertical segment from the midline to `midline - extent`.
    /// Positive extents grow upward, negative ones downward; zero paints nothing.
    fn draw_bar(&mut self, x: u32, extent: i64, pen: &Pen) {
        if x >= self.image.width() || extent == 0 {
            return;
        }
        let mid = self.midline as i64;
        let height = self.image.height() as i64;
        let (from, to) = if extent > 0 {
            ((mid - extent).max(0), mid)
        } else {
            (mid, (mid - extent).min(height))
        };

        let top_height = self.midline.max(1) as f32;
        let bottom_height = (self.image.height() - self.midline).max(1) as f32;
        for y in from..to {
            let t = if y < mid {
                (mid - y) as f32 / top_height
            } else {
                (y - mid + 1) as f32 / bottom_height
            };
            let color = pen.color_at(t);
            let px = self.image.get_pixel_mut(x, y as u32);
            match color[3] {
                0 => {}
                255 => *px = color,
                _ => *px = blend_over(*px, color),
            }
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Source-over compositing of `src` onto `dst`, rounded back to 8 bits so an
/// opaque destination stays opaque.
pub fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = (src[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) / out_a;
        out[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba(out)
}

/// Bar length in pixels for `value` in a half of `half_height` rows.
pub fn bar_extent(half_height: u32, value: f32) -> i64 {
    (half_height as f32 * value).round() as i64
}
