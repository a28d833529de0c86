//! Minimal raster primitives on top of an [`image::RgbImage`].

use image::{Rgb, RgbImage};

pub struct Canvas {
    img: RgbImage,
}

impl Canvas {
    #[must_use]
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self { img: RgbImage::from_pixel(width, height, background) }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.img.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.img.height()
    }

    /// Mixes `color` into the pixel at `(x, y)` with opacity `alpha`.
    /// Coordinates outside the image are ignored.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn blend(&mut self, x: i64, y: i64, color: Rgb<u8>, alpha: f32) {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return;
        };
        if x >= self.width() || y >= self.height() {
            return;
        }
        let alpha = alpha.clamp(0.0, 1.0);
        let px = self.img.get_pixel_mut(x, y);
        for (dst, src) in px.0.iter_mut().zip(color.0) {
            *dst = (f32::from(*dst) * (1.0 - alpha) + f32::from(src) * alpha).round() as u8;
        }
    }

    fn dot(&mut self, x: i64, y: i64, color: Rgb<u8>, thickness: u32, alpha: f32) {
        let t = i64::from(thickness.max(1));
        let lo = -(t - 1) / 2;
        for dy in lo..lo + t {
            for dx in lo..lo + t {
                self.blend(x + dx, y + dy, color, alpha);
            }
        }
    }

    /// Bresenham line between two points given in pixel coordinates.
    #[allow(clippy::cast_possible_truncation)]
    pub fn line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        color: Rgb<u8>,
        thickness: u32,
        alpha: f32,
    ) {
        let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
        let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.dot(x0, y0, color, thickness, alpha);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Horizontal dashed line at row `y` from `x0` to `x1`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn dashed_hline(
        &mut self,
        y: f32,
        x0: f32,
        x1: f32,
        dash: u32,
        color: Rgb<u8>,
        thickness: u32,
    ) {
        let y = y.round() as i64;
        let (start, end) = (x0.round() as i64, x1.round() as i64);
        let period = i64::from(dash.max(1)) * 2;
        for x in start..=end {
            if (x - start) % period < period / 2 {
                self.dot(x, y, color, thickness, 1.0);
            }
        }
    }

    #[must_use]
    pub fn into_image(self) -> RgbImage {
        self.img
    }
}
