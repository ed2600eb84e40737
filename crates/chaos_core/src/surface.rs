//! In-memory 1-bit framebuffer.
//!
//! Pixels are packed row-major, eight per byte, most significant bit first,
//! which is the layout e-paper controllers take over SPI. A set bit is
//! `BinaryColor::On` (ink). The buffer is an embedded-graphics `DrawTarget`,
//! so it is a [`PixelSurface`](crate::traits::PixelSurface) and also accepts
//! any embedded-graphics primitive or text.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Point, Size};
use std::convert::Infallible;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    stride: usize,
    bits: Vec<u8>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let stride = (width as usize).div_ceil(8);
        Self {
            width,
            height,
            stride,
            bits: vec![0; stride * height as usize],
        }
    }

    fn locate(&self, point: Point) -> Option<(usize, u8)> {
        let Point { x, y } = point;
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        Some((y * self.stride + x / 8, 0x80 >> (x % 8)))
    }

    /// Color at `point`, `None` off the grid.
    pub fn pixel(&self, point: Point) -> Option<BinaryColor> {
        self.locate(point)
            .map(|(byte, mask)| BinaryColor::from(self.bits[byte] & mask != 0))
    }

    /// True when `(x, y)` is inked.
    pub fn get_pixel(&self, x: i32, y: i32) -> bool {
        self.pixel(Point::new(x, y)) == Some(BinaryColor::On)
    }

    /// Number of inked pixels.
    pub fn count_set(&self) -> usize {
        (0..self.height as i32)
            .flat_map(|y| (0..self.width as i32).map(move |x| (x, y)))
            .filter(|&(x, y)| self.get_pixel(x, y))
            .count()
    }

    /// Packed rows, `ceil(width / 8)` bytes each.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Expands to RGBA, black ink on white paper.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let level = if self.get_pixel(x, y) { 0 } else { 255 };
                out.extend_from_slice(&[level, level, level, 255]);
            }
        }
        out
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            // Off-grid pixels are clipped.
            let Some((byte, mask)) = self.locate(point) else {
                continue;
            };
            match color {
                BinaryColor::On => self.bits[byte] |= mask,
                BinaryColor::Off => self.bits[byte] &= !mask,
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = match color {
            BinaryColor::On => 0xFF,
            BinaryColor::Off => 0x00,
        };
        self.bits.fill(fill);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Framebuffer;
    use crate::traits::PixelSurface;
    use embedded_graphics::pixelcolor::BinaryColor;
    use embedded_graphics::prelude::{Point, Primitive, Size};
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
    use embedded_graphics::Drawable;

    #[test]
    fn set_and_get_round_trip() {
        let mut fb = Framebuffer::new(13, 4);
        fb.set_pixel(0, 0, BinaryColor::On);
        fb.set_pixel(12, 3, BinaryColor::On);
        fb.set_pixel(9, 1, BinaryColor::On);
        assert!(fb.get_pixel(0, 0));
        assert!(fb.get_pixel(12, 3));
        assert!(fb.get_pixel(9, 1));
        assert!(!fb.get_pixel(8, 1));
        assert_eq!(fb.count_set(), 3);
        fb.set_pixel(9, 1, BinaryColor::Off);
        assert!(!fb.get_pixel(9, 1));
        assert_eq!(fb.pixel(Point::new(9, 1)), Some(BinaryColor::Off));
        assert_eq!(fb.pixel(Point::new(13, 0)), None);
    }

    #[test]
    fn reports_size_through_surface() {
        let fb = Framebuffer::new(200, 120);
        assert_eq!(PixelSurface::width(&fb), 200);
        assert_eq!(PixelSurface::height(&fb), 120);
    }

    #[test]
    fn packs_msb_first() {
        let mut fb = Framebuffer::new(16, 1);
        fb.set_pixel(0, 0, BinaryColor::On);
        fb.set_pixel(9, 0, BinaryColor::On);
        assert_eq!(fb.as_bytes(), &[0x80, 0x40]);
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut fb = Framebuffer::new(4, 4);
        fb.set_pixel(-1, 0, BinaryColor::On);
        fb.set_pixel(0, 4, BinaryColor::On);
        fb.set_pixel(4, 0, BinaryColor::On);
        assert_eq!(fb.count_set(), 0);
        assert!(!fb.get_pixel(-1, -1));
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut fb = Framebuffer::new(10, 3);
        PixelSurface::clear(&mut fb, BinaryColor::On);
        assert_eq!(fb.count_set(), 30);
        PixelSurface::clear(&mut fb, BinaryColor::Off);
        assert_eq!(fb.count_set(), 0);
    }

    #[test]
    fn accepts_embedded_graphics_primitives() {
        let mut fb = Framebuffer::new(8, 8);
        Rectangle::new(Point::new(6, 6), Size::new(4, 3))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut fb)
            .expect("infallible");
        // Clipped to the 2x2 corner.
        assert_eq!(fb.count_set(), 4);
        assert!(fb.get_pixel(7, 7));
    }

    #[test]
    fn rgba_uses_black_ink() {
        let mut fb = Framebuffer::new(2, 1);
        fb.set_pixel(1, 0, BinaryColor::On);
        assert_eq!(fb.to_rgba(), vec![255, 255, 255, 255, 0, 0, 0, 255]);
    }
}
