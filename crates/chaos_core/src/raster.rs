//! Point and line rasterization onto a [`PixelSurface`].

use crate::fit::ScreenPoint;
use crate::traits::PixelSurface;
use embedded_graphics::pixelcolor::BinaryColor;
use serde::{Deserialize, Serialize};

/// Pixels of an integer Bresenham segment, from `start` to `end` inclusive.
#[derive(Debug, Clone)]
pub struct BresenhamLine {
    x: i32,
    y: i32,
    end: ScreenPoint,
    dx: i32,
    dy: i32,
    sx: i32,
    sy: i32,
    err: i32,
    done: bool,
}

impl BresenhamLine {
    pub fn new(start: ScreenPoint, end: ScreenPoint) -> Self {
        let dx = (end.x - start.x).abs();
        let dy = -(end.y - start.y).abs();
        Self {
            x: start.x,
            y: start.y,
            end,
            dx,
            dy,
            sx: if start.x < end.x { 1 } else { -1 },
            sy: if start.y < end.y { 1 } else { -1 },
            err: dx + dy,
            done: false,
        }
    }
}

impl Iterator for BresenhamLine {
    type Item = ScreenPoint;

    fn next(&mut self) -> Option<ScreenPoint> {
        if self.done {
            return None;
        }
        let current = ScreenPoint::new(self.x, self.y);
        if current == self.end {
            self.done = true;
            return Some(current);
        }
        let e2 = 2 * self.err;
        if e2 >= self.dy {
            self.err += self.dy;
            self.x += self.sx;
        }
        if e2 <= self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }
        Some(current)
    }
}

/// Sets every pixel of the segment `start`..=`end`.
pub fn draw_line(surface: &mut impl PixelSurface, start: ScreenPoint, end: ScreenPoint) {
    for p in BresenhamLine::new(start, end) {
        surface.set_pixel(p.x, p.y, BinaryColor::On);
    }
}

/// Fills a `size`×`size` square centred on `center`. Even sizes extend one
/// pixel further up and left. Pixels off the surface are dropped.
pub fn stamp_square(surface: &mut impl PixelSurface, center: ScreenPoint, size: u32) {
    if size == 0 {
        return;
    }
    let size = size as i32;
    let lo = -(size / 2);
    let hi = lo + size;
    for dy in lo..hi {
        for dx in lo..hi {
            surface.set_pixel(center.x + dx, center.y + dy, BinaryColor::On);
        }
    }
}

/// Stamp sizes for trajectory points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rasterizer {
    pub point_size: u32,
    /// Size of the newest point, drawn larger to mark the current position.
    pub head_size: u32,
    pub connect: bool,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self {
            point_size: 3,
            head_size: 5,
            connect: true,
        }
    }
}

impl Rasterizer {
    /// Draws `points` (oldest first) in ink.
    pub fn draw(&self, surface: &mut impl PixelSurface, points: &[ScreenPoint]) {
        if self.connect {
            for pair in points.windows(2) {
                draw_line(surface, pair[0], pair[1]);
            }
        }
        for &p in points {
            stamp_square(surface, p, self.point_size);
        }
        if let Some(&head) = points.last() {
            stamp_square(surface, head, self.head_size);
        }
    }
}
