// The drawing surface for Draw mode: an ink layer the size of the preview,
// composited over the live camera image every frame.

use crate::draw::line_points;
use crate::types::{FrameBuffer, Point};

/// Where strokes land. Coordinates are surface pixels.
pub trait DrawSurface {
    fn size(&self) -> (usize, usize);
    fn draw_line(&mut self, from: Point, to: Point, color: u32, width: u32);
    fn clear(&mut self);
}

pub struct Canvas {
    width: usize,
    height: usize,
    ink: Vec<u32>,        // 0x00RRGGBB where painted
    painted: Vec<bool>,   // false = let the camera show through
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ink: vec![0u32; width * height],
            painted: vec![false; width * height],
        }
    }

    #[cfg(test)]
    pub fn is_painted(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.painted[y * self.width + x]
    }

    #[cfg(test)]
    pub fn is_blank(&self) -> bool {
        !self.painted.iter().any(|&p| p)
    }

    /// Copy painted pixels over `fb` (same size as the canvas; extra area is ignored).
    pub fn composite_onto(&self, fb: &mut FrameBuffer) {
        let w = self.width.min(fb.width);
        let h = self.height.min(fb.height);
        for y in 0..h {
            for x in 0..w {
                let i = y * self.width + x;
                if self.painted[i] {
                    fb.pixels[y * fb.width + x] = self.ink[i];
                }
            }
        }
    }

    /// Filled disc; radius 0 paints a single pixel.
    fn stamp(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        let r2 = radius * radius;
        for y in (cy - radius)..=(cy + radius) {
            for x in (cx - radius)..=(cx + radius) {
                let (dx, dy) = (x - cx, y - cy);
                if dx * dx + dy * dy > r2 { continue; }
                if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height { continue; }
                let i = y as usize * self.width + x as usize;
                self.ink[i] = color & 0x00FF_FFFF;
                self.painted[i] = true;
            }
        }
    }
}

impl DrawSurface for Canvas {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn draw_line(&mut self, from: Point, to: Point, color: u32, width: u32) {
        let radius = (width.max(1) / 2) as i32;
        for (x, y) in line_points(from.x, from.y, to.x, to.y) {
            self.stamp(x, y, radius, color);
        }
    }

    fn clear(&mut self) {
        self.painted.fill(false);
        self.ink.fill(0);
    }
}
