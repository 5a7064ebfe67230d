//! Software RGBA8 raster canvas.
//!
//! This is a plain CPU pixel buffer: no GPU, no antialiasing, source-over
//! blending only. Presentation layers read the buffer back with
//! [`PixelCanvas::as_bytes`] and ship it wherever they like (terminal cells,
//! PNG snapshots, a window blit).

use bytemuck::{Pod, Zeroable};
use nocturne_core::Rgba;

use crate::Canvas2d;

/// One packed RGBA8 pixel.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba(color: Rgba) -> Self {
        let [r, g, b, a] = color.to_rgba8();
        Self { r, g, b, a }
    }
}

/// CPU-side raster surface with a fixed background color.
///
/// `clear_rect` resets pixels to the background rather than to transparent
/// black, so a cleared canvas always shows the surface's own backdrop.
pub struct PixelCanvas {
    width: u32,
    height: u32,
    base: Pixel,
    pixels: Vec<Pixel>,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32, base: Rgba) -> Self {
        let base = Pixel::from_rgba(base);
        Self {
            width,
            height,
            base,
            pixels: vec![base; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reallocate the backing store for new dimensions.
    ///
    /// Like an HTML canvas whose width/height attributes change, resizing
    /// discards all previous content and resets to the background.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize((width * height) as usize, self.base);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Raw RGBA8 bytes in row-major order, `width * height * 4` long.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Clamp a float rectangle to integer pixel bounds.
    fn clip_rect(&self, x: f32, y: f32, w: f32, h: f32) -> Option<(u32, u32, u32, u32)> {
        if w <= 0.0 || h <= 0.0 {
            return None;
        }
        let x0 = x.floor().max(0.0) as u32;
        let y0 = y.floor().max(0.0) as u32;
        let x1 = ((x + w).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((y + h).ceil().max(0.0) as u32).min(self.height);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0, y0, x1, y1))
    }

    fn blend_pixel(&mut self, x: u32, y: u32, src: Rgba) {
        let idx = (y * self.width + x) as usize;
        let dst = self.pixels[idx];
        self.pixels[idx] = blend_source_over(dst, src);
    }
}

impl Canvas2d for PixelCanvas {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        let Some((x0, y0, x1, y1)) = self.clip_rect(x, y, w, h) else {
            return;
        };
        if color.a >= 1.0 {
            // Opaque fill replaces outright, no per-pixel blend needed
            let px = Pixel::from_rgba(color);
            for row in y0..y1 {
                let start = (row * self.width + x0) as usize;
                let end = (row * self.width + x1) as usize;
                self.pixels[start..end].fill(px);
            }
            return;
        }
        for row in y0..y1 {
            for col in x0..x1 {
                self.blend_pixel(col, row, color);
            }
        }
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let Some((x0, y0, x1, y1)) = self.clip_rect(x, y, w, h) else {
            return;
        };
        let base = self.base;
        for row in y0..y1 {
            let start = (row * self.width + x0) as usize;
            let end = (row * self.width + x1) as usize;
            self.pixels[start..end].fill(base);
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        if radius <= 0.0 || color.a <= 0.0 {
            return;
        }
        // Sub-pixel radii still land one dot on their center pixel
        let r = radius.max(0.5);
        let r_sq = r * r;
        let x0 = (cx - r).floor().max(0.0) as u32;
        let y0 = (cy - r).floor().max(0.0) as u32;
        let x1 = ((cx + r).ceil().max(0.0) as u32 + 1).min(self.width);
        let y1 = ((cy + r).ceil().max(0.0) as u32 + 1).min(self.height);
        for row in y0..y1 {
            for col in x0..x1 {
                let dx = (col as f32 + 0.5) - cx;
                let dy = (row as f32 + 0.5) - cy;
                if dx * dx + dy * dy <= r_sq {
                    self.blend_pixel(col, row, color);
                }
            }
        }
    }
}

/// Source-over composite of `src` onto `dst` in 8-bit space.
fn blend_source_over(dst: Pixel, src: Rgba) -> Pixel {
    let a = src.a.clamp(0.0, 1.0);
    if a >= 1.0 {
        return Pixel::from_rgba(src);
    }
    if a <= 0.0 {
        return dst;
    }
    let inv = 1.0 - a;
    let mix = |s: f32, d: u8| -> u8 {
        let v = s.clamp(0.0, 1.0) * 255.0 * a + d as f32 * inv;
        v.round().clamp(0.0, 255.0) as u8
    };
    Pixel {
        r: mix(src.r, dst.r),
        g: mix(src.g, dst.g),
        b: mix(src.b, dst.b),
        a: (a * 255.0 + dst.a as f32 * inv).round().clamp(0.0, 255.0) as u8,
    }
}
