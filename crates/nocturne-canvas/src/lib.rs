//! Nocturne Canvas - 2D drawing boundary and raster targets
//!
//! Provides the immediate-mode drawing surface the animation engine paints
//! through, plus concrete targets:
//! - Software RGBA8 raster canvas with source-over blending
//! - Shared handle for canvases owned by a host but drawn by the engine
//! - Recording canvas that logs draw calls for assertions
//! - PNG snapshot encoding for headless captures

pub mod pixel;
pub mod recording;
pub mod shared;
pub mod snapshot;

use nocturne_core::Rgba;

pub use pixel::{Pixel, PixelCanvas};
pub use recording::{DrawOp, RecordingCanvas};
pub use shared::SharedCanvas;
pub use snapshot::save_png;

/// Minimal immediate-mode 2D surface.
///
/// Coordinates are in pixels with the origin at the top-left corner.
/// Implementations clip against their own bounds; callers may pass
/// rectangles or circles that extend past the edges.
pub trait Canvas2d {
    /// Fill a rectangle with `color`, blending over existing content.
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba);

    /// Reset a rectangle to the surface's background.
    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32);

    /// Fill a circle centered at (`cx`, `cy`), blending over existing content.
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba);
}
