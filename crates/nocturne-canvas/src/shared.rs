//! Shared handle to a host-owned raster canvas.
//!
//! The host creates the [`PixelCanvas`], keeps a clone of the handle for
//! presentation and resizing, and hands another clone to the engine as its
//! drawing context. This mirrors a DOM page owning a canvas element while
//! the animation code holds only the 2D context.

use std::cell::RefCell;
use std::rc::Rc;

use nocturne_core::Rgba;

use crate::{Canvas2d, PixelCanvas};

/// Cloneable handle over a [`PixelCanvas`].
///
/// All clones refer to the same pixel storage. The engine is
/// single-threaded cooperative, so `Rc<RefCell<_>>` suffices; borrows are
/// short and never held across calls.
#[derive(Clone)]
pub struct SharedCanvas {
    inner: Rc<RefCell<PixelCanvas>>,
}

impl SharedCanvas {
    pub fn new(width: u32, height: u32, base: Rgba) -> Self {
        Self {
            inner: Rc::new(RefCell::new(PixelCanvas::new(width, height, base))),
        }
    }

    pub fn width(&self) -> u32 {
        self.inner.borrow().width()
    }

    pub fn height(&self) -> u32 {
        self.inner.borrow().height()
    }

    /// Owner-side resize; clones observe the new dimensions immediately.
    pub fn resize(&self, width: u32, height: u32) {
        self.inner.borrow_mut().resize(width, height);
    }

    /// Run `f` with read access to the underlying raster.
    pub fn with_pixels<R>(&self, f: impl FnOnce(&PixelCanvas) -> R) -> R {
        f(&self.inner.borrow())
    }
}

impl Canvas2d for SharedCanvas {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        self.inner.borrow_mut().fill_rect(x, y, w, h, color);
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.inner.borrow_mut().clear_rect(x, y, w, h);
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        self.inner.borrow_mut().fill_circle(cx, cy, radius, color);
    }
}
