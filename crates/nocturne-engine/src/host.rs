//! The host boundary: where drawing surfaces actually live.
//!
//! The application owns its surface elements (canvas panes, offscreen
//! buffers); the engine only ever asks the host for a drawing context and
//! for current pixel dimensions, and tolerates the host saying no.

use nocturne_canvas::Canvas2d;
use nocturne_core::SurfaceId;

/// A drawing context plus the surface's pixel extents at acquisition time.
pub struct SurfaceSource<C> {
    pub canvas: C,
    pub width: u32,
    pub height: u32,
}

/// Provider of named drawing surfaces.
pub trait SurfaceHost<C: Canvas2d> {
    /// Hand out a drawing context for `id`. `None` means the element does
    /// not exist or cannot produce a context; the engine skips
    /// registration entirely in that case.
    fn acquire(&mut self, id: &SurfaceId) -> Option<SurfaceSource<C>>;

    /// Current live pixel extents for `id`. `None` means the element is
    /// gone; the engine keeps its stale extents rather than erroring.
    fn dimensions(&mut self, id: &SurfaceId) -> Option<(u32, u32)>;
}

/// Host-side happenings that invalidate surface dimensions.
///
/// The engine reacts to all three identically: re-read every registered
/// surface's live extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    ViewportResized,
    FullscreenChanged,
    VisibilityChanged,
}
