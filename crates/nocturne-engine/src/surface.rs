//! Per-surface simulation state

use nocturne_core::SurfaceId;

use crate::particle::{Particle, ParticleKind};
use crate::scheduler::FrameRequest;

/// Everything the engine tracks for one registered surface.
///
/// Owned exclusively by the engine's registry; the canvas handle is the
/// engine's drawing context, never the pixel storage itself.
pub struct SurfaceState<C> {
    pub id: SurfaceId,
    pub canvas: C,
    pub width: u32,
    pub height: u32,
    pub particles: Vec<Particle>,
    /// Timestamp of the last frame that actually rendered; throttled
    /// invocations leave it untouched
    pub last_frame_ms: f64,
    /// Pending frame request, kept only so teardown can cancel it
    pub frame_request: Option<FrameRequest>,
    /// Which particle variant this surface spawns, fixed at registration
    pub kind: ParticleKind,
}

impl<C> SurfaceState<C> {
    pub fn new(id: SurfaceId, canvas: C, width: u32, height: u32, kind: ParticleKind) -> Self {
        Self {
            id,
            canvas,
            width,
            height,
            particles: Vec::new(),
            last_frame_ms: 0.0,
            frame_request: None,
            kind,
        }
    }
}
