//! Frame scheduling seam between the engine and its host's display loop.
//!
//! The engine never self-schedules; it asks a [`FrameScheduler`] for the
//! next frame and remembers the returned handle so teardown can cancel it.
//! Hosts drain due requests once per display tick and call back into
//! `Engine::frame`, which keeps every piece of engine work on the host's
//! callback queue.

use nocturne_core::SurfaceId;

/// Opaque handle to one scheduled frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(u64);

/// Per-platform render-loop abstraction.
pub trait FrameScheduler {
    /// Queue a frame callback for `id`, returning a cancellation handle.
    fn request(&mut self, id: &SurfaceId) -> FrameRequest;

    /// Cancel a previously queued request. Unknown handles are ignored.
    fn cancel(&mut self, request: FrameRequest);
}

/// Host-pump scheduler: requests queue up and the host drains them once
/// per display tick.
#[derive(Default)]
pub struct TickScheduler {
    queue: Vec<(FrameRequest, SurfaceId)>,
    next_handle: u64,
    total_requests: u64,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued surface for this tick, in request order.
    pub fn take_due(&mut self) -> Vec<SurfaceId> {
        self.queue.drain(..).map(|(_, id)| id).collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Total requests ever made; lets tests verify that disposal stops
    /// the request chain exactly.
    pub fn total_requests(&self) -> u64 {
        self.total_requests
    }
}

impl FrameScheduler for TickScheduler {
    fn request(&mut self, id: &SurfaceId) -> FrameRequest {
        let handle = FrameRequest(self.next_handle);
        self.next_handle += 1;
        self.total_requests += 1;
        self.queue.push((handle, id.clone()));
        handle
    }

    fn cancel(&mut self, request: FrameRequest) {
        self.queue.retain(|(handle, _)| *handle != request);
    }
}
