//! The engine: surface registry, render-loop driver, resize coordinator,
//! and lifecycle hooks.
//!
//! One [`Engine`] value owns the whole registry; nothing here is global,
//! so several engines can coexist (pages, tests). Every failure mode on
//! the call surface is tolerated silently: this is a decorative effect,
//! and the worst outcome of any error is that an animation stops drawing.

use std::collections::HashMap;

use nocturne_canvas::Canvas2d;
use nocturne_core::SurfaceId;

use crate::config::EngineConfig;
use crate::host::{HostEvent, SurfaceHost};
use crate::particle::{Particle, ParticleKind};
use crate::rng::EffectRng;
use crate::scheduler::{FrameScheduler, TickScheduler};
use crate::surface::SurfaceState;

pub struct Engine<C: Canvas2d, S: FrameScheduler> {
    surfaces: HashMap<SurfaceId, SurfaceState<C>>,
    scheduler: S,
    rng: EffectRng,
    config: EngineConfig,
    disposed: bool,
}

impl<C: Canvas2d, S: FrameScheduler> Engine<C, S> {
    pub fn new(scheduler: S) -> Self {
        Self::with_config(scheduler, EngineConfig::default())
    }

    pub fn with_config(scheduler: S, config: EngineConfig) -> Self {
        Self {
            surfaces: HashMap::new(),
            scheduler,
            rng: EffectRng::new(0x6e6f_6374),
            config,
            disposed: false,
        }
    }

    /// Fix the random sequence, for deterministic tests and captures.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.rng = EffectRng::new(seed);
        self
    }

    /// Register a surface and paint its background wash.
    ///
    /// Idempotent: an already-registered id is left untouched. If the
    /// host cannot produce a drawing context for `id`, no state is
    /// created at all.
    pub fn register_surface(
        &mut self,
        id: impl Into<SurfaceId>,
        kind: ParticleKind,
        host: &mut dyn SurfaceHost<C>,
    ) {
        if self.disposed {
            return;
        }
        let id = id.into();
        if self.surfaces.contains_key(&id) {
            return;
        }
        let Some(source) = host.acquire(&id) else {
            log::debug!("surface {id} has no drawing context, skipping registration");
            return;
        };
        let mut state = SurfaceState::new(
            id.clone(),
            source.canvas,
            source.width,
            source.height,
            kind,
        );
        // The surface must never sit visually blank before its first frame
        state.canvas.fill_rect(
            0.0,
            0.0,
            state.width as f32,
            state.height as f32,
            self.config.background,
        );
        self.surfaces.insert(id, state);
    }

    /// Begin the render loop for `id`. Unknown ids are ignored; a surface
    /// with a frame already pending is never double-scheduled.
    pub fn start(&mut self, id: &SurfaceId) {
        if self.disposed {
            return;
        }
        let Some(state) = self.surfaces.get_mut(id) else {
            log::debug!("start for unknown surface {id}");
            return;
        };
        if state.frame_request.is_none() {
            state.frame_request = Some(self.scheduler.request(id));
        }
    }

    /// Cancel the pending frame for `id`, freezing the surface as drawn.
    pub fn stop(&mut self, id: &SurfaceId) {
        let Some(state) = self.surfaces.get_mut(id) else {
            return;
        };
        if let Some(request) = state.frame_request.take() {
            self.scheduler.cancel(request);
        }
    }

    /// One scheduled frame for `id` at host timestamp `now_ms`.
    ///
    /// Unknown id or disposed engine: silent return with no reschedule.
    /// That silence is the mechanism by which disposal and late callbacks
    /// are tolerated without errors.
    pub fn frame(&mut self, id: &SurfaceId, now_ms: f64) {
        if self.disposed {
            return;
        }
        let Some(state) = self.surfaces.get_mut(id) else {
            log::debug!("frame for unknown surface {id}");
            return;
        };
        state.frame_request = None;

        // Throttle: keep the request chain ticking at host rate but only
        // render at the configured ceiling
        if now_ms - state.last_frame_ms < self.config.frame_interval_ms() {
            state.frame_request = Some(self.scheduler.request(id));
            return;
        }
        state.last_frame_ms = now_ms;

        let width = state.width as f32;
        let height = state.height as f32;

        // Top up the population, clamped so the cap is a hard bound
        let headroom = self.config.max_particles.saturating_sub(state.particles.len());
        for _ in 0..self.config.spawn_batch.min(headroom) {
            state.particles.push(Particle::spawn(
                state.kind,
                &mut self.rng,
                width,
                height,
                &self.config,
            ));
        }

        state.canvas.clear_rect(0.0, 0.0, width, height);

        // Back-to-front so swap_remove never skips the next element
        let mut i = state.particles.len();
        while i > 0 {
            i -= 1;
            let particle = &mut state.particles[i];
            particle.step(now_ms, width, height, &mut self.rng, &self.config);
            particle.draw(&mut state.canvas, &self.config);

            let (x, y) = particle.position();
            let out_of_bounds = x < 0.0 || x > width || y < 0.0 || y > height;
            if particle.is_expired() || out_of_bounds {
                state.particles.swap_remove(i);
            }
        }

        state.frame_request = Some(self.scheduler.request(id));
    }

    /// Overwrite one surface's stored extents. Particles are left alone;
    /// anything now out of bounds is culled by the next frame's check.
    pub fn resize(&mut self, id: &SurfaceId, width: u32, height: u32) {
        if let Some(state) = self.surfaces.get_mut(id) {
            state.width = width;
            state.height = height;
        }
    }

    /// Re-read every registered surface's live extents from the host.
    /// Surfaces the host no longer knows keep their stale extents.
    pub fn resize_all(&mut self, host: &mut dyn SurfaceHost<C>) {
        let ids: Vec<SurfaceId> = self.surfaces.keys().cloned().collect();
        for id in ids {
            if let Some((width, height)) = host.dimensions(&id) {
                self.resize(&id, width, height);
            }
        }
    }

    /// Viewport resize, fullscreen toggle, and visibility change all mean
    /// the same thing to the engine: dimensions may be stale.
    pub fn handle_host_event(&mut self, event: HostEvent, host: &mut dyn SurfaceHost<C>) {
        match event {
            HostEvent::ViewportResized
            | HostEvent::FullscreenChanged
            | HostEvent::VisibilityChanged => self.resize_all(host),
        }
    }

    /// Teardown: cancel every pending frame. The engine is inert
    /// afterwards; `frame`, `start`, and `register_surface` become no-ops.
    pub fn dispose(&mut self) {
        for state in self.surfaces.values_mut() {
            if let Some(request) = state.frame_request.take() {
                self.scheduler.cancel(request);
            }
        }
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn particle_count(&self, id: &SurfaceId) -> Option<usize> {
        self.surfaces.get(id).map(|s| s.particles.len())
    }

    pub fn dimensions(&self, id: &SurfaceId) -> Option<(u32, u32)> {
        self.surfaces.get(id).map(|s| (s.width, s.height))
    }

    /// Whether `id` has a frame pending.
    pub fn is_running(&self, id: &SurfaceId) -> bool {
        self.surfaces
            .get(id)
            .is_some_and(|s| s.frame_request.is_some())
    }

    pub fn surface_ids(&self) -> impl Iterator<Item = &SurfaceId> {
        self.surfaces.keys()
    }

    /// Read access to a surface's drawing context, for presentation.
    pub fn canvas(&self, id: &SurfaceId) -> Option<&C> {
        self.surfaces.get(id).map(|s| &s.canvas)
    }
}

impl<C: Canvas2d> Engine<C, TickScheduler> {
    /// Drain one tick's worth of due frames and dispatch them, the way a
    /// display loop fires its queued animation callbacks.
    pub fn run_due_frames(&mut self, now_ms: f64) {
        for id in self.scheduler.take_due() {
            self.frame(&id, now_ms);
        }
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SurfaceSource;
    use crate::particle::LifecycleParticle;
    use nocturne_canvas::{DrawOp, RecordingCanvas};

    /// Test host with a fixed table of surface sizes; ids absent from the
    /// table have "no element" and produce no context.
    struct TestHost {
        sizes: HashMap<String, (u32, u32)>,
    }

    impl TestHost {
        fn new(entries: &[(&str, u32, u32)]) -> Self {
            let sizes = entries
                .iter()
                .map(|&(id, w, h)| (id.to_string(), (w, h)))
                .collect();
            Self { sizes }
        }

        fn set_size(&mut self, id: &str, w: u32, h: u32) {
            self.sizes.insert(id.to_string(), (w, h));
        }
    }

    impl SurfaceHost<RecordingCanvas> for TestHost {
        fn acquire(&mut self, id: &SurfaceId) -> Option<SurfaceSource<RecordingCanvas>> {
            let &(width, height) = self.sizes.get(id.as_str())?;
            Some(SurfaceSource {
                canvas: RecordingCanvas::new(),
                width,
                height,
            })
        }

        fn dimensions(&mut self, id: &SurfaceId) -> Option<(u32, u32)> {
            self.sizes.get(id.as_str()).copied()
        }
    }

    fn engine_with(host: &mut TestHost, id: &str, kind: ParticleKind) -> Engine<RecordingCanvas, TickScheduler> {
        let mut engine = Engine::new(TickScheduler::new()).with_seed(0xbeef);
        engine.register_surface(id, kind, host);
        engine
    }

    const FRAME: f64 = 1000.0 / 60.0;

    /// Timestamps spaced just over one frame interval, starting past it so
    /// the first frame renders.
    fn tick_time(n: u64) -> f64 {
        (n + 1) as f64 * (FRAME + 0.1)
    }

    #[test]
    fn register_paints_wash_before_any_frame() {
        let mut host = TestHost::new(&[("hero", 120, 80)]);
        let engine = engine_with(&mut host, "hero", ParticleKind::Ambient);
        let id = SurfaceId::from("hero");

        let canvas = engine.canvas(&id).unwrap();
        assert_eq!(canvas.ops().len(), 1);
        assert!(matches!(
            canvas.ops()[0],
            DrawOp::FillRect { x: 0.0, y: 0.0, w: 120.0, h: 80.0, .. }
        ));
    }

    #[test]
    fn register_is_idempotent() {
        let mut host = TestHost::new(&[("hero", 120, 80)]);
        let mut engine = engine_with(&mut host, "hero", ParticleKind::Ambient);
        let id = SurfaceId::from("hero");

        engine.start(&id);
        engine.run_due_frames(tick_time(0));
        let before = engine.particle_count(&id).unwrap();

        engine.register_surface("hero", ParticleKind::Lifecycle, &mut host);
        assert_eq!(engine.particle_count(&id), Some(before));
        // Second registration repaints nothing
        assert_eq!(
            engine
                .canvas(&id)
                .unwrap()
                .ops()
                .iter()
                .filter(|op| matches!(op, DrawOp::FillRect { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn missing_context_creates_no_state() {
        let mut host = TestHost::new(&[]);
        let mut engine: Engine<RecordingCanvas, TickScheduler> = Engine::new(TickScheduler::new());
        engine.register_surface("ghost", ParticleKind::Ambient, &mut host);
        assert_eq!(engine.particle_count(&SurfaceId::from("ghost")), None);
        assert_eq!(engine.surface_ids().count(), 0);
    }

    #[test]
    fn first_rendered_frame_spawns_one_batch() {
        let mut host = TestHost::new(&[("hero", 100, 100)]);
        let mut engine = engine_with(&mut host, "hero", ParticleKind::Ambient);
        let id = SurfaceId::from("hero");

        engine.start(&id);
        engine.run_due_frames(tick_time(0));
        assert_eq!(engine.particle_count(&id), Some(10));
    }

    #[test]
    fn population_never_exceeds_cap() {
        let mut host = TestHost::new(&[("stars", 200, 150)]);
        let mut engine = engine_with(&mut host, "stars", ParticleKind::Lifecycle);
        let id = SurfaceId::from("stars");

        engine.start(&id);
        for n in 0..500 {
            engine.run_due_frames(tick_time(n));
            assert!(engine.particle_count(&id).unwrap() <= 100);
        }
    }

    #[test]
    fn spawn_batch_is_clamped_near_the_cap() {
        let mut host = TestHost::new(&[("hero", 100, 100)]);
        let mut engine = engine_with(&mut host, "hero", ParticleKind::Ambient);
        let id = SurfaceId::from("hero");

        engine.start(&id);
        // 95 particles leaves headroom for only 5
        for n in 0..20 {
            engine.run_due_frames(tick_time(n));
        }
        let state = engine.surfaces.get_mut(&id).unwrap();
        state.particles.truncate(95);
        engine.run_due_frames(tick_time(20));
        assert_eq!(engine.particle_count(&id), Some(100));
    }

    #[test]
    fn throttled_frame_renders_nothing_but_keeps_the_chain() {
        let mut host = TestHost::new(&[("hero", 100, 100)]);
        let mut engine = engine_with(&mut host, "hero", ParticleKind::Ambient);
        let id = SurfaceId::from("hero");

        engine.start(&id);
        engine.run_due_frames(100.0);
        assert_eq!(engine.particle_count(&id), Some(10));
        let rendered_at = engine.surfaces[&id].last_frame_ms;
        assert_eq!(rendered_at, 100.0);

        // Under one frame interval later: no spawn, no timestamp change
        engine.run_due_frames(105.0);
        assert_eq!(engine.particle_count(&id), Some(10));
        assert_eq!(engine.surfaces[&id].last_frame_ms, 100.0);
        // But the request chain is still alive
        assert!(engine.is_running(&id));
        assert_eq!(engine.scheduler().pending(), 1);
    }

    /// Engine that never spawns, so culling is observable in isolation.
    fn cull_only_engine(
        host: &mut TestHost,
        id: &str,
    ) -> Engine<RecordingCanvas, TickScheduler> {
        let mut config = EngineConfig::default();
        config.spawn_batch = 0;
        let mut engine = Engine::with_config(TickScheduler::new(), config).with_seed(0xbeef);
        engine.register_surface(id, ParticleKind::Lifecycle, host);
        engine
    }

    #[test]
    fn expired_lifecycle_particle_is_removed_regardless_of_opacity() {
        let mut host = TestHost::new(&[("stars", 100, 100)]);
        let mut engine = cull_only_engine(&mut host, "stars");
        let id = SurfaceId::from("stars");

        let mut rng = EffectRng::new(1);
        let mut dying =
            LifecycleParticle::spawn(&mut rng, 100.0, 100.0, &engine.config.lifecycle);
        dying.spawn_frames = 0;
        dying.opacity = 1.0;
        dying.lifespan = 0;
        dying.vx = 0.0;
        dying.vy = 0.0;
        engine
            .surfaces
            .get_mut(&id)
            .unwrap()
            .particles
            .push(Particle::Lifecycle(dying));

        engine.start(&id);
        engine.run_due_frames(tick_time(0));
        assert_eq!(engine.particle_count(&id), Some(0));
    }

    #[test]
    fn out_of_bounds_particle_is_removed_next_frame() {
        let mut host = TestHost::new(&[("stars", 100, 100)]);
        let mut engine = cull_only_engine(&mut host, "stars");
        let id = SurfaceId::from("stars");

        let mut rng = EffectRng::new(1);
        let mut stray =
            LifecycleParticle::spawn(&mut rng, 100.0, 100.0, &engine.config.lifecycle);
        stray.x = -1.0;
        stray.vx = 0.0;
        stray.vy = 0.0;
        engine
            .surfaces
            .get_mut(&id)
            .unwrap()
            .particles
            .push(Particle::Lifecycle(stray));

        engine.start(&id);
        engine.run_due_frames(tick_time(0));
        assert_eq!(engine.particle_count(&id), Some(0));
    }

    #[test]
    fn ambient_particles_never_trigger_the_bounds_check() {
        let mut host = TestHost::new(&[("hero", 60, 40)]);
        let mut engine = engine_with(&mut host, "hero", ParticleKind::Ambient);
        let id = SurfaceId::from("hero");

        engine.start(&id);
        for n in 0..2000 {
            engine.run_due_frames(tick_time(n));
        }
        // Wrap keeps every firefly in bounds, so the population sits at
        // the cap with nothing ever culled
        assert_eq!(engine.particle_count(&id), Some(100));
    }

    #[test]
    fn unknown_surface_frame_does_not_reschedule() {
        let mut host = TestHost::new(&[("hero", 100, 100)]);
        let mut engine = engine_with(&mut host, "hero", ParticleKind::Ambient);

        let before = engine.scheduler().total_requests();
        engine.frame(&SurfaceId::from("nobody"), 1000.0);
        assert_eq!(engine.scheduler().total_requests(), before);
    }

    #[test]
    fn start_is_idempotent_while_a_frame_is_pending() {
        let mut host = TestHost::new(&[("hero", 100, 100)]);
        let mut engine = engine_with(&mut host, "hero", ParticleKind::Ambient);
        let id = SurfaceId::from("hero");

        engine.start(&id);
        engine.start(&id);
        assert_eq!(engine.scheduler().pending(), 1);
        assert_eq!(engine.scheduler().total_requests(), 1);
    }

    #[test]
    fn stop_cancels_and_start_resumes() {
        let mut host = TestHost::new(&[("hero", 100, 100)]);
        let mut engine = engine_with(&mut host, "hero", ParticleKind::Ambient);
        let id = SurfaceId::from("hero");

        engine.start(&id);
        engine.run_due_frames(tick_time(0));
        engine.stop(&id);
        assert!(!engine.is_running(&id));
        assert_eq!(engine.scheduler().pending(), 0);

        let frozen = engine.particle_count(&id).unwrap();
        engine.run_due_frames(tick_time(1));
        assert_eq!(engine.particle_count(&id), Some(frozen));

        engine.start(&id);
        engine.run_due_frames(tick_time(2));
        assert_eq!(engine.particle_count(&id), Some(frozen + 10));
    }

    #[test]
    fn dispose_stops_every_request_chain() {
        let mut host = TestHost::new(&[("hero", 100, 100), ("stars", 80, 60)]);
        let mut engine = engine_with(&mut host, "hero", ParticleKind::Ambient);
        engine.register_surface("stars", ParticleKind::Lifecycle, &mut host);
        let hero = SurfaceId::from("hero");
        let stars = SurfaceId::from("stars");

        engine.start(&hero);
        engine.start(&stars);
        engine.run_due_frames(tick_time(0));

        engine.dispose();
        let total = engine.scheduler().total_requests();
        assert_eq!(engine.scheduler().pending(), 0);

        // No path may issue another request
        engine.run_due_frames(tick_time(1));
        engine.frame(&hero, tick_time(2));
        engine.start(&stars);
        engine.register_surface("hero", ParticleKind::Ambient, &mut host);
        assert_eq!(engine.scheduler().total_requests(), total);
        assert!(engine.is_disposed());
    }

    #[test]
    fn resize_updates_one_surface_and_no_others() {
        let mut host = TestHost::new(&[("hero", 100, 100), ("stars", 80, 60)]);
        let mut engine = engine_with(&mut host, "hero", ParticleKind::Ambient);
        engine.register_surface("stars", ParticleKind::Lifecycle, &mut host);

        engine.resize(&SurfaceId::from("hero"), 640, 480);
        assert_eq!(engine.dimensions(&SurfaceId::from("hero")), Some((640, 480)));
        assert_eq!(engine.dimensions(&SurfaceId::from("stars")), Some((80, 60)));
    }

    #[test]
    fn host_events_resync_every_surface() {
        let mut host = TestHost::new(&[("hero", 100, 100), ("stars", 80, 60)]);
        let mut engine = engine_with(&mut host, "hero", ParticleKind::Ambient);
        engine.register_surface("stars", ParticleKind::Lifecycle, &mut host);

        host.set_size("hero", 300, 200);
        host.set_size("stars", 150, 90);
        engine.handle_host_event(HostEvent::ViewportResized, &mut host);
        assert_eq!(engine.dimensions(&SurfaceId::from("hero")), Some((300, 200)));
        assert_eq!(engine.dimensions(&SurfaceId::from("stars")), Some((150, 90)));
    }

    #[test]
    fn vanished_host_element_keeps_stale_dimensions() {
        let mut host = TestHost::new(&[("hero", 100, 100)]);
        let mut engine = engine_with(&mut host, "hero", ParticleKind::Ambient);

        host.sizes.remove("hero");
        engine.resize_all(&mut host);
        assert_eq!(engine.dimensions(&SurfaceId::from("hero")), Some((100, 100)));
    }

    #[test]
    fn frame_clears_before_drawing_particles() {
        let mut host = TestHost::new(&[("hero", 100, 100)]);
        let mut engine = engine_with(&mut host, "hero", ParticleKind::Ambient);
        let id = SurfaceId::from("hero");

        engine.start(&id);
        engine.run_due_frames(tick_time(0));

        let ops = engine.canvas(&id).unwrap().ops();
        // wash, clear, then ten circles
        assert!(matches!(ops[0], DrawOp::FillRect { .. }));
        assert!(matches!(ops[1], DrawOp::ClearRect { w: 100.0, h: 100.0, .. }));
        assert_eq!(ops.len(), 12);
        assert!(ops[2..].iter().all(|op| matches!(op, DrawOp::FillCircle { .. })));
    }

    #[test]
    fn surfaces_simulate_independently() {
        let mut host = TestHost::new(&[("hero", 100, 100), ("stars", 80, 60)]);
        let mut engine = engine_with(&mut host, "hero", ParticleKind::Ambient);
        engine.register_surface("stars", ParticleKind::Lifecycle, &mut host);
        let hero = SurfaceId::from("hero");
        let stars = SurfaceId::from("stars");

        engine.start(&hero);
        engine.run_due_frames(tick_time(0));
        assert_eq!(engine.particle_count(&hero), Some(10));
        // A surface that was never started does not simulate
        assert_eq!(engine.particle_count(&stars), Some(0));
    }
}
