//! Headless capture: simulate offscreen, save the final frame as PNG.

use std::path::Path;

use anyhow::{Context, Result};
use nocturne_canvas::{save_png, SharedCanvas};
use nocturne_core::SurfaceId;
use nocturne_engine::{
    Engine, EngineConfig, ParticleKind, SurfaceHost, SurfaceSource, TickScheduler,
};

/// Host with a single offscreen surface named "offscreen".
struct OffscreenHost {
    canvas: SharedCanvas,
}

impl SurfaceHost<SharedCanvas> for OffscreenHost {
    fn acquire(&mut self, id: &SurfaceId) -> Option<SurfaceSource<SharedCanvas>> {
        (id.as_str() == "offscreen").then(|| SurfaceSource {
            canvas: self.canvas.clone(),
            width: self.canvas.width(),
            height: self.canvas.height(),
        })
    }

    fn dimensions(&mut self, id: &SurfaceId) -> Option<(u32, u32)> {
        (id.as_str() == "offscreen").then(|| (self.canvas.width(), self.canvas.height()))
    }
}

pub fn run(
    out: &Path,
    frames: u32,
    width: u32,
    height: u32,
    kind: ParticleKind,
    seed: u32,
    config: EngineConfig,
) -> Result<()> {
    let mut host = OffscreenHost {
        canvas: SharedCanvas::new(width, height, config.background),
    };
    let interval = config.frame_interval_ms();

    let mut engine = Engine::with_config(TickScheduler::new(), config).with_seed(seed);
    engine.register_surface("offscreen", kind, &mut host);
    let id = SurfaceId::from("offscreen");
    engine.start(&id);

    // Feed timestamps just past the throttle window so every tick renders
    let mut now_ms = interval + 1.0;
    for _ in 0..frames {
        engine.run_due_frames(now_ms);
        now_ms += interval + 1.0;
    }
    engine.dispose();

    host.canvas
        .with_pixels(|canvas| save_png(canvas, out))
        .with_context(|| format!("Failed to write {}", out.display()))
}
