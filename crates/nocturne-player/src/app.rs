//! The live demo loop: host events in, engine frames out.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use nocturne_core::SurfaceId;
use nocturne_engine::{Engine, EngineConfig, HostEvent, ParticleKind, TickScheduler};

use crate::panes::{PaneHost, FIREFLIES, STARS};
use crate::terminal::Terminal;

/// The pump polls faster than the render cap so the engine's own
/// throttle, not the event timeout, sets the frame rate.
const POLL_INTERVAL: Duration = Duration::from_millis(4);

pub fn run(config: EngineConfig) -> Result<()> {
    let mut terminal = Terminal::new()?;
    let (cols, rows) = terminal.size();
    let mut host = PaneHost::new(cols, rows, config.background);

    let mut engine = Engine::with_config(TickScheduler::new(), config);
    engine.register_surface(FIREFLIES, ParticleKind::Ambient, &mut host);
    engine.register_surface(STARS, ParticleKind::Lifecycle, &mut host);
    let fireflies = SurfaceId::from(FIREFLIES);
    let stars = SurfaceId::from(STARS);
    engine.start(&fireflies);
    engine.start(&stars);

    let started = Instant::now();
    let mut paused = false;

    loop {
        let now_ms = started.elapsed().as_secs_f64() * 1000.0;
        engine.run_due_frames(now_ms);
        terminal.present(host.panes())?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char('p') => {
                    if paused {
                        engine.start(&fireflies);
                        engine.start(&stars);
                    } else {
                        engine.stop(&fireflies);
                        engine.stop(&stars);
                    }
                    paused = !paused;
                }
                _ => {}
            },
            Event::Resize(new_cols, new_rows) => {
                log::debug!("terminal resized to {new_cols}x{new_rows}");
                terminal.resized(new_cols, new_rows);
                host.relayout(new_cols, new_rows);
                engine.handle_host_event(HostEvent::ViewportResized, &mut host);
            }
            Event::FocusGained | Event::FocusLost => {
                engine.handle_host_event(HostEvent::VisibilityChanged, &mut host);
            }
            _ => {}
        }
    }

    engine.dispose();
    Ok(())
}
