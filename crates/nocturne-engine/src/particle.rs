//! Particle variants: the ambient "firefly" wanderer and the lifecycle "star"

use nocturne_canvas::Canvas2d;

use crate::config::{AmbientConfig, EngineConfig, LifecycleConfig};
use crate::rng::EffectRng;

/// Heading perturbation applied to fireflies every frame, in degrees
const ANGLE_JITTER_DEG: f32 = 10.0;

/// Which particle variant a surface spawns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Ambient,
    Lifecycle,
}

/// Wandering particle with wrap-around boundary behavior and no lifespan.
#[derive(Debug, Clone)]
pub struct AmbientParticle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// Heading in radians
    pub angle: f32,
    /// Scalar speed, derived from size so small fireflies drift slowly
    pub speed: f32,
}

impl AmbientParticle {
    pub fn spawn(rng: &mut EffectRng, width: f32, height: f32, cfg: &AmbientConfig) -> Self {
        let size = rng.range(0.0, cfg.max_size);
        Self {
            x: rng.range(0.0, width),
            y: rng.range(0.0, height),
            size,
            angle: rng.angle(),
            speed: size * size / 4.0,
        }
    }

    /// Advance along the heading, jitter the heading, wrap at the edges.
    pub fn step(&mut self, width: f32, height: f32, rng: &mut EffectRng) {
        self.x += self.speed * self.angle.cos();
        self.y += self.speed * self.angle.sin();
        self.angle += rng.signed_unit(ANGLE_JITTER_DEG.to_radians());

        // Exiting one edge re-enters at the opposite edge
        if self.x < 0.0 {
            self.x = width;
        } else if self.x > width {
            self.x = 0.0;
        }
        if self.y < 0.0 {
            self.y = height;
        } else if self.y > height {
            self.y = 0.0;
        }
    }
}

/// Particle with spawn fade-in, steady state, fade-out, and in-place reset.
///
/// Unlike [`AmbientParticle`] this variant never wraps; whatever drifts past
/// an edge is culled by the driver's generic bounds check.
#[derive(Debug, Clone)]
pub struct LifecycleParticle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub opacity: f32,
    pub vx: f32,
    pub vy: f32,
    /// Remaining frames; the driver removes the particle at <= 0
    pub lifespan: i32,
    /// Remaining fade-in frames
    pub spawn_frames: i32,
    /// Wall-clock deadline for the pending soft reset, if armed
    pub reset_due: Option<f64>,
}

impl LifecycleParticle {
    pub fn spawn(rng: &mut EffectRng, width: f32, height: f32, cfg: &LifecycleConfig) -> Self {
        Self {
            x: rng.range(0.0, width),
            y: rng.range(0.0, height),
            size: rng.range(0.0, cfg.max_size),
            opacity: 0.0,
            vx: rng.range(-1.0, 1.0),
            vy: rng.range(-1.0, 1.0),
            lifespan: cfg.base_lifespan + rng.range(0.0, cfg.lifespan_jitter as f32) as i32,
            spawn_frames: cfg.spawn_frames,
            reset_due: None,
        }
    }

    pub fn step(
        &mut self,
        now_ms: f64,
        width: f32,
        height: f32,
        rng: &mut EffectRng,
        cfg: &LifecycleConfig,
    ) {
        // A due reset replaces this frame's motion entirely
        if let Some(due) = self.reset_due {
            if now_ms >= due {
                self.reset(width, height, rng, cfg);
                return;
            }
        }

        self.x += self.vx;
        self.y += self.vy;

        if self.spawn_frames > 0 {
            self.spawn_frames -= 1;
            self.opacity = 1.0 - self.spawn_frames as f32 / cfg.spawn_frames as f32;
        } else if self.lifespan < cfg.fade_frames {
            self.opacity = self.lifespan as f32 / cfg.fade_frames as f32;
        }

        // Armed at most once per expiry; the delay is wall-clock, decoupled
        // from the frame clock
        if self.opacity <= 0.0 && self.reset_due.is_none() {
            self.reset_due = Some(now_ms + cfg.reset_delay_ms);
        }

        self.lifespan -= 1;
    }

    /// In-place soft reset to a freshly spawned state; identity preserved.
    pub fn reset(&mut self, width: f32, height: f32, rng: &mut EffectRng, cfg: &LifecycleConfig) {
        *self = Self::spawn(rng, width, height, cfg);
    }
}

/// One particle of either variant; dispatch is a match, never a type check.
#[derive(Debug, Clone)]
pub enum Particle {
    Ambient(AmbientParticle),
    Lifecycle(LifecycleParticle),
}

impl Particle {
    pub fn spawn(
        kind: ParticleKind,
        rng: &mut EffectRng,
        width: f32,
        height: f32,
        cfg: &EngineConfig,
    ) -> Self {
        match kind {
            ParticleKind::Ambient => {
                Self::Ambient(AmbientParticle::spawn(rng, width, height, &cfg.ambient))
            }
            ParticleKind::Lifecycle => {
                Self::Lifecycle(LifecycleParticle::spawn(rng, width, height, &cfg.lifecycle))
            }
        }
    }

    pub fn kind(&self) -> ParticleKind {
        match self {
            Self::Ambient(_) => ParticleKind::Ambient,
            Self::Lifecycle(_) => ParticleKind::Lifecycle,
        }
    }

    pub fn step(
        &mut self,
        now_ms: f64,
        width: f32,
        height: f32,
        rng: &mut EffectRng,
        cfg: &EngineConfig,
    ) {
        match self {
            Self::Ambient(p) => p.step(width, height, rng),
            Self::Lifecycle(p) => p.step(now_ms, width, height, rng, &cfg.lifecycle),
        }
    }

    pub fn draw(&self, canvas: &mut impl Canvas2d, cfg: &EngineConfig) {
        match self {
            Self::Ambient(p) => canvas.fill_circle(p.x, p.y, p.size, cfg.ambient.color),
            Self::Lifecycle(p) => canvas.fill_circle(
                p.x,
                p.y,
                p.size,
                cfg.lifecycle.color.with_alpha(p.opacity.clamp(0.0, 1.0)),
            ),
        }
    }

    /// Kind-specific expiry: only lifecycle particles run out of frames.
    pub fn is_expired(&self) -> bool {
        match self {
            Self::Ambient(_) => false,
            Self::Lifecycle(p) => p.lifespan <= 0,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        match self {
            Self::Ambient(p) => (p.x, p.y),
            Self::Lifecycle(p) => (p.x, p.y),
        }
    }
}
