//! Nocturne Engine - background particle animation
//!
//! Simulates decorative particle effects on independent named surfaces:
//! an ambient "firefly" drift and a lifecycle-driven "star" field. Each
//! surface owns its particle set and timing; a frame-rate-limited driver
//! spawns, updates, draws, and culls; a resize coordinator keeps stored
//! extents in sync with the host.
//!
//! The engine draws through the `nocturne-canvas` boundary and schedules
//! through a [`FrameScheduler`], so hosts decide both where pixels land
//! and when frames fire.

pub mod config;
pub mod engine;
pub mod host;
pub mod particle;
pub mod rng;
pub mod scheduler;
pub mod surface;

pub use config::{AmbientConfig, EngineConfig, LifecycleConfig};
pub use engine::Engine;
pub use host::{HostEvent, SurfaceHost, SurfaceSource};
pub use particle::{AmbientParticle, LifecycleParticle, Particle, ParticleKind};
pub use rng::EffectRng;
pub use scheduler::{FrameRequest, FrameScheduler, TickScheduler};
pub use surface::SurfaceState;
