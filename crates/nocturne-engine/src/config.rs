//! Effect configuration (parsed from TOML) with stock defaults

use nocturne_core::{Result, Rgba};

/// Tuning for the ambient "firefly" effect
#[derive(Debug, Clone)]
pub struct AmbientConfig {
    /// Fixed draw color for every firefly
    pub color: Rgba,
    /// Sizes are drawn uniformly from [0, max_size)
    pub max_size: f32,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            color: Rgba::from_hex(0xd4e157),
            max_size: 2.0,
        }
    }
}

/// Tuning for the lifecycle "star" effect
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// Base color; per-particle opacity is applied on top
    pub color: Rgba,
    /// Sizes are drawn uniformly from [0, max_size)
    pub max_size: f32,
    /// Minimum lifespan in frames
    pub base_lifespan: i32,
    /// Random extra lifespan in frames, uniform in [0, jitter)
    pub lifespan_jitter: i32,
    /// Fade-in duration in frames
    pub spawn_frames: i32,
    /// Fade-out duration in frames (the tail end of the lifespan)
    pub fade_frames: i32,
    /// Wall-clock delay between expiry and the in-place reset
    pub reset_delay_ms: f64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            color: Rgba::WHITE,
            max_size: 3.0,
            base_lifespan: 300,
            lifespan_jitter: 300,
            spawn_frames: 60,
            fade_frames: 60,
            reset_delay_ms: 1000.0,
        }
    }
}

/// Engine-wide configuration; defaults match the stock effect tuning
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Hard cap on particles per surface
    pub max_particles: usize,
    /// Particles added per rendered frame while under the cap
    pub spawn_batch: usize,
    /// Render rate ceiling; the request chain still ticks at host rate
    pub max_fps: f64,
    /// Background wash painted at registration and restored by clears
    pub background: Rgba,
    pub ambient: AmbientConfig,
    pub lifecycle: LifecycleConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_particles: 100,
            spawn_batch: 10,
            max_fps: 60.0,
            background: Rgba::from_hex(0x0a0e1a),
            ambient: AmbientConfig::default(),
            lifecycle: LifecycleConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Minimum elapsed time between two rendered frames
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.max_fps
    }

    /// Parse a config from TOML text, falling back to defaults per key
    pub fn parse(text: &str) -> Result<Self> {
        let table: toml::value::Table = toml::from_str(text)?;
        Ok(Self::from_toml(&table))
    }

    /// Build a config from a TOML table; missing or malformed keys keep
    /// their defaults, out-of-range values are clamped.
    pub fn from_toml(table: &toml::value::Table) -> Self {
        let mut config = Self::default();

        if let Some(v) = table.get("max_particles") {
            let n = v.as_integer().unwrap_or(config.max_particles as i64);
            config.max_particles = n.clamp(1, 10_000) as usize;
        }
        if let Some(v) = table.get("spawn_batch") {
            let n = v.as_integer().unwrap_or(config.spawn_batch as i64);
            config.spawn_batch = n.clamp(1, 10_000) as usize;
        }
        if let Some(v) = table.get("max_fps") {
            config.max_fps = (toml_f32(v, config.max_fps as f32) as f64).clamp(1.0, 240.0);
        }
        if let Some(v) = table.get("background") {
            config.background = toml_rgba(v, config.background);
        }

        if let Some(t) = table.get("ambient").and_then(|v| v.as_table()) {
            if let Some(v) = t.get("color") {
                config.ambient.color = toml_rgba(v, config.ambient.color);
            }
            if let Some(v) = t.get("max_size") {
                config.ambient.max_size = toml_f32(v, config.ambient.max_size).max(0.1);
            }
        }

        if let Some(t) = table.get("lifecycle").and_then(|v| v.as_table()) {
            if let Some(v) = t.get("color") {
                config.lifecycle.color = toml_rgba(v, config.lifecycle.color);
            }
            if let Some(v) = t.get("max_size") {
                config.lifecycle.max_size = toml_f32(v, config.lifecycle.max_size).max(0.1);
            }
            if let Some(v) = t.get("base_lifespan") {
                let n = v.as_integer().unwrap_or(config.lifecycle.base_lifespan as i64);
                config.lifecycle.base_lifespan = n.clamp(1, 100_000) as i32;
            }
            if let Some(v) = t.get("lifespan_jitter") {
                let n = v.as_integer().unwrap_or(config.lifecycle.lifespan_jitter as i64);
                config.lifecycle.lifespan_jitter = n.clamp(0, 100_000) as i32;
            }
            if let Some(v) = t.get("spawn_frames") {
                let n = v.as_integer().unwrap_or(config.lifecycle.spawn_frames as i64);
                config.lifecycle.spawn_frames = n.clamp(1, 100_000) as i32;
            }
            if let Some(v) = t.get("fade_frames") {
                let n = v.as_integer().unwrap_or(config.lifecycle.fade_frames as i64);
                config.lifecycle.fade_frames = n.clamp(1, 100_000) as i32;
            }
            if let Some(v) = t.get("reset_delay_ms") {
                config.lifecycle.reset_delay_ms =
                    (toml_f32(v, config.lifecycle.reset_delay_ms as f32) as f64).max(0.0);
            }
        }

        config
    }
}

// ── TOML helpers (handle integer/float coercion) ──

fn toml_f32(v: &toml::Value, default: f32) -> f32 {
    v.as_float()
        .map(|f| f as f32)
        .or_else(|| v.as_integer().map(|i| i as f32))
        .unwrap_or(default)
}

fn toml_rgba(v: &toml::Value, default: Rgba) -> Rgba {
    if let Some(arr) = v.as_array() {
        if arr.len() >= 4 {
            return Rgba::new(
                toml_f32(&arr[0], default.r),
                toml_f32(&arr[1], default.g),
                toml_f32(&arr[2], default.b),
                toml_f32(&arr[3], default.a),
            );
        }
    }
    default
}
