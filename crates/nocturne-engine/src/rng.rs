//! Lightweight xorshift32 PRNG — no external crate needed

use std::f32::consts::TAU;

pub struct EffectRng {
    state: u32,
}

impl EffectRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() as f32) / (u32::MAX as f32)
    }

    /// Returns a float in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Returns a heading in [0, 2π) radians
    pub fn angle(&mut self) -> f32 {
        self.next_f32() * TAU
    }

    /// Returns a float in [-magnitude, magnitude)
    pub fn signed_unit(&mut self, magnitude: f32) -> f32 {
        self.range(-magnitude, magnitude)
    }
}
