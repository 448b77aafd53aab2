//! Seeded 3D simplex noise field.

use glam::Vec3;
use simdnoise::NoiseBuilder;

/// Deterministic coherent noise over 3D space.
///
/// The field holds nothing but its seed, so every generation call can own an
/// independent copy and two planets can be built on separate threads without
/// sharing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseField {
    seed: i32,
}

impl NoiseField {
    /// Creates a field from a 64-bit generation seed.
    pub fn new(seed: u64) -> Self {
        // Fold the high half in so seeds differing only above bit 32 still differ.
        let folded = (seed ^ (seed >> 32)) as u32;
        Self { seed: folded as i32 }
    }

    /// Returns the seed handed to the simplex generator.
    pub fn seed(&self) -> i32 {
        self.seed
    }

    /// Derives an independent field, e.g. for ocean colors.
    pub fn with_offset(&self, salt: i32) -> Self {
        Self {
            seed: self.seed.wrapping_add(salt.wrapping_mul(31337)),
        }
    }

    /// Samples the field at `pos`. Callers scale `pos` by a frequency first.
    ///
    /// Uses 4D simplex noise with w fixed at 0, which samples seamlessly on
    /// spherical surfaces. The result is clamped to [-1, 1].
    pub fn sample(&self, pos: Vec3) -> f32 {
        let value = NoiseBuilder::fbm_4d_offset(pos.x, 1, pos.y, 1, pos.z, 1, 0.0, 1)
            .with_seed(self.seed)
            .with_freq(1.0)
            .with_octaves(1)
            .generate()
            .0[0];

        if value.is_finite() {
            value.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }
}
