//! Multi-octave elevation sampling with a signed power curve.

use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize};

use super::field::NoiseField;
use crate::error::ConfigError;

/// Noise shaping parameters for one elevation field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    /// Lower clamp for elevation.
    pub min: f32,
    /// Upper clamp for elevation. Must be greater than `min`.
    pub max: f32,
    /// Number of noise octaves.
    pub octaves: u8,
    /// Frequency multiplier per octave (typically 2.0).
    pub lacunarity: f32,
    /// Base frequency.
    pub scale: f32,
    /// Exponent applied to the elevation magnitude, sign preserved.
    pub power: f32,
    /// Reserved. Accepted in configuration but not applied.
    pub warp: f32,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            min: -0.05,
            max: 0.05,
            octaves: 4,
            lacunarity: 2.0,
            scale: 1.5,
            power: 1.0,
            warp: 0.0,
        }
    }
}

impl NoiseSettings {
    /// Default settings for ocean waves and water color.
    pub fn sea_default() -> Self {
        Self {
            min: -0.02,
            max: 0.02,
            octaves: 2,
            lacunarity: 2.0,
            scale: 3.0,
            power: 1.0,
            warp: 0.0,
        }
    }

    /// Deserializes a possibly partial block, taking missing fields from
    /// `sea_default()` rather than `default()`.
    pub fn deserialize_sea<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        NoiseOverrides::deserialize(deserializer).map(|o| o.apply(Self::sea_default()))
    }

    /// Checks bounds and shaping values. `label` names the field in errors.
    pub fn validate(&self, label: &'static str) -> Result<(), ConfigError> {
        let values = [self.min, self.max, self.lacunarity, self.scale, self.power, self.warp];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::NonFinite(label));
        }
        if self.max <= self.min {
            return Err(ConfigError::InvalidNoiseBounds(label, self.min, self.max));
        }
        if self.octaves == 0 {
            return Err(ConfigError::ZeroOctaves(label));
        }
        Ok(())
    }

    /// Maps a clamped elevation to [0, 1] across `min..max`.
    pub fn normalize(&self, elevation: f32) -> f32 {
        (elevation - self.min) / (self.max - self.min)
    }

    /// Maps a clamped elevation to [-1, 1] across `min..max`.
    pub fn normalize_signed(&self, elevation: f32) -> f32 {
        self.normalize(elevation) * 2.0 - 1.0
    }
}

/// Samples the shaped, clamped elevation in direction `dir`.
///
/// `dir` must already be unit length. Octave amplitude starts at 1 and halves
/// each octave while the frequency starts at `scale` and grows by
/// `lacunarity`. The sum is not renormalized; the clamp bounds it.
pub fn sample_elevation(dir: Vec3, settings: &NoiseSettings, field: &NoiseField) -> f32 {
    let mut elevation = 0.0f32;
    let mut amplitude = 1.0f32;
    let mut frequency = settings.scale;

    for _ in 0..settings.octaves {
        elevation += field.sample(dir * frequency) * amplitude;
        amplitude *= 0.5;
        frequency *= settings.lacunarity;
    }

    let shaped = elevation.signum() * elevation.abs().powf(settings.power);
    shaped.clamp(settings.min, settings.max)
}

/// A noise block where every field is optional.
#[derive(Deserialize)]
struct NoiseOverrides {
    min: Option<f32>,
    max: Option<f32>,
    octaves: Option<u8>,
    lacunarity: Option<f32>,
    scale: Option<f32>,
    power: Option<f32>,
    warp: Option<f32>,
}

impl NoiseOverrides {
    fn apply(self, base: NoiseSettings) -> NoiseSettings {
        NoiseSettings {
            min: self.min.unwrap_or(base.min),
            max: self.max.unwrap_or(base.max),
            octaves: self.octaves.unwrap_or(base.octaves),
            lacunarity: self.lacunarity.unwrap_or(base.lacunarity),
            scale: self.scale.unwrap_or(base.scale),
            power: self.power.unwrap_or(base.power),
            warp: self.warp.unwrap_or(base.warp),
        }
    }
}
