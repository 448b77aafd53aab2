//! Declarative biome description.

use serde::{Deserialize, Serialize};

use super::bands::BandTable;
use crate::color::{Color, GradientStop};
use crate::error::ConfigError;
use crate::noise::NoiseSettings;

/// Coloring and noise shaping for one planet style.
///
/// Field names follow camelCase in JSON (`seaColors`, `tintColor`,
/// `seaNoise`). Omitted keys take the values from `Biome::default()`.
/// Omitted keys inside `noise` take `NoiseSettings::default()`, and inside
/// `seaNoise` they take `NoiseSettings::sea_default()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Biome {
    /// Display name, used in logs and exports.
    pub name: String,
    /// Land gradient over normalized elevation in [0, 1].
    pub colors: Vec<GradientStop>,
    /// Ocean gradient. `None` means no ocean shell is built.
    pub sea_colors: Option<Vec<GradientStop>>,
    /// Color blended in proportionally to surface steepness.
    pub tint_color: Option<Color>,
    /// Terrain elevation noise.
    pub noise: NoiseSettings,
    /// Ocean wave and water color noise.
    #[serde(deserialize_with = "NoiseSettings::deserialize_sea")]
    pub sea_noise: NoiseSettings,
    /// Optional band table. When present it colors the land instead of
    /// `colors` and drives decoration placement.
    pub bands: Option<BandTable>,
}

impl Default for Biome {
    fn default() -> Self {
        Self {
            name: "custom".to_string(),
            colors: Vec::new(),
            sea_colors: None,
            tint_color: None,
            noise: NoiseSettings::default(),
            sea_noise: NoiseSettings::sea_default(),
            bands: None,
        }
    }
}

impl Biome {
    /// Builds a land-only biome from `(threshold, 0xRRGGBB)` pairs.
    pub fn from_hex_stops(name: &str, stops: &[(f32, u32)], noise: NoiseSettings) -> Self {
        Self {
            name: name.to_string(),
            colors: hex_stops(stops),
            noise,
            ..Default::default()
        }
    }

    pub fn with_sea(mut self, stops: &[(f32, u32)]) -> Self {
        self.sea_colors = Some(hex_stops(stops));
        self
    }

    pub fn with_tint(mut self, hex: u32) -> Self {
        self.tint_color = Some(Color::from_hex(hex));
        self
    }

    pub fn with_bands(mut self, bands: BandTable) -> Self {
        self.bands = Some(bands);
        self
    }

    pub fn has_ocean(&self) -> bool {
        self.sea_colors.is_some()
    }

    /// Validates every part of the biome. Called once before generation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.colors.is_empty() {
            return Err(ConfigError::EmptyGradient("colors"));
        }
        self.noise.validate("noise")?;

        if let Some(sea_colors) = &self.sea_colors {
            if sea_colors.is_empty() {
                return Err(ConfigError::EmptyGradient("seaColors"));
            }
            self.sea_noise.validate("seaNoise")?;
        }

        if let Some(tint) = self.tint_color {
            if !tint.to_array().iter().all(|c| c.is_finite()) {
                return Err(ConfigError::NonFinite("tintColor"));
            }
        }

        if let Some(bands) = &self.bands {
            bands.validate()?;
        }
        Ok(())
    }

    /// Parses and validates a biome from JSON.
    pub fn from_json(json: &str) -> Result<Self, BiomeLoadError> {
        let biome: Biome = serde_json::from_str(json)?;
        biome.validate()?;
        Ok(biome)
    }
}

fn hex_stops(stops: &[(f32, u32)]) -> Vec<GradientStop> {
    stops
        .iter()
        .map(|&(threshold, hex)| GradientStop::new(threshold, Color::from_hex(hex)))
        .collect()
}

/// Errors from loading a biome description.
#[derive(thiserror::Error, Debug)]
pub enum BiomeLoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed biome JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid biome: {0}")]
    Config(#[from] ConfigError),
}
