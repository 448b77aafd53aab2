//! Built-in biome presets.

use super::bands::BandTable;
use super::config::Biome;
use crate::error::ConfigError;
use crate::noise::NoiseSettings;

/// Names accepted by `Biome::preset`.
pub const PRESET_NAMES: [&str; 6] = ["earth", "desert", "ice", "lava", "procedural", "scenario"];

impl Biome {
    /// Looks up a built-in biome by name (case-insensitive).
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        let biome = match name.to_ascii_lowercase().as_str() {
            "earth" => Self::earth(),
            "desert" => Self::desert(),
            "ice" => Self::ice(),
            "lava" => Self::lava(),
            "procedural" => Self::procedural(),
            "scenario" => Self::scenario(),
            _ => return Err(ConfigError::UnknownPreset(name.to_string())),
        };
        Ok(biome)
    }

    /// Temperate world with oceans and a snowy tint on steep ground.
    pub fn earth() -> Self {
        let noise = NoiseSettings { min: -0.05, max: 0.06, octaves: 5, ..NoiseSettings::default() };
        Self::from_hex_stops(
            "earth",
            &[
                (0.0, 0x2d4f2a),
                (0.35, 0xc2b280),
                (0.45, 0x4c7a34),
                (0.7, 0x6b5a44),
                (0.9, 0xf5f5f5),
            ],
            noise,
        )
        .with_sea(&[(-0.5, 0x0b2545), (0.0, 0x134074), (0.5, 0x5fa8d3)])
        .with_tint(0xdde6ee)
    }

    /// Dry dunes, no water.
    pub fn desert() -> Self {
        let noise = NoiseSettings { min: -0.03, max: 0.04, octaves: 3, scale: 1.2, ..NoiseSettings::default() };
        Self::from_hex_stops(
            "desert",
            &[(0.0, 0x8c5a2b), (0.4, 0xc99a5b), (0.8, 0xedc98a), (1.0, 0xf6e0b0)],
            noise,
        )
        .with_tint(0x9c6b3c)
    }

    /// Frozen world with a pale slush ocean.
    pub fn ice() -> Self {
        let noise = NoiseSettings { min: -0.04, max: 0.05, power: 1.4, ..NoiseSettings::default() };
        Self::from_hex_stops(
            "ice",
            &[(0.0, 0x8fb8d8), (0.5, 0xd7e8f5), (1.0, 0xffffff)],
            noise,
        )
        .with_sea(&[(-0.5, 0x3e6a8a), (0.5, 0xa9cde3)])
    }

    /// Cooling crust over molten seas.
    pub fn lava() -> Self {
        let noise = NoiseSettings { min: -0.06, max: 0.05, octaves: 6, lacunarity: 2.2, ..NoiseSettings::default() };
        let mut sea_noise = NoiseSettings::sea_default();
        sea_noise.scale = 2.0;
        Self {
            sea_noise,
            ..Self::from_hex_stops(
                "lava",
                &[(0.0, 0x1a1a1a), (0.5, 0x3b2f2f), (0.85, 0x5a4a42)],
                noise,
            )
            .with_sea(&[(-0.5, 0x7a1500), (0.0, 0xd94600), (0.5, 0xffb300)])
        }
    }

    /// Banded terrestrial world that also scatters trees, rocks and grass.
    pub fn procedural() -> Self {
        let noise = NoiseSettings { min: -0.08, max: 0.08, octaves: 5, scale: 1.2, ..NoiseSettings::default() };
        Self::from_hex_stops("procedural", &[(0.0, 0x1b3a5c), (1.0, 0xf4f7fb)], noise)
            .with_sea(&[(-0.5, 0x0e2a47), (0.5, 0x2e6f9e)])
            .with_bands(BandTable::default())
    }

    /// Black-to-white gradient over a single octave, used for smoke tests.
    pub fn scenario() -> Self {
        let noise = NoiseSettings {
            min: -0.1,
            max: 0.1,
            octaves: 1,
            lacunarity: 2.0,
            scale: 1.0,
            power: 1.0,
            warp: 0.0,
        };
        Self::from_hex_stops("scenario", &[(-1.0, 0x000000), (1.0, 0xffffff)], noise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_presets_validate() {
        for name in PRESET_NAMES {
            let biome = Biome::preset(name).unwrap();
            assert_eq!(biome.name, name);
            assert!(biome.validate().is_ok(), "{} failed validation", name);
        }
    }

    #[test]
    fn test_preset_lookup_is_case_insensitive() {
        assert_eq!(Biome::preset("Earth").unwrap(), Biome::earth());
    }

    #[test]
    fn test_unknown_preset() {
        assert_eq!(
            Biome::preset("swamp"),
            Err(ConfigError::UnknownPreset("swamp".to_string()))
        );
    }

    #[test]
    fn test_ocean_presets() {
        assert!(Biome::earth().has_ocean());
        assert!(!Biome::desert().has_ocean());
        assert!(!Biome::scenario().has_ocean());
        assert!(Biome::procedural().bands.is_some());
    }
}
