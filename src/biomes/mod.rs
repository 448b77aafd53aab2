//! Biomes: gradient palettes, noise shaping and optional elevation bands.
//!
//! A `Biome` is the full declarative description of how a planet looks.
//! When it carries a `BandTable`, land color comes from the bands and each
//! band may roll decoration placements for the scatter stage.

mod bands;
mod config;
mod presets;

pub use bands::{collect_placements, Band, BandKind, BandTable, DecorationRule};
pub use config::{Biome, BiomeLoadError};
pub use presets::PRESET_NAMES;
