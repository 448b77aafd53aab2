//! The finished planet handed back to the caller.

use crate::geometry::Mesh;
use crate::ocean::OceanShell;
use crate::scatter::{DecorationInstance, PropCategory};

/// Represents a procedurally generated planet.
///
/// Everything is owned; the generator keeps no reference after returning.
#[derive(Debug, Clone, PartialEq)]
pub struct Planet {
    /// Master random seed for generation.
    pub seed: u64,
    /// Name of the biome the planet was generated with.
    pub biome_name: String,
    /// Displaced terrain with normals and per-vertex colors.
    pub terrain: Mesh,
    /// Ocean shell, present only when the biome has sea colors.
    pub ocean: Option<OceanShell>,
    /// Placed props, empty unless the biome has bands.
    pub decorations: Vec<DecorationInstance>,
    /// Per-vertex terrain elevation, aligned with `terrain.positions`.
    pub elevations: Vec<f32>,
}

impl Planet {
    /// Gets the minimum and maximum applied elevation.
    pub fn height_range(&self) -> (f32, f32) {
        self.elevations
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &e| (lo.min(e), hi.max(e)))
    }

    /// Gets the minimum and maximum terrain vertex distance from the center.
    pub fn radius_range(&self) -> (f32, f32) {
        self.terrain
            .positions
            .iter()
            .map(|p| p.length())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), r| (lo.min(r), hi.max(r)))
    }

    pub fn has_ocean(&self) -> bool {
        self.ocean.is_some()
    }

    /// Number of decorations in `category`.
    pub fn decoration_count(&self, category: PropCategory) -> usize {
        self.decorations.iter().filter(|d| d.category() == category).count()
    }
}
