//! Generator options shared by every stage.

use serde::{Deserialize, Serialize};

use crate::biomes::Biome;
use crate::error::ConfigError;
use crate::geometry::{cube_sphere, icosphere, Mesh};
use crate::scatter::ScatterConfig;

/// Sphere tessellation used when the generator builds its own input mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SphereKind {
    /// Subdivided icosahedron; `detail` is the subdivision count.
    #[default]
    Icosphere,
    /// Spherified cube; `detail` is the per-face grid resolution.
    CubeSphere,
}

impl SphereKind {
    pub fn build(self, radius: f32, detail: u32) -> Mesh {
        match self {
            SphereKind::Icosphere => icosphere(radius, detail),
            SphereKind::CubeSphere => cube_sphere(radius, detail.max(1)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SphereKind::Icosphere => "icosphere",
            SphereKind::CubeSphere => "cube_sphere",
        }
    }
}

/// Knobs that are not part of a biome description.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Radius of generated input spheres.
    pub radius: f32,
    /// Ocean rest radius as a fraction of the original sphere radius.
    pub ocean_radius_scale: f32,
    /// Ocean material opacity.
    pub ocean_opacity: f32,
    /// Run band decoration and scatter when the biome has bands.
    pub decorate: bool,
    pub scatter: ScatterConfig,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            radius: 1.0,
            ocean_radius_scale: 0.985,
            ocean_opacity: 0.85,
            decorate: true,
            scatter: ScatterConfig::default(),
        }
    }
}

impl GeneratorOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::InvalidOption("radius", self.radius));
        }
        if !(self.ocean_radius_scale.is_finite() && self.ocean_radius_scale > 0.0) {
            return Err(ConfigError::InvalidOption("ocean_radius_scale", self.ocean_radius_scale));
        }
        if !(0.0..=1.0).contains(&self.ocean_opacity) {
            return Err(ConfigError::InvalidOption("ocean_opacity", self.ocean_opacity));
        }
        self.scatter.validate()
    }
}

/// Configuration passed to each generation stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageConfig {
    pub biome: Biome,
    pub options: GeneratorOptions,
}

impl StageConfig {
    pub fn new(biome: Biome, options: GeneratorOptions) -> Self {
        Self { biome, options }
    }

    /// Validates the biome and options together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.biome.validate()?;
        self.options.validate()
    }

    /// True when the decoration and scatter stages have work to do.
    pub fn decorates(&self) -> bool {
        self.options.decorate && self.biome.bands.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_valid() {
        assert!(GeneratorOptions::default().validate().is_ok());
    }

    #[test]
    fn test_bad_options_rejected() {
        let opts = GeneratorOptions { ocean_opacity: -0.1, ..Default::default() };
        assert_eq!(opts.validate(), Err(ConfigError::InvalidOption("ocean_opacity", -0.1)));
        let opts = GeneratorOptions { radius: 0.0, ..Default::default() };
        assert_eq!(opts.validate(), Err(ConfigError::InvalidOption("radius", 0.0)));
    }

    #[test]
    fn test_decorates_needs_bands() {
        let options = GeneratorOptions::default();
        assert!(!StageConfig::new(Biome::earth(), options).decorates());
        assert!(StageConfig::new(Biome::procedural(), options).decorates());
        let off = GeneratorOptions { decorate: false, ..options };
        assert!(!StageConfig::new(Biome::procedural(), off).decorates());
    }

    #[test]
    fn test_sphere_kinds() {
        assert_eq!(SphereKind::Icosphere.build(1.0, 3).vertex_count(), 642);
        assert!(SphereKind::CubeSphere.build(1.0, 4).vertex_count() > 0);
    }
}
