//! High-level entry point assembling the standard stage sequence.

use log::info;

use super::config::{GeneratorOptions, SphereKind, StageConfig};
use super::stage::{
    DecorationStage, OceanStage, Pipeline, PipelineError, PlanetBuild, ScatterStage, TerrainStage,
};
use crate::biomes::Biome;
use crate::error::ConfigError;
use crate::geometry::Mesh;
use crate::noise::NoiseField;
use crate::scatter::PropCategory;
use crate::terrain::{Planet, TerrainEngine};

/// Generates planets for one biome and seed.
///
/// Generation is a pure function of the input mesh, biome, options and seed.
/// The generator holds no mutable state, so one instance can serve several
/// threads.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanetGenerator {
    biome: Biome,
    seed: u64,
    options: GeneratorOptions,
}

impl PlanetGenerator {
    pub fn new(biome: Biome, seed: u64) -> Self {
        Self { biome, seed, options: GeneratorOptions::default() }
    }

    pub fn with_options(mut self, options: GeneratorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn biome(&self) -> &Biome {
        &self.biome
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// The terrain engine the terrain stage uses, for sampling the surface
    /// outside a mesh (previews, probes).
    pub fn terrain_engine(&self) -> Result<TerrainEngine, ConfigError> {
        TerrainEngine::new(&self.biome, NoiseField::new(self.seed))
    }

    /// Builds the stage sequence for this biome.
    ///
    /// Ocean is always scheduled and skips itself without sea colors; the
    /// decoration and scatter stages are only added when the biome has bands
    /// and decoration is enabled.
    pub fn pipeline(&self) -> Pipeline {
        let config = StageConfig::new(self.biome.clone(), self.options);
        let decorates = config.decorates();
        let mut pipeline = Pipeline::new(config);
        pipeline.add_stage(TerrainStage).add_stage(OceanStage);
        if decorates {
            pipeline.add_stage(DecorationStage).add_stage(ScatterStage);
        }
        pipeline
    }

    /// Generates a planet from `sphere`.
    ///
    /// The biome, options and mesh are all validated before any vertex is
    /// touched.
    pub fn generate(&self, sphere: Mesh) -> Result<Planet, PipelineError> {
        self.generate_with_callbacks(sphere, |_, _, _| {}, |_, _, _| {})
    }

    /// Like `generate`, reporting stage progress through the callbacks.
    pub fn generate_with_callbacks<F1, F2>(
        &self,
        sphere: Mesh,
        on_stage_start: F1,
        on_stage_complete: F2,
    ) -> Result<Planet, PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        sphere.validate_sphere()?;
        let pipeline = self.pipeline();
        let mut build = PlanetBuild::new(sphere, self.seed);
        pipeline.run_with_callbacks(&mut build, on_stage_start, on_stage_complete)?;

        let terrain = build.terrain.ok_or_else(|| {
            PipelineError::StageFailed("generate".to_string(), "no terrain produced".to_string())
        })?;
        let planet = Planet {
            seed: self.seed,
            biome_name: self.biome.name.clone(),
            terrain: terrain.mesh,
            ocean: build.ocean,
            decorations: build.decorations,
            elevations: terrain.elevations,
        };

        let (lo, hi) = planet.height_range();
        info!(
            "generated '{}' planet (seed {}): {} vertices, elevation {:.4}..{:.4}, ocean: {}, {} trees, {} rocks, {} grass",
            planet.biome_name,
            planet.seed,
            planet.terrain.vertex_count(),
            lo,
            hi,
            planet.has_ocean(),
            planet.decoration_count(PropCategory::Tree),
            planet.decoration_count(PropCategory::Rock),
            planet.decoration_count(PropCategory::Grass),
        );
        Ok(planet)
    }

    /// Builds a sphere of `options.radius` and generates on it.
    pub fn generate_sphere(&self, kind: SphereKind, detail: u32) -> Result<Planet, PipelineError> {
        self.options.validate()?;
        self.generate(kind.build(self.options.radius, detail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;
    use crate::pipeline::StageId;

    #[test]
    fn test_pipeline_shape() {
        let plain = PlanetGenerator::new(Biome::earth(), 1).pipeline();
        assert_eq!(plain.stage_ids(), vec![StageId::Terrain, StageId::Ocean]);

        let banded = PlanetGenerator::new(Biome::procedural(), 1).pipeline();
        assert_eq!(banded.stage_count(), 4);
    }

    #[test]
    fn test_generate_earth() {
        let planet = PlanetGenerator::new(Biome::earth(), 5)
            .generate_sphere(SphereKind::Icosphere, 2)
            .unwrap();
        assert_eq!(planet.elevations.len(), planet.terrain.vertex_count());
        assert!(planet.ocean.is_some());
        assert!(planet.decorations.is_empty());
        assert_eq!(planet.biome_name, "earth");
    }

    #[test]
    fn test_engine_matches_planet() {
        let generator = PlanetGenerator::new(Biome::desert(), 21);
        let planet = generator.generate_sphere(SphereKind::Icosphere, 1).unwrap();
        let engine = generator.terrain_engine().unwrap();
        let sphere = SphereKind::Icosphere.build(1.0, 1);
        for (p, e) in sphere.positions.iter().zip(&planet.elevations) {
            assert!((engine.elevation(p.normalize()) - e).abs() < 1e-4);
        }
    }

    #[test]
    fn test_empty_mesh_rejected() {
        let err = PlanetGenerator::new(Biome::earth(), 5).generate(Mesh::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Mesh(MeshError::Empty)));
    }

    #[test]
    fn test_bad_options_rejected() {
        let options = GeneratorOptions { ocean_radius_scale: f32::NAN, ..Default::default() };
        let generator = PlanetGenerator::new(Biome::earth(), 5).with_options(options);
        let err = generator.generate_sphere(SphereKind::Icosphere, 1).unwrap_err();
        assert!(matches!(err, PipelineError::Config(ConfigError::InvalidOption("ocean_radius_scale", _))));
    }
}
