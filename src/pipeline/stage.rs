//! Generation stage trait and pipeline orchestration.

use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use super::config::StageConfig;
use crate::biomes::collect_placements;
use crate::error::{ConfigError, MeshError};
use crate::geometry::Mesh;
use crate::noise::NoiseField;
use crate::ocean::{OceanBuilder, OceanShell};
use crate::scatter::{scatter, DecorationInstance, PlacementRecord};
use crate::terrain::{DisplacedTerrain, TerrainEngine};

/// Unique identifier for generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Noise displacement and coloring of the input sphere.
    Terrain,
    /// Ocean shell with rest and wave positions.
    Ocean,
    /// Band classification emitting placement records.
    Decoration,
    /// Capping and orienting placement records into instances.
    Scatter,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Terrain => "terrain",
            StageId::Ocean => "ocean",
            StageId::Decoration => "decoration",
            StageId::Scatter => "scatter",
        }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Stage '{0}' failed: {1}")]
    StageFailed(String, String),
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid mesh: {0}")]
    Mesh(#[from] MeshError),
}

/// Mutable state threaded through the stages of one generation call.
///
/// Each call owns its own noise field and rng, so separate builds never
/// share state.
#[derive(Debug)]
pub struct PlanetBuild {
    pub seed: u64,
    pub field: NoiseField,
    pub rng: ChaCha8Rng,
    /// Input sphere, taken by the terrain stage.
    pub sphere: Option<Mesh>,
    pub terrain: Option<DisplacedTerrain>,
    pub ocean: Option<OceanShell>,
    pub placements: Vec<PlacementRecord>,
    pub decorations: Vec<DecorationInstance>,
}

impl PlanetBuild {
    pub fn new(sphere: Mesh, seed: u64) -> Self {
        Self {
            seed,
            field: NoiseField::new(seed),
            rng: ChaCha8Rng::seed_from_u64(seed),
            sphere: Some(sphere),
            terrain: None,
            ocean: None,
            placements: Vec::new(),
            decorations: Vec::new(),
        }
    }
}

fn missing_terrain(stage: &str) -> PipelineError {
    PipelineError::StageFailed(stage.to_string(), "terrain has not been generated".to_string())
}

/// Trait for implementing generation stages.
///
/// Each stage reads what earlier stages left in the `PlanetBuild` and adds
/// its own output.
pub trait GenerationStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the generation stage, modifying the build in place.
    fn execute(&self, build: &mut PlanetBuild, config: &StageConfig) -> Result<(), PipelineError>;
}

/// Orchestrates multiple generation stages into a complete pipeline.
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
    config: StageConfig,
}

impl Pipeline {
    /// Creates a new empty pipeline with the given configuration.
    pub fn new(config: StageConfig) -> Self {
        Self {
            stages: Vec::new(),
            config,
        }
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn stage_ids(&self) -> Vec<StageId> {
        self.stages.iter().map(|s| s.id()).collect()
    }

    /// Checks that every stage's dependencies run before it.
    pub fn check_dependencies(&self) -> Result<(), PipelineError> {
        let mut completed: Vec<StageId> = Vec::new();
        for stage in &self.stages {
            if let Some(dep) = stage.dependencies().iter().find(|d| !completed.contains(*d)) {
                return Err(PipelineError::MissingDependency(
                    stage.name().to_string(),
                    dep.name().to_string(),
                ));
            }
            completed.push(stage.id());
        }
        Ok(())
    }

    /// Executes all stages in order on the given build.
    pub fn run(&self, build: &mut PlanetBuild) -> Result<(), PipelineError> {
        self.run_with_callbacks(build, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// Dependencies and configuration are checked before the first stage
    /// starts.
    ///
    /// # Arguments
    /// * `build` - The planet under construction
    /// * `on_stage_start` - Called when each stage begins
    /// * `on_stage_complete` - Called when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        build: &mut PlanetBuild,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        self.check_dependencies()?;
        self.config.validate()?;

        let total = self.stages.len();
        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);
            stage.execute(build, &self.config)?;
            debug!("stage '{}' complete ({}/{})", stage.id().name(), i + 1, total);
            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}

/// Displaces and colors the input sphere.
pub struct TerrainStage;

impl GenerationStage for TerrainStage {
    fn id(&self) -> StageId {
        StageId::Terrain
    }

    fn name(&self) -> &str {
        "Terrain Displacement"
    }

    fn execute(&self, build: &mut PlanetBuild, config: &StageConfig) -> Result<(), PipelineError> {
        let engine = TerrainEngine::new(&config.biome, build.field)?;
        let sphere = build.sphere.take().ok_or_else(|| {
            PipelineError::StageFailed(self.name().to_string(), "no input sphere".to_string())
        })?;
        build.terrain = Some(engine.displace(sphere)?);
        Ok(())
    }
}

/// Builds the ocean shell when the biome has sea colors.
pub struct OceanStage;

impl GenerationStage for OceanStage {
    fn id(&self) -> StageId {
        StageId::Ocean
    }

    fn name(&self) -> &str {
        "Ocean Shell"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Terrain]
    }

    fn execute(&self, build: &mut PlanetBuild, config: &StageConfig) -> Result<(), PipelineError> {
        let builder = OceanBuilder::new(
            &config.biome,
            build.field,
            config.options.ocean_radius_scale,
            config.options.ocean_opacity,
        )?;
        let Some(builder) = builder else {
            debug!("biome '{}' has no sea colors, skipping ocean", config.biome.name);
            return Ok(());
        };

        let terrain = build.terrain.as_ref().ok_or_else(|| missing_terrain(self.name()))?;
        let ocean = builder.build(&terrain.directions, &terrain.base_radii, terrain.mesh.indices.clone())?;
        build.ocean = Some(ocean);
        Ok(())
    }
}

/// Rolls band decoration rules for every terrain vertex.
pub struct DecorationStage;

impl GenerationStage for DecorationStage {
    fn id(&self) -> StageId {
        StageId::Decoration
    }

    fn name(&self) -> &str {
        "Band Decoration"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Terrain]
    }

    fn execute(&self, build: &mut PlanetBuild, config: &StageConfig) -> Result<(), PipelineError> {
        let Some(bands) = &config.biome.bands else {
            return Ok(());
        };

        let terrain = build.terrain.as_ref().ok_or_else(|| missing_terrain(self.name()))?;
        let noise = &config.biome.noise;
        let heights: Vec<f32> = terrain.elevations.iter().map(|&e| noise.normalize_signed(e)).collect();
        let placements = collect_placements(bands, &terrain.mesh.positions, &heights, &mut build.rng);
        debug!("{} placement candidates", placements.len());
        build.placements = placements;
        Ok(())
    }
}

/// Caps and orients placement records into decoration instances.
pub struct ScatterStage;

impl GenerationStage for ScatterStage {
    fn id(&self) -> StageId {
        StageId::Scatter
    }

    fn name(&self) -> &str {
        "Asset Scatter"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Decoration]
    }

    fn execute(&self, build: &mut PlanetBuild, config: &StageConfig) -> Result<(), PipelineError> {
        let records = std::mem::take(&mut build.placements);
        build.decorations = scatter(&records, &config.options.scatter, &mut build.rng);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biomes::Biome;
    use crate::geometry::icosphere;
    use crate::pipeline::GeneratorOptions;

    fn config(biome: Biome) -> StageConfig {
        StageConfig::new(biome, GeneratorOptions::default())
    }

    #[test]
    fn test_missing_dependency() {
        let mut pipeline = Pipeline::new(config(Biome::earth()));
        pipeline.add_stage(OceanStage);
        let mut build = PlanetBuild::new(icosphere(1.0, 1), 1);
        match pipeline.run(&mut build) {
            Err(PipelineError::MissingDependency(stage, dep)) => {
                assert_eq!(stage, "Ocean Shell");
                assert_eq!(dep, "terrain");
            }
            other => panic!("expected missing dependency, got {:?}", other),
        }
        assert!(build.sphere.is_some());
    }

    #[test]
    fn test_callbacks_fire_in_order() {
        let mut pipeline = Pipeline::new(config(Biome::earth()));
        pipeline.add_stage(TerrainStage).add_stage(OceanStage);
        let mut build = PlanetBuild::new(icosphere(1.0, 1), 3);
        let mut started = Vec::new();
        let mut finished = 0;
        pipeline
            .run_with_callbacks(
                &mut build,
                |name, i, total| started.push((name.to_string(), i, total)),
                |_, _, _| finished += 1,
            )
            .unwrap();
        assert_eq!(started[0], ("Terrain Displacement".to_string(), 0, 2));
        assert_eq!(started[1].0, "Ocean Shell");
        assert_eq!(finished, 2);
        assert!(build.terrain.is_some() && build.ocean.is_some());
    }

    #[test]
    fn test_invalid_config_stops_before_terrain() {
        let mut biome = Biome::earth();
        biome.noise.max = biome.noise.min;
        let mut pipeline = Pipeline::new(config(biome));
        pipeline.add_stage(TerrainStage);
        let sphere = icosphere(1.0, 1);
        let mut build = PlanetBuild::new(sphere.clone(), 3);
        assert!(matches!(pipeline.run(&mut build), Err(PipelineError::Config(_))));
        assert_eq!(build.sphere, Some(sphere));
        assert!(build.terrain.is_none());
    }

    #[test]
    fn test_decoration_then_scatter() {
        let mut pipeline = Pipeline::new(config(Biome::procedural()));
        pipeline
            .add_stage(TerrainStage)
            .add_stage(DecorationStage)
            .add_stage(ScatterStage);
        let mut build = PlanetBuild::new(icosphere(1.0, 4), 12);
        pipeline.run(&mut build).unwrap();
        assert!(build.placements.is_empty());
        assert!(build.decorations.len() <= 300);
    }
}
