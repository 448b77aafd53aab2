//! Pipeline module for orchestrating planet generation stages.
//!
//! Provides a trait-based architecture for modular generation stages
//! that can be composed into a complete planet generation pipeline.

mod config;
mod generator;
mod stage;

pub use config::{GeneratorOptions, SphereKind, StageConfig};
pub use generator::PlanetGenerator;
pub use stage::{
    DecorationStage, GenerationStage, OceanStage, Pipeline, PipelineError, PlanetBuild,
    ScatterStage, StageId, TerrainStage,
};
