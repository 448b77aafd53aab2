//! Deterministic procedural planet generator.
//!
//! Takes a sphere mesh, a declarative biome and a seed, and produces a
//! displaced, vertex-colored terrain mesh, an optional ocean shell with rest
//! and wave morph targets, and optional scattered props (trees, rocks, grass).
//!
//! ```no_run
//! use planetgen::{Biome, PlanetGenerator};
//! use planetgen::geometry::icosphere;
//!
//! let planet = PlanetGenerator::new(Biome::earth(), 42).generate(icosphere(1.0, 4))?;
//! if let Some(ocean) = &planet.ocean {
//!     let _frame = ocean.blend(0.5);
//! }
//! # Ok::<(), planetgen::pipeline::PipelineError>(())
//! ```

pub mod biomes;
pub mod color;
pub mod error;
pub mod export;
pub mod geometry;
pub mod noise;
pub mod ocean;
pub mod pipeline;
pub mod scatter;
pub mod terrain;

pub use biomes::{Biome, BandTable};
pub use color::{Color, ColorGradient};
pub use error::{ConfigError, MeshError};
pub use geometry::Mesh;
pub use noise::{NoiseField, NoiseSettings};
pub use ocean::OceanShell;
pub use pipeline::{GeneratorOptions, PipelineError, PlanetGenerator, SphereKind};
pub use scatter::{DecorationInstance, PropKind, PropLibrary};
pub use terrain::{Planet, TerrainEngine};
