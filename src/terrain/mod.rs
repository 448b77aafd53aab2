//! Terrain generation module.
//!
//! Displaces a sphere mesh along its original directions by layered noise,
//! colors each vertex and provides the `Planet` result type.

mod displace;
mod planet;

pub use displace::{steepness, DisplacedTerrain, SurfaceSample, TerrainEngine, WORLD_UP};
pub use planet::Planet;
