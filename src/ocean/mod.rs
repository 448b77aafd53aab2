//! Ocean shell generation.
//!
//! Built only for biomes with sea colors: a slightly smaller sphere whose
//! rest and wave position sets act as morph targets for the renderer.

mod shell;

pub use shell::{OceanBuilder, OceanShell};
