//! Validation errors shared by the generation stages.
//!
//! Both kinds are raised before any vertex is touched, so a failed
//! generation never leaves a partially displaced mesh behind.

use thiserror::Error;

/// Invalid biome, noise, band or scatter configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid noise bounds for '{0}': max ({2}) must be greater than min ({1})")]
    InvalidNoiseBounds(&'static str, f32, f32),
    #[error("Noise settings '{0}' must use at least one octave")]
    ZeroOctaves(&'static str),
    #[error("Non-finite value in '{0}'")]
    NonFinite(&'static str),
    #[error("Color gradient '{0}' has no stops")]
    EmptyGradient(&'static str),
    #[error("Band table has no bands")]
    EmptyBandTable,
    #[error("Band bounds must be strictly ascending: {0} follows {1}")]
    UnsortedBands(f32, f32),
    #[error("Band blend width must be positive, got {0}")]
    InvalidBlendWidth(f32),
    #[error("Band ending at {0} is narrower than the blend width {1}")]
    NarrowBand(f32, f32),
    #[error("Decoration probability {0} outside [0, 1]")]
    InvalidProbability(f32),
    #[error("Invalid scale range: {0}..{1}")]
    InvalidScaleRange(f32, f32),
    #[error("Invalid generator option '{0}': {1}")]
    InvalidOption(&'static str, f32),
    #[error("Unknown biome preset '{0}'")]
    UnknownPreset(String),
}

/// A vertex buffer whose shape is inconsistent or unusable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("Mesh has no vertices")]
    Empty,
    #[error("Buffer of {len} floats does not match stride {stride} x count {count}")]
    StrideMismatch { len: usize, stride: usize, count: usize },
    #[error("Attribute '{name}' has {len} entries, expected {expected}")]
    AttributeLength { name: &'static str, len: usize, expected: usize },
    #[error("Index count {0} is not a multiple of 3")]
    IndexCount(usize),
    #[error("Index {index} out of range for {vertices} vertices")]
    IndexOutOfRange { index: u32, vertices: usize },
    #[error("Unindexed vertex count {0} is not a multiple of 3")]
    TriangleCount(usize),
    #[error("Vertex {0} has a non-finite or zero-length position")]
    DegenerateVertex(usize),
}
