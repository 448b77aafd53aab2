//! Noise generation for terrain, ocean waves and water color.
//!
//! Uses simdnoise simplex noise sampled on the unit sphere.

mod field;
mod fractal;

pub use field::NoiseField;
pub use fractal::{NoiseSettings, sample_elevation};
