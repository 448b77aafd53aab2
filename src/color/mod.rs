//! Colors and threshold-based color gradients.

mod gradient;

pub use gradient::{Color, ColorGradient, GradientStop};
