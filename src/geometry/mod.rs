//! Sphere meshes and vertex buffers.
//!
//! Provides the `Mesh` container consumed and produced by the generation
//! pipeline, plus icosahedral and cube-sphere sources for it.

mod cube_sphere;
mod icosphere;
mod mesh;

pub use cube_sphere::{cube_sphere, cube_sphere_vertex_count};
pub use icosphere::{icosphere, icosphere_vertex_count};
pub use mesh::{Mesh, smooth_normals};
