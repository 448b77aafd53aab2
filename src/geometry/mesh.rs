//! Vertex buffers with optional indices, normals and colors.

use std::collections::HashMap;

use glam::Vec3;

use crate::color::Color;
use crate::error::MeshError;

/// A triangle mesh owned by value.
///
/// `normals` and `colors` are either empty or hold one entry per vertex.
/// Without `indices`, every three consecutive vertices form a triangle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub colors: Vec<Color>,
    pub indices: Option<Vec<u32>>,
}

impl Mesh {
    /// Creates a mesh from positions and optional triangle indices.
    pub fn new(positions: Vec<Vec3>, indices: Option<Vec<u32>>) -> Result<Self, MeshError> {
        let mesh = Self {
            positions,
            normals: Vec::new(),
            colors: Vec::new(),
            indices,
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Creates a mesh from a flat float buffer.
    ///
    /// `stride` is the number of floats per vertex (at least 3, position
    /// first) and `count` the vertex count the buffer claims to hold.
    pub fn from_flat(
        data: &[f32],
        stride: usize,
        count: usize,
        indices: Option<Vec<u32>>,
    ) -> Result<Self, MeshError> {
        if stride < 3 || stride.checked_mul(count) != Some(data.len()) {
            return Err(MeshError::StrideMismatch { len: data.len(), stride, count });
        }
        let positions = data
            .chunks_exact(stride)
            .map(|v| Vec3::new(v[0], v[1], v[2]))
            .collect();
        Self::new(positions, indices)
    }

    /// Checks that the buffers are consistent and every vertex is usable.
    pub fn validate(&self) -> Result<(), MeshError> {
        let n = self.positions.len();
        if n == 0 {
            return Err(MeshError::Empty);
        }
        if !self.normals.is_empty() && self.normals.len() != n {
            return Err(MeshError::AttributeLength { name: "normals", len: self.normals.len(), expected: n });
        }
        if !self.colors.is_empty() && self.colors.len() != n {
            return Err(MeshError::AttributeLength { name: "colors", len: self.colors.len(), expected: n });
        }
        match &self.indices {
            Some(indices) => {
                if indices.len() % 3 != 0 {
                    return Err(MeshError::IndexCount(indices.len()));
                }
                if let Some(&index) = indices.iter().find(|&&i| i as usize >= n) {
                    return Err(MeshError::IndexOutOfRange { index, vertices: n });
                }
            }
            None if n % 3 != 0 => return Err(MeshError::TriangleCount(n)),
            None => {}
        }
        if let Some(i) = self.positions.iter().position(|p| !p.is_finite()) {
            return Err(MeshError::DegenerateVertex(i));
        }
        Ok(())
    }

    /// Like `validate`, and additionally rejects vertices at the origin,
    /// which have no outward direction to displace along.
    pub fn validate_sphere(&self) -> Result<(), MeshError> {
        self.validate()?;
        match self.positions.iter().position(|p| p.length_squared() == 0.0) {
            Some(i) => Err(MeshError::DegenerateVertex(i)),
            None => Ok(()),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 3,
        }
    }

    /// Iterates triangles as vertex index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        let count = self.triangle_count();
        (0..count).map(move |t| match &self.indices {
            Some(indices) => [
                indices[t * 3] as usize,
                indices[t * 3 + 1] as usize,
                indices[t * 3 + 2] as usize,
            ],
            None => [t * 3, t * 3 + 1, t * 3 + 2],
        })
    }

    /// Recomputes smooth per-vertex normals from the current positions.
    pub fn compute_vertex_normals(&mut self) {
        self.normals = smooth_normals(&self.positions, self.triangles());
    }
}

/// Area-weighted smooth normals for `positions`.
///
/// Vertices sharing an exact position are welded, so seams in unindexed or
/// split meshes still shade smoothly. Vertices touched by no triangle (or only
/// degenerate ones) fall back to their radial direction.
pub fn smooth_normals(positions: &[Vec3], triangles: impl Iterator<Item = [usize; 3]>) -> Vec<Vec3> {
    let mut group_of = Vec::with_capacity(positions.len());
    let mut groups: HashMap<[u32; 3], usize> = HashMap::with_capacity(positions.len());
    for p in positions {
        // Adding +0.0 folds -0.0 into +0.0 so both signs weld.
        let key = [(p.x + 0.0).to_bits(), (p.y + 0.0).to_bits(), (p.z + 0.0).to_bits()];
        let next = groups.len();
        group_of.push(*groups.entry(key).or_insert(next));
    }

    let mut accum = vec![Vec3::ZERO; groups.len()];
    for [a, b, c] in triangles {
        // Cross product length is twice the triangle area.
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        accum[group_of[a]] += face;
        accum[group_of[b]] += face;
        accum[group_of[c]] += face;
    }

    positions
        .iter()
        .zip(&group_of)
        .map(|(p, &g)| {
            let n = accum[g].normalize_or_zero();
            if n == Vec3::ZERO { p.normalize_or_zero() } else { n }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> Mesh {
        let positions = vec![
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
        ];
        let indices = vec![0, 1, 3, 0, 2, 1, 0, 3, 2, 1, 2, 3];
        Mesh::new(positions, Some(indices)).unwrap()
    }

    #[test]
    fn test_empty_mesh_rejected() {
        assert_eq!(Mesh::new(Vec::new(), None), Err(MeshError::Empty));
    }

    #[test]
    fn test_flat_stride_mismatch() {
        let data = [1.0, 0.0, 0.0, 0.0, 1.0];
        assert_eq!(
            Mesh::from_flat(&data, 3, 2, None),
            Err(MeshError::StrideMismatch { len: 5, stride: 3, count: 2 })
        );
    }

    #[test]
    fn test_flat_count_overflow() {
        assert_eq!(
            Mesh::from_flat(&[0.0; 6], 3, usize::MAX, None),
            Err(MeshError::StrideMismatch { len: 6, stride: 3, count: usize::MAX })
        );
    }

    #[test]
    fn test_flat_with_extra_attributes() {
        // position + uv per vertex
        let data = [
            1.0, 0.0, 0.0, 0.1, 0.2,
            0.0, 1.0, 0.0, 0.3, 0.4,
            0.0, 0.0, 1.0, 0.5, 0.6,
        ];
        let mesh = Mesh::from_flat(&data, 5, 3, None).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.positions[1], Vec3::Y);
    }

    #[test]
    fn test_index_out_of_range() {
        let positions = vec![Vec3::X, Vec3::Y, Vec3::Z];
        assert_eq!(
            Mesh::new(positions, Some(vec![0, 1, 3])),
            Err(MeshError::IndexOutOfRange { index: 3, vertices: 3 })
        );
    }

    #[test]
    fn test_unindexed_count_must_be_triangles() {
        let positions = vec![Vec3::X, Vec3::Y, Vec3::Z, Vec3::NEG_X];
        assert_eq!(Mesh::new(positions, None), Err(MeshError::TriangleCount(4)));
    }

    #[test]
    fn test_zero_vertex_rejected() {
        let positions = vec![Vec3::X, Vec3::ZERO, Vec3::Z];
        let mesh = Mesh::new(positions, None).unwrap();
        assert_eq!(mesh.validate_sphere(), Err(MeshError::DegenerateVertex(1)));

        let positions = vec![Vec3::X, Vec3::splat(f32::NAN), Vec3::Z];
        assert_eq!(Mesh::new(positions, None), Err(MeshError::DegenerateVertex(1)));
    }

    #[test]
    fn test_attribute_length_checked() {
        let mut mesh = tetrahedron();
        mesh.colors = vec![Color::WHITE; 2];
        assert_eq!(
            mesh.validate(),
            Err(MeshError::AttributeLength { name: "colors", len: 2, expected: 4 })
        );
    }

    #[test]
    fn test_normals_point_outward() {
        let mut mesh = tetrahedron();
        mesh.compute_vertex_normals();
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!(n.dot(*p) > 0.0, "normal {:?} points inward at {:?}", n, p);
        }
    }

    #[test]
    fn test_unindexed_normals_are_welded() {
        let indexed = tetrahedron();
        let positions: Vec<Vec3> = indexed
            .triangles()
            .flat_map(|[a, b, c]| [indexed.positions[a], indexed.positions[b], indexed.positions[c]])
            .collect();
        let mut soup = Mesh::new(positions, None).unwrap();
        soup.compute_vertex_normals();

        // Every copy of the first corner gets the same smooth normal.
        let corner = Vec3::new(1.0, 1.0, 1.0);
        let normals: Vec<Vec3> = soup
            .positions
            .iter()
            .zip(&soup.normals)
            .filter(|(p, _)| **p == corner)
            .map(|(_, n)| *n)
            .collect();
        assert_eq!(normals.len(), 3);
        assert!(normals.iter().all(|n| (*n - corner.normalize()).length() < 1e-5));
    }
}
