//! Cube-sphere mesh built from six spherified face grids.

use glam::Vec3;

use super::mesh::Mesh;

/// Cube faces as `(normal, s axis, t axis)`; face point = `n + s * S + t * T`.
const FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
];

/// Number of vertices `cube_sphere` produces for a face resolution.
pub fn cube_sphere_vertex_count(resolution: u32) -> usize {
    let side = resolution as usize + 1;
    6 * side * side
}

/// Builds an indexed cube-sphere of `radius` with `resolution` quads per face edge.
///
/// Face grids do not share vertices. Seam vertices land on bit-identical
/// positions because face coordinates are derived from integer grid steps,
/// so normal welding treats them as one.
pub fn cube_sphere(radius: f32, resolution: u32) -> Mesh {
    let res = resolution.max(1);
    let side = res + 1;
    let mut positions = Vec::with_capacity(cube_sphere_vertex_count(res));
    let mut indices = Vec::with_capacity(6 * (res * res * 6) as usize);

    for (normal, s_axis, t_axis) in FACES {
        let base = positions.len() as u32;
        for j in 0..side {
            let t = grid_coord(j, res);
            for i in 0..side {
                let s = grid_coord(i, res);
                positions.push(spherify(normal + s_axis * s + t_axis * t) * radius);
            }
        }

        let outward = s_axis.cross(t_axis).dot(normal) > 0.0;
        for j in 0..res {
            for i in 0..res {
                let a = base + j * side + i;
                let b = a + 1;
                let c = a + side + 1;
                let d = a + side;
                if outward {
                    indices.extend_from_slice(&[a, b, c, a, c, d]);
                } else {
                    indices.extend_from_slice(&[a, c, b, a, d, c]);
                }
            }
        }
    }

    let mut mesh = Mesh {
        positions,
        indices: Some(indices),
        ..Default::default()
    };
    mesh.compute_vertex_normals();
    mesh
}

/// Moves a point on the unit cube onto the unit sphere.
///
/// Keeps cells closer to equal area than normalizing, which crowds
/// vertices toward the cube corners.
fn spherify(p: Vec3) -> Vec3 {
    let sq = p * p;
    let stretch = |a: f32, b: f32| (1.0 - 0.5 * (a + b) + a * b / 3.0).max(0.0).sqrt();
    p * Vec3::new(
        stretch(sq.y, sq.z),
        stretch(sq.x, sq.z),
        stretch(sq.x, sq.y),
    )
}

/// Maps grid step `i` of `res` to [-1, 1] so that `-grid_coord(i)` equals
/// `grid_coord(res - i)` exactly.
fn grid_coord(i: u32, res: u32) -> f32 {
    (2.0 * i as f32 - res as f32) / res as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_count() {
        let mesh = cube_sphere(1.0, 8);
        assert_eq!(mesh.vertex_count(), cube_sphere_vertex_count(8));
        assert_eq!(mesh.triangle_count(), 6 * 8 * 8 * 2);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_vertices_on_radius() {
        let mesh = cube_sphere(3.0, 6);
        for p in &mesh.positions {
            assert!((p.length() - 3.0).abs() < 1e-4, "vertex {:?} off sphere", p);
        }
    }

    #[test]
    fn test_outward_winding_on_every_face() {
        let mesh = cube_sphere(1.0, 4);
        for [a, b, c] in mesh.triangles() {
            let (pa, pb, pc) = (mesh.positions[a], mesh.positions[b], mesh.positions[c]);
            assert!((pb - pa).cross(pc - pa).dot(pa + pb + pc) > 0.0);
        }
    }

    #[test]
    fn test_seam_normals_are_smooth() {
        for res in [4, 5] {
            let mesh = cube_sphere(1.0, res);
            for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
                assert!(n.dot(p.normalize()) > 0.95, "normal {:?} at {:?}", n, p);
            }
        }
    }

    #[test]
    fn test_spherify_unit_length() {
        for p in [
            Vec3::new(1.0, 0.5, 0.5),
            Vec3::new(-1.0, 0.3, -0.7),
            Vec3::new(0.8, 0.8, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ] {
            assert!((spherify(p).length() - 1.0).abs() < 1e-5, "{:?}", p);
        }
        assert!((spherify(Vec3::NEG_Y) - Vec3::NEG_Y).length() < 1e-6);
    }

    #[test]
    fn test_face_axes_cover_cube() {
        for (normal, s_axis, t_axis) in FACES {
            assert_eq!(normal.dot(s_axis), 0.0);
            assert_eq!(normal.dot(t_axis), 0.0);
            assert_eq!(s_axis.dot(t_axis), 0.0);
        }
        let sum: Vec3 = FACES.iter().map(|f| f.0).sum();
        assert_eq!(sum, Vec3::ZERO);
    }

    #[test]
    fn test_grid_coord_symmetry() {
        for res in [3, 5, 7, 16] {
            for i in 0..=res {
                assert_eq!(-grid_coord(i, res), grid_coord(res - i, res));
            }
        }
    }
}
