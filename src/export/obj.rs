//! Wavefront OBJ export with per-vertex colors.
//!
//! Colors use the common `v x y z r g b` extension understood by Blender,
//! MeshLab and most viewers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::geometry::Mesh;
use crate::scatter::PropLibrary;
use crate::terrain::Planet;

/// Errors that can occur during OBJ export.
#[derive(Error, Debug)]
pub enum ObjExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid mesh: {0}")]
    Mesh(#[from] crate::error::MeshError),
}

/// Writes `mesh` as a single named OBJ object.
pub fn write_obj<W: Write>(mesh: &Mesh, name: &str, writer: &mut W) -> Result<(), ObjExportError> {
    mesh.validate()?;

    writeln!(writer, "# {} vertices, {} triangles", mesh.vertex_count(), mesh.triangle_count())?;
    writeln!(writer, "o {}", name)?;

    for (i, p) in mesh.positions.iter().enumerate() {
        match mesh.colors.get(i) {
            Some(c) => writeln!(writer, "v {:.6} {:.6} {:.6} {:.4} {:.4} {:.4}", p.x, p.y, p.z, c.r, c.g, c.b)?,
            None => writeln!(writer, "v {:.6} {:.6} {:.6}", p.x, p.y, p.z)?,
        }
    }
    for n in &mesh.normals {
        writeln!(writer, "vn {:.6} {:.6} {:.6}", n.x, n.y, n.z)?;
    }

    let has_normals = !mesh.normals.is_empty();
    for [a, b, c] in mesh.triangles() {
        // OBJ indices are 1-based
        let (a, b, c) = (a + 1, b + 1, c + 1);
        if has_normals {
            writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
        } else {
            writeln!(writer, "f {a} {b} {c}")?;
        }
    }
    Ok(())
}

/// Exports a mesh to `path`.
pub fn export_mesh_obj(mesh: &Mesh, path: &Path, name: &str) -> Result<(), ObjExportError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_obj(mesh, name, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Exports the planet's terrain and, if present, its ocean frozen at
/// `ocean_influence`.
///
/// Output files:
/// - `{output_dir}/{base_name}_terrain.obj`
/// - `{output_dir}/{base_name}_ocean.obj`
///
/// Returns the paths written.
pub fn export_planet_obj(
    planet: &Planet,
    output_dir: &Path,
    base_name: &str,
    ocean_influence: f32,
) -> Result<Vec<PathBuf>, ObjExportError> {
    std::fs::create_dir_all(output_dir)?;
    let mut written = Vec::new();

    let terrain_path = output_dir.join(format!("{}_terrain.obj", base_name));
    export_mesh_obj(&planet.terrain, &terrain_path, "terrain")?;
    written.push(terrain_path);

    if let Some(ocean) = &planet.ocean {
        let ocean_path = output_dir.join(format!("{}_ocean.obj", base_name));
        export_mesh_obj(&ocean.mesh_at(ocean_influence), &ocean_path, "ocean")?;
        written.push(ocean_path);
    }

    Ok(written)
}

/// Exports every prop mesh as `{output_dir}/{kind}.obj`.
pub fn export_prop_library_obj(library: &PropLibrary, output_dir: &Path) -> Result<Vec<PathBuf>, ObjExportError> {
    std::fs::create_dir_all(output_dir)?;
    library
        .iter()
        .map(|(kind, mesh)| {
            let path = output_dir.join(format!("{}.obj", kind.name()));
            export_mesh_obj(mesh, &path, kind.name())?;
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geometry::icosphere;
    use glam::Vec3;
    use tempfile::tempdir;

    #[test]
    fn test_write_triangle() {
        let mut mesh = Mesh::new(vec![Vec3::X, Vec3::Y, Vec3::Z], None).unwrap();
        mesh.colors = vec![Color::WHITE; 3];
        let mut out = Vec::new();
        write_obj(&mesh, "tri", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("o tri"));
        assert!(text.contains("v 1.000000 0.000000 0.000000 1.0000 1.0000 1.0000"));
        assert!(text.contains("f 1 2 3"));
        assert!(!text.contains("vn"));
    }

    #[test]
    fn test_icosphere_counts() {
        let mesh = icosphere(1.0, 1);
        let mut out = Vec::new();
        write_obj(&mesh, "sphere", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let count = |prefix: &str| text.lines().filter(|l| l.starts_with(prefix)).count();
        assert_eq!(count("v "), mesh.vertex_count());
        assert_eq!(count("vn "), mesh.vertex_count());
        assert_eq!(count("f "), mesh.triangle_count());
    }

    #[test]
    fn test_invalid_mesh_not_written() {
        let mesh = Mesh { positions: vec![Vec3::X], ..Default::default() };
        let mut out = Vec::new();
        assert!(matches!(write_obj(&mesh, "bad", &mut out), Err(ObjExportError::Mesh(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn test_prop_library_export() {
        let dir = tempdir().unwrap();
        let written = export_prop_library_obj(&PropLibrary::new(), dir.path()).unwrap();
        assert_eq!(written.len(), 8);
        assert!(dir.path().join("tree_pine.obj").exists());
    }
}
