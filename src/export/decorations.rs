//! JSON export of decoration instances.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scatter::{DecorationInstance, PropCategory, PropKind};
use crate::terrain::Planet;

/// Errors that can occur during decoration export.
#[derive(Error, Debug)]
pub enum DecorationExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One instance as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecorationRecord {
    pub kind: PropKind,
    /// Library mesh name, e.g. `tree_pine`.
    pub mesh: String,
    pub category: PropCategory,
    pub position: [f32; 3],
    /// Quaternion as `[x, y, z, w]`.
    pub rotation: [f32; 4],
    pub scale: f32,
    /// Column-major local-to-planet matrix.
    pub transform: [f32; 16],
}

impl From<&DecorationInstance> for DecorationRecord {
    fn from(instance: &DecorationInstance) -> Self {
        Self {
            kind: instance.kind,
            mesh: instance.kind.name().to_string(),
            category: instance.category(),
            position: instance.position.to_array(),
            rotation: instance.rotation.to_array(),
            scale: instance.scale,
            transform: instance.transform().to_cols_array(),
        }
    }
}

/// Top-level decoration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecorationFile {
    pub seed: u64,
    pub biome: String,
    pub instances: Vec<DecorationRecord>,
}

impl DecorationFile {
    pub fn from_planet(planet: &Planet) -> Self {
        Self {
            seed: planet.seed,
            biome: planet.biome_name.clone(),
            instances: planet.decorations.iter().map(DecorationRecord::from).collect(),
        }
    }
}

/// Writes the planet's decorations as pretty-printed JSON.
///
/// Output is written to `{output_dir}/{base_name}_decorations.json`.
pub fn export_decorations_json(
    planet: &Planet,
    output_dir: &Path,
    base_name: &str,
) -> Result<(), DecorationExportError> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("{}_decorations.json", base_name));
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &DecorationFile::from_planet(planet))?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Mesh;
    use crate::scatter::{surface_rotation, TreeVariant};
    use glam::Vec3;
    use tempfile::tempdir;

    fn planet_with_tree() -> Planet {
        let normal = Vec3::new(1.0, 1.0, 0.0).normalize();
        Planet {
            seed: 99,
            biome_name: "procedural".to_string(),
            terrain: Mesh::default(),
            ocean: None,
            decorations: vec![DecorationInstance {
                kind: PropKind::Tree(TreeVariant::Pine),
                position: normal * 1.02,
                rotation: surface_rotation(normal),
                scale: 0.9,
            }],
            elevations: Vec::new(),
        }
    }

    #[test]
    fn test_export_and_read_back() {
        let dir = tempdir().unwrap();
        let planet = planet_with_tree();
        export_decorations_json(&planet, dir.path(), "world").unwrap();

        let text = std::fs::read_to_string(dir.path().join("world_decorations.json")).unwrap();
        let file: DecorationFile = serde_json::from_str(&text).unwrap();
        assert_eq!(file.seed, 99);
        assert_eq!(file.instances.len(), 1);

        let record = &file.instances[0];
        assert_eq!(record.mesh, "tree_pine");
        assert_eq!(record.category, PropCategory::Tree);
        assert_eq!(&record.transform[12..15], &record.position[..]);
    }

    #[test]
    fn test_kind_serialization() {
        let record = DecorationRecord::from(&planet_with_tree().decorations[0]);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["kind"]["category"], "tree");
        assert_eq!(value["kind"]["variant"], "pine");
        assert_eq!(value["category"], "tree");
    }
}
