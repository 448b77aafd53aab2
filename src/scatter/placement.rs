//! Placement records and their conversion into oriented prop instances.

use std::f32::consts::TAU;

use glam::{Mat3, Mat4, Quat, Vec3};
use log::{debug, warn};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::props::{PropCategory, PropKind};
use crate::error::ConfigError;

/// A candidate decoration emitted by terrain classification.
///
/// `position` is the displaced surface vertex; its direction from the
/// planet center is the surface normal used for placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub position: Vec3,
    pub scale: f32,
    pub kind: PropKind,
}

/// Instance caps and surface offsets per category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    pub max_trees: usize,
    pub max_rocks: usize,
    pub max_grass: usize,
    /// Radial offset per unit of instance scale.
    pub tree_offset: f32,
    pub rock_offset: f32,
    pub grass_offset: f32,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            max_trees: 100,
            max_rocks: 80,
            max_grass: 120,
            tree_offset: 0.002,
            rock_offset: -0.003,
            grass_offset: 0.001,
        }
    }
}

impl ScatterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if [self.tree_offset, self.rock_offset, self.grass_offset]
            .iter()
            .any(|v| !v.is_finite())
        {
            return Err(ConfigError::NonFinite("scatter"));
        }
        Ok(())
    }

    pub fn cap(&self, category: PropCategory) -> usize {
        match category {
            PropCategory::Tree => self.max_trees,
            PropCategory::Rock => self.max_rocks,
            PropCategory::Grass => self.max_grass,
        }
    }

    pub fn offset(&self, category: PropCategory) -> f32 {
        match category {
            PropCategory::Tree => self.tree_offset,
            PropCategory::Rock => self.rock_offset,
            PropCategory::Grass => self.grass_offset,
        }
    }
}

/// A placed prop ready to be inserted into a scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecorationInstance {
    pub kind: PropKind,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl DecorationInstance {
    pub fn category(&self) -> PropCategory {
        self.kind.category()
    }

    /// Local-to-planet transform.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.rotation, self.position)
    }

    /// The instance's local +Y axis in planet space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

/// Rotation taking local +Y onto `normal`, built from an orthonormal basis.
///
/// The reference axis is +Y unless `normal` is nearly parallel to it, in
/// which case +X is used.
pub fn surface_rotation(normal: Vec3) -> Quat {
    let up = normal.normalize();
    let reference = if up.dot(Vec3::Y).abs() < 0.99 { Vec3::Y } else { Vec3::X };
    let tangent = reference.cross(up).normalize();
    let bitangent = tangent.cross(up);
    Quat::from_mat3(&Mat3::from_cols(tangent, up, bitangent)).normalize()
}

/// Caps each category, subsampling uniformly when over budget.
///
/// Records keep their relative order within a category; categories come out
/// in tree, rock, grass order.
pub fn subsample<R: Rng>(
    records: &[PlacementRecord],
    config: &ScatterConfig,
    rng: &mut R,
) -> Vec<PlacementRecord> {
    let mut kept = Vec::with_capacity(records.len());
    for category in PropCategory::all() {
        let mut group: Vec<PlacementRecord> = records
            .iter()
            .filter(|r| r.kind.category() == category)
            .copied()
            .collect();
        let cap = config.cap(category);
        if group.len() > cap {
            warn!(
                "{} {} candidates exceed cap of {}, subsampling",
                group.len(),
                category.name(),
                cap
            );
            group.shuffle(rng);
            group.truncate(cap);
        }
        kept.extend(group);
    }
    kept
}

/// Turns placement records into oriented, scaled prop instances.
///
/// Each instance sits at `|position| + scale * offset` along the record's
/// direction, has local +Y along that direction, a random spin about it, and
/// uniform `scale`.
pub fn scatter<R: Rng>(
    records: &[PlacementRecord],
    config: &ScatterConfig,
    rng: &mut R,
) -> Vec<DecorationInstance> {
    let kept = subsample(records, config, rng);
    debug!("scattering {} of {} placement records", kept.len(), records.len());

    kept.into_iter()
        .map(|record| {
            let normal = record.position.normalize();
            let radius = record.position.length();
            let offset = record.scale * config.offset(record.kind.category());
            let spin = Quat::from_axis_angle(normal, rng.random::<f32>() * TAU);
            DecorationInstance {
                kind: record.kind,
                position: normal * (radius + offset),
                rotation: (spin * surface_rotation(normal)).normalize(),
                scale: record.scale,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scatter::props::{GrassVariant, RockVariant, TreeVariant};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn synthetic(kind: PropKind, count: usize) -> Vec<PlacementRecord> {
        (0..count)
            .map(|i| {
                let a = i as f32 * 0.731;
                let b = i as f32 * 0.317;
                PlacementRecord {
                    position: Vec3::new(a.cos() * b.sin(), b.cos(), a.sin() * b.sin()) * 1.05,
                    scale: 0.5 + (i % 7) as f32 * 0.1,
                    kind,
                }
            })
            .collect()
    }

    #[test]
    fn test_tree_cap() {
        let records = synthetic(PropKind::Tree(TreeVariant::Normal), 500);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let instances = scatter(&records, &ScatterConfig::default(), &mut rng);
        assert_eq!(instances.len(), 100);

        let kept = subsample(&records, &ScatterConfig::default(), &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(kept.len(), 100);
        for record in &kept {
            assert!(records.contains(record), "fabricated record {:?}", record);
        }
    }

    #[test]
    fn test_instances_drawn_from_records() {
        let records = synthetic(PropKind::Tree(TreeVariant::Pine), 500);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for instance in scatter(&records, &ScatterConfig::default(), &mut rng) {
            let dir = instance.position.normalize();
            let source = records.iter().any(|r| {
                (r.position.normalize() - dir).length() < 1e-5 && r.scale == instance.scale
            });
            assert!(source, "instance at {:?} has no source record", instance.position);
        }
    }

    #[test]
    fn test_under_cap_keeps_everything() {
        let mut records = synthetic(PropKind::Rock(RockVariant::Small), 30);
        records.extend(synthetic(PropKind::Grass(GrassVariant::Beach), 200));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let kept = subsample(&records, &ScatterConfig::default(), &mut rng);
        let rocks = kept.iter().filter(|r| r.kind.category() == PropCategory::Rock).count();
        let grass = kept.iter().filter(|r| r.kind.category() == PropCategory::Grass).count();
        assert_eq!(rocks, 30);
        assert_eq!(grass, 120);
    }

    #[test]
    fn test_surface_rotation_aligns_up() {
        let normals = [
            Vec3::Y,
            Vec3::NEG_Y,
            Vec3::X,
            Vec3::new(0.3, -0.8, 0.52).normalize(),
            Vec3::new(0.0, 0.999, 0.01).normalize(),
        ];
        for n in normals {
            let rotation = surface_rotation(n);
            assert!((rotation * Vec3::Y - n).length() < 1e-4, "up misaligned for {:?}", n);
            assert!((rotation.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_instance_orientation_and_offset() {
        let records = synthetic(PropKind::Tree(TreeVariant::Small), 20);
        let config = ScatterConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let instances = scatter(&records, &config, &mut rng);
        for (record, instance) in records.iter().zip(&instances) {
            let n = record.position.normalize();
            assert!((instance.up() - n).length() < 1e-4);
            let expected = record.position.length() + record.scale * config.tree_offset;
            assert!((instance.position.length() - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn test_scatter_is_deterministic() {
        let records = synthetic(PropKind::Grass(GrassVariant::Plains), 300);
        let a = scatter(&records, &ScatterConfig::default(), &mut ChaCha8Rng::seed_from_u64(77));
        let b = scatter(&records, &ScatterConfig::default(), &mut ChaCha8Rng::seed_from_u64(77));
        assert_eq!(a, b);
    }
}
