//! Prop kinds and their procedural geometry.
//!
//! Every prop is a small group of cones, cylinders and low-poly spheres
//! merged into one vertex-colored mesh. Geometry is sized for a planet of
//! radius 1 with the base resting on local y = 0 and +Y as "up".

use std::f32::consts::TAU;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::geometry::{Mesh, icosphere};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeVariant {
    Small,
    Normal,
    Pine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RockVariant {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrassVariant {
    Beach,
    Plains,
}

/// Decoration category. Each has its own instance cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropCategory {
    Tree,
    Rock,
    Grass,
}

impl PropCategory {
    pub const fn all() -> [PropCategory; 3] {
        [PropCategory::Tree, PropCategory::Rock, PropCategory::Grass]
    }

    pub const fn name(self) -> &'static str {
        match self {
            PropCategory::Tree => "tree",
            PropCategory::Rock => "rock",
            PropCategory::Grass => "grass",
        }
    }
}

/// A concrete prop variant. Serialized as `{"category": ..., "variant": ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", content = "variant", rename_all = "snake_case")]
pub enum PropKind {
    Tree(TreeVariant),
    Rock(RockVariant),
    Grass(GrassVariant),
}

impl PropKind {
    /// All kinds in library order.
    pub const fn all() -> [PropKind; 8] {
        [
            PropKind::Tree(TreeVariant::Small),
            PropKind::Tree(TreeVariant::Normal),
            PropKind::Tree(TreeVariant::Pine),
            PropKind::Rock(RockVariant::Small),
            PropKind::Rock(RockVariant::Medium),
            PropKind::Rock(RockVariant::Large),
            PropKind::Grass(GrassVariant::Beach),
            PropKind::Grass(GrassVariant::Plains),
        ]
    }

    pub const fn category(self) -> PropCategory {
        match self {
            PropKind::Tree(_) => PropCategory::Tree,
            PropKind::Rock(_) => PropCategory::Rock,
            PropKind::Grass(_) => PropCategory::Grass,
        }
    }

    /// Position of this kind in `PropKind::all()` and in the library.
    pub const fn index(self) -> usize {
        match self {
            PropKind::Tree(TreeVariant::Small) => 0,
            PropKind::Tree(TreeVariant::Normal) => 1,
            PropKind::Tree(TreeVariant::Pine) => 2,
            PropKind::Rock(RockVariant::Small) => 3,
            PropKind::Rock(RockVariant::Medium) => 4,
            PropKind::Rock(RockVariant::Large) => 5,
            PropKind::Grass(GrassVariant::Beach) => 6,
            PropKind::Grass(GrassVariant::Plains) => 7,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            PropKind::Tree(TreeVariant::Small) => "tree_small",
            PropKind::Tree(TreeVariant::Normal) => "tree_normal",
            PropKind::Tree(TreeVariant::Pine) => "tree_pine",
            PropKind::Rock(RockVariant::Small) => "rock_small",
            PropKind::Rock(RockVariant::Medium) => "rock_medium",
            PropKind::Rock(RockVariant::Large) => "rock_large",
            PropKind::Grass(GrassVariant::Beach) => "grass_beach",
            PropKind::Grass(GrassVariant::Plains) => "grass_plains",
        }
    }
}

const TRUNK: u32 = 0x6b4a2b;
const LEAVES: u32 = 0x3f8f3a;
const DARK_LEAVES: u32 = 0x2d6b34;
const PINE: u32 = 0x1f5a3a;
const STONE: u32 = 0x8a8580;
const DARK_STONE: u32 = 0x5e5955;
const DUNE_GRASS: u32 = 0xc8c27a;
const MEADOW_GRASS: u32 = 0x5fae45;

/// One mesh per `PropKind`, built once and shared by all instances.
#[derive(Debug, Clone)]
pub struct PropLibrary {
    meshes: Vec<Mesh>,
}

impl Default for PropLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl PropLibrary {
    pub fn new() -> Self {
        let meshes = PropKind::all().into_iter().map(build_prop).collect();
        Self { meshes }
    }

    pub fn get(&self, kind: PropKind) -> &Mesh {
        &self.meshes[kind.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PropKind, &Mesh)> {
        PropKind::all().into_iter().zip(self.meshes.iter())
    }
}

fn build_prop(kind: PropKind) -> Mesh {
    let mut parts = PartBuilder::default();
    match kind {
        PropKind::Tree(TreeVariant::Small) => {
            parts.cylinder(0.0025, 0.003, 0.012, 0.0, 6, TRUNK);
            parts.cone(0.011, 0.022, 0.01, 7, LEAVES);
        }
        PropKind::Tree(TreeVariant::Normal) => {
            parts.cylinder(0.003, 0.004, 0.02, 0.0, 6, TRUNK);
            parts.sphere(0.014, Vec3::new(0.0, 0.03, 0.0), Vec3::ONE, 1, LEAVES);
            parts.sphere(0.009, Vec3::new(0.006, 0.038, 0.002), Vec3::ONE, 0, DARK_LEAVES);
        }
        PropKind::Tree(TreeVariant::Pine) => {
            parts.cylinder(0.0025, 0.0035, 0.014, 0.0, 6, TRUNK);
            parts.cone(0.014, 0.02, 0.01, 8, PINE);
            parts.cone(0.011, 0.018, 0.02, 8, PINE);
            parts.cone(0.007, 0.015, 0.03, 8, PINE);
        }
        PropKind::Rock(RockVariant::Small) => {
            parts.sphere(0.008, Vec3::new(0.0, 0.003, 0.0), Vec3::new(1.2, 0.7, 1.0), 0, STONE);
        }
        PropKind::Rock(RockVariant::Medium) => {
            parts.sphere(0.014, Vec3::new(0.0, 0.005, 0.0), Vec3::new(1.0, 0.75, 1.15), 0, STONE);
            parts.sphere(0.007, Vec3::new(0.012, 0.002, 0.004), Vec3::new(1.0, 0.8, 1.0), 0, DARK_STONE);
        }
        PropKind::Rock(RockVariant::Large) => {
            parts.sphere(0.022, Vec3::new(0.0, 0.008, 0.0), Vec3::new(1.1, 0.8, 1.0), 1, DARK_STONE);
            parts.sphere(0.012, Vec3::new(-0.018, 0.004, 0.006), Vec3::new(1.0, 0.7, 1.2), 0, STONE);
        }
        PropKind::Grass(GrassVariant::Beach) => {
            for (x, z, h) in [(0.0, 0.0, 0.012), (0.003, 0.002, 0.009), (-0.002, 0.003, 0.01)] {
                parts.blade(Vec3::new(x, 0.0, z), 0.0012, h, DUNE_GRASS);
            }
        }
        PropKind::Grass(GrassVariant::Plains) => {
            for i in 0..5 {
                let angle = i as f32 / 5.0 * TAU;
                let base = Vec3::new(angle.cos() * 0.003, 0.0, angle.sin() * 0.003);
                parts.blade(base, 0.0015, 0.01 + 0.002 * (i % 2) as f32, MEADOW_GRASS);
            }
        }
    }
    parts.finish()
}

/// Accumulates primitive shapes into one indexed, colored mesh.
#[derive(Default)]
struct PartBuilder {
    positions: Vec<Vec3>,
    colors: Vec<Color>,
    indices: Vec<u32>,
}

impl PartBuilder {
    fn ring(&mut self, radius: f32, y: f32, center: Vec3, segments: u32, color: Color) -> u32 {
        let start = self.positions.len() as u32;
        for k in 0..segments {
            let angle = k as f32 / segments as f32 * TAU;
            self.positions
                .push(center + Vec3::new(angle.cos() * radius, y, angle.sin() * radius));
            self.colors.push(color);
        }
        start
    }

    fn point(&mut self, p: Vec3, color: Color) -> u32 {
        self.positions.push(p);
        self.colors.push(color);
        (self.positions.len() - 1) as u32
    }

    /// Open-ended cylinder from `y0` to `y0 + height`.
    fn cylinder(&mut self, top: f32, bottom: f32, height: f32, y0: f32, segments: u32, hex: u32) {
        let color = Color::from_hex(hex);
        let low = self.ring(bottom, y0, Vec3::ZERO, segments, color);
        let high = self.ring(top, y0 + height, Vec3::ZERO, segments, color);
        for k in 0..segments {
            let next = (k + 1) % segments;
            let (b0, b1, t0, t1) = (low + k, low + next, high + k, high + next);
            self.indices.extend_from_slice(&[b0, t0, b1, b1, t0, t1]);
        }
    }

    /// Closed cone with its base at `y0`.
    fn cone(&mut self, radius: f32, height: f32, y0: f32, segments: u32, hex: u32) {
        self.cone_at(Vec3::new(0.0, y0, 0.0), radius, height, segments, Color::from_hex(hex));
    }

    fn cone_at(&mut self, base: Vec3, radius: f32, height: f32, segments: u32, color: Color) {
        let ring = self.ring(radius, base.y, Vec3::new(base.x, 0.0, base.z), segments, color);
        let apex = self.point(base + Vec3::new(0.0, height, 0.0), color);
        let center = self.point(base, color);
        for k in 0..segments {
            let (b0, b1) = (ring + k, ring + (k + 1) % segments);
            self.indices.extend_from_slice(&[b0, apex, b1, center, b0, b1]);
        }
    }

    /// Thin three-sided spike standing on `base`.
    fn blade(&mut self, base: Vec3, radius: f32, height: f32, hex: u32) {
        self.cone_at(base, radius, height, 3, Color::from_hex(hex));
    }

    /// Low-poly ellipsoid from an icosphere, scaled per axis and moved to `center`.
    fn sphere(&mut self, radius: f32, center: Vec3, stretch: Vec3, detail: u32, hex: u32) {
        let color = Color::from_hex(hex);
        let ball = icosphere(radius, detail);
        let start = self.positions.len() as u32;
        for p in &ball.positions {
            self.positions.push(center + *p * stretch);
            self.colors.push(color);
        }
        if let Some(indices) = &ball.indices {
            self.indices.extend(indices.iter().map(|i| start + i));
        }
    }

    fn finish(self) -> Mesh {
        let mut mesh = Mesh {
            positions: self.positions,
            normals: Vec::new(),
            colors: self.colors,
            indices: Some(self.indices),
        };
        mesh.compute_vertex_normals();
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_covers_every_kind() {
        let library = PropLibrary::new();
        for kind in PropKind::all() {
            let mesh = library.get(kind);
            assert!(mesh.validate().is_ok(), "{} invalid", kind.name());
            assert!(mesh.triangle_count() > 0);
            assert_eq!(mesh.colors.len(), mesh.vertex_count());
        }
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, kind) in PropKind::all().into_iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_props_stand_on_base() {
        let library = PropLibrary::new();
        for kind in [PropKind::Tree(TreeVariant::Pine), PropKind::Grass(GrassVariant::Plains)] {
            let mesh = library.get(kind);
            let min_y = mesh.positions.iter().map(|p| p.y).fold(f32::MAX, f32::min);
            let max_y = mesh.positions.iter().map(|p| p.y).fold(f32::MIN, f32::max);
            assert!(min_y.abs() < 1e-6, "{} base at {}", kind.name(), min_y);
            assert!(max_y > 0.0);
        }
    }

    #[test]
    fn test_categories() {
        assert_eq!(PropKind::Tree(TreeVariant::Pine).category(), PropCategory::Tree);
        assert_eq!(PropKind::Rock(RockVariant::Large).category(), PropCategory::Rock);
        assert_eq!(PropKind::Grass(GrassVariant::Beach).category(), PropCategory::Grass);
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&PropKind::Tree(TreeVariant::Pine)).unwrap();
        assert_eq!(json, r#"{"category":"tree","variant":"pine"}"#);
        let back: PropKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PropKind::Tree(TreeVariant::Pine));
    }
}
