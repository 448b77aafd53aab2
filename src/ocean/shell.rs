//! Ocean shell with rest and wave morph targets.

use glam::Vec3;
use log::debug;
use rayon::prelude::*;

use crate::biomes::Biome;
use crate::color::ColorGradient;
use crate::error::{ConfigError, MeshError};
use crate::geometry::{smooth_normals, Mesh};
use crate::noise::{sample_elevation, NoiseField, NoiseSettings};

/// Salt for the water color field, kept apart from the wave field.
const COLOR_FIELD_SALT: i32 = 1;

/// Companion sphere inside the terrain with two position sets.
///
/// `mesh` holds the rest positions, rest normals and water colors. The wave
/// set shares its topology. Renderers blend the two with a single influence
/// value; nothing here animates.
#[derive(Debug, Clone, PartialEq)]
pub struct OceanShell {
    pub mesh: Mesh,
    pub wave_positions: Vec<Vec3>,
    pub wave_normals: Vec<Vec3>,
    /// Radial wave offset per vertex, bounded by the sea noise range.
    pub wave_offsets: Vec<f32>,
    /// Material opacity in [0, 1].
    pub opacity: f32,
}

impl OceanShell {
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    pub fn rest_positions(&self) -> &[Vec3] {
        &self.mesh.positions
    }

    /// Positions at `influence`, clamped to [0, 1]: 0 is rest, 1 is wave.
    pub fn blend(&self, influence: f32) -> Vec<Vec3> {
        let t = influence.clamp(0.0, 1.0);
        self.mesh
            .positions
            .iter()
            .zip(&self.wave_positions)
            .map(|(rest, wave)| rest.lerp(*wave, t))
            .collect()
    }

    /// Normals at `influence`, renormalized after blending.
    pub fn blend_normals(&self, influence: f32) -> Vec<Vec3> {
        let t = influence.clamp(0.0, 1.0);
        self.mesh
            .normals
            .iter()
            .zip(&self.wave_normals)
            .map(|(rest, wave)| {
                let n = rest.lerp(*wave, t).normalize_or_zero();
                if n == Vec3::ZERO { *rest } else { n }
            })
            .collect()
    }

    /// A standalone mesh frozen at `influence`.
    pub fn mesh_at(&self, influence: f32) -> Mesh {
        Mesh {
            positions: self.blend(influence),
            normals: self.blend_normals(influence),
            colors: self.mesh.colors.clone(),
            indices: self.mesh.indices.clone(),
        }
    }
}

/// Builds ocean shells for a biome that has sea colors.
#[derive(Debug, Clone)]
pub struct OceanBuilder {
    sea_noise: NoiseSettings,
    gradient: ColorGradient,
    wave_field: NoiseField,
    color_field: NoiseField,
    radius_scale: f32,
    opacity: f32,
}

impl OceanBuilder {
    /// Returns `Ok(None)` when the biome has no sea colors.
    pub fn new(
        biome: &Biome,
        field: NoiseField,
        radius_scale: f32,
        opacity: f32,
    ) -> Result<Option<Self>, ConfigError> {
        let Some(sea_colors) = &biome.sea_colors else {
            return Ok(None);
        };
        biome.sea_noise.validate("seaNoise")?;
        if !(radius_scale.is_finite() && radius_scale > 0.0) {
            return Err(ConfigError::InvalidOption("ocean_radius_scale", radius_scale));
        }
        if !(0.0..=1.0).contains(&opacity) {
            return Err(ConfigError::InvalidOption("ocean_opacity", opacity));
        }

        Ok(Some(Self {
            sea_noise: biome.sea_noise,
            gradient: ColorGradient::new("seaColors", sea_colors)?,
            wave_field: field,
            color_field: field.with_offset(COLOR_FIELD_SALT),
            radius_scale,
            opacity,
        }))
    }

    /// Builds the shell over the original sphere's directions and radii.
    ///
    /// `indices` is the terrain topology; the shell reuses it.
    pub fn build(
        &self,
        directions: &[Vec3],
        base_radii: &[f32],
        indices: Option<Vec<u32>>,
    ) -> Result<OceanShell, MeshError> {
        if directions.len() != base_radii.len() {
            return Err(MeshError::AttributeLength {
                name: "base_radii",
                len: base_radii.len(),
                expected: directions.len(),
            });
        }

        let samples: Vec<(Vec3, Vec3, f32, _)> = directions
            .par_iter()
            .zip(base_radii.par_iter())
            .map(|(&dir, &radius)| {
                let rest = dir * radius * self.radius_scale;
                let offset = sample_elevation(dir, &self.sea_noise, &self.wave_field);
                let shade = self.sea_noise.normalize(sample_elevation(dir, &self.sea_noise, &self.color_field));
                (rest, rest + dir * offset, offset, self.gradient.get(shade - 0.5))
            })
            .collect();

        let mut positions = Vec::with_capacity(samples.len());
        let mut wave_positions = Vec::with_capacity(samples.len());
        let mut wave_offsets = Vec::with_capacity(samples.len());
        let mut colors = Vec::with_capacity(samples.len());
        for (rest, wave, offset, color) in samples {
            positions.push(rest);
            wave_positions.push(wave);
            wave_offsets.push(offset);
            colors.push(color);
        }

        let mut mesh = Mesh::new(positions, indices)?;
        mesh.colors = colors;
        mesh.compute_vertex_normals();
        let wave_normals = smooth_normals(&wave_positions, mesh.triangles());

        debug!("built ocean shell with {} vertices", mesh.vertex_count());

        Ok(OceanShell { mesh, wave_positions, wave_normals, wave_offsets, opacity: self.opacity })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geometry::icosphere;

    fn earth_builder(seed: u64) -> OceanBuilder {
        OceanBuilder::new(&Biome::earth(), NoiseField::new(seed), 0.985, 0.85)
            .unwrap()
            .unwrap()
    }

    fn shell(seed: u64) -> OceanShell {
        let sphere = icosphere(1.0, 2);
        let directions: Vec<Vec3> = sphere.positions.iter().map(|p| p.normalize()).collect();
        let radii = vec![1.0; directions.len()];
        earth_builder(seed).build(&directions, &radii, sphere.indices).unwrap()
    }

    #[test]
    fn test_no_sea_colors_no_builder() {
        let builder = OceanBuilder::new(&Biome::desert(), NoiseField::new(1), 0.985, 0.85).unwrap();
        assert!(builder.is_none());
    }

    #[test]
    fn test_rest_radius_and_wave_bounds() {
        let ocean = shell(11);
        let sea = NoiseSettings::sea_default();
        for (i, rest) in ocean.rest_positions().iter().enumerate() {
            assert!((rest.length() - 0.985).abs() < 1e-5);
            let offset = ocean.wave_offsets[i];
            assert!(offset >= sea.min && offset <= sea.max);
            assert!((ocean.wave_positions[i].length() - (0.985 + offset)).abs() < 1e-5);
        }
        assert_eq!(ocean.opacity, 0.85);
    }

    #[test]
    fn test_blend_endpoints_and_clamp() {
        let ocean = shell(2);
        assert_eq!(ocean.blend(0.0), ocean.mesh.positions);
        assert_eq!(ocean.blend(-3.0), ocean.mesh.positions);
        let wave = ocean.blend(1.0);
        for (a, b) in wave.iter().zip(&ocean.wave_positions) {
            assert!((*a - *b).length() < 1e-6);
        }
        assert_eq!(ocean.blend(7.0), ocean.blend(1.0));
    }

    #[test]
    fn test_normals_and_colors_per_vertex() {
        let ocean = shell(4);
        let n = ocean.vertex_count();
        assert_eq!(ocean.mesh.normals.len(), n);
        assert_eq!(ocean.wave_normals.len(), n);
        assert_eq!(ocean.mesh.colors.len(), n);
        let stops = Biome::earth().sea_colors.unwrap();
        let lo = stops.iter().map(|s| s.color).fold(Color::WHITE, |a, c| Color::new(a.r.min(c.r), a.g.min(c.g), a.b.min(c.b)));
        let hi = stops.iter().map(|s| s.color).fold(Color::BLACK, |a, c| Color::new(a.r.max(c.r), a.g.max(c.g), a.b.max(c.b)));
        for c in &ocean.mesh.colors {
            assert!(c.r >= lo.r - 1e-5 && c.r <= hi.r + 1e-5);
            assert!(c.b >= lo.b - 1e-5 && c.b <= hi.b + 1e-5);
        }
    }

    #[test]
    fn test_invalid_opacity_rejected() {
        let err = OceanBuilder::new(&Biome::earth(), NoiseField::new(1), 0.985, 1.5).unwrap_err();
        assert_eq!(err, ConfigError::InvalidOption("ocean_opacity", 1.5));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(shell(9), shell(9));
    }
}
