//! Noise displacement and per-vertex coloring of a sphere mesh.

use std::f32::consts::PI;

use glam::Vec3;
use log::debug;
use rayon::prelude::*;

use crate::biomes::{BandTable, Biome};
use crate::color::{Color, ColorGradient};
use crate::error::{ConfigError, MeshError};
use crate::geometry::Mesh;
use crate::noise::{sample_elevation, NoiseField, NoiseSettings};

/// Up axis used for steepness tinting.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Elevation and color of the surface in one direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub elevation: f32,
    pub color: Color,
}

/// A displaced terrain mesh plus the per-vertex data later stages need.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplacedTerrain {
    pub mesh: Mesh,
    /// Unit direction of each original vertex.
    pub directions: Vec<Vec3>,
    /// Distance of each original vertex from the center.
    pub base_radii: Vec<f32>,
    /// Clamped elevation applied to each vertex.
    pub elevations: Vec<f32>,
}

/// Displaces and colors sphere meshes for one biome and noise field.
#[derive(Debug, Clone)]
pub struct TerrainEngine {
    noise: NoiseSettings,
    field: NoiseField,
    gradient: ColorGradient,
    bands: Option<BandTable>,
    tint: Option<Color>,
}

impl TerrainEngine {
    /// Validates the biome's land settings and prepares the gradient.
    pub fn new(biome: &Biome, field: NoiseField) -> Result<Self, ConfigError> {
        biome.noise.validate("noise")?;
        if let Some(bands) = &biome.bands {
            bands.validate()?;
        }
        Ok(Self {
            noise: biome.noise,
            field,
            gradient: ColorGradient::new("colors", &biome.colors)?,
            bands: biome.bands.clone(),
            tint: biome.tint_color,
        })
    }

    pub fn noise(&self) -> &NoiseSettings {
        &self.noise
    }

    /// Clamped elevation in unit direction `dir`.
    pub fn elevation(&self, dir: Vec3) -> f32 {
        sample_elevation(dir, &self.noise, &self.field)
    }

    /// Land color for `elevation` in direction `dir`, tinted by steepness
    /// when the biome has a tint color.
    pub fn color(&self, dir: Vec3, elevation: f32) -> Color {
        let base = match &self.bands {
            Some(bands) => bands.color(self.noise.normalize_signed(elevation)),
            None => self.gradient.get(self.noise.normalize(elevation)),
        };
        match self.tint {
            Some(tint) => base.lerp(tint, steepness(dir)),
            None => base,
        }
    }

    /// Elevation and color for any direction, not tied to a mesh.
    pub fn surface_sample(&self, dir: Vec3) -> SurfaceSample {
        let dir = dir.normalize_or_zero();
        let elevation = self.elevation(dir);
        SurfaceSample { elevation, color: self.color(dir, elevation) }
    }

    /// Displaces every vertex along its original direction, colors it and
    /// recomputes smooth normals.
    ///
    /// The mesh is checked before any vertex moves; on error it is dropped
    /// unchanged.
    pub fn displace(&self, mut mesh: Mesh) -> Result<DisplacedTerrain, MeshError> {
        mesh.validate_sphere()?;

        let samples: Vec<(Vec3, f32, f32, Color)> = mesh
            .positions
            .par_iter()
            .map(|&p| {
                let radius = p.length();
                let dir = p / radius;
                let elevation = self.elevation(dir);
                (dir, radius, elevation, self.color(dir, elevation))
            })
            .collect();

        let n = samples.len();
        let mut directions = Vec::with_capacity(n);
        let mut base_radii = Vec::with_capacity(n);
        let mut elevations = Vec::with_capacity(n);
        let mut colors = Vec::with_capacity(n);
        for (position, (dir, radius, elevation, color)) in mesh.positions.iter_mut().zip(samples) {
            *position += dir * elevation;
            directions.push(dir);
            base_radii.push(radius);
            elevations.push(elevation);
            colors.push(color);
        }
        mesh.colors = colors;
        mesh.compute_vertex_normals();

        debug!(
            "displaced {} vertices, elevation {:.4}..{:.4}",
            n,
            elevations.iter().copied().fold(f32::INFINITY, f32::min),
            elevations.iter().copied().fold(f32::NEG_INFINITY, f32::max),
        );

        Ok(DisplacedTerrain { mesh, directions, base_radii, elevations })
    }
}

/// Angle between `dir` and `WORLD_UP` scaled to [0, 1].
pub fn steepness(dir: Vec3) -> f32 {
    dir.dot(WORLD_UP).clamp(-1.0, 1.0).acos() / PI
}
