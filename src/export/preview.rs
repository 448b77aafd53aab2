//! Equirectangular (lat/lon) color preview rendered straight from the noise.
//!
//! The preview samples the terrain engine per pixel rather than the mesh, so
//! its sharpness does not depend on the sphere detail level.

use std::f32::consts::{FRAC_PI_2, PI, TAU};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use glam::Vec3;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Rgb};
use rayon::prelude::*;
use thiserror::Error;

use crate::terrain::TerrainEngine;

/// Errors that can occur during preview export.
#[derive(Error, Debug)]
pub enum PreviewExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid output dimensions: {0}x{1}")]
    InvalidDimensions(u32, u32),
}

/// Options for preview export.
#[derive(Debug, Clone)]
pub struct PreviewOptions {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// PNG compression type.
    pub compression: CompressionType,
    /// PNG filter type.
    pub filter: FilterType,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            width: 512,
            height: 256,
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

#[inline]
fn lat_lon_to_dir(lat: f32, lon: f32) -> Vec3 {
    // lon=0 points toward +Z, lat=+pi/2 toward +Y
    let (slon, clon) = lon.sin_cos();
    let (slat, clat) = lat.sin_cos();
    Vec3::new(clat * slon, slat, clat * clon)
}

/// Renders the surface colors into an RGB buffer.
pub fn render_preview(
    engine: &TerrainEngine,
    width: u32,
    height: u32,
) -> Result<ImageBuffer<Rgb<u8>, Vec<u8>>, PreviewExportError> {
    if width < 2 || height < 2 {
        return Err(PreviewExportError::InvalidDimensions(width, height));
    }

    let rows: Vec<Vec<u8>> = (0..height)
        .into_par_iter()
        .map(|y| {
            // lat in [pi/2, -pi/2] top to bottom, sampling pixel centers
            let fy = (y as f32 + 0.5) / height as f32;
            let lat = FRAC_PI_2 - fy * PI;
            let mut row = Vec::with_capacity(width as usize * 3);
            for x in 0..width {
                let fx = (x as f32 + 0.5) / width as f32;
                let lon = -PI + fx * TAU;
                let color = engine.surface_sample(lat_lon_to_dir(lat, lon)).color;
                row.extend_from_slice(&color.to_rgb8());
            }
            row
        })
        .collect();

    let raw: Vec<u8> = rows.concat();
    ImageBuffer::from_raw(width, height, raw).ok_or(PreviewExportError::InvalidDimensions(width, height))
}

/// Export an equirectangular RGB color preview PNG.
///
/// Output is written to `{output_dir}/{base_name}_preview.png`.
pub fn export_preview_png(
    engine: &TerrainEngine,
    output_dir: &Path,
    base_name: &str,
    options: &PreviewOptions,
) -> Result<(), PreviewExportError> {
    let img = render_preview(engine, options.width, options.height)?;

    std::fs::create_dir_all(output_dir)?;
    let filename = format!("{}_preview.png", base_name);
    let path = output_dir.join(filename);
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    encoder.write_image(
        img.as_raw(),
        options.width,
        options.height,
        image::ExtendedColorType::Rgb8,
    )?;

    Ok(())
}
