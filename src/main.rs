//! Planetgen CLI - Procedural planet generator.
//!
//! Generate displaced, vertex-colored planets with optional oceans and
//! scattered props, and export them as OBJ, JSON and PNG previews.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;

use planetgen::biomes::{Biome, BiomeLoadError, PRESET_NAMES};
use planetgen::export::{
    export_decorations_json, export_planet_obj, export_preview_png, export_prop_library_obj,
    PreviewOptions,
};
use planetgen::geometry::{cube_sphere_vertex_count, icosphere_vertex_count};
use planetgen::pipeline::{GeneratorOptions, PlanetGenerator, SphereKind};
use planetgen::scatter::{PropCategory, PropLibrary};

/// Deterministic procedural planet generator.
#[derive(Parser)]
#[command(name = "planetgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a planet and export it.
    Generate {
        /// Subdivision level (icosphere) or per-face grid size (cube sphere).
        #[arg(short, long, default_value = "5")]
        detail: u32,

        /// Sphere tessellation to displace.
        #[arg(long, default_value = "icosphere")]
        sphere: SphereArg,

        /// Random seed for reproducible generation.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Built-in biome preset.
        #[arg(short, long, default_value = "earth")]
        preset: String,

        /// Biome JSON file, overrides --preset.
        #[arg(short, long)]
        biome: Option<PathBuf>,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "planet")]
        name: String,

        /// Sphere radius.
        #[arg(long, default_value = "1.0")]
        radius: f32,

        /// Ocean wave influence (0 = rest, 1 = wave) for the exported ocean mesh.
        #[arg(long, default_value = "0.0")]
        ocean_influence: f32,

        /// Skip OBJ export.
        #[arg(long)]
        no_obj: bool,

        /// Export an equirectangular color preview PNG.
        #[arg(long)]
        preview: bool,

        /// Preview width in pixels (height is half).
        #[arg(long, default_value = "1024")]
        preview_width: u32,

        /// Export decoration instances as JSON.
        #[arg(long)]
        decorations: bool,

        /// Export the prop library meshes to `{output}/props/`.
        #[arg(long)]
        props: bool,

        /// Skip band decoration and scatter even when the biome has bands.
        #[arg(long)]
        no_decorate: bool,
    },

    /// Display vertex and triangle counts per detail level.
    Info {
        /// Highest detail level to list.
        #[arg(short, long, default_value = "6")]
        detail: u32,

        /// Sphere tessellation.
        #[arg(long, default_value = "icosphere")]
        sphere: SphereArg,
    },

    /// List built-in biome presets.
    Presets {
        /// Print the named preset as JSON.
        #[arg(long)]
        json: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SphereArg {
    /// Subdivided icosahedron.
    Icosphere,
    /// Spherified cube.
    Cube,
}

impl From<SphereArg> for SphereKind {
    fn from(arg: SphereArg) -> Self {
        match arg {
            SphereArg::Icosphere => SphereKind::Icosphere,
            SphereArg::Cube => SphereKind::CubeSphere,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            detail,
            sphere,
            seed,
            preset,
            biome,
            output,
            name,
            radius,
            ocean_influence,
            no_obj,
            preview,
            preview_width,
            decorations,
            props,
            no_decorate,
        } => {
            let exports = Exports {
                obj: !no_obj,
                preview: preview.then_some(preview_width),
                decorations,
                props,
                ocean_influence,
            };
            run_generate(
                detail,
                sphere.into(),
                seed,
                &preset,
                biome.as_deref(),
                &output,
                &name,
                radius,
                !no_decorate,
                &exports,
            );
        }
        Commands::Info { detail, sphere } => {
            run_info(detail, sphere.into());
        }
        Commands::Presets { json } => {
            run_presets(json.as_deref());
        }
    }
}

struct Exports {
    obj: bool,
    preview: Option<u32>,
    decorations: bool,
    props: bool,
    ocean_influence: f32,
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("Error {}: {}", context, err);
    std::process::exit(1);
}

fn load_biome(preset: &str, path: Option<&Path>) -> Result<Biome, BiomeLoadError> {
    match path {
        Some(path) => Biome::from_json(&std::fs::read_to_string(path)?),
        None => Ok(Biome::preset(preset)?),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_generate(
    detail: u32,
    sphere: SphereKind,
    seed: Option<u64>,
    preset: &str,
    biome_path: Option<&Path>,
    output: &Path,
    name: &str,
    radius: f32,
    decorate: bool,
    exports: &Exports,
) {
    let max_detail = match sphere {
        SphereKind::Icosphere => 8,
        SphereKind::CubeSphere => 512,
    };
    if detail > max_detail {
        eprintln!("Error: Detail must be at most {} for {}", max_detail, sphere.name());
        std::process::exit(1);
    }
    if !(0.0..=1.0).contains(&exports.ocean_influence) {
        eprintln!("Error: Ocean influence must be between 0.0 and 1.0");
        std::process::exit(1);
    }

    // Generate seed if not provided
    let seed = seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    });

    let biome = load_biome(preset, biome_path).unwrap_or_else(|e| fail("loading biome", e));

    println!("Planetgen - Procedural Planet Generator");
    println!("=======================================");
    println!("Biome: {}", biome.name);
    println!("Sphere: {} (detail {})", sphere.name(), detail);
    println!("Seed: {}", seed);
    println!("Output: {}", output.display());

    let options = GeneratorOptions { radius, decorate, ..Default::default() };
    let generator = PlanetGenerator::new(biome, seed).with_options(options);

    let start = Instant::now();
    println!("\nRunning generation pipeline...");
    let mesh = sphere.build(radius, detail);
    let planet = generator
        .generate_with_callbacks(
            mesh,
            |name, i, total| {
                println!("  [{}/{}] Starting: {}", i + 1, total, name);
            },
            |name, i, total| {
                println!("  [{}/{}] Completed: {}", i + 1, total, name);
            },
        )
        .unwrap_or_else(|e| fail("during generation", e));

    println!("Generation completed in {:.2?}", start.elapsed());

    let (min_h, max_h) = planet.height_range();
    let (min_r, max_r) = planet.radius_range();
    println!("Vertices: {}", planet.terrain.vertex_count());
    println!("Elevation range: [{:.4}, {:.4}]", min_h, max_h);
    println!("Radius range: [{:.4}, {:.4}]", min_r, max_r);
    match &planet.ocean {
        Some(ocean) => println!("Ocean: {} vertices, opacity {:.2}", ocean.vertex_count(), ocean.opacity),
        None => println!("Ocean: none"),
    }
    if !planet.decorations.is_empty() {
        println!(
            "Decorations: {} trees, {} rocks, {} grass",
            planet.decoration_count(PropCategory::Tree),
            planet.decoration_count(PropCategory::Rock),
            planet.decoration_count(PropCategory::Grass),
        );
    }

    println!("\nExporting...");
    let export_start = Instant::now();

    if exports.obj {
        let written = export_planet_obj(&planet, output, name, exports.ocean_influence)
            .unwrap_or_else(|e| fail("exporting OBJ", e));
        for path in written {
            println!("  Exported {}", path.display());
        }
    }

    if let Some(width) = exports.preview {
        let engine = generator.terrain_engine().unwrap_or_else(|e| fail("building preview", e));
        let options = PreviewOptions { width, height: (width / 2).max(2), ..Default::default() };
        export_preview_png(&engine, output, name, &options).unwrap_or_else(|e| fail("exporting preview", e));
        println!("  Exported preview: {}_preview.png ({}x{})", name, options.width, options.height);
    }

    if exports.decorations {
        export_decorations_json(&planet, output, name).unwrap_or_else(|e| fail("exporting decorations", e));
        println!("  Exported {} decorations: {}_decorations.json", planet.decorations.len(), name);
    }

    if exports.props {
        let written = export_prop_library_obj(&PropLibrary::new(), &output.join("props"))
            .unwrap_or_else(|e| fail("exporting props", e));
        println!("  Exported {} prop meshes to {}", written.len(), output.join("props").display());
    }

    println!("Export completed in {:.2?}", export_start.elapsed());
    println!("\nDone! Total time: {:.2?}", start.elapsed());
}

fn run_info(detail: u32, sphere: SphereKind) {
    println!("Planetgen - Sphere Info");
    println!("=======================");
    println!("Sphere: {}", sphere.name());
    println!();
    println!("  Detail      Vertices     Triangles   Positions (bytes)");

    let levels: Vec<u32> = match sphere {
        SphereKind::Icosphere => (0..=detail.min(10)).collect(),
        SphereKind::CubeSphere => (1..=detail.max(1)).map(|i| 1 << i.min(12)).collect(),
    };
    for level in levels {
        let (vertices, triangles) = match sphere {
            SphereKind::Icosphere => (icosphere_vertex_count(level), 20usize << (2 * level)),
            SphereKind::CubeSphere => (cube_sphere_vertex_count(level), 12 * (level as usize).pow(2)),
        };
        println!("  {:>6}  {:>10}  {:>12}  {:>18}", level, vertices, triangles, vertices * 12);
    }
}

fn run_presets(json: Option<&str>) {
    match json {
        Some(name) => {
            let biome = Biome::preset(name).unwrap_or_else(|e| fail("looking up preset", e));
            let text = serde_json::to_string_pretty(&biome).unwrap_or_else(|e| fail("serializing preset", e));
            println!("{}", text);
        }
        None => {
            println!("Built-in presets:");
            for name in PRESET_NAMES {
                if let Ok(biome) = Biome::preset(name) {
                    let ocean = if biome.has_ocean() { "ocean" } else { "dry" };
                    let bands = if biome.bands.is_some() { ", bands + props" } else { "" };
                    println!("  {:<12} {}{}", name, ocean, bands);
                }
            }
        }
    }
}
