//! Export module for saving generated planets to common file formats.
//!
//! Supports Wavefront OBJ with vertex colors for the terrain, ocean and prop
//! meshes, JSON for decoration instances, and an equirectangular PNG color
//! preview.

mod decorations;
mod obj;
mod preview;

pub use decorations::{export_decorations_json, DecorationExportError, DecorationFile, DecorationRecord};
pub use obj::{export_mesh_obj, export_planet_obj, export_prop_library_obj, write_obj, ObjExportError};
pub use preview::{export_preview_png, render_preview, PreviewExportError, PreviewOptions};
