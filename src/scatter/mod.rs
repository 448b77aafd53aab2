//! Decoration scatter: trees, rocks and grass on the planet surface.
//!
//! Placement records emitted by the band classifier are capped per
//! category, oriented to the surface normal and turned into instances of
//! the procedural props in `PropLibrary`.

mod placement;
mod props;

pub use placement::{
    DecorationInstance, PlacementRecord, ScatterConfig, scatter, subsample, surface_rotation,
};
pub use props::{GrassVariant, PropCategory, PropKind, PropLibrary, RockVariant, TreeVariant};
