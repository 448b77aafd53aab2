//! Height-banded terrain classification with decoration rolls.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::ConfigError;
use crate::scatter::{GrassVariant, PlacementRecord, PropKind, RockVariant, TreeVariant};

/// Named elevation band, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandKind {
    DeepWater,
    Transition,
    ShallowWater,
    Sand,
    Grass,
    Forest,
    Rock,
    DarkRock,
    Snow,
}

/// Chance for a vertex in a band to emit one of `kinds`. A band's rule
/// probabilities share one roll per vertex, so they must sum to at most 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecorationRule {
    /// Per-vertex probability in [0, 1].
    pub probability: f32,
    /// Inclusive `[min, max]` instance scale.
    pub scale: [f32; 2],
    /// Candidate kinds, picked uniformly.
    pub kinds: Vec<PropKind>,
}

impl DecorationRule {
    pub fn new(probability: f32, scale: [f32; 2], kinds: &[PropKind]) -> Self {
        Self { probability, scale, kinds: kinds.to_vec() }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(ConfigError::InvalidProbability(self.probability));
        }
        let [lo, hi] = self.scale;
        if !(lo.is_finite() && hi.is_finite()) || lo <= 0.0 || hi < lo || self.kinds.is_empty() {
            return Err(ConfigError::InvalidScaleRange(lo, hi));
        }
        Ok(())
    }
}

/// One band: elevations from the previous band's `upper` (inclusive) to this
/// band's `upper` (exclusive). The last band is unbounded above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub kind: BandKind,
    #[serde(default)]
    pub upper: Option<f32>,
    pub color: Color,
    #[serde(default)]
    pub decorations: Vec<DecorationRule>,
}

impl Band {
    pub fn new(kind: BandKind, upper: Option<f32>, hex: u32) -> Self {
        Self { kind, upper, color: Color::from_hex(hex), decorations: Vec::new() }
    }

    pub fn with_decoration(mut self, rule: DecorationRule) -> Self {
        self.decorations.push(rule);
        self
    }
}

/// Ordered bands over signed normalized elevation in [-1, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandTable {
    pub bands: Vec<Band>,
    /// Width of the color cross-fade centered on each boundary.
    #[serde(default = "default_blend_width")]
    pub blend_width: f32,
}

fn default_blend_width() -> f32 {
    0.03
}

impl Default for BandTable {
    fn default() -> Self {
        use PropKind::{Grass, Rock, Tree};

        Self {
            bands: vec![
                Band::new(BandKind::DeepWater, Some(-0.18), 0x1b3a5c),
                Band::new(BandKind::Transition, Some(-0.1), 0x24578a),
                Band::new(BandKind::ShallowWater, Some(-0.02), 0x3a7fb8),
                Band::new(BandKind::Sand, Some(0.02), 0xd9c48f)
                    .with_decoration(DecorationRule::new(0.10, [0.6, 1.0], &[Grass(GrassVariant::Beach)]))
                    .with_decoration(DecorationRule::new(0.05, [0.5, 0.9], &[Rock(RockVariant::Small)])),
                Band::new(BandKind::Grass, Some(0.15), 0x6aa84f)
                    .with_decoration(DecorationRule::new(0.20, [0.7, 1.2], &[Grass(GrassVariant::Plains)]))
                    .with_decoration(DecorationRule::new(0.05, [0.6, 1.0], &[Tree(TreeVariant::Small)])),
                Band::new(BandKind::Forest, Some(0.3), 0x2f6b2f).with_decoration(DecorationRule::new(
                    0.20,
                    [0.8, 1.3],
                    &[Tree(TreeVariant::Normal), Tree(TreeVariant::Pine)],
                )),
                Band::new(BandKind::Rock, Some(0.45), 0x7a6f64)
                    .with_decoration(DecorationRule::new(
                        0.15,
                        [0.7, 1.2],
                        &[Rock(RockVariant::Medium), Rock(RockVariant::Large)],
                    ))
                    .with_decoration(DecorationRule::new(0.05, [0.6, 0.9], &[Tree(TreeVariant::Pine)])),
                Band::new(BandKind::DarkRock, Some(0.6), 0x4f4842),
                Band::new(BandKind::Snow, None, 0xf4f7fb),
            ],
            blend_width: default_blend_width(),
        }
    }
}

impl BandTable {
    /// Rejects empty tables, unsorted or missing bounds, inner bands narrower
    /// than `blend_width` and bad rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bands.is_empty() {
            return Err(ConfigError::EmptyBandTable);
        }
        if !(self.blend_width.is_finite() && self.blend_width > 0.0) {
            return Err(ConfigError::InvalidBlendWidth(self.blend_width));
        }

        let last = self.bands.len() - 1;
        let mut previous = f32::NEG_INFINITY;
        for band in &self.bands[..last] {
            let upper = band.upper.ok_or(ConfigError::NonFinite("band upper bound"))?;
            if !upper.is_finite() {
                return Err(ConfigError::NonFinite("band upper bound"));
            }
            if upper <= previous {
                return Err(ConfigError::UnsortedBands(upper, previous));
            }
            // both cross-fades must fit inside the band
            if previous.is_finite() && upper - previous < self.blend_width {
                return Err(ConfigError::NarrowBand(upper, self.blend_width));
            }
            previous = upper;
        }

        for band in &self.bands {
            for rule in &band.decorations {
                rule.validate()?;
            }
            let total: f32 = band.decorations.iter().map(|r| r.probability).sum();
            if total > 1.0 {
                return Err(ConfigError::InvalidProbability(total));
            }
        }
        Ok(())
    }

    /// Index of the band containing `h`.
    pub fn band_index(&self, h: f32) -> usize {
        let last = self.bands.len() - 1;
        self.bands[..last]
            .iter()
            .position(|b| b.upper.is_some_and(|upper| h < upper))
            .unwrap_or(last)
    }

    pub fn classify(&self, h: f32) -> BandKind {
        self.bands[self.band_index(h)].kind
    }

    /// Band color at `h`, cross-faded near boundaries.
    pub fn color(&self, h: f32) -> Color {
        let i = self.band_index(h);
        let band = &self.bands[i];
        let half = self.blend_width * 0.5;

        let below = if i > 0 { self.bands[i - 1].upper.map(|lower| h - lower) } else { None };
        let above = if i + 1 < self.bands.len() { band.upper.map(|upper| upper - h) } else { None };

        match (below, above) {
            (Some(d_lo), d_hi) if d_lo < half && d_hi.map_or(true, |d| d_lo <= d) => {
                let t = smoothstep(-half, half, d_lo);
                self.bands[i - 1].color.lerp(band.color, t)
            }
            (_, Some(d_hi)) if d_hi < half => {
                let t = smoothstep(-half, half, -d_hi);
                band.color.lerp(self.bands[i + 1].color, t)
            }
            _ => band.color,
        }
    }

    /// Rolls once for the vertex's band and returns at most one record.
    ///
    /// The roll walks the band's rules with cumulative probability, so each
    /// rule keeps its own per-vertex chance.
    pub fn roll_decoration<R: Rng>(&self, position: Vec3, h: f32, rng: &mut R) -> Option<PlacementRecord> {
        let band = &self.bands[self.band_index(h)];
        if band.decorations.is_empty() {
            return None;
        }
        let roll = rng.random::<f32>();
        let mut cumulative = 0.0;
        let rule = band.decorations.iter().find(|rule| {
            cumulative += rule.probability;
            roll < cumulative
        })?;

        let kind = rule.kinds[rng.random_range(0..rule.kinds.len())];
        let [lo, hi] = rule.scale;
        let scale = if hi > lo { rng.random_range(lo..=hi) } else { lo };
        Some(PlacementRecord { position, scale, kind })
    }
}

/// Emits placement records for a set of displaced vertices.
///
/// `heights` holds signed normalized elevations, one per position. Vertices
/// are visited in order and share `rng`, so a fixed seed reproduces the set.
pub fn collect_placements<R: Rng>(
    table: &BandTable,
    positions: &[Vec3],
    heights: &[f32],
    rng: &mut R,
) -> Vec<PlacementRecord> {
    positions
        .iter()
        .zip(heights)
        .filter_map(|(&position, &h)| table.roll_decoration(position, h, rng))
        .collect()
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
