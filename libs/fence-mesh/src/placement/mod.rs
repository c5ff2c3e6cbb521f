//! # Placement Strategies
//!
//! Turns one [`SegmentGeometry`] into boxes. The preset's conform mode
//! picks the strategy:
//!
//! - [`ConformMode::None`] → [`straight::place`]: posts on the chord, one
//!   long rail per tier
//! - [`ConformMode::Ground`] → [`ground::place`]: posts sampled from the
//!   terrain, rails per post gap with obstruction checks
//!
//! All positions handled here are local to the fence origin. Only rays
//! leave local space: they are cast at `local + origin` and hits are
//! brought back by subtracting the origin.

pub mod ground;
pub mod straight;

use crate::assembly::SlotMap;
use crate::preset::{ConformMode, StylePreset};
use crate::primitives::GeometryBuffers;
use crate::segment::SegmentGeometry;
use crate::terrain::{LayerMask, TerrainQuery};
use glam::DVec3;

/// Everything a strategy writes into or queries.
pub struct PlacementContext<'a> {
    /// Buffers receiving the boxes.
    pub buffers: &'a mut GeometryBuffers,
    /// Submesh of each part.
    pub slots: SlotMap,
    /// Collision world for ground and obstruction rays.
    pub terrain: &'a dyn TerrainQuery,
    /// World position of the fence pivot.
    pub origin: DVec3,
    /// Layers ground samples may hit.
    pub conform_mask: LayerMask,
}

/// Parts emitted for one segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementTally {
    /// Posts emitted.
    pub posts: usize,
    /// Pickets emitted.
    pub pickets: usize,
    /// Post gaps with at least one blocked rail.
    pub obstructed_gaps: usize,
}

/// Places one segment with the strategy its preset asks for.
pub fn place_segment(
    ctx: &mut PlacementContext<'_>,
    geometry: &SegmentGeometry,
    preset: &StylePreset,
) -> PlacementTally {
    match preset.conform_mode {
        ConformMode::None => straight::place(ctx, geometry, preset),
        ConformMode::Ground => ground::place(ctx, geometry, preset),
    }
}

/// Number of pickets filling `distance`; the gap is clamped by the preset.
pub(crate) fn picket_count(distance: f64, preset: &StylePreset) -> usize {
    let pitch = preset.picket_dimensions.length + preset.effective_picket_gap();
    let count = (distance / pitch).ceil();
    if count.is_finite() && count > 0.0 {
        count as usize
    } else {
        0
    }
}
