//! # Style Presets
//!
//! A [`StylePreset`] describes how one fence segment is built: spacing,
//! dimensions, rail tiers, conform behavior and which material each part
//! uses. Presets are authored once and shared by many sections through
//! `Arc`; a build only ever reads them.
//!
//! Out-of-range authored values are kept as written and clamped when read
//! through the `effective_*` accessors, so a shared preset is never
//! mutated by a build.

use crate::error::FenceError;
use crate::primitives::BoxDimensions;
use config::constants::{
    clamp_unit, DEFAULT_LEAN, DEFAULT_PICKET_CONFORM, DEFAULT_PICKET_DIMENSIONS,
    DEFAULT_PICKET_GAP, DEFAULT_PICKET_GROUND_OFFSET, DEFAULT_POST_DIMENSIONS,
    DEFAULT_RAILS, DEFAULT_RAIL_GROUND_OFFSET, DEFAULT_RAIL_THICKNESS, DEFAULT_RAIL_WIDTH,
    DEFAULT_SEGMENT_LENGTH, DEFAULT_TILT, MAX_SEGMENT_LENGTH, MIN_PICKET_GAP,
    MIN_SEGMENT_LENGTH,
};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// DISCRIMINANTS
// =============================================================================

/// Which parts a segment is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FenceKind {
    /// Posts and rails.
    #[default]
    Farm,
    /// Posts, rails and pickets.
    Picket,
}

/// Whether posts follow the terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConformMode {
    /// Posts stand on the straight chord between waypoints.
    #[default]
    None,
    /// Posts are dropped onto the terrain and tilted by its normal.
    Ground,
}

/// How rails meet posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PostJoint {
    /// Rails run through the post centerline.
    #[default]
    Inset,
    /// Rails sit flush against the post's outer face.
    Offset,
}

/// Logical material slot of a fence part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialSlot {
    /// Slot 0.
    Post = 0,
    /// Slot 1.
    Rail = 1,
    /// Slot 2.
    Picket = 2,
}

impl MaterialSlot {
    /// Index into a preset's material list.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

// =============================================================================
// MATERIALS & RAILS
// =============================================================================

/// Handle of a renderer material. Two handles with the same name are the
/// same material and share one submesh.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(pub String);

impl MaterialId {
    /// Creates a material handle.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Material name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One horizontal rail tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rail {
    /// Height of the rail bottom above the post base.
    pub ground_offset: f64,
    /// Vertical size of the rail.
    pub width: f64,
    /// Carried with the preset; pickets are suppressed by any obstructed rail.
    pub obstruction_prevents_pickets: bool,
}

impl Rail {
    /// Creates a rail tier.
    pub fn new(ground_offset: f64, width: f64) -> Self {
        Self {
            ground_offset,
            width,
            obstruction_prevents_pickets: false,
        }
    }
}

impl Default for Rail {
    fn default() -> Self {
        Self::new(DEFAULT_RAIL_GROUND_OFFSET, DEFAULT_RAIL_WIDTH)
    }
}

// =============================================================================
// STYLE PRESET
// =============================================================================

/// Construction recipe for a fence segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePreset {
    /// Which parts are built.
    pub fence_kind: FenceKind,
    /// Straight or terrain-following posts.
    pub conform_mode: ConformMode,
    /// Build rails through obstacles instead of skipping them.
    pub allow_obstructions: bool,
    /// 1 = posts follow the terrain normal, 0 = posts stand upright.
    pub lean: f64,
    /// How much upright posts pitch with the slope to the next post.
    pub tilt: f64,
    /// 1 = pickets drop onto the terrain, 0 = pickets follow the rails.
    pub picket_conform: f64,
    /// Target distance between posts.
    pub segment_length: f64,
    /// Rail/post joint style.
    pub post_joint: PostJoint,
    /// Post box size.
    pub post_dimensions: BoxDimensions,
    /// Picket box size.
    pub picket_dimensions: BoxDimensions,
    /// Gap between neighbouring pickets.
    pub picket_gap: f64,
    /// Height of picket bottoms above the ground.
    pub picket_ground_offset: f64,
    /// Rail thickness across the fence line.
    pub rail_thickness: f64,
    /// Materials by slot: post, rail, picket.
    pub materials: Vec<MaterialId>,
    /// Rail tiers, bottom to top.
    pub rails: Vec<Rail>,
}

impl Default for StylePreset {
    fn default() -> Self {
        Self {
            fence_kind: FenceKind::Farm,
            conform_mode: ConformMode::None,
            allow_obstructions: false,
            lean: DEFAULT_LEAN,
            tilt: DEFAULT_TILT,
            picket_conform: DEFAULT_PICKET_CONFORM,
            segment_length: DEFAULT_SEGMENT_LENGTH,
            post_joint: PostJoint::Inset,
            post_dimensions: BoxDimensions::from_array(DEFAULT_POST_DIMENSIONS),
            picket_dimensions: BoxDimensions::from_array(DEFAULT_PICKET_DIMENSIONS),
            picket_gap: DEFAULT_PICKET_GAP,
            picket_ground_offset: DEFAULT_PICKET_GROUND_OFFSET,
            rail_thickness: DEFAULT_RAIL_THICKNESS,
            materials: Vec::new(),
            rails: DEFAULT_RAILS
                .iter()
                .map(|&[offset, width]| Rail::new(offset, width))
                .collect(),
        }
    }
}

impl StylePreset {
    /// Default preset using the given post, rail and picket materials.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fence_mesh::preset::{MaterialId, StylePreset};
    ///
    /// let preset = StylePreset::with_materials([
    ///     MaterialId::new("wood"),
    ///     MaterialId::new("wood"),
    ///     MaterialId::new("paint"),
    /// ]);
    /// assert_eq!(preset.materials.len(), 3);
    /// ```
    pub fn with_materials(materials: impl IntoIterator<Item = MaterialId>) -> Self {
        Self {
            materials: materials.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Post spacing clamped to the supported range.
    pub fn effective_segment_length(&self) -> f64 {
        if self.segment_length.is_nan() {
            return MIN_SEGMENT_LENGTH;
        }
        self.segment_length.clamp(MIN_SEGMENT_LENGTH, MAX_SEGMENT_LENGTH)
    }

    /// Picket gap, never below [`MIN_PICKET_GAP`].
    pub fn effective_picket_gap(&self) -> f64 {
        if self.picket_gap.is_nan() {
            return MIN_PICKET_GAP;
        }
        self.picket_gap.max(MIN_PICKET_GAP)
    }

    /// Lean clamped to `[0, 1]`.
    pub fn effective_lean(&self) -> f64 {
        clamp_unit(self.lean)
    }

    /// Tilt clamped to `[0, 1]`.
    pub fn effective_tilt(&self) -> f64 {
        clamp_unit(self.tilt)
    }

    /// Picket conform clamped to `[0, 1]`.
    pub fn effective_picket_conform(&self) -> f64 {
        clamp_unit(self.picket_conform)
    }

    /// Number of material slots the fence kind draws from.
    pub fn required_material_slots(&self) -> usize {
        match self.fence_kind {
            FenceKind::Farm => 2,
            FenceKind::Picket => 3,
        }
    }

    /// Material slots used when building with this preset, in slot order.
    pub fn used_slots(&self) -> &'static [MaterialSlot] {
        match self.fence_kind {
            FenceKind::Farm => &[MaterialSlot::Post, MaterialSlot::Rail],
            FenceKind::Picket => &[MaterialSlot::Post, MaterialSlot::Rail, MaterialSlot::Picket],
        }
    }

    /// Material bound to `slot`, if the list is long enough.
    pub fn material(&self, slot: MaterialSlot) -> Option<&MaterialId> {
        self.materials.get(slot.index())
    }

    /// Checks that every used slot has a material.
    ///
    /// `section` is only used to label the error.
    pub fn validate_materials(&self, section: usize) -> Result<(), FenceError> {
        let required = self.required_material_slots();
        if self.materials.len() < required {
            return Err(FenceError::insufficient_materials(
                section,
                required,
                self.materials.len(),
            ));
        }
        Ok(())
    }
}
