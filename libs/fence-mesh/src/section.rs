//! # Fence Sections
//!
//! A section is one waypoint of the fence path. Its preset styles the
//! segment that starts at it and runs to the next section.

use crate::error::FenceError;
use crate::preset::StylePreset;
use config::constants::DEFAULT_HEIGHT_MODIFIER;
use glam::DVec3;
use std::sync::Arc;

/// One waypoint plus the style of its outgoing segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Corner position, relative to the fence origin.
    pub corner_point: DVec3,
    /// Style of the outgoing segment. `None` skips that segment.
    pub preset: Option<Arc<StylePreset>>,
    /// Puts rails and pickets on the other side of the posts.
    pub flip: bool,
    height_modifier: f64,
}

impl Section {
    /// Creates a section at `corner_point`.
    pub fn new(corner_point: DVec3, preset: Option<Arc<StylePreset>>) -> Self {
        Self {
            corner_point,
            preset,
            flip: false,
            height_modifier: DEFAULT_HEIGHT_MODIFIER,
        }
    }

    /// Per-section height scale. Stored for authoring tools; placement
    /// does not read it.
    #[inline]
    pub fn height_modifier(&self) -> f64 {
        self.height_modifier
    }

    /// Sets the height modifier. Rejects negative and non-finite values.
    pub fn set_height_modifier(&mut self, value: f64) -> Result<(), FenceError> {
        if !value.is_finite() || value < 0.0 {
            return Err(FenceError::InvalidHeightModifier { value });
        }
        self.height_modifier = value;
        Ok(())
    }
}
