//! # Segment Geometry
//!
//! Quantities derived from two consecutive sections and the preset of the
//! first one. Both placement strategies start from a [`SegmentGeometry`].

use crate::preset::{PostJoint, StylePreset};
use crate::section::Section;
use config::constants::{MAX_SEGMENT_POSTS, SEGMENT_EPSILON};
use glam::DVec3;

/// Derived layout of one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentGeometry {
    /// Local start corner.
    pub start: DVec3,
    /// Local end corner.
    pub end: DVec3,
    /// Straight-line length between the corners.
    pub length: f64,
    /// Number of post gaps, `ceil(length / spacing)`.
    pub post_count: usize,
    /// `+1` when the section is flipped, `-1` otherwise.
    pub flip_factor: f64,
    /// Lateral distance from the post centerline to the rail centerline.
    pub rail_center_offset: f64,
    /// Lateral distance from the post centerline to the picket centerline.
    pub picket_offset: f64,
}

impl SegmentGeometry {
    /// Lays out the segment from `from` to `to`.
    ///
    /// ## Returns
    ///
    /// `None` when the corners coincide (within [`SEGMENT_EPSILON`]), the
    /// length is not finite, or the segment needs more than
    /// [`MAX_SEGMENT_POSTS`] post gaps. The caller treats all of these as a
    /// malformed path.
    pub fn new(from: &Section, to: &Section, preset: &StylePreset) -> Option<Self> {
        let start = from.corner_point;
        let end = to.corner_point;
        let length = start.distance(end);
        if !length.is_finite() || length <= SEGMENT_EPSILON {
            return None;
        }

        let gaps = (length / preset.effective_segment_length()).ceil();
        if gaps > MAX_SEGMENT_POSTS as f64 {
            return None;
        }
        let post_count = (gaps as usize).max(1);

        let flip_factor = if from.flip { 1.0 } else { -1.0 };
        let half_post_width = preset.post_dimensions.width * 0.5;
        let half_rail_thickness = preset.rail_thickness * 0.5;
        let half_picket_width = preset.picket_dimensions.width * 0.5;

        let joint_offset = match preset.post_joint {
            PostJoint::Inset => 0.0,
            PostJoint::Offset => half_post_width + half_rail_thickness,
        };
        let rail_center_offset = joint_offset * flip_factor;
        // Pickets sit against the inner face of the rails
        let picket_offset = rail_center_offset - (half_rail_thickness + half_picket_width) * flip_factor;

        Some(Self {
            start,
            end,
            length,
            post_count,
            flip_factor,
            rail_center_offset,
            picket_offset,
        })
    }

    /// Point at parameter `t` along the chord (not clamped).
    #[inline]
    pub fn point_at(&self, t: f64) -> DVec3 {
        self.start.lerp(self.end, t)
    }

    /// Unit direction from start to end.
    #[inline]
    pub fn direction(&self) -> DVec3 {
        (self.end - self.start) / self.length
    }

    /// Parameter of post `index`; posts `0` and `post_count` sit on the corners.
    #[inline]
    pub fn post_param(&self, index: usize) -> f64 {
        index as f64 / self.post_count as f64
    }
}
