//! # Straight Placement
//!
//! Posts stand upright at even steps along the chord between two corners.
//! Every post and picket shares one rotation built from the flattened
//! segment direction. Each rail tier is a single box spanning the whole
//! segment, so a straight segment costs one box per tier no matter how
//! many posts it has.

use super::{picket_count, PlacementContext, PlacementTally};
use crate::orientation::{look_rotation, post_frame};
use crate::preset::{FenceKind, StylePreset};
use crate::primitives::BoxDimensions;
use crate::segment::SegmentGeometry;
use glam::DVec3;

/// Places posts, pickets and rails for a segment that ignores terrain.
pub fn place(
    ctx: &mut PlacementContext<'_>,
    geometry: &SegmentGeometry,
    preset: &StylePreset,
) -> PlacementTally {
    let mut tally = PlacementTally::default();

    let direction = geometry.direction();
    let flat = DVec3::new(direction.x, 0.0, direction.z);
    let section_rot = look_rotation(flat, DVec3::Y);
    let post_rot = post_frame(section_rot);

    let post_dims = preset.post_dimensions;
    let half_post_height = post_dims.height * 0.5;
    let half_post_length = post_dims.length * 0.5;

    let picket_slot = ctx.slots.picket.filter(|_| preset.fence_kind == FenceKind::Picket);
    let picket_offset = post_rot * DVec3::X * geometry.picket_offset;
    let picket_lift =
        section_rot * DVec3::Y * (preset.picket_dimensions.height * 0.5 + preset.picket_ground_offset);

    // =========================================================================
    // POSTS & PICKETS
    // =========================================================================

    for j in 0..=geometry.post_count {
        let post_pos = geometry.point_at(geometry.post_param(j));

        ctx.buffers.emit_box(
            post_pos + DVec3::Y * half_post_height - direction * half_post_length,
            post_rot,
            post_dims,
            ctx.slots.post,
        );
        tally.posts += 1;

        let Some(picket_submesh) = picket_slot else {
            continue;
        };
        if j == geometry.post_count {
            continue;
        }

        let next_pos = geometry.point_at(geometry.post_param(j + 1));
        let start = post_pos + direction * half_post_length + picket_offset;
        let end = next_pos - direction * half_post_length + picket_offset;

        let count = picket_count(start.distance(end), preset);
        for p in 0..count {
            let t = p as f64 / count as f64;
            ctx.buffers.emit_box(
                start.lerp(end, t) + picket_lift,
                post_rot,
                preset.picket_dimensions,
                picket_submesh,
            );
        }
        tally.pickets += count;
    }

    // =========================================================================
    // RAILS
    // =========================================================================

    let lateral = section_rot * DVec3::NEG_X * geometry.rail_center_offset;
    for rail in &preset.rails {
        let lift = DVec3::Y * rail.ground_offset;
        let rail_start = geometry.start + lift;
        let rail_end = geometry.end + lift;
        let rail_length = rail_start.distance(rail_end);
        let rail_rot = look_rotation(rail_end - rail_start, DVec3::Y);

        ctx.buffers.emit_box(
            rail_start + rail_rot * DVec3::Z * (rail_length * 0.5) + lateral,
            rail_rot,
            BoxDimensions::new(preset.rail_thickness, rail.width, rail_length),
            ctx.slots.rail,
        );
    }

    tally
}
