//! # Ground-Conforming Placement
//!
//! Posts are dropped onto the terrain and oriented by a blend of the
//! terrain normal and an upright frame. Rails are built per post gap so
//! they follow the ground, and each one is checked for obstacles.
//!
//! ## Algorithm
//!
//! 1. Sample the terrain below `post_count + 2` points: the posts plus one
//!    extra point a post spacing past the end, used only to orient the
//!    final post
//! 2. Build a normal-aligned frame per sample and pull its anchor back by
//!    half a post length
//! 3. Blend each normal frame toward an upright frame by `1 - lean`
//! 4. Emit posts `0..=post_count`
//! 5. Per gap: rails (skipped when obstructed), then pickets if no rail in
//!    the gap was blocked

use super::{picket_count, PlacementContext, PlacementTally};
use crate::orientation::{blend, look_rotation, upright_frame};
use crate::preset::{FenceKind, StylePreset};
use crate::primitives::BoxDimensions;
use crate::segment::SegmentGeometry;
use crate::terrain::{sample_ground, LayerMask, RayHit};
use config::constants::{RAYCAST_DISTANCE, RAYCAST_HEIGHT};
use glam::{DQuat, DVec3};

/// Oriented base of one post.
#[derive(Debug, Clone, Copy)]
struct PostFrame {
    anchor: DVec3,
    normal_rot: DQuat,
}

/// Places posts, rails and pickets for a terrain-following segment.
pub fn place(
    ctx: &mut PlacementContext<'_>,
    geometry: &SegmentGeometry,
    preset: &StylePreset,
) -> PlacementTally {
    let mut tally = PlacementTally::default();
    let n = geometry.post_count;

    let post_dims = preset.post_dimensions;
    let half_post_length = post_dims.length * 0.5;
    let half_post_height = post_dims.height * 0.5;
    let lean = preset.effective_lean();
    let tilt = preset.effective_tilt();
    let picket_slot = ctx.slots.picket.filter(|_| preset.fence_kind == FenceKind::Picket);

    let samples: Vec<RayHit> = (0..n + 2)
        .map(|j| {
            let world = geometry.point_at(j as f64 / n as f64) + ctx.origin;
            let hit = sample_ground(ctx.terrain, world, ctx.conform_mask);
            RayHit {
                point: hit.point - ctx.origin,
                normal: hit.normal,
            }
        })
        .collect();

    let frames: Vec<PostFrame> = samples
        .iter()
        .enumerate()
        .map(|(k, sample)| {
            let along = match samples.get(k + 1) {
                Some(next) => next.point - sample.point,
                None => sample.point - samples[k - 1].point,
            };
            let normal_rot = look_rotation(sample.normal, along);
            PostFrame {
                anchor: sample.point + normal_rot * DVec3::NEG_Y * half_post_length,
                normal_rot,
            }
        })
        .collect();

    let rotations: Vec<DQuat> = (0..=n)
        .map(|k| {
            let mut lateral = frames[k + 1].anchor - frames[k].anchor;
            lateral.y *= -tilt;
            blend(frames[k].normal_rot, upright_frame(lateral), 1.0 - lean)
        })
        .collect();

    // =========================================================================
    // POSTS
    // =========================================================================

    for (frame, rot) in frames.iter().zip(&rotations) {
        ctx.buffers.emit_box(
            frame.anchor + *rot * DVec3::Z * half_post_height,
            *rot,
            post_dims,
            ctx.slots.post,
        );
        tally.posts += 1;
    }

    // =========================================================================
    // RAILS & PICKETS
    // =========================================================================

    for k in 0..n {
        let (cp_anchor, cp_rot) = (frames[k].anchor, rotations[k]);
        let (np_anchor, np_rot) = (frames[k + 1].anchor, rotations[k + 1]);
        let cp_dir = cp_rot * DVec3::Z;
        let np_dir = np_rot * DVec3::Z;

        let mut obstructed = false;
        for (r, rail) in preset.rails.iter().enumerate() {
            let start = cp_anchor + cp_dir * rail.ground_offset + cp_rot * DVec3::Y * half_post_length;
            let end = np_anchor + np_dir * rail.ground_offset + np_rot * DVec3::Y * half_post_length;
            let rail_length = start.distance(end);
            let rail_rot = look_rotation(end - start, cp_dir);
            let forward = rail_rot * DVec3::Z;

            if !preset.allow_obstructions
                && ctx
                    .terrain
                    .raycast(start + ctx.origin, forward, rail_length, LayerMask::DEFAULT)
                    .is_some()
            {
                log::trace!("rail {r} blocked between posts {k} and {}", k + 1);
                obstructed = true;
                continue;
            }

            ctx.buffers.emit_box(
                start + forward * (rail_length * 0.5) + cp_rot * DVec3::X * geometry.rail_center_offset,
                rail_rot,
                BoxDimensions::new(preset.rail_thickness, rail.width, rail_length),
                ctx.slots.rail,
            );
        }

        if obstructed {
            tally.obstructed_gaps += 1;
            continue;
        }
        if let Some(submesh) = picket_slot {
            let start = cp_anchor + cp_rot * DVec3::Y * post_dims.length;
            tally.pickets += place_pickets(ctx, geometry, preset, (start, cp_rot), (np_anchor, np_rot), submesh);
        }
    }

    tally
}

/// Fills one post gap with pickets, re-conforming them to the terrain.
///
/// Returns the number of pickets emitted.
fn place_pickets(
    ctx: &mut PlacementContext<'_>,
    geometry: &SegmentGeometry,
    preset: &StylePreset,
    (start, start_rot): (DVec3, DQuat),
    (end, end_rot): (DVec3, DQuat),
    submesh: usize,
) -> usize {
    let dims = preset.picket_dimensions;
    let lift = dims.height * 0.5 + preset.picket_ground_offset;
    let conform = preset.effective_picket_conform();

    let count = picket_count(start.distance(end), preset);
    for p in 0..count {
        let t = p as f64 / count as f64;
        let rot = start_rot.slerp(end_rot, t);
        let vertical = rot * DVec3::Z * lift;
        let offset = vertical + rot * DVec3::X * geometry.picket_offset;
        let straight = (start + offset).lerp(end + offset, t);

        let position = if conform > 0.0 {
            let probe = straight + ctx.origin + DVec3::Y * RAYCAST_HEIGHT;
            match ctx
                .terrain
                .raycast(probe, DVec3::NEG_Y, RAYCAST_DISTANCE, LayerMask::DEFAULT)
            {
                Some(hit) => straight.lerp(hit.point - ctx.origin + vertical, conform),
                None => straight,
            }
        } else {
            straight
        };

        ctx.buffers.emit_box(position, rot, dims, submesh);
    }
    count
}
