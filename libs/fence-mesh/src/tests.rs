//! # Fence Build Tests
//!
//! End-to-end scenarios running whole paths through `Fence::build_fence`.

use crate::error::FenceError;
use crate::fence::Fence;
use crate::preset::{ConformMode, FenceKind, MaterialId, StylePreset};
use crate::stats::SegmentOutcome;
use crate::terrain::FlatGround;
use approx::assert_relative_eq;
use config::constants::{BOX_INDEX_COUNT, BOX_VERTEX_COUNT};
use glam::DVec3;
use std::sync::Arc;

fn materials(names: &[&str]) -> Vec<MaterialId> {
    names.iter().copied().map(MaterialId::new).collect()
}

fn farm() -> Arc<StylePreset> {
    Arc::new(StylePreset::with_materials(materials(&["post", "rail"])))
}

fn picket() -> Arc<StylePreset> {
    Arc::new(StylePreset {
        fence_kind: FenceKind::Picket,
        ..StylePreset::with_materials(materials(&["post", "rail", "picket"]))
    })
}

/// Fence through `points`, every section styled by `preset`.
fn fence_through(points: &[DVec3], preset: Arc<StylePreset>) -> Fence {
    let mut fence = Fence::new();
    for (i, point) in points.iter().enumerate() {
        let style = (i == 0).then(|| Arc::clone(&preset));
        fence.add_section(*point, style);
    }
    fence
}

fn box_center(fence: &Fence, index: usize) -> DVec3 {
    let start = index * BOX_VERTEX_COUNT;
    fence.mesh().vertices()[start..start + BOX_VERTEX_COUNT]
        .iter()
        .copied()
        .sum::<DVec3>()
        / BOX_VERTEX_COUNT as f64
}

// =============================================================================
// STRAIGHT PATHS
// =============================================================================

#[test]
fn test_three_waypoint_farm_fence() {
    let mut fence = fence_through(
        &[DVec3::ZERO, DVec3::new(4.0, 0.0, 0.0), DVec3::new(4.0, 0.0, 4.0)],
        farm(),
    );
    fence.build_fence().unwrap();

    let stats = fence.stats();
    // 3 posts per segment, the shared corner post is emitted twice
    assert_eq!(stats.post_count, 6);
    assert_eq!(stats.built_segments(), 2);
    assert_relative_eq!(stats.total_length, 8.0, epsilon = 1e-12);

    let rails = StylePreset::default().rails.len();
    let boxes = 6 + 2 * rails;
    assert_eq!(stats.vertex_count, boxes * BOX_VERTEX_COUNT);
    assert_eq!(stats.triangle_count, boxes * BOX_INDEX_COUNT / 3);

    let mesh = fence.mesh();
    assert_eq!(mesh.submesh_count(), 2);
    assert_eq!(mesh.submesh(0).len(), 6 * BOX_INDEX_COUNT);
    assert_eq!(mesh.submesh(1).len(), 2 * rails * BOX_INDEX_COUNT);

    // Segment 0 emits posts 0..3 then its rails; segment 1 starts at box 6
    let corner_a = box_center(&fence, 2);
    let corner_b = box_center(&fence, 3 + rails);
    assert_relative_eq!((corner_a - corner_b).length(), 0.0, epsilon = 1e-9);
}

#[test]
fn test_straight_post_count() {
    for (length, spacing, expected) in [(5.0, 2.0, 4), (0.5, 2.0, 2), (10.0, 3.0, 5), (4.0, 2.0, 3)] {
        let preset = Arc::new(StylePreset {
            segment_length: spacing,
            ..StylePreset::with_materials(materials(&["a", "b"]))
        });
        let mut fence = fence_through(&[DVec3::ZERO, DVec3::new(0.0, 0.0, length)], preset);
        fence.build_fence().unwrap();
        assert_eq!(fence.stats().post_count, expected, "length {length}, spacing {spacing}");
    }
}

#[test]
fn test_box_topology_counts() {
    let mut fence = fence_through(&[DVec3::ZERO, DVec3::new(3.0, 0.5, 1.0)], picket());
    fence.build_fence().unwrap();

    let mesh = fence.mesh();
    assert_eq!(mesh.vertex_count() % BOX_VERTEX_COUNT, 0);
    let boxes = mesh.vertex_count() / BOX_VERTEX_COUNT;
    let indices: usize = (0..mesh.submesh_count()).map(|s| mesh.submesh(s).len()).sum();
    assert_eq!(indices, boxes * BOX_INDEX_COUNT);
    assert_eq!(mesh.normals().len(), mesh.vertex_count());
    assert_eq!(mesh.uvs().len(), mesh.vertex_count());
    assert!(mesh.validate());

    let stats = fence.stats();
    let rails = StylePreset::default().rails.len();
    assert_eq!(boxes, stats.post_count + stats.picket_count + rails);
}

#[test]
fn test_build_is_idempotent() {
    let mut fence = fence_through(
        &[DVec3::ZERO, DVec3::new(5.0, 0.0, 0.0), DVec3::new(5.0, 1.0, 6.0)],
        picket(),
    );
    fence.build_fence().unwrap();
    let first_mesh = fence.mesh().clone();
    let first_stats = fence.stats().clone();

    fence.build_fence().unwrap();
    assert_eq!(fence.mesh(), &first_mesh);
    assert_eq!(fence.stats().segments, first_stats.segments);
    assert_eq!(fence.stats().vertex_count, first_stats.vertex_count);
}

// =============================================================================
// MATERIALS
// =============================================================================

#[test]
fn test_shared_materials_share_submeshes() {
    let first = Arc::new(StylePreset::with_materials(materials(&["wood", "metal"])));
    let second = Arc::new(StylePreset {
        fence_kind: FenceKind::Picket,
        ..StylePreset::with_materials(materials(&["metal", "wood", "paint"]))
    });

    let mut fence = Fence::new();
    fence.add_section(DVec3::ZERO, Some(first));
    fence.add_section(DVec3::new(2.0, 0.0, 0.0), Some(second));
    fence.add_section(DVec3::new(4.0, 0.0, 0.0), None);
    fence.build_fence().unwrap();

    let mesh = fence.mesh();
    assert_eq!(mesh.materials(), materials(&["wood", "metal", "paint"]).as_slice());
    assert_eq!(mesh.submesh_count(), 3);

    // wood: 2 posts + 3 rails; metal: 3 rails + 2 posts
    assert_eq!(mesh.submesh(0).len(), 5 * BOX_INDEX_COUNT);
    assert_eq!(mesh.submesh(1).len(), 5 * BOX_INDEX_COUNT);
    assert_eq!(
        mesh.submesh(2).len(),
        fence.stats().picket_count * BOX_INDEX_COUNT
    );
}

#[test]
fn test_single_material_preset() {
    let preset = Arc::new(StylePreset::with_materials(materials(&["wood", "wood", "wood"])));
    let mut fence = fence_through(&[DVec3::ZERO, DVec3::X * 3.0], preset);
    fence.build_fence().unwrap();
    assert_eq!(fence.mesh().submesh_count(), 1);
    assert_eq!(fence.mesh().materials().len(), 1);
}

#[test]
fn test_insufficient_materials_keeps_previous_mesh() {
    let mut fence = fence_through(&[DVec3::ZERO, DVec3::X * 4.0], farm());
    fence.build_fence().unwrap();
    let before = fence.mesh().clone();
    let before_posts = fence.stats().post_count;

    fence.sections_mut()[0].preset = Some(Arc::new(StylePreset {
        fence_kind: FenceKind::Picket,
        ..StylePreset::with_materials(materials(&["post", "rail"]))
    }));

    assert_eq!(
        fence.build_fence(),
        Err(FenceError::InsufficientMaterials {
            section: 0,
            required: 3,
            found: 2,
        })
    );
    assert_eq!(fence.mesh(), &before);
    assert_eq!(fence.stats().post_count, before_posts);
}

// =============================================================================
// MALFORMED PATHS
// =============================================================================

#[test]
fn test_coincident_corners_stop_build() {
    let mut fence = fence_through(
        &[
            DVec3::ZERO,
            DVec3::new(4.0, 0.0, 0.0),
            DVec3::new(4.0, 0.0, 0.0),
            DVec3::new(8.0, 0.0, 0.0),
        ],
        farm(),
    );
    fence.build_fence().unwrap();

    let stats = fence.stats();
    assert_eq!(stats.aborted_at, Some(1));
    assert_eq!(stats.segments.len(), 2);
    assert_eq!(stats.segments[1].outcome, SegmentOutcome::Aborted);
    // Geometry from the first segment survives
    assert_eq!(stats.post_count, 3);
    assert!(!fence.mesh().is_empty());
}

#[test]
fn test_unbounded_corner_stops_build() {
    let ground = Arc::new(StylePreset {
        conform_mode: ConformMode::Ground,
        ..(*farm()).clone()
    });
    for far in [DVec3::new(f64::INFINITY, 0.0, 0.0), DVec3::new(1e300, 0.0, 0.0)] {
        for preset in [farm(), Arc::clone(&ground)] {
            let mut fence = fence_through(&[DVec3::ZERO, DVec3::X * 2.0, far], preset);
            fence.set_terrain(FlatGround::new(0.0));
            fence.build_fence().unwrap();

            let stats = fence.stats();
            assert_eq!(stats.aborted_at, Some(1));
            assert_eq!(stats.segments[1].outcome, SegmentOutcome::Aborted);
            assert_eq!(stats.post_count, 2);
            assert!(fence.mesh().vertices().iter().all(|v| v.is_finite()));
        }
    }
}

#[test]
fn test_missing_preset_skips_segment() {
    let mut fence = fence_through(
        &[
            DVec3::ZERO,
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(4.0, 0.0, 0.0),
            DVec3::new(6.0, 0.0, 0.0),
        ],
        farm(),
    );
    fence.section_mut(1).unwrap().preset = None;
    fence.build_fence().unwrap();

    let stats = fence.stats();
    let outcomes: Vec<_> = stats.segments.iter().map(|s| s.outcome).collect();
    assert_eq!(
        outcomes,
        [SegmentOutcome::Built, SegmentOutcome::Skipped, SegmentOutcome::Built]
    );
    assert_eq!(stats.post_count, 4);
    assert_relative_eq!(stats.total_length, 4.0, epsilon = 1e-12);
    assert!(stats.aborted_at.is_none());
}

#[test]
fn test_zero_picket_gap_is_clamped() {
    let preset = Arc::new(StylePreset {
        picket_gap: 0.0,
        segment_length: 3.0,
        ..(*picket()).clone()
    });
    let mut fence = fence_through(&[DVec3::ZERO, DVec3::X * 2.01], Arc::clone(&preset));
    fence.build_fence().unwrap();

    // 1.91 between the posts at 0.01 + 0.01 per picket
    assert_eq!(fence.stats().picket_count, 96);
    assert!(fence.mesh().vertices().iter().all(|v| v.is_finite()));
    // The shared preset is not rewritten
    assert_eq!(preset.picket_gap, 0.0);
}

// =============================================================================
// GROUND CONFORMING
// =============================================================================

#[test]
fn test_ground_mode_over_open_ground_matches_straight() {
    let points = [DVec3::ZERO, DVec3::new(3.0, 0.0, 2.0), DVec3::new(7.0, 0.0, 2.0)];

    let mut straight = fence_through(&points, picket());
    straight.build_fence().unwrap();

    let ground_preset = Arc::new(StylePreset {
        conform_mode: ConformMode::Ground,
        ..(*picket()).clone()
    });
    let mut ground = fence_through(&points, ground_preset);
    ground.build_fence().unwrap();

    assert_eq!(ground.stats().post_count, straight.stats().post_count);
    assert_eq!(ground.stats().picket_count, straight.stats().picket_count);

    let posts: Vec<DVec3> = (0..ground.stats().segments[0].posts)
        .map(|i| box_center(&ground, i))
        .collect();
    for (i, center) in posts.iter().enumerate() {
        let t = i as f64 / (posts.len() - 1) as f64;
        let expected = points[0].lerp(points[1], t) + DVec3::Y * 0.55;
        assert_relative_eq!((*center - expected).length(), 0.0, epsilon = 1e-9);
    }
}

#[test]
fn test_ground_mode_respects_origin() {
    let preset = Arc::new(StylePreset {
        conform_mode: ConformMode::Ground,
        ..(*farm()).clone()
    });
    let mut fence = Fence::new();
    fence.set_origin(DVec3::new(100.0, 5.0, 0.0));
    fence.set_terrain(FlatGround::new(3.0));
    fence.add_section(DVec3::new(100.0, 5.0, 0.0), Some(preset));
    fence.add_section(DVec3::new(104.0, 5.0, 0.0), None);
    fence.build_fence().unwrap();

    // Ground at world y = 3 is local y = -2
    let (min, max) = fence.mesh().bounds().unwrap();
    assert_relative_eq!(min.y, -2.0, epsilon = 1e-9);
    assert_relative_eq!(max.y, -2.0 + 1.1, epsilon = 1e-9);
    assert_relative_eq!(min.x, -0.05, epsilon = 1e-9);
}

#[test]
fn test_preset_from_json_builds() {
    let json = r#"{
        "fence_kind": "Picket",
        "conform_mode": "Ground",
        "segment_length": 1.5,
        "lean": 0.0,
        "materials": ["wood", "wood", "paint"],
        "rails": [{ "ground_offset": 0.3, "width": 0.08, "obstruction_prevents_pickets": false }]
    }"#;
    let preset: StylePreset = serde_json::from_str(json).unwrap();

    let mut fence = fence_through(&[DVec3::ZERO, DVec3::new(3.0, 0.0, 0.0)], Arc::new(preset));
    fence.set_terrain(FlatGround::new(0.0));
    fence.build_fence().unwrap();

    let stats = fence.stats();
    assert_eq!(stats.post_count, 3);
    assert_eq!(fence.mesh().submesh_count(), 2);
    assert_eq!(
        fence.mesh().submesh(0).len(),
        (stats.post_count + 2) * BOX_INDEX_COUNT
    );
}
