//! # Fence Aggregate
//!
//! [`Fence`] owns the ordered section list and rebuilds the whole mesh
//! from it on every [`Fence::build_fence`] call.
//!
//! ## Build Pipeline
//!
//! ```text
//! sections[i], sections[i + 1]
//!       ↓ (no preset → skip, coincident → stop)
//! SegmentGeometry + SlotMap
//!       ↓
//! straight / ground placement → GeometryBuffers
//!       ↓
//! commit → FenceMesh, BuildStats
//! ```

use crate::assembly::{commit, MaterialTable};
use crate::error::FenceError;
use crate::mesh::{FenceMesh, MeshSink};
use crate::placement::{place_segment, PlacementContext};
use crate::preset::StylePreset;
use crate::primitives::GeometryBuffers;
use crate::section::Section;
use crate::segment::SegmentGeometry;
use crate::stats::{BuildStats, SegmentOutcome, SegmentReport};
use crate::terrain::{LayerMask, OpenGround, TerrainQuery};
use config::constants::DEFAULT_SECTION_OFFSET;
use glam::DVec3;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// A fence path and the mesh last built from it.
///
/// # Example
///
/// ```rust
/// use fence_mesh::fence::Fence;
/// use fence_mesh::preset::{MaterialId, StylePreset};
/// use glam::DVec3;
/// use std::sync::Arc;
///
/// let preset = Arc::new(StylePreset::with_materials([
///     MaterialId::new("post"),
///     MaterialId::new("rail"),
/// ]));
/// let mut fence = Fence::new();
/// fence.add_section(DVec3::ZERO, Some(preset));
/// fence.add_section(DVec3::new(4.0, 0.0, 0.0), None);
/// fence.build_fence()?;
///
/// assert_eq!(fence.stats().post_count, 3);
/// assert_eq!(fence.mesh().submesh_count(), 2);
/// # Ok::<(), fence_mesh::FenceError>(())
/// ```
pub struct Fence {
    sections: Vec<Section>,
    origin: DVec3,
    conform_mask: LayerMask,
    terrain: Box<dyn TerrainQuery>,
    selected_section: usize,
    mesh: FenceMesh,
    stats: BuildStats,
}

impl Default for Fence {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Fence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fence")
            .field("sections", &self.sections)
            .field("origin", &self.origin)
            .field("conform_mask", &self.conform_mask)
            .field("selected_section", &self.selected_section)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl Fence {
    /// Creates an empty fence at the world origin over open ground.
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            origin: DVec3::ZERO,
            conform_mask: LayerMask::DEFAULT,
            terrain: Box::new(OpenGround),
            selected_section: 0,
            mesh: FenceMesh::new(),
            stats: BuildStats::default(),
        }
    }

    /// Creates a fence with one short segment along +X, ready to build.
    pub fn with_default_sections(preset: Arc<StylePreset>) -> Self {
        let mut fence = Self::new();
        fence.sections.push(Section::new(DVec3::ZERO, Some(Arc::clone(&preset))));
        fence
            .sections
            .push(Section::new(DVec3::X * DEFAULT_SECTION_OFFSET, Some(preset)));
        fence
    }

    // =========================================================================
    // PLACEMENT & COLLABORATORS
    // =========================================================================

    /// World position section corners are relative to.
    #[inline]
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Moves the pivot. Sections move with it.
    pub fn set_origin(&mut self, origin: DVec3) {
        self.origin = origin;
    }

    /// Layers ground samples may hit.
    #[inline]
    pub fn conform_mask(&self) -> LayerMask {
        self.conform_mask
    }

    /// Sets the layers ground samples may hit.
    pub fn set_conform_mask(&mut self, mask: LayerMask) {
        self.conform_mask = mask;
    }

    /// Collision world used by ground-conforming segments.
    pub fn terrain(&self) -> &dyn TerrainQuery {
        self.terrain.as_ref()
    }

    /// Replaces the collision world.
    pub fn set_terrain(&mut self, terrain: impl TerrainQuery + 'static) {
        self.terrain = Box::new(terrain);
    }

    // =========================================================================
    // SECTIONS
    // =========================================================================

    /// Sections in path order.
    #[inline]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Mutable sections; the list itself only changes through the
    /// add/remove operations.
    #[inline]
    pub fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }

    /// Section at `index`, if any.
    pub fn section_mut(&mut self, index: usize) -> Option<&mut Section> {
        self.sections.get_mut(index)
    }

    /// Appends a section at world `position`.
    ///
    /// ## Parameters
    ///
    /// - `position`: world-space corner; stored relative to the origin
    /// - `preset`: style of the new section; `None` reuses the last
    ///   section's preset (or none for the first section)
    ///
    /// ## Returns
    ///
    /// Index of the new section.
    pub fn add_section(&mut self, position: DVec3, preset: Option<Arc<StylePreset>>) -> usize {
        let preset = preset.or_else(|| self.sections.last().and_then(|s| s.preset.clone()));
        self.sections.push(Section::new(position - self.origin, preset));
        self.sections.len() - 1
    }

    /// Removes and returns the section at `index`.
    ///
    /// ## Errors
    ///
    /// [`FenceError::SectionOutOfRange`] when `index` does not exist.
    pub fn remove_section(&mut self, index: usize) -> Result<Section, FenceError> {
        if index >= self.sections.len() {
            return Err(FenceError::out_of_range(index, self.sections.len()));
        }
        Ok(self.sections.remove(index))
    }

    /// Removes the last section, if any.
    pub fn remove_last_section(&mut self) -> Option<Section> {
        self.sections.pop()
    }

    /// Index of the section an editor has selected.
    #[inline]
    pub fn selected_section(&self) -> usize {
        self.selected_section
    }

    /// Selects a section. The index is clamped to the section list.
    pub fn select(&mut self, index: usize) {
        self.selected_section = index;
        self.clamp_selection_index();
    }

    /// Pulls the selection back into range after sections were removed.
    /// An empty fence selects 0.
    pub fn clamp_selection_index(&mut self) {
        self.selected_section = self
            .selected_section
            .min(self.sections.len().saturating_sub(1));
    }

    // =========================================================================
    // BUILD
    // =========================================================================

    /// Regenerates the mesh from the current sections.
    ///
    /// Fewer than two sections clears the mesh and stats. A segment whose
    /// section has no preset is skipped. Coincident corners, or a segment
    /// too long to lay out, stop the build but keep the geometry of
    /// earlier segments.
    ///
    /// ## Errors
    ///
    /// [`FenceError::InsufficientMaterials`] when a preset lacks a material
    /// its fence kind needs, and [`FenceError::TooManyVertices`] when the
    /// mesh overflows 32-bit indices. On error the previous mesh and stats
    /// are kept.
    pub fn build_fence(&mut self) -> Result<(), FenceError> {
        if self.sections.len() < 2 {
            log::debug!("fence has {} section(s), nothing to build", self.sections.len());
            self.mesh = FenceMesh::new();
            self.stats = BuildStats::default();
            return Ok(());
        }

        let started = Instant::now();
        let mut buffers = GeometryBuffers::new();
        let mut materials = MaterialTable::new();
        let mut stats = BuildStats::default();

        for (index, pair) in self.sections.windows(2).enumerate() {
            let (from, to) = (&pair[0], &pair[1]);
            let length = from.corner_point.distance(to.corner_point);

            let Some(preset) = from.preset.as_deref() else {
                log::debug!("section {index} has no preset, skipping segment");
                stats.record(SegmentReport::empty(index, SegmentOutcome::Skipped, length));
                continue;
            };

            let Some(geometry) = SegmentGeometry::new(from, to, preset) else {
                log::warn!(
                    "sections {index} and {} do not form a valid segment (length {length}), stopping build",
                    index + 1
                );
                stats.record(SegmentReport::empty(index, SegmentOutcome::Aborted, length));
                break;
            };

            let slots = materials.slot_map(preset, index)?;
            let mut ctx = PlacementContext {
                buffers: &mut buffers,
                slots,
                terrain: self.terrain.as_ref(),
                origin: self.origin,
                conform_mask: self.conform_mask,
            };
            let tally = place_segment(&mut ctx, &geometry, preset);

            log::debug!(
                "segment {index}: {:.3} long, {} posts, {} pickets, {} obstructed gaps",
                geometry.length,
                tally.posts,
                tally.pickets,
                tally.obstructed_gaps
            );
            stats.record(SegmentReport {
                index,
                outcome: SegmentOutcome::Built,
                length: geometry.length,
                posts: tally.posts,
                pickets: tally.pickets,
                obstructed_gaps: tally.obstructed_gaps,
            });
        }

        let mut mesh = FenceMesh::new();
        commit(&mut mesh, buffers, &materials)?;

        stats.vertex_count = mesh.vertex_count();
        stats.triangle_count = mesh.triangle_count();
        stats.build_time = started.elapsed();

        log::debug!(
            "fence built: {} vertices, {} triangles, {} submeshes in {:?}",
            stats.vertex_count,
            stats.triangle_count,
            mesh.submesh_count(),
            stats.build_time
        );

        self.mesh = mesh;
        self.stats = stats;
        Ok(())
    }

    /// Mesh from the last successful build.
    #[inline]
    pub fn mesh(&self) -> &FenceMesh {
        &self.mesh
    }

    /// Statistics from the last successful build.
    #[inline]
    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Replays the last build into a host mesh.
    pub fn export_to(&self, sink: &mut dyn MeshSink) {
        self.mesh.replay_into(sink);
    }
}
