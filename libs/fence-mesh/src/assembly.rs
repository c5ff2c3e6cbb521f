//! # Mesh Assembly
//!
//! Maps preset material slots onto shared submeshes and commits the
//! finished buffers into a [`MeshSink`].
//!
//! Submeshes are keyed by material identity: every distinct material gets
//! exactly one submesh, in first-seen order, and every part using that
//! material lands in it regardless of which preset or slot named it.

use crate::error::FenceError;
use crate::mesh::MeshSink;
use crate::preset::{MaterialId, MaterialSlot, StylePreset};
use crate::primitives::GeometryBuffers;

/// Submesh index of each part of one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotMap {
    /// Submesh receiving posts.
    pub post: usize,
    /// Submesh receiving rails.
    pub rail: usize,
    /// Submesh receiving pickets. `None` for fence kinds without pickets.
    pub picket: Option<usize>,
}

/// Distinct materials of a build, in submesh order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialTable {
    materials: Vec<MaterialId>,
}

impl MaterialTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the submesh of `material`, appending it if unseen.
    pub fn register(&mut self, material: &MaterialId) -> usize {
        if let Some(index) = self.materials.iter().position(|m| m == material) {
            return index;
        }
        self.materials.push(material.clone());
        self.materials.len() - 1
    }

    /// Resolves the submeshes for a segment built with `preset`.
    ///
    /// Only slots the fence kind draws from are registered.
    ///
    /// ## Errors
    ///
    /// [`FenceError::InsufficientMaterials`] when the preset lists fewer
    /// materials than its fence kind needs; the table is left unchanged.
    pub fn slot_map(&mut self, preset: &StylePreset, section: usize) -> Result<SlotMap, FenceError> {
        preset.validate_materials(section)?;

        let mut resolve = |slot: MaterialSlot| {
            preset
                .material(slot)
                .map(|material| self.register(material))
                .ok_or_else(|| {
                    FenceError::insufficient_materials(
                        section,
                        preset.required_material_slots(),
                        preset.materials.len(),
                    )
                })
        };

        let post = resolve(MaterialSlot::Post)?;
        let rail = resolve(MaterialSlot::Rail)?;
        let picket = if preset.used_slots().contains(&MaterialSlot::Picket) {
            Some(resolve(MaterialSlot::Picket)?)
        } else {
            None
        };

        Ok(SlotMap { post, rail, picket })
    }

    /// Number of distinct materials.
    #[inline]
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Returns true if nothing was registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Materials in submesh order.
    #[inline]
    pub fn materials(&self) -> &[MaterialId] {
        &self.materials
    }
}

/// Commits buffers into `sink`.
///
/// The submesh count always equals the material count, so a material
/// whose parts all collapsed still gets an (empty) submesh.
///
/// ## Errors
///
/// [`FenceError::TooManyVertices`] when the vertex count does not fit a
/// 32-bit index; `sink` is not touched in that case.
pub fn commit<S: MeshSink + ?Sized>(
    sink: &mut S,
    mut buffers: GeometryBuffers,
    materials: &MaterialTable,
) -> Result<(), FenceError> {
    let count = buffers.vertex_count();
    let max = u32::MAX as usize;
    if count > max {
        return Err(FenceError::TooManyVertices { count, max });
    }

    buffers.ensure_submeshes(materials.len());
    let GeometryBuffers {
        vertices,
        normals,
        uvs,
        submeshes,
        ..
    } = buffers;

    sink.clear();
    sink.set_vertices(vertices);
    sink.set_uvs(uvs);
    sink.set_submesh_count(submeshes.len());
    for (index, indices) in submeshes.into_iter().enumerate() {
        sink.set_triangles(indices, index);
    }
    sink.set_normals(normals);
    sink.recalculate_normals();
    sink.recalculate_bounds();
    sink.set_materials(materials.materials().to_vec());

    Ok(())
}
