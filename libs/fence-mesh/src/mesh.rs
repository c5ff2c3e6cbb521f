//! # Fence Mesh
//!
//! The committed output of a build: vertex positions, normals, UVs, one
//! triangle list per submesh and the material of each submesh.
//!
//! [`MeshSink`] is the renderer-side port a build commits into.
//! [`FenceMesh`] is the crate's own sink; hosts with an engine mesh type
//! implement the trait for it and replay a build with
//! [`FenceMesh::replay_into`].

use crate::preset::MaterialId;
use glam::{DVec2, DVec3};

/// Receiver of committed fence geometry.
///
/// A commit calls, in order: `clear`, `set_vertices`, `set_uvs`,
/// `set_submesh_count`, `set_triangles` once per submesh, `set_normals`,
/// `recalculate_normals`, `recalculate_bounds`, `set_materials`.
pub trait MeshSink {
    /// Drops all previous geometry.
    fn clear(&mut self);
    /// Replaces vertex positions.
    fn set_vertices(&mut self, vertices: Vec<DVec3>);
    /// Replaces the UV channel.
    fn set_uvs(&mut self, uvs: Vec<DVec2>);
    /// Sets how many submeshes follow.
    fn set_submesh_count(&mut self, count: usize);
    /// Replaces the triangle indices of one submesh.
    fn set_triangles(&mut self, indices: Vec<u32>, submesh: usize);
    /// Replaces vertex normals.
    fn set_normals(&mut self, normals: Vec<DVec3>);
    /// Recomputes normals from the committed triangles.
    fn recalculate_normals(&mut self);
    /// Recomputes the bounding box.
    fn recalculate_bounds(&mut self);
    /// Sets the material of each submesh, in submesh order.
    fn set_materials(&mut self, materials: Vec<MaterialId>);
}

/// A triangle mesh split into material submeshes.
///
/// Positions are f64; export helpers convert to f32 for GPU upload.
///
/// # Example
///
/// ```rust
/// use fence_mesh::mesh::{FenceMesh, MeshSink};
/// use glam::DVec3;
///
/// let mut mesh = FenceMesh::new();
/// mesh.set_vertices(vec![DVec3::ZERO, DVec3::X, DVec3::Y]);
/// mesh.set_submesh_count(1);
/// mesh.set_triangles(vec![0, 1, 2], 0);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FenceMesh {
    vertices: Vec<DVec3>,
    normals: Vec<DVec3>,
    uvs: Vec<DVec2>,
    submeshes: Vec<Vec<u32>>,
    materials: Vec<MaterialId>,
    bounds: Option<(DVec3, DVec3)>,
}

impl FenceMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles summed over all submeshes.
    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.len() / 3).sum()
    }

    /// Returns the number of submeshes.
    #[inline]
    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    /// Returns true if the mesh has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertex positions.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Vertex normals.
    #[inline]
    pub fn normals(&self) -> &[DVec3] {
        &self.normals
    }

    /// Vertex UVs.
    #[inline]
    pub fn uvs(&self) -> &[DVec2] {
        &self.uvs
    }

    /// Triangle indices of `submesh` (empty if it does not exist).
    pub fn submesh(&self, submesh: usize) -> &[u32] {
        self.submeshes.get(submesh).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Material of each submesh.
    #[inline]
    pub fn materials(&self) -> &[MaterialId] {
        &self.materials
    }

    /// Bounding box from the last `recalculate_bounds`, as (min, max).
    #[inline]
    pub fn bounds(&self) -> Option<(DVec3, DVec3)> {
        self.bounds
    }

    /// Computes area-weighted vertex normals from the triangles.
    ///
    /// Vertices are not shared between box faces, so every vertex ends up
    /// with its face normal. Vertices of degenerate triangles keep a zero
    /// normal.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![DVec3::ZERO; self.vertices.len()];

        for tri in self.submeshes.iter().flat_map(|s| s.chunks_exact(3)) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let (Some(&v0), Some(&v1), Some(&v2)) = (
                self.vertices.get(i0),
                self.vertices.get(i1),
                self.vertices.get(i2),
            ) else {
                continue;
            };

            let normal = (v1 - v0).cross(v2 - v0);
            normals[i0] += normal;
            normals[i1] += normal;
            normals[i2] += normal;
        }

        for normal in &mut normals {
            let len = normal.length();
            if len > 0.0 {
                *normal /= len;
            }
        }

        self.normals = normals;
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners of the bounding box.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        let Some((first, rest)) = self.vertices.split_first() else {
            return (DVec3::ZERO, DVec3::ZERO);
        };

        rest.iter()
            .fold((*first, *first), |(min, max), v| (min.min(*v), max.max(*v)))
    }

    /// Validates the mesh for correctness.
    ///
    /// Checks:
    /// - Every submesh holds whole triangles
    /// - All triangle indices are valid
    /// - No triangle repeats a vertex
    /// - One material per submesh
    ///
    /// Zero-area triangles from zero-sized parts are allowed.
    pub fn validate(&self) -> bool {
        let vertex_count = self.vertices.len() as u32;

        if !self.materials.is_empty() && self.materials.len() != self.submeshes.len() {
            return false;
        }

        for submesh in &self.submeshes {
            if submesh.len() % 3 != 0 {
                return false;
            }
            for tri in submesh.chunks_exact(3) {
                if tri.iter().any(|&i| i >= vertex_count) {
                    return false;
                }
                if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                    return false;
                }
            }
        }

        true
    }

    /// Exports vertices as f32 array for GPU.
    ///
    /// Returns flattened [x, y, z, x, y, z, ...] array.
    pub fn vertices_f32(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| [v.x as f32, v.y as f32, v.z as f32])
            .collect()
    }

    /// Exports normals as f32 array for GPU.
    pub fn normals_f32(&self) -> Vec<f32> {
        self.normals
            .iter()
            .flat_map(|n| [n.x as f32, n.y as f32, n.z as f32])
            .collect()
    }

    /// Exports UVs as a flattened [u, v, u, v, ...] f32 array.
    pub fn uvs_f32(&self) -> Vec<f32> {
        self.uvs.iter().flat_map(|uv| [uv.x as f32, uv.y as f32]).collect()
    }

    /// Exports one submesh's indices for GPU.
    pub fn indices_u32(&self, submesh: usize) -> Vec<u32> {
        self.submesh(submesh).to_vec()
    }

    /// Commits a copy of this mesh into another sink.
    pub fn replay_into(&self, sink: &mut dyn MeshSink) {
        sink.clear();
        sink.set_vertices(self.vertices.clone());
        sink.set_uvs(self.uvs.clone());
        sink.set_submesh_count(self.submeshes.len());
        for (index, indices) in self.submeshes.iter().enumerate() {
            sink.set_triangles(indices.clone(), index);
        }
        sink.set_normals(self.normals.clone());
        sink.recalculate_normals();
        sink.recalculate_bounds();
        sink.set_materials(self.materials.clone());
    }
}

impl MeshSink for FenceMesh {
    fn clear(&mut self) {
        *self = Self::default();
    }

    fn set_vertices(&mut self, vertices: Vec<DVec3>) {
        self.vertices = vertices;
    }

    fn set_uvs(&mut self, uvs: Vec<DVec2>) {
        self.uvs = uvs;
    }

    fn set_submesh_count(&mut self, count: usize) {
        self.submeshes.resize_with(count, Vec::new);
    }

    fn set_triangles(&mut self, indices: Vec<u32>, submesh: usize) {
        if submesh >= self.submeshes.len() {
            self.submeshes.resize_with(submesh + 1, Vec::new);
        }
        self.submeshes[submesh] = indices;
    }

    fn set_normals(&mut self, normals: Vec<DVec3>) {
        self.normals = normals;
    }

    fn recalculate_normals(&mut self) {
        self.compute_normals();
    }

    fn recalculate_bounds(&mut self) {
        self.bounds = Some(self.bounding_box());
    }

    fn set_materials(&mut self, materials: Vec<MaterialId>) {
        self.materials = materials;
    }
}
