//! # Oriented Box Primitive
//!
//! Emits rectangular prisms (posts, rails, pickets) into shared geometry
//! buffers. Every box is flat shaded: each face owns its four vertices so
//! normals and UVs never blend across an edge.

use config::constants::{BOX_INDEX_COUNT, BOX_VERTEX_COUNT};
use glam::{DQuat, DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Size of a box in its local frame.
///
/// - `width`: extent across local left/right, centered
/// - `length`: extent along local up, measured from the base
/// - `height`: extent along local forward/back, centered
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxDimensions {
    /// Left/right extent.
    pub width: f64,
    /// Up extent from the base.
    pub length: f64,
    /// Forward/back extent.
    pub height: f64,
}

impl BoxDimensions {
    /// Creates box dimensions.
    pub const fn new(width: f64, length: f64, height: f64) -> Self {
        Self {
            width,
            length,
            height,
        }
    }

    /// Builds dimensions from a `[width, length, height]` triple.
    pub const fn from_array(dims: [f64; 3]) -> Self {
        Self::new(dims[0], dims[1], dims[2])
    }
}

/// Accumulated geometry for one build.
///
/// Triangle indices are grouped per submesh slot; a slot's list is created
/// the first time a box is emitted into it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryBuffers {
    pub(crate) vertices: Vec<DVec3>,
    pub(crate) normals: Vec<DVec3>,
    pub(crate) uvs: Vec<DVec2>,
    pub(crate) submeshes: Vec<Vec<u32>>,
    box_count: usize,
}

impl GeometryBuffers {
    /// Creates empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices emitted so far. Also the base index of the next box.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of boxes emitted so far.
    #[inline]
    pub fn box_count(&self) -> usize {
        self.box_count
    }

    /// Total triangle indices across all submeshes.
    pub fn index_count(&self) -> usize {
        self.submeshes.iter().map(Vec::len).sum()
    }

    /// Number of submesh slots that exist.
    #[inline]
    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    /// Emitted vertex positions.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Emitted per-vertex normals.
    #[inline]
    pub fn normals(&self) -> &[DVec3] {
        &self.normals
    }

    /// Emitted per-vertex UVs.
    #[inline]
    pub fn uvs(&self) -> &[DVec2] {
        &self.uvs
    }

    /// Triangle indices of one submesh slot (empty if the slot was never used).
    pub fn submesh(&self, slot: usize) -> &[u32] {
        self.submeshes.get(slot).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Makes sure at least `count` submesh slots exist.
    pub fn ensure_submeshes(&mut self, count: usize) {
        if self.submeshes.len() < count {
            self.submeshes.resize_with(count, Vec::new);
        }
    }

    /// Appends one oriented box.
    ///
    /// ## Parameters
    ///
    /// - `base`: base center of the box; it extends `dims.length` along the
    ///   rotated up axis from here and is centered on the other two axes
    /// - `orientation`: rotation of the box's local frame
    /// - `dims`: box size
    /// - `submesh`: slot receiving the 36 indices
    ///
    /// ## Returns
    ///
    /// The index of the first of the 24 vertices written.
    pub fn emit_box(
        &mut self,
        base: DVec3,
        orientation: DQuat,
        dims: BoxDimensions,
        submesh: usize,
    ) -> u32 {
        let first = self.vertices.len() as u32;

        let up = orientation * DVec3::Y;
        let down = -up;
        let front = orientation * DVec3::Z;
        let back = -front;
        let right = orientation * DVec3::X;
        let left = -right;

        let left_pos = left * (dims.width * 0.5);
        let right_pos = right * (dims.width * 0.5);
        let front_pos = front * (dims.height * 0.5);
        let back_pos = back * (dims.height * 0.5);
        let up_pos = up * dims.length;

        let p0 = base + back_pos + left_pos + up_pos;
        let p1 = base + front_pos + left_pos + up_pos;
        let p2 = base + front_pos + left_pos;
        let p3 = base + back_pos + left_pos;

        let p4 = base + back_pos + right_pos + up_pos;
        let p5 = base + front_pos + right_pos + up_pos;
        let p6 = base + front_pos + right_pos;
        let p7 = base + back_pos + right_pos;

        // One quad per face; each face's normal is the axis all four corners share.
        let faces: [([DVec3; 4], DVec3); 6] = [
            ([p0, p1, p2, p3], left),
            ([p7, p4, p0, p3], back),
            ([p4, p5, p1, p0], up),
            ([p6, p7, p3, p2], down),
            ([p5, p6, p2, p1], front),
            ([p7, p6, p5, p4], right),
        ];
        self.vertices.reserve(BOX_VERTEX_COUNT);
        self.normals.reserve(BOX_VERTEX_COUNT);
        for (quad, normal) in faces {
            self.vertices.extend_from_slice(&quad);
            self.normals.extend_from_slice(&[normal; 4]);
        }

        self.uvs.extend_from_slice(&box_uvs(dims));

        self.ensure_submeshes(submesh + 1);
        let indices = &mut self.submeshes[submesh];
        indices.reserve(BOX_INDEX_COUNT);
        for face in 0..6u32 {
            let o = first + face * 4;
            indices.extend_from_slice(&[o + 3, o + 1, o, o + 3, o + 2, o + 1]);
        }

        self.box_count += 1;
        first
    }
}

/// UV layout of a box, in emitted face order.
///
/// Each face is parameterized by two of the box dimensions, but the pairs
/// do not line up with the faces they land on (the second face gets the
/// width × length pair although it spans width × height, and so on).
/// Existing fence textures are authored against this layout.
fn box_uvs(dims: BoxDimensions) -> [DVec2; 24] {
    let w = dims.width;
    let d = dims.length;
    let h = dims.height;

    let uv_00 = DVec2::ZERO;
    let uv_d0 = DVec2::new(d, 0.0);
    let uv_0d = DVec2::new(0.0, d);
    let uv_0h = DVec2::new(0.0, h);
    let uv_dh = DVec2::new(d, h);
    let uv_w0 = DVec2::new(w, 0.0);
    let uv_wh = DVec2::new(w, h);
    let uv_wd = DVec2::new(w, d);

    [
        uv_d0, uv_dh, uv_0h, uv_00, //
        uv_w0, uv_wd, uv_0d, uv_00, //
        uv_w0, uv_wh, uv_0h, uv_00, //
        uv_0h, uv_00, uv_w0, uv_wh, //
        uv_0d, uv_00, uv_w0, uv_wd, //
        uv_d0, uv_dh, uv_0h, uv_00, //
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_dims() -> BoxDimensions {
        BoxDimensions::new(2.0, 1.0, 2.0)
    }

    #[test]
    fn test_box_vertex_count() {
        let mut buffers = GeometryBuffers::new();
        buffers.emit_box(DVec3::ZERO, DQuat::IDENTITY, unit_dims(), 0);
        assert_eq!(buffers.vertex_count(), BOX_VERTEX_COUNT);
        assert_eq!(buffers.normals().len(), BOX_VERTEX_COUNT);
        assert_eq!(buffers.uvs().len(), BOX_VERTEX_COUNT);
    }

    #[test]
    fn test_box_index_count() {
        let mut buffers = GeometryBuffers::new();
        buffers.emit_box(DVec3::ZERO, DQuat::IDENTITY, unit_dims(), 0);
        assert_eq!(buffers.index_count(), BOX_INDEX_COUNT);
    }

    #[test]
    fn test_box_base_index_advances() {
        let mut buffers = GeometryBuffers::new();
        let first = buffers.emit_box(DVec3::ZERO, DQuat::IDENTITY, unit_dims(), 0);
        let second = buffers.emit_box(DVec3::X * 5.0, DQuat::IDENTITY, unit_dims(), 0);
        assert_eq!(first, 0);
        assert_eq!(second, 24);
        assert_eq!(buffers.submesh(0)[36..39], [24 + 3, 24 + 1, 24]);
        assert_eq!(buffers.box_count(), 2);
    }

    #[test]
    fn test_box_submesh_slots_grow() {
        let mut buffers = GeometryBuffers::new();
        buffers.emit_box(DVec3::ZERO, DQuat::IDENTITY, unit_dims(), 2);
        assert_eq!(buffers.submesh_count(), 3);
        assert!(buffers.submesh(0).is_empty());
        assert!(buffers.submesh(1).is_empty());
        assert_eq!(buffers.submesh(2).len(), BOX_INDEX_COUNT);
        assert!(buffers.submesh(7).is_empty());
    }

    #[test]
    fn test_box_extents_identity() {
        let mut buffers = GeometryBuffers::new();
        buffers.emit_box(DVec3::ZERO, DQuat::IDENTITY, BoxDimensions::new(2.0, 3.0, 4.0), 0);

        let mut min = DVec3::splat(f64::MAX);
        let mut max = DVec3::splat(f64::MIN);
        for v in buffers.vertices() {
            min = min.min(*v);
            max = max.max(*v);
        }
        assert_eq!(min, DVec3::new(-1.0, 0.0, -2.0));
        assert_eq!(max, DVec3::new(1.0, 3.0, 2.0));
    }

    #[test]
    fn test_box_normals_point_outward() {
        let mut buffers = GeometryBuffers::new();
        let orientation = DQuat::from_rotation_y(0.7) * DQuat::from_rotation_x(0.3);
        let base = DVec3::new(3.0, 1.0, -2.0);
        buffers.emit_box(base, orientation, unit_dims(), 0);

        let center = base + orientation * DVec3::new(0.0, 0.5, 0.0);
        for tri in buffers.submesh(0).chunks(3) {
            let v0 = buffers.vertices()[tri[0] as usize];
            let v1 = buffers.vertices()[tri[1] as usize];
            let v2 = buffers.vertices()[tri[2] as usize];
            let face_normal = (v1 - v0).cross(v2 - v0).normalize();
            let emitted = buffers.normals()[tri[0] as usize];

            assert_relative_eq!(face_normal.dot(emitted), 1.0, epsilon = 1e-9);
            assert!((v0 - center).dot(face_normal) > 0.0);
        }
    }

    #[test]
    fn test_box_uvs_use_dimensions() {
        let mut buffers = GeometryBuffers::new();
        buffers.emit_box(DVec3::ZERO, DQuat::IDENTITY, BoxDimensions::new(0.1, 0.2, 1.5), 0);
        let uvs = buffers.uvs();
        assert_eq!(uvs[0], DVec2::new(0.2, 0.0));
        assert_eq!(uvs[1], DVec2::new(0.2, 1.5));
        assert_eq!(uvs[5], DVec2::new(0.1, 0.2));
        assert_eq!(uvs[9], DVec2::new(0.1, 1.5));
    }

    #[test]
    fn test_box_zero_dimensions_is_degenerate_not_invalid() {
        let mut buffers = GeometryBuffers::new();
        buffers.emit_box(DVec3::ONE, DQuat::IDENTITY, BoxDimensions::new(0.0, 0.0, 0.0), 0);
        assert_eq!(buffers.vertex_count(), BOX_VERTEX_COUNT);
        assert!(buffers.vertices().iter().all(|v| *v == DVec3::ONE));
        assert!(buffers.submesh(0).iter().all(|&i| (i as usize) < BOX_VERTEX_COUNT));
    }
}
