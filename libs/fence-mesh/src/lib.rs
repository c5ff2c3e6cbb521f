//! # Fence Mesh
//!
//! Procedural fence meshes from a path of waypoints.
//! Each segment between two sections is styled by a shared preset and
//! turned into posts, rails and pickets made of oriented boxes.
//!
//! ## Architecture
//!
//! ```text
//! Fence (sections, presets, terrain) → placement → GeometryBuffers → FenceMesh
//! ```
//!
//! ## Algorithms
//!
//! - **Straight placement**: evenly spaced upright posts, one rail per tier
//! - **Ground placement**: posts sampled from the terrain and blended
//!   between the surface normal and upright, rails per post gap with
//!   obstruction checks, pickets re-conformed to the ground
//! - **Assembly**: one submesh per distinct material across all presets
//!
//! ## Usage
//!
//! ```rust
//! use fence_mesh::{Fence, FlatGround, MaterialId, StylePreset};
//! use fence_mesh::preset::ConformMode;
//! use glam::DVec3;
//! use std::sync::Arc;
//!
//! let preset = Arc::new(StylePreset {
//!     conform_mode: ConformMode::Ground,
//!     ..StylePreset::with_materials([MaterialId::new("wood"), MaterialId::new("wood")])
//! });
//!
//! let mut fence = Fence::new();
//! fence.set_terrain(FlatGround::new(0.0));
//! fence.add_section(DVec3::ZERO, Some(preset));
//! fence.add_section(DVec3::new(6.0, 0.0, 0.0), None);
//! fence.build_fence()?;
//!
//! assert_eq!(fence.mesh().submesh_count(), 1);
//! # Ok::<(), fence_mesh::FenceError>(())
//! ```

pub mod assembly;
pub mod error;
pub mod fence;
pub mod mesh;
pub mod orientation;
pub mod placement;
pub mod preset;
pub mod primitives;
pub mod section;
pub mod segment;
pub mod stats;
pub mod terrain;

pub use error::FenceError;
pub use fence::Fence;
pub use mesh::{FenceMesh, MeshSink};
pub use preset::{ConformMode, FenceKind, MaterialId, PostJoint, Rail, StylePreset};
pub use section::Section;
pub use stats::{BuildStats, SegmentOutcome, SegmentReport};
pub use terrain::{FlatGround, LayerMask, OpenGround, RayHit, TerrainQuery};

#[cfg(test)]
mod tests;
