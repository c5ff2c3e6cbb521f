//! # Primitives
//!
//! Geometry emitters for fence parts. Posts, rails and pickets are all
//! oriented boxes.

pub mod cube;

pub use cube::{BoxDimensions, GeometryBuffers};
