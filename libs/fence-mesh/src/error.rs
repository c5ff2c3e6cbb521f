//! # Fence Errors
//!
//! Error types for fence building and section editing.
//!
//! Malformed paths, missing presets, raycast misses and degenerate
//! directions are not errors: the build handles them with documented
//! fallbacks and reports them through [`crate::stats::BuildStats`].

use thiserror::Error;

/// Errors that can occur while building or editing a fence.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FenceError {
    /// A preset lists fewer materials than its fence kind needs.
    #[error(
        "Insufficient materials: section {section} needs {required} material slots, preset has {found}"
    )]
    InsufficientMaterials {
        section: usize,
        required: usize,
        found: usize,
    },

    /// A section index does not exist.
    #[error("Section index {index} out of range (len: {len})")]
    SectionOutOfRange { index: usize, len: usize },

    /// A height modifier is negative or not finite.
    #[error("Invalid height modifier: {value}")]
    InvalidHeightModifier { value: f64 },

    /// The committed mesh exceeds the 32-bit index range.
    #[error("Too many vertices: {count} (max: {max})")]
    TooManyVertices { count: usize, max: usize },
}

impl FenceError {
    /// Creates an insufficient materials error.
    pub fn insufficient_materials(section: usize, required: usize, found: usize) -> Self {
        Self::InsufficientMaterials {
            section,
            required,
            found,
        }
    }

    /// Creates a section out of range error.
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::SectionOutOfRange { index, len }
    }
}
