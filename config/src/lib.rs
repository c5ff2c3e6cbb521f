//! # Config Crate
//!
//! Centralized configuration constants for the fence mesh engine.
//! All magic numbers and tunable parameters are defined here so that the
//! placement strategies, the box emitter and the preset defaults agree.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{MIN_PICKET_GAP, RAYCAST_HEIGHT, RAYCAST_DISTANCE};
//!
//! // Picket gaps are never allowed to collapse to zero
//! let authored_gap: f64 = 0.0;
//! let gap = authored_gap.max(MIN_PICKET_GAP);
//! assert!(gap > 0.0);
//!
//! // A ground probe starts above the sample and reaches well below it
//! assert!(RAYCAST_DISTANCE > RAYCAST_HEIGHT);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Engine-Agnostic**: Values are plain `f64`/`usize`, no math types
//! - **Authoring Defaults**: Preset defaults match the shipped fence asset

pub mod constants;
