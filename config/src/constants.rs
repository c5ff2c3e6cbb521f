//! # Configuration Constants
//!
//! Centralized constants for the fence mesh engine.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Raycasting**: Reach of terrain probes
//! - **Preset Limits**: Clamps applied when presets are read
//! - **Preset Defaults**: Values of a freshly authored preset
//! - **Box Topology**: Counts produced by the oriented box emitter

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Minimum distance between two consecutive waypoints.
///
/// A segment at or below this length is a malformed path and stops the
/// build for every remaining section.
pub const SEGMENT_EPSILON: f64 = 1e-6;

/// Most post gaps a single segment may be split into.
///
/// Segments needing more are malformed paths, like coincident corners.
pub const MAX_SEGMENT_POSTS: usize = 100_000;

/// Squared-length threshold below which a direction vector is treated as
/// zero. Look rotations fall back to identity instead of normalizing it.
pub const DIRECTION_EPSILON: f64 = 1e-12;

// =============================================================================
// RAYCASTING CONSTANTS
// =============================================================================

/// Height above a sample point at which a downward terrain probe starts.
pub const RAYCAST_HEIGHT: f64 = 1000.0;

/// Maximum distance travelled by a downward terrain probe.
///
/// Twice [`RAYCAST_HEIGHT`] so the probe reaches as far below the sample
/// as it started above it.
pub const RAYCAST_DISTANCE: f64 = 2000.0;

// =============================================================================
// PRESET LIMITS
// =============================================================================

/// Smallest post spacing a preset may request.
pub const MIN_SEGMENT_LENGTH: f64 = 0.1;

/// Largest post spacing a preset may request.
pub const MAX_SEGMENT_LENGTH: f64 = 10.0;

/// Smallest gap between pickets.
///
/// The picket count of a gap is `ceil(gap_length / (picket_length + gap))`;
/// a gap near zero with thin pickets would explode the count.
///
/// # Example
///
/// ```rust
/// use config::constants::MIN_PICKET_GAP;
///
/// let count = (1.0_f64 / (0.0 + MIN_PICKET_GAP)).ceil();
/// assert!(count.is_finite());
/// ```
pub const MIN_PICKET_GAP: f64 = 0.01;

// =============================================================================
// PRESET DEFAULTS
// =============================================================================

/// Default post spacing.
pub const DEFAULT_SEGMENT_LENGTH: f64 = 2.0;

/// Default lean (1 = posts follow the terrain normal).
pub const DEFAULT_LEAN: f64 = 1.0;

/// Default tilt.
pub const DEFAULT_TILT: f64 = 1.0;

/// Default picket conform (1 = pickets drop fully onto the terrain).
pub const DEFAULT_PICKET_CONFORM: f64 = 1.0;

/// Default post size as `[width, length, height]`.
pub const DEFAULT_POST_DIMENSIONS: [f64; 3] = [0.1, 0.1, 1.1];

/// Default picket size as `[width, length, height]`.
pub const DEFAULT_PICKET_DIMENSIONS: [f64; 3] = [0.07, 0.01, 1.0];

/// Default gap between pickets.
pub const DEFAULT_PICKET_GAP: f64 = 0.1;

/// Default height of the picket bottoms above the ground.
pub const DEFAULT_PICKET_GROUND_OFFSET: f64 = 0.1;

/// Default rail thickness.
pub const DEFAULT_RAIL_THICKNESS: f64 = 0.04;

/// Default rail tiers as `[ground_offset, width]`.
pub const DEFAULT_RAILS: [[f64; 2]; 3] = [[0.2, 0.1], [0.5, 0.1], [0.8, 0.1]];

/// Ground offset of a rail created without explicit values.
pub const DEFAULT_RAIL_GROUND_OFFSET: f64 = 0.5;

/// Width of a rail created without explicit values.
pub const DEFAULT_RAIL_WIDTH: f64 = 0.07;

/// Height modifier of a new section.
pub const DEFAULT_HEIGHT_MODIFIER: f64 = 1.0;

/// Distance along +X between the two sections of a default fence.
pub const DEFAULT_SECTION_OFFSET: f64 = 1.0;

// =============================================================================
// BOX TOPOLOGY
// =============================================================================

/// Vertices emitted per box (4 per face, 6 faces, no sharing).
pub const BOX_VERTEX_COUNT: usize = 24;

/// Triangle indices emitted per box (2 triangles per face).
pub const BOX_INDEX_COUNT: usize = 36;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Clamps a blend factor into `[0, 1]`. NaN becomes 0.
///
/// # Example
///
/// ```rust
/// use config::constants::clamp_unit;
///
/// assert_eq!(clamp_unit(1.5), 1.0);
/// assert_eq!(clamp_unit(-0.2), 0.0);
/// assert_eq!(clamp_unit(f64::NAN), 0.0);
/// ```
#[inline]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
