//! # Terrain Queries
//!
//! The fence never talks to a physics engine directly. Ground sampling,
//! rail obstruction checks and picket re-conforming all go through the
//! [`TerrainQuery`] port, so a host can plug in its collision world and
//! tests can plug in deterministic fakes.

use config::constants::{RAYCAST_DISTANCE, RAYCAST_HEIGHT};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Bit set of collision layers a ray should consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Matches nothing.
    pub const NONE: Self = Self(0);
    /// Matches every layer. Used for unfiltered queries.
    pub const DEFAULT: Self = Self(u32::MAX);

    /// Mask containing a single layer. Indices past 31 give an empty mask.
    pub const fn layer(index: u32) -> Self {
        match 1u32.checked_shl(index) {
            Some(bits) => Self(bits),
            None => Self::NONE,
        }
    }

    /// Returns true if `index` is part of the mask.
    #[inline]
    pub const fn contains(self, index: u32) -> bool {
        index < 32 && self.0 & (1 << index) != 0
    }

    /// Union of two masks.
    #[inline]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Where a ray struck the terrain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space hit point.
    pub point: DVec3,
    /// Surface normal at the hit point.
    pub normal: DVec3,
}

/// Raycast port implemented by the host's collision world.
pub trait TerrainQuery {
    /// Casts a ray and returns the closest hit within `max_distance`.
    ///
    /// ## Parameters
    ///
    /// - `origin`: world-space start of the ray
    /// - `direction`: unit direction
    /// - `max_distance`: reach of the ray
    /// - `layers`: layers the ray may hit
    fn raycast(
        &self,
        origin: DVec3,
        direction: DVec3,
        max_distance: f64,
        layers: LayerMask,
    ) -> Option<RayHit>;
}

impl<T: TerrainQuery + ?Sized> TerrainQuery for &T {
    fn raycast(
        &self,
        origin: DVec3,
        direction: DVec3,
        max_distance: f64,
        layers: LayerMask,
    ) -> Option<RayHit> {
        (**self).raycast(origin, direction, max_distance, layers)
    }
}

/// Probes straight down through `point` from high above it.
///
/// Returns the hit, or the point itself with an up normal when nothing
/// is below.
pub fn sample_ground(terrain: &dyn TerrainQuery, point: DVec3, layers: LayerMask) -> RayHit {
    terrain
        .raycast(
            point + DVec3::Y * RAYCAST_HEIGHT,
            DVec3::NEG_Y,
            RAYCAST_DISTANCE,
            layers,
        )
        .unwrap_or_else(|| {
            log::trace!("ground probe missed at {point}, using flat sample");
            RayHit {
                point,
                normal: DVec3::Y,
            }
        })
}

// =============================================================================
// BUNDLED TERRAINS
// =============================================================================

/// Terrain with nothing in it. Every ray misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenGround;

impl TerrainQuery for OpenGround {
    fn raycast(&self, _: DVec3, _: DVec3, _: f64, _: LayerMask) -> Option<RayHit> {
        None
    }
}

/// Infinite horizontal plane at `height`, living on collision `layer`.
#[derive(Debug, Clone, Copy)]
pub struct FlatGround {
    /// Plane height.
    pub height: f64,
    /// Collision layer of the plane.
    pub layer: u32,
}

impl FlatGround {
    /// Plane at `height` on layer 0.
    pub fn new(height: f64) -> Self {
        Self { height, layer: 0 }
    }
}

impl TerrainQuery for FlatGround {
    fn raycast(
        &self,
        origin: DVec3,
        direction: DVec3,
        max_distance: f64,
        layers: LayerMask,
    ) -> Option<RayHit> {
        if !layers.contains(self.layer) || direction.y.abs() <= f64::EPSILON {
            return None;
        }
        let t = (self.height - origin.y) / direction.y;
        if t < 0.0 || t > max_distance {
            return None;
        }
        let normal = if origin.y >= self.height {
            DVec3::Y
        } else {
            DVec3::NEG_Y
        };
        Some(RayHit {
            point: origin + direction * t,
            normal,
        })
    }
}
