//! # Orientation Helpers
//!
//! Rotation builders shared by the placement strategies.
//!
//! ## Conventions
//!
//! A rotation's local `+Z` is "forward", `+Y` is "up" and `+X` is "right".
//! Boxes extend along forward/back by their height, so a post frame is a
//! rotation whose forward axis points along the post (world up for an
//! upright post) and whose up axis runs along the fence line.

use config::constants::{clamp_unit, DIRECTION_EPSILON};
use glam::{DMat3, DQuat, DVec3};
use std::f64::consts::PI;

/// Rotation whose forward axis is `forward` and whose up axis is as close to
/// `up` as possible.
///
/// A near-zero `forward` gives the identity rotation. When `up` is parallel
/// to `forward` the shortest arc from `+Z` is used instead.
///
/// # Example
///
/// ```rust
/// use fence_mesh::orientation::look_rotation;
/// use glam::DVec3;
///
/// let rot = look_rotation(DVec3::X, DVec3::Y);
/// assert!((rot * DVec3::Z - DVec3::X).length() < 1e-12);
/// assert!((rot * DVec3::Y - DVec3::Y).length() < 1e-12);
/// ```
pub fn look_rotation(forward: DVec3, up: DVec3) -> DQuat {
    if forward.length_squared() <= DIRECTION_EPSILON {
        return DQuat::IDENTITY;
    }
    let z = forward.normalize();
    let x = up.cross(z);
    if x.length_squared() <= DIRECTION_EPSILON {
        return DQuat::from_rotation_arc(DVec3::Z, z);
    }
    let x = x.normalize();
    let y = z.cross(x);
    DQuat::from_mat3(&DMat3::from_cols(x, y, z)).normalize()
}

/// Shortest rotation taking direction `from` onto direction `to`.
///
/// Either vector being near zero gives the identity rotation.
pub fn from_to_rotation(from: DVec3, to: DVec3) -> DQuat {
    if from.length_squared() <= DIRECTION_EPSILON || to.length_squared() <= DIRECTION_EPSILON {
        return DQuat::IDENTITY;
    }
    DQuat::from_rotation_arc(from.normalize(), to.normalize())
}

/// Half turn about world up. Swaps a frame's left and right sides while
/// keeping its vertical axis.
#[inline]
pub fn half_turn() -> DQuat {
    DQuat::from_rotation_y(PI)
}

/// Stands a look rotation up as a post frame.
///
/// The rotation's forward axis is swung onto its own up axis, so the box
/// height runs vertically, then the frame is half-turned so its right side
/// lands on the rotation's left.
pub fn post_frame(rotation: DQuat) -> DQuat {
    half_turn() * from_to_rotation(rotation * DVec3::Z, rotation * DVec3::Y) * rotation
}

/// Upright frame for a post looking along `lateral`.
///
/// Falls back to the identity look rotation when `lateral` is near zero.
pub fn upright_frame(lateral: DVec3) -> DQuat {
    let look = if lateral.length_squared() > DIRECTION_EPSILON {
        look_rotation(lateral, DVec3::Y)
    } else {
        DQuat::IDENTITY
    };
    post_frame(look)
}

/// Spherical blend between two rotations; `t` is clamped to `[0, 1]`.
#[inline]
pub fn blend(from: DQuat, to: DQuat, t: f64) -> DQuat {
    from.slerp(to, clamp_unit(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_vec_eq(a: DVec3, b: DVec3) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-9);
    }

    #[test]
    fn test_look_rotation_axes() {
        let forward = DVec3::new(1.0, 0.0, 1.0);
        let rot = look_rotation(forward, DVec3::Y);
        assert_vec_eq(rot * DVec3::Z, forward.normalize());
        assert_vec_eq(rot * DVec3::Y, DVec3::Y);
    }

    #[test]
    fn test_look_rotation_zero_forward_is_identity() {
        assert_eq!(look_rotation(DVec3::ZERO, DVec3::Y), DQuat::IDENTITY);
    }

    #[test]
    fn test_look_rotation_parallel_up_falls_back() {
        let rot = look_rotation(DVec3::Y * 3.0, DVec3::Y);
        assert_vec_eq(rot * DVec3::Z, DVec3::Y);
    }

    #[test]
    fn test_look_rotation_up_hint_is_orthogonalized() {
        let rot = look_rotation(DVec3::Y, DVec3::new(1.0, 0.5, 0.0));
        assert_vec_eq(rot * DVec3::Z, DVec3::Y);
        assert_vec_eq(rot * DVec3::Y, DVec3::X);
    }

    #[test]
    fn test_from_to_rotation() {
        let rot = from_to_rotation(DVec3::X, DVec3::Y * 2.0);
        assert_vec_eq(rot * DVec3::X, DVec3::Y);
        assert_eq!(from_to_rotation(DVec3::ZERO, DVec3::Y), DQuat::IDENTITY);
    }

    #[test]
    fn test_half_turn_swaps_sides() {
        assert_vec_eq(half_turn() * DVec3::X, -DVec3::X);
        assert_vec_eq(half_turn() * DVec3::Y, DVec3::Y);
    }

    #[test]
    fn test_post_frame_stands_upright() {
        let section = look_rotation(DVec3::X, DVec3::Y);
        let frame = post_frame(section);
        // Height axis vertical, length axis along the fence line
        assert_vec_eq(frame * DVec3::Z, DVec3::Y);
        assert_vec_eq(frame * DVec3::Y, DVec3::X);
        // Right side of the post is the left side of the section
        assert_vec_eq(frame * DVec3::X, section * -DVec3::X);
    }

    #[test]
    fn test_upright_frame_zero_lateral() {
        let frame = upright_frame(DVec3::ZERO);
        assert_vec_eq(frame * DVec3::Z, DVec3::Y);
    }

    #[test]
    fn test_blend_endpoints() {
        let a = DQuat::IDENTITY;
        let b = DQuat::from_rotation_y(1.0);
        assert_relative_eq!(blend(a, b, 0.0).dot(a).abs(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(blend(a, b, 1.0).dot(b).abs(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(blend(a, b, 7.0).dot(b).abs(), 1.0, epsilon = 1e-9);
    }
}
