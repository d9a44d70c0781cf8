//! Euler-angle helpers in degrees.
//!
//! Euler triples are `(pitch, yaw, roll)` about `(X, Y, Z)` and are applied
//! roll first, then pitch, then yaw (`EulerRot::YXZ`). Yaw is the heading
//! around world up.

use glam::{EulerRot, Mat3, Quat, Vec3};

pub const MIN_TETHER_STEPS: u32 = 2;
pub const MAX_TETHER_STEPS: u32 = 24;

/// Wraps an angle into `[0, 360)`.
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

pub fn from_euler_degrees(euler: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        euler.y.to_radians(),
        euler.x.to_radians(),
        euler.z.to_radians(),
    )
}

/// Returns `(pitch, yaw, roll)` in degrees, each wrapped into `[0, 360)`.
pub fn to_euler_degrees(rotation: Quat) -> Vec3 {
    let (yaw, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
    Vec3::new(
        wrap_degrees(pitch.to_degrees()),
        wrap_degrees(yaw.to_degrees()),
        wrap_degrees(roll.to_degrees()),
    )
}

pub fn yaw_degrees(rotation: Quat) -> f32 {
    to_euler_degrees(rotation).y
}

pub fn from_yaw_degrees(yaw: f32) -> Quat {
    Quat::from_rotation_y(yaw.to_radians())
}

/// Drops pitch and roll, keeping only the heading of `rotation`.
pub fn yaw_only(rotation: Quat) -> Quat {
    from_yaw_degrees(yaw_degrees(rotation))
}

/// Replaces the yaw of `rotation`, keeping its pitch and roll.
pub fn with_yaw(rotation: Quat, yaw: f32) -> Quat {
    let (_, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
    Quat::from_euler(EulerRot::YXZ, yaw.to_radians(), pitch, roll)
}

pub fn clamp_tether_steps(steps: i32) -> u32 {
    steps.clamp(MIN_TETHER_STEPS as i32, MAX_TETHER_STEPS as i32) as u32
}

/// Snaps `angle` to the nearest of `steps` equally spaced headings.
pub fn step_angle(angle: f32, steps: u32) -> f32 {
    let step = 360.0 / steps.clamp(MIN_TETHER_STEPS, MAX_TETHER_STEPS) as f32;
    (angle / step).round() * step
}

/// Rotation whose forward axis (-Z) points along `forward`.
///
/// Falls back to identity for a zero direction; when `forward` is parallel to
/// `up` another reference axis is picked so the result stays well formed.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let forward = forward.normalize_or_zero();
    if forward.length_squared() < 0.0001 {
        return Quat::IDENTITY;
    }

    let mut right = forward.cross(up);
    if right.length_squared() < 0.0001 {
        right = forward.cross(Vec3::Z);
        if right.length_squared() < 0.0001 {
            right = forward.cross(Vec3::X);
        }
    }
    let right = right.normalize();
    let corrected_up = right.cross(forward);

    Quat::from_mat3(&Mat3::from_cols(right, corrected_up, -forward)).normalize()
}
