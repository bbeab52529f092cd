//! Small 4x4 matrix helpers used to build the camera transforms.
//!
//! All matrices are column-major `glam::Mat4` values, matching the layout the
//! uniform buffers expect. Rotations follow the viewer's own angle convention:
//! a positive angle about X tips +Y towards -Z, a positive angle about Y turns
//! +Z towards -X (the opposite sense of `glam`'s right-handed rotations).

use glam::{Mat4, Vec3, Vec4};

/// Perspective projection with a vertical field of view in radians.
///
/// Depth maps to `[0, 1]` as wgpu expects.
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh(fov_y, aspect, near, far)
}

/// Rotation about the X axis.
pub fn rotation_x(angle: f32) -> Mat4 {
    Mat4::from_rotation_x(-angle)
}

/// Rotation about the Y axis.
pub fn rotation_y(angle: f32) -> Mat4 {
    Mat4::from_rotation_y(-angle)
}

/// Translation by `(x, y, z)`.
pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, y, z))
}

/// `a * b`: applies `b` first, then `a`.
pub fn multiply(a: Mat4, b: Mat4) -> Mat4 {
    a * b
}

/// Transforms a homogeneous point (or direction, with `w = 0`).
pub fn multiply_point(m: Mat4, point: Vec4) -> Vec4 {
    m * point
}

/// Orientation of the camera in world space: yaw about Y applied after pitch about X.
///
/// Used to carry camera-local pan deltas into world space.
pub fn orbit_rotation(x_rotation: f32, y_rotation: f32) -> Mat4 {
    multiply(rotation_y(y_rotation), rotation_x(x_rotation))
}

/// Rotation that moves the world opposite to the camera orientation.
///
/// This is the inverse of [`orbit_rotation`] for the same angles.
pub fn view_rotation(x_rotation: f32, y_rotation: f32) -> Mat4 {
    multiply(rotation_x(-x_rotation), rotation_y(-y_rotation))
}
