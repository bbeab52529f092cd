//! Orbit/pan navigation.
//!
//! The renderer keeps a fixed camera and moves the world instead: the model
//! matrix is `view_rotation(-x, -y) * translate(offset)`. Pan deltas arrive in
//! camera-local space and are carried into world space with the rotation as it
//! was *before* this frame's orbit delta is applied.

use glam::{Mat4, Vec3, Vec4};

use crate::config::CameraConfig;
use crate::input::{NavMode, Navigation};
use crate::math::{multiply, multiply_point, orbit_rotation, perspective, translation, view_rotation};

/// Accumulated camera offsets and orbit angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub x_offset: f32,
    pub y_offset: f32,
    pub z_offset: f32,
    pub x_rotation: f32,
    pub y_rotation: f32,
}

impl CameraState {
    pub fn from_config(config: &CameraConfig) -> Self {
        let [x_offset, y_offset, z_offset] = config.initial_offset;
        let [x_rotation, y_rotation] = config.initial_rotation;
        Self {
            x_offset,
            y_offset,
            z_offset,
            x_rotation,
            y_rotation,
        }
    }

    pub fn offset(&self) -> Vec3 {
        Vec3::new(self.x_offset, self.y_offset, self.z_offset)
    }

    /// Apply one frame of navigation input and return the new model matrix.
    pub fn update(&mut self, nav: &Navigation, config: &CameraConfig) -> Mat4 {
        let mut local = Vec4::new(0.0, 0.0, nav.wheel_delta / config.wheel_divisor, 0.0);
        let mut rotation_delta = (0.0, 0.0);

        match nav.mode {
            NavMode::Pan => {
                local.x = nav.cursor_delta.x * config.pan_sensitivity;
                local.y = -nav.cursor_delta.y * config.pan_sensitivity;
            }
            NavMode::Orbit => {
                rotation_delta = (
                    nav.cursor_delta.y * config.orbit_sensitivity,
                    nav.cursor_delta.x * config.orbit_sensitivity,
                );
            }
            NavMode::Idle => {}
        }

        let world = multiply_point(orbit_rotation(self.x_rotation, self.y_rotation), local);
        self.x_offset += world.x;
        self.y_offset += world.y;
        self.z_offset += world.z;

        self.x_rotation += rotation_delta.0;
        self.y_rotation += rotation_delta.1;

        self.model_matrix()
    }

    /// `view_rotation(x, y) * translate(offset)`
    pub fn model_matrix(&self) -> Mat4 {
        multiply(
            view_rotation(self.x_rotation, self.y_rotation),
            translation(self.x_offset, self.y_offset, self.z_offset),
        )
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

/// Projection for a viewport of the given aspect ratio.
pub fn projection(config: &CameraConfig, aspect: f32) -> Mat4 {
    perspective(config.fov_degrees.to_radians(), aspect, config.near, config.far)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn nav(mode: NavMode, dx: f32, dy: f32, wheel: f32) -> Navigation {
        Navigation {
            mode,
            cursor_delta: Vec2::new(dx, dy),
            wheel_delta: wheel,
        }
    }

    #[test]
    fn test_idle_frame_keeps_state() {
        let config = CameraConfig::default();
        let mut camera = CameraState::default();
        let before = camera;
        let model = camera.update(&Navigation::NONE, &config);
        assert_eq!(camera, before);
        assert!(model.abs_diff_eq(before.model_matrix(), 1e-6));
    }

    #[test]
    fn test_orbit_changes_only_rotation() {
        let config = CameraConfig::default();
        let mut camera = CameraState::default();
        let before = camera;
        camera.update(&nav(NavMode::Orbit, 20.0, -10.0, 0.0), &config);
        assert_eq!(camera.offset(), before.offset());
        assert!((camera.y_rotation - (before.y_rotation + 0.2)).abs() < 1e-6);
        assert!((camera.x_rotation - (before.x_rotation - 0.1)).abs() < 1e-6);
    }

    #[test]
    fn test_wheel_moves_along_rotated_depth_axis() {
        let config = CameraConfig::default();
        let mut camera = CameraState {
            x_offset: 0.0,
            y_offset: 0.0,
            z_offset: 0.0,
            x_rotation: 0.0,
            y_rotation: 0.0,
        };
        camera.update(&nav(NavMode::Idle, 0.0, 0.0, 90.0), &config);
        assert!(camera.offset().abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), 1e-6));
    }

    #[test]
    fn test_pan_uses_rotation_before_orbit_delta() {
        let config = CameraConfig::default();
        let mut camera = CameraState {
            x_offset: 0.0,
            y_offset: 0.0,
            z_offset: 0.0,
            x_rotation: 0.0,
            y_rotation: 0.0,
        };
        // Orbit while scrolling: the wheel delta is carried by the old (identity) rotation.
        camera.update(&nav(NavMode::Orbit, 100.0, 0.0, 90.0), &config);
        assert!(camera.offset().abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), 1e-6));
        assert!((camera.y_rotation - 1.0).abs() < 1e-6);
    }
}
