//! Viewer configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "simulation": { "tracer_count": 200, "seed": 42 }, "scene": { "grid_size": 5 } }
//! ```

use std::f32::consts::{FRAC_PI_2, PI};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub simulation: SimulationConfig,
    pub camera: CameraConfig,
    pub scene: SceneConfig,
}

impl ViewerConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Lorenz Tracers".to_string(),
            width: 1100,
            height: 900,
        }
    }
}

/// Initial parameter values and simulation limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub sigma: f32,
    pub rho: f32,
    pub beta: f32,
    pub max_trail_length: usize,
    pub tracer_count: usize,
    /// Euler step applied every frame.
    pub step_size: f32,
    /// New tracers start uniformly inside `[0, spawn_extent)^3`.
    pub spawn_extent: f32,
    /// Fixed RNG seed; random when absent.
    pub seed: Option<u64>,
    /// Parsed tracer counts are clamped to this.
    pub tracer_limit: usize,
    /// Parsed trail lengths are clamped to this.
    pub trail_length_limit: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sigma: 10.0,
            rho: 28.0,
            beta: 8.0 / 3.0,
            max_trail_length: 1000,
            tracer_count: 20,
            step_size: crate::integrator::DEFAULT_STEP,
            spawn_extent: 10.0,
            seed: None,
            tracer_limit: 5000,
            trail_length_limit: 100_000,
        }
    }
}

/// Navigation sensitivities and projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// World units per pixel of right-button drag.
    pub pan_sensitivity: f32,
    /// Radians per pixel of left-button drag.
    pub orbit_sensitivity: f32,
    /// Wheel pixels per world unit of depth motion.
    pub wheel_divisor: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub initial_offset: [f32; 3],
    /// `[x_rotation, y_rotation]` in radians.
    pub initial_rotation: [f32; 2],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            pan_sensitivity: 0.04,
            orbit_sensitivity: 0.01,
            wheel_divisor: 90.0,
            fov_degrees: 90.0,
            near: 0.1,
            far: 1000.0,
            initial_offset: [0.0, -10.0, 0.0],
            initial_rotation: [FRAC_PI_2, PI],
        }
    }
}

/// Reference geometry and draw settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub grid_size: u32,
    pub grid_alpha: f32,
    pub axes_size: f32,
    /// Scale for axes and grids.
    pub geometry_scale: f32,
    /// Scale for the tracer cloud; trajectories span tens of units.
    pub tracer_scale: f32,
    pub show_axes: bool,
    pub show_x_plane: bool,
    pub show_y_plane: bool,
    pub show_z_plane: bool,
    /// Draw into a centred square instead of the whole window.
    pub square_viewport: bool,
    pub clear_color: [f64; 4],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            grid_size: 10,
            grid_alpha: 0.05,
            axes_size: 1000.0,
            geometry_scale: 1.0,
            tracer_scale: 0.1,
            show_axes: true,
            show_x_plane: false,
            show_y_plane: true,
            show_z_plane: false,
            square_viewport: true,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ViewerConfig::from_json(r#"{ "simulation": { "tracer_count": 3 } }"#).unwrap();
        assert_eq!(config.simulation.tracer_count, 3);
        assert_eq!(config.simulation.rho, 28.0);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_round_trip_through_json() {
        let mut config = ViewerConfig::default();
        config.simulation.seed = Some(9);
        let text = config.to_json_pretty().unwrap();
        assert_eq!(ViewerConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            ViewerConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
