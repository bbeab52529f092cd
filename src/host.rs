//! The host surface: what the user can change between frames.
//!
//! Numeric parameters are kept as the raw text the user typed. The frame driver
//! parses them every frame; anything that doesn't parse yields `None` and the
//! corresponding state is left as it was.

use crate::config::ViewerConfig;

/// Which reference geometry is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggles {
    pub axes: bool,
    pub x_plane: bool,
    pub y_plane: bool,
    pub z_plane: bool,
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            axes: true,
            x_plane: false,
            y_plane: true,
            z_plane: false,
        }
    }
}

/// Raw per-frame inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct HostInputs {
    pub sigma: String,
    pub rho: String,
    pub beta: String,
    pub max_trail_length: String,
    pub tracer_count: String,
    pub toggles: Toggles,
    /// Displayed drawing surface size in physical pixels.
    pub width: u32,
    pub height: u32,
}

impl HostInputs {
    pub fn from_config(config: &ViewerConfig) -> Self {
        let sim = &config.simulation;
        let scene = &config.scene;
        Self {
            sigma: sim.sigma.to_string(),
            rho: sim.rho.to_string(),
            beta: sim.beta.to_string(),
            max_trail_length: sim.max_trail_length.to_string(),
            tracer_count: sim.tracer_count.to_string(),
            toggles: Toggles {
                axes: scene.show_axes,
                x_plane: scene.show_x_plane,
                y_plane: scene.show_y_plane,
                z_plane: scene.show_z_plane,
            },
            width: config.window.width,
            height: config.window.height,
        }
    }

    /// Overwrite the five numeric fields.
    pub fn apply_preset(&mut self, preset: &Preset) {
        self.rho = preset.rho.to_string();
        self.sigma = preset.sigma.to_string();
        self.beta = preset.beta.to_string();
        self.max_trail_length = preset.length.to_string();
        self.tracer_count = preset.count.to_string();
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Validate every numeric field. Counts above the given limits are clamped.
    pub fn parse(&self, tracer_limit: usize, trail_length_limit: usize) -> ParsedInputs {
        ParsedInputs {
            sigma: parse_real(&self.sigma),
            rho: parse_real(&self.rho),
            beta: parse_real(&self.beta),
            max_trail_length: parse_count(&self.max_trail_length).map(|n| n.min(trail_length_limit)),
            tracer_count: parse_count(&self.tracer_count).map(|n| n.min(tracer_limit)),
        }
    }
}

impl Default for HostInputs {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}

/// Validated-or-unchanged view of [`HostInputs`]: `None` means "keep the previous value".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParsedInputs {
    pub sigma: Option<f32>,
    pub rho: Option<f32>,
    pub beta: Option<f32>,
    pub max_trail_length: Option<usize>,
    pub tracer_count: Option<usize>,
}

/// A finite real number, or `None`.
pub fn parse_real(text: &str) -> Option<f32> {
    let value = text.trim().parse::<f64>().ok()?;
    let value = value as f32;
    value.is_finite().then_some(value)
}

/// A finite, non-negative number truncated toward zero, or `None`.
pub fn parse_count(text: &str) -> Option<usize> {
    let value = text.trim().parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    // Saturates for values beyond usize::MAX; callers clamp anyway.
    Some(value.trunc() as usize)
}

/// Named parameter set for the preset buttons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub rho: f32,
    pub sigma: f32,
    pub beta: f32,
    pub length: usize,
    pub count: usize,
}

impl Preset {
    const fn new(name: &'static str, rho: f32, sigma: f32, beta: f32, length: usize, count: usize) -> Self {
        Self {
            name,
            rho,
            sigma,
            beta,
            length,
            count,
        }
    }
}

pub const PRESETS: &[Preset] = &[
    Preset::new("Classic", 28.0, 10.0, 8.0 / 3.0, 1000, 20),
    Preset::new("Calm", 14.0, 10.0, 8.0 / 3.0, 500, 50),
    Preset::new("Wild", 45.0, 14.0, 4.0, 1500, 30),
    Preset::new("Tight", 28.0, 10.0, 1.0, 2000, 10),
    Preset::new("Stretched", 45.92, 16.0, 4.0, 1000, 40),
    Preset::new("Collapse", 0.5, 10.0, 8.0 / 3.0, 300, 200),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_real() {
        assert_eq!(parse_real("10"), Some(10.0));
        assert_eq!(parse_real(" 2.5 "), Some(2.5));
        assert_eq!(parse_real("-3e1"), Some(-30.0));
        assert_eq!(parse_real(""), None);
        assert_eq!(parse_real("abc"), None);
        assert_eq!(parse_real("inf"), None);
        assert_eq!(parse_real("NaN"), None);
        assert_eq!(parse_real("1e40"), None);
    }

    #[test]
    fn test_parse_count_truncates() {
        assert_eq!(parse_count("20"), Some(20));
        assert_eq!(parse_count("7.9"), Some(7));
        assert_eq!(parse_count("0"), Some(0));
        assert_eq!(parse_count("-1"), None);
        assert_eq!(parse_count("twenty"), None);
        assert_eq!(parse_count("inf"), None);
    }

    #[test]
    fn test_parse_clamps_counts() {
        let mut inputs = HostInputs::default();
        inputs.tracer_count = "1000000".to_string();
        inputs.max_trail_length = "9".to_string();
        let parsed = inputs.parse(5000, 100_000);
        assert_eq!(parsed.tracer_count, Some(5000));
        assert_eq!(parsed.max_trail_length, Some(9));
    }

    #[test]
    fn test_preset_fills_fields() {
        let mut inputs = HostInputs::default();
        inputs.sigma = "garbage".to_string();
        inputs.apply_preset(&PRESETS[1]);
        let parsed = inputs.parse(usize::MAX, usize::MAX);
        assert_eq!(parsed.sigma, Some(10.0));
        assert_eq!(parsed.rho, Some(14.0));
        assert_eq!(parsed.max_trail_length, Some(500));
        assert_eq!(parsed.tracer_count, Some(50));
    }

    #[test]
    fn test_defaults_parse() {
        let parsed = HostInputs::default().parse(usize::MAX, usize::MAX);
        assert_eq!(parsed.sigma, Some(10.0));
        assert_eq!(parsed.rho, Some(28.0));
        assert!((parsed.beta.unwrap() - 8.0 / 3.0).abs() < 1e-6);
        assert_eq!(parsed.tracer_count, Some(20));
    }
}
