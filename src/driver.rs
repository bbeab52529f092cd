//! The per-frame step.
//!
//! [`FrameDriver`] owns every piece of mutable application state (camera,
//! tracers, reference geometry, current Lorenz parameters) and turns one frame
//! of host input into a [`Frame`]: the viewport, the two transforms, and an
//! ordered list of draw calls. It never touches the GPU; the renderer executes
//! the `Frame` afterwards.
//!
//! Order within a frame:
//!
//! 1. parse the numeric inputs (invalid ones keep last frame's value)
//! 2. resize the tracer cloud
//! 3. apply the trail length
//! 4. advance every tracer one Euler step
//! 5. size the viewport, recomputing the projection if the aspect changed
//! 6. update the camera from input deltas
//! 7. clear
//! 8. axes and grids at geometry scale
//! 9. tracers at tracer scale
//! 10. reset per-frame input deltas

use glam::Mat4;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace};

use crate::camera::{projection, CameraState};
use crate::config::ViewerConfig;
use crate::drawable::{DrawList, DrawParams, MeshStore};
use crate::host::HostInputs;
use crate::input::Input;
use crate::integrator::{Euler, Lorenz};
use crate::shapes::{Axes, Grid, Plane};
use crate::tracer::{Tracer, TracerCloud};

/// Pixel rectangle to render into, origin at the top left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Whole surface, or its largest centred square.
    pub fn fit(width: u32, height: u32, square: bool) -> Self {
        if !square {
            return Self {
                x: 0,
                y: 0,
                width,
                height,
            };
        }
        let side = width.min(height);
        Self {
            x: (width - side) / 2,
            y: (height - side) / 2,
            width: side,
            height: side,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height, `None` for an empty viewport.
    pub fn aspect(&self) -> Option<f32> {
        (!self.is_empty()).then(|| self.width as f32 / self.height as f32)
    }
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub viewport: Viewport,
    pub projection: Mat4,
    pub model: Mat4,
    pub clear_color: [f64; 4],
    pub draws: DrawList,
}

/// Application state plus the frame step.
#[derive(Debug)]
pub struct FrameDriver {
    config: ViewerConfig,
    camera: CameraState,
    cloud: TracerCloud,
    grids: [Grid; 3],
    axes: Axes,
    system: Lorenz,
    integrator: Euler,
    max_trail_length: usize,
    rng: StdRng,
    projection: Mat4,
    aspect: Option<f32>,
}

impl FrameDriver {
    /// Build the reference geometry and initial state. No tracers exist until
    /// the first frame.
    pub fn new<S: MeshStore + ?Sized>(config: ViewerConfig, store: &mut S) -> Self {
        let scene = &config.scene;
        let sim = &config.simulation;

        let grid_color = [1.0, 1.0, 1.0, scene.grid_alpha];
        let grids = Plane::ALL.map(|plane| Grid::with_color(&mut *store, plane, scene.grid_size, grid_color));
        let axes = Axes::new(store, scene.axes_size);

        let rng = match sim.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        debug!(
            grid_size = scene.grid_size,
            axes_size = scene.axes_size,
            seed = ?sim.seed,
            "Scene geometry built"
        );

        Self {
            camera: CameraState::from_config(&config.camera),
            cloud: TracerCloud::new(),
            grids,
            axes,
            system: Lorenz::new(sim.sigma, sim.rho, sim.beta),
            integrator: Euler::new(sim.step_size),
            max_trail_length: sim.max_trail_length.min(sim.trail_length_limit),
            rng,
            projection: Mat4::IDENTITY,
            aspect: None,
            config,
        }
    }

    /// Run one frame.
    pub fn frame<S: MeshStore + ?Sized>(&mut self, host: &HostInputs, input: &mut Input, store: &mut S) -> Frame {
        let sim = &self.config.simulation;
        let parsed = host.parse(sim.tracer_limit, sim.trail_length_limit);

        // 1. parameters
        if let Some(sigma) = parsed.sigma {
            self.system.sigma = sigma;
        }
        if let Some(rho) = parsed.rho {
            self.system.rho = rho;
        }
        if let Some(beta) = parsed.beta {
            self.system.beta = beta;
        }
        if parsed.sigma.is_none() || parsed.rho.is_none() || parsed.beta.is_none() {
            trace!(sigma = %host.sigma, rho = %host.rho, beta = %host.beta, "Ignoring unparsable parameter");
        }

        // 2. population
        if let Some(count) = parsed.tracer_count {
            if count != self.cloud.len() {
                debug!(from = self.cloud.len(), to = count, "Resizing tracer cloud");
            }
            let extent = sim.spawn_extent;
            let rng = &mut self.rng;
            self.cloud
                .resize(count, store, |s| Tracer::spawn_random(s, &mut *rng, extent));
        } else {
            trace!(input = %host.tracer_count, "Ignoring unparsable tracer count");
        }

        // 3. trail length; the last valid value is re-applied so new tracers pick it up
        match parsed.max_trail_length {
            Some(length) => {
                if length != self.max_trail_length {
                    debug!(from = self.max_trail_length, to = length, "Trail length changed");
                }
                self.max_trail_length = length;
            }
            None => trace!(input = %host.max_trail_length, "Ignoring unparsable trail length"),
        }
        self.cloud.set_max_length(self.max_trail_length);

        // 4. integrate
        self.cloud.advance(store, &self.integrator, &self.system);

        // 5. viewport and projection
        let viewport = Viewport::fit(host.width, host.height, self.config.scene.square_viewport);
        if let Some(aspect) = viewport.aspect() {
            if self.aspect != Some(aspect) {
                debug!(width = viewport.width, height = viewport.height, "Viewport resized");
                self.projection = projection(&self.config.camera, aspect);
                self.aspect = Some(aspect);
            }
        }

        // 6. camera
        let model = self.camera.update(&input.navigation(), &self.config.camera);

        // 7-9. clear, then draw in a fixed order
        let scene = &self.config.scene;
        let mut draws = DrawList::new();
        let geometry = DrawParams::with_scale(scene.geometry_scale);
        let toggles = host.toggles;
        if toggles.axes {
            self.axes.draw(&mut draws, geometry);
        }
        for (grid, visible) in self.grids.iter().zip([toggles.x_plane, toggles.y_plane, toggles.z_plane]) {
            if visible {
                grid.draw(&mut draws, geometry);
            }
        }
        self.cloud.draw(&mut draws, DrawParams::with_scale(scene.tracer_scale));

        // 10. reset deltas
        input.end_frame();

        Frame {
            viewport,
            projection: self.projection,
            model,
            clear_color: scene.clear_color,
            draws,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn cloud(&self) -> &TracerCloud {
        &self.cloud
    }

    pub fn system(&self) -> &Lorenz {
        &self.system
    }

    pub fn max_trail_length(&self) -> usize {
        self.max_trail_length
    }

    pub fn grid(&self, plane: Plane) -> &Grid {
        &self.grids[plane as usize]
    }

    pub fn axes(&self) -> &Axes {
        &self.axes
    }

    /// Projection for the most recent non-empty viewport.
    pub fn projection(&self) -> Mat4 {
        self.projection
    }
}
