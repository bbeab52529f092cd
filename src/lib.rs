//! # Lorenz Tracers
//!
//! Real-time 3D viewer for the Lorenz system. A cloud of tracers, each one an
//! independently integrated trajectory, is advanced by one explicit Euler step
//! per frame and drawn as colored line strips with bounded trails, over optional
//! reference grids and RGB axes. The camera orbits with the left mouse button,
//! pans with the right one and dollies with the wheel.
//!
//! ## Quick Start
//!
//! ```ignore
//! use lorenz_tracers::prelude::*;
//!
//! fn main() -> Result<(), ViewerError> {
//!     let mut config = ViewerConfig::default();
//!     config.simulation.tracer_count = 200;
//!     run(config)
//! }
//! ```
//!
//! ## Without a window
//!
//! The frame step is independent of the GPU. [`FrameDriver`] writes geometry
//! through the [`MeshStore`] trait and returns a [`Frame`] describing what to
//! draw; [`MemoryMeshStore`] keeps the buffers on the CPU:
//!
//! ```
//! use lorenz_tracers::prelude::*;
//!
//! let mut store = MemoryMeshStore::new();
//! let mut driver = FrameDriver::new(ViewerConfig::default(), &mut store);
//! let mut input = Input::new();
//! let host = HostInputs::default();
//!
//! let frame = driver.frame(&host, &mut input, &mut store);
//! assert_eq!(driver.cloud().len(), 20);
//! assert!(!frame.draws.is_empty());
//! ```
//!
//! ## Core Concepts
//!
//! | Piece | Role |
//! |-------|------|
//! | [`Drawable`] | Position + color buffers and a line topology |
//! | [`Grid`], [`Axes`] | Static reference geometry, uploaded once |
//! | [`Tracer`] | Trail with FIFO eviction past its max length |
//! | [`TracerCloud`] | Externally sized, ordered set of tracers |
//! | [`Euler`], [`Lorenz`] | Fixed-step integrator and the ODE it steps |
//! | [`CameraState`] | Orbit angles and offsets accumulated from input |
//! | [`HostInputs`] | Raw user inputs, parsed validated-or-unchanged |
//! | [`FrameDriver`] | The per-frame step tying it all together |

pub mod app;
pub mod camera;
pub mod config;
pub mod drawable;
pub mod driver;
pub mod error;
pub mod gpu;
pub mod host;
pub mod input;
pub mod integrator;
pub mod math;
pub mod shapes;
pub mod time;
pub mod tracer;
pub mod ui;

pub use app::run;
pub use camera::CameraState;
pub use config::{CameraConfig, SceneConfig, SimulationConfig, ViewerConfig, WindowConfig};
pub use drawable::{
    BufferUsage, Color, DrawCommand, DrawList, DrawParams, Drawable, MemoryMeshStore, MeshId, MeshStore, Position,
    Topology,
};
pub use driver::{Frame, FrameDriver, Viewport};
pub use error::{ConfigError, GpuError, ShaderError, ShaderStage, ViewerError};
pub use glam::{Mat4, Vec2, Vec3, Vec4};
pub use host::{HostInputs, ParsedInputs, Preset, Toggles, PRESETS};
pub use input::{Input, MouseButton, NavMode, Navigation};
pub use integrator::{Euler, Lorenz, OdeSystem};
pub use shapes::{Axes, Grid, Plane};
pub use time::FrameTimer;
pub use tracer::{Tracer, TracerCloud};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use lorenz_tracers::prelude::*;
/// ```
pub mod prelude {
    pub use crate::app::run;
    pub use crate::camera::CameraState;
    pub use crate::config::ViewerConfig;
    pub use crate::drawable::{DrawList, DrawParams, Drawable, MemoryMeshStore, MeshStore, Topology};
    pub use crate::driver::{Frame, FrameDriver};
    pub use crate::error::ViewerError;
    pub use crate::host::HostInputs;
    pub use crate::input::Input;
    pub use crate::integrator::{Euler, Lorenz, OdeSystem};
    pub use crate::shapes::{Axes, Grid, Plane};
    pub use crate::tracer::{Tracer, TracerCloud};
    pub use crate::{Vec2, Vec3, Vec4};
}
