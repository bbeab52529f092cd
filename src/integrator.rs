//! Fixed-step integration of the Lorenz system.
//!
//! The ODE system and the step size are plain data: an [`OdeSystem`] supplies
//! the derivative at a point, and [`Euler`] advances a point by one explicit
//! step. Trail storage lives elsewhere (see [`crate::tracer`]).

use glam::Vec3;

/// Step size used when none is configured.
pub const DEFAULT_STEP: f32 = 0.01;

/// An autonomous first-order ODE system in three variables.
pub trait OdeSystem {
    /// Time derivative at `p`.
    fn derivative(&self, p: Vec3) -> Vec3;
}

/// Lorenz system parameters.
///
/// ```text
/// dx/dt = sigma * (y - x)
/// dy/dt = x * (rho - z) - y
/// dz/dt = x * y - beta * z
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lorenz {
    pub sigma: f32,
    pub rho: f32,
    pub beta: f32,
}

impl Lorenz {
    pub fn new(sigma: f32, rho: f32, beta: f32) -> Self {
        Self { sigma, rho, beta }
    }
}

impl Default for Lorenz {
    /// The classic butterfly: sigma = 10, rho = 28, beta = 8/3.
    fn default() -> Self {
        Self::new(10.0, 28.0, 8.0 / 3.0)
    }
}

impl OdeSystem for Lorenz {
    fn derivative(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            self.sigma * (p.y - p.x),
            p.x * (self.rho - p.z) - p.y,
            p.x * p.y - self.beta * p.z,
        )
    }
}

/// Explicit (forward) Euler integrator with a fixed step.
///
/// No stability guard: large steps or extreme parameters may diverge to
/// non-finite values, which are passed through unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Euler {
    pub step: f32,
}

impl Euler {
    pub fn new(step: f32) -> Self {
        Self { step }
    }

    /// `p + step * f(p)`
    pub fn advance<S: OdeSystem + ?Sized>(&self, system: &S, p: Vec3) -> Vec3 {
        p + system.derivative(p) * self.step
    }

    /// The three per-axis next-value functions of one step, each a function of the
    /// current `(x, y, z)`.
    pub fn axis_functions<'a, S: OdeSystem + ?Sized>(
        &'a self,
        system: &'a S,
    ) -> (
        impl Fn(f32, f32, f32) -> f32 + 'a,
        impl Fn(f32, f32, f32) -> f32 + 'a,
        impl Fn(f32, f32, f32) -> f32 + 'a,
    ) {
        (
            move |x, y, z| self.advance(system, Vec3::new(x, y, z)).x,
            move |x, y, z| self.advance(system, Vec3::new(x, y, z)).y,
            move |x, y, z| self.advance(system, Vec3::new(x, y, z)).z,
        )
    }
}

impl Default for Euler {
    fn default() -> Self {
        Self::new(DEFAULT_STEP)
    }
}
