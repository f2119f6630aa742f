//! Configuration types for the simulation driver.

use crate::float::Float;
use crate::integrator::Integrator;
use crate::vec::Vec3;

/// Largest frame step accepted by `update`, about 30 updates per second.
pub const DEFAULT_MAX_FRAME_DT: f64 = 0.033;

/// Environment and solver settings owned by a simulation.
///
/// # Builder Pattern
/// ```
/// use catena::config::SimulationConfig;
/// use catena::vec::Vec3;
///
/// let config: SimulationConfig<f64> = SimulationConfig::new()
///     .with_iterations(10)
///     .with_gravity(Vec3::new(0.0, 0.0, -9.81))
///     .with_damping(0.99)
///     .with_substeps(5);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig<F: Float> {
    /// Distance constraint passes per substep, at least 1. Default: 10.
    pub iterations: usize,
    /// Global constraint stiffness in [0, 1]. Default: 1.0 (rigid).
    pub stiffness: F,
    /// Gravity acceleration. Default: (0, 0, -9.81).
    pub gravity: Vec3<F>,
    /// Verlet velocity retention in (0, 1]. 1.0 = no damping. Default: 0.99.
    pub damping: F,
    /// Substeps per frame, at least 1. Default: 5.
    pub substeps: usize,
    /// Frame steps longer than this are clamped. Default: 0.033 s.
    pub max_frame_dt: F,
    /// Constant force applied to every free node each substep. Default: zero.
    pub wind: Vec3<F>,
    /// Integration strategy. Default: Verlet.
    pub integrator: Integrator<F>,
}

impl<F: Float> SimulationConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        SimulationConfig {
            iterations: 10,
            stiffness: F::one(),
            gravity: Vec3::up(F::from_f64(-9.81)),
            damping: F::from_f64(0.99),
            substeps: 5,
            max_frame_dt: F::from_f64(DEFAULT_MAX_FRAME_DT),
            wind: Vec3::zero(),
            integrator: Integrator::Verlet,
        }
    }

    /// Set the number of constraint iterations (clamped to at least 1).
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    /// Set the global stiffness (clamped to [0, 1]).
    pub fn with_stiffness(mut self, stiffness: F) -> Self {
        if stiffness.is_finite() {
            self.stiffness = stiffness.clamp(F::zero(), F::one());
        }
        self
    }

    pub fn with_gravity(mut self, gravity: Vec3<F>) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the damping factor (clamped to (0, 1]).
    pub fn with_damping(mut self, damping: F) -> Self {
        if damping.is_finite() && damping > F::zero() {
            self.damping = damping.min(F::one());
        }
        self
    }

    /// Set the number of substeps (clamped to at least 1).
    pub fn with_substeps(mut self, substeps: usize) -> Self {
        self.substeps = substeps.max(1);
        self
    }

    /// Set the frame step cap. Non-positive values are ignored.
    pub fn with_max_frame_dt(mut self, max_frame_dt: F) -> Self {
        if max_frame_dt.is_finite() && max_frame_dt > F::zero() {
            self.max_frame_dt = max_frame_dt;
        }
        self
    }

    pub fn with_wind(mut self, wind: Vec3<F>) -> Self {
        self.wind = wind;
        self
    }

    pub fn with_integrator(mut self, integrator: Integrator<F>) -> Self {
        self.integrator = integrator;
        self
    }
}

impl<F: Float> SimulationConfig<F> {
    /// Apply the builder clamps to a config whose public fields were set
    /// directly. Invalid scalars fall back to their defaults.
    pub fn normalized(mut self) -> Self {
        let defaults = Self::new();
        self.iterations = self.iterations.max(1);
        self.substeps = self.substeps.max(1);
        self.stiffness = if self.stiffness.is_finite() {
            self.stiffness.clamp(F::zero(), F::one())
        } else {
            defaults.stiffness
        };
        self.damping = if self.damping.is_finite() && self.damping > F::zero() {
            self.damping.min(F::one())
        } else {
            defaults.damping
        };
        if !(self.max_frame_dt.is_finite() && self.max_frame_dt > F::zero()) {
            self.max_frame_dt = defaults.max_frame_dt;
        }
        self
    }
}

impl<F: Float> Default for SimulationConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}
