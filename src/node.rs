//! Point masses with force accumulation and Verlet/Euler state.

use crate::float::Float;
use crate::vec::Vec3;

/// A point mass in a chain.
///
/// `prev_position` drives Verlet integration; `velocity` drives the
/// spring-damper integrator and is derived for observation in Verlet mode.
/// A fixed node ignores forces and is never moved by integration or
/// constraint correction.
#[derive(Clone, Debug, PartialEq)]
pub struct Node<F: Float> {
    pub position: Vec3<F>,
    pub prev_position: Vec3<F>,
    pub velocity: Vec3<F>,
    pub acceleration: Vec3<F>,
    pub force: Vec3<F>,
    pub mass: F,
    pub fixed: bool,
}

impl<F: Float> Node<F> {
    /// Create a free node at rest.
    pub fn new(position: Vec3<F>, mass: F) -> Self {
        Node {
            position,
            prev_position: position,
            velocity: Vec3::zero(),
            acceleration: Vec3::zero(),
            force: Vec3::zero(),
            mass,
            fixed: false,
        }
    }

    /// Create a fixed anchor node.
    pub fn anchor(position: Vec3<F>, mass: F) -> Self {
        Node { fixed: true, ..Node::new(position, mass) }
    }

    /// True when the mass can be divided by.
    pub fn has_valid_mass(&self) -> bool {
        self.mass.is_finite() && self.mass > F::zero()
    }

    pub fn apply_force(&mut self, force: Vec3<F>) {
        if !self.fixed {
            self.force += force;
        }
    }

    pub fn clear_forces(&mut self) {
        self.force = Vec3::zero();
    }

    pub fn update_acceleration(&mut self) {
        self.acceleration = if !self.fixed && self.mass > F::zero() {
            self.force.scale(F::one() / self.mass)
        } else {
            Vec3::zero()
        };
    }

    /// Position-based Verlet step of length `h`.
    ///
    /// `damping` in (0, 1]; 1 leaves the motion undamped. The stored velocity
    /// is for observers only and does not feed the next step.
    pub fn integrate_verlet(&mut self, h: F, damping: F) {
        if self.fixed {
            return;
        }
        self.update_acceleration();

        let current = self.position;
        let mut next = current.scale(F::two()) - self.prev_position + self.acceleration.scale(h * h);
        next += (next - self.prev_position).scale(damping - F::one());

        if !h.is_near_zero(F::from_f64(1e-30)) {
            self.velocity = (next - self.prev_position).scale(F::one() / h);
        }
        self.prev_position = current;
        self.position = next;
        self.clear_forces();
    }

    /// Semi-implicit Euler step with `extra` force added to the accumulator.
    pub fn integrate_euler(&mut self, dt: F, extra: Vec3<F>) {
        if self.fixed {
            return;
        }
        self.force += extra;
        self.update_acceleration();

        self.velocity += self.acceleration.scale(dt);
        self.prev_position = self.position;
        self.position += self.velocity.scale(dt);
        self.clear_forces();
    }

    /// Place the node at rest at `position`, discarding all motion state.
    pub fn reset_to(&mut self, position: Vec3<F>) {
        self.position = position;
        self.prev_position = position;
        self.velocity = Vec3::zero();
        self.acceleration = Vec3::zero();
        self.clear_forces();
    }

    pub fn kinetic_energy(&self) -> F {
        F::half() * self.mass * self.velocity.length_sq()
    }
}
