//! Time integration strategies.
//!
//! [`Integrator::Verlet`] moves nodes from their previous positions and
//! leaves link lengths to the constraint solver. [`Integrator::SpringDamper`]
//! turns every link into a Hooke spring with relative-velocity damping and
//! steps with semi-implicit Euler; no projection pass follows it.

use crate::float::Float;
use crate::node::Node;
use crate::topology::Link;
use crate::vec::Vec3;
use alloc::vec;

/// Default spring constant for [`Integrator::spring_damper`].
pub const DEFAULT_SPRING_STIFFNESS: f64 = 100.0;
/// Default damping coefficient for [`Integrator::spring_damper`].
pub const DEFAULT_SPRING_DAMPING: f64 = 0.5;

/// Integration strategy, fixed for the lifetime of a simulation.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Integrator<F: Float> {
    /// Position-based Verlet, paired with iterative distance projection.
    Verlet,
    /// Explicit spring forces with spring constant `stiffness` and
    /// relative-velocity damping coefficient `damping`.
    SpringDamper { stiffness: F, damping: F },
}

impl<F: Float> Integrator<F> {
    pub fn spring_damper() -> Self {
        Integrator::SpringDamper {
            stiffness: F::from_f64(DEFAULT_SPRING_STIFFNESS),
            damping: F::from_f64(DEFAULT_SPRING_DAMPING),
        }
    }

    /// Whether the distance constraint pass should run after this integrator.
    pub fn uses_projection(&self) -> bool {
        matches!(self, Integrator::Verlet)
    }

    /// Advance every free node by `h`. `damping` is the Verlet velocity
    /// retention factor and is ignored by the spring-damper strategy.
    pub fn integrate(&self, nodes: &mut [Node<F>], links: &[Link<F>], h: F, damping: F) {
        match *self {
            Integrator::Verlet => {
                for node in nodes.iter_mut() {
                    node.integrate_verlet(h, damping);
                }
            }
            Integrator::SpringDamper { stiffness, damping: coefficient } => {
                let forces = link_forces(nodes, links, stiffness, coefficient);
                for (node, force) in nodes.iter_mut().zip(forces) {
                    node.integrate_euler(h, force);
                }
            }
        }
    }
}

impl<F: Float> Default for Integrator<F> {
    fn default() -> Self {
        Integrator::Verlet
    }
}

/// Hooke force of a single link acting on its child node.
pub fn spring_force<F: Float>(node: &Node<F>, parent: &Node<F>, rest_length: F, k: F, c: F) -> Vec3<F> {
    let direction = node.position - parent.position;
    let dist = direction.length();
    if dist < F::from_f64(1e-10) {
        return Vec3::zero();
    }
    let unit = direction.scale(F::one() / dist);
    let spring = unit.scale(-k * (dist - rest_length));
    let damp = (node.velocity - parent.velocity).scale(-c);
    spring + damp
}

/// Summed link forces per node, evaluated from one snapshot of the state.
fn link_forces<F: Float>(nodes: &[Node<F>], links: &[Link<F>], k: F, c: F) -> alloc::vec::Vec<Vec3<F>> {
    let mut forces = vec![Vec3::zero(); nodes.len()];
    for link in links {
        forces[link.node] += spring_force(&nodes[link.node], &nodes[link.parent], link.rest_length, k, c);
    }
    forces
}
