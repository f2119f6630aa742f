//! Iterative constraint solver: distance relaxation followed by contacts.

use crate::constraint::{Constraint, DistanceConstraint, GroundPlane, SphereCollider};
use crate::float::Float;
use crate::node::Node;
use crate::observer::StepObserver;
use crate::topology::Topology;
use alloc::vec::Vec as AllocVec;

/// Gauss-Seidel relaxation over an ordered list of distance constraints,
/// then one pass over the collision geometry.
///
/// Each distance constraint sees the corrections already made by earlier
/// ones in the same pass. More iterations bring the chain closer to rigid.
#[derive(Clone, Debug)]
pub struct ConstraintSolver<F: Float> {
    links: AllocVec<DistanceConstraint<F>>,
    ground: GroundPlane<F>,
    ground_enabled: bool,
    spheres: AllocVec<SphereCollider<F>>,
    iterations: usize,
    stiffness: F,
}

impl<F: Float> ConstraintSolver<F> {
    pub fn new(iterations: usize, stiffness: F) -> Self {
        let mut solver = ConstraintSolver {
            links: AllocVec::new(),
            ground: GroundPlane::default(),
            ground_enabled: false,
            spheres: AllocVec::new(),
            iterations: 1,
            stiffness: F::one(),
        };
        solver.set_iterations(iterations);
        solver.set_stiffness(stiffness);
        solver
    }

    /// Replace the distance constraints with one per topology link.
    pub fn rebuild(&mut self, topology: &Topology<F>) {
        self.links = topology.distance_constraints();
    }

    /// Route a constraint to the distance list or the collision set.
    pub fn add_constraint(&mut self, constraint: Constraint<F>) {
        match constraint {
            Constraint::Distance(c) => self.links.push(c),
            Constraint::Ground(g) => {
                self.ground = g;
                self.ground_enabled = true;
            }
            Constraint::Sphere(s) => self.spheres.push(s),
        }
    }

    pub fn set_iterations(&mut self, iterations: usize) {
        self.iterations = iterations.max(1);
    }

    /// Clamp to [0, 1]. NaN leaves the current stiffness in place.
    pub fn set_stiffness(&mut self, stiffness: F) {
        if stiffness.is_finite() {
            self.stiffness = stiffness.clamp(F::zero(), F::one());
        } else {
            log::warn!("ignoring non-finite stiffness {}", stiffness);
        }
    }

    pub fn enable_ground(&mut self, height: F, restitution: F) {
        self.ground = GroundPlane::new(height, restitution);
        self.ground_enabled = true;
    }

    /// The plane settings are kept for a later [`toggle_ground`](Self::toggle_ground).
    pub fn disable_ground(&mut self) {
        self.ground_enabled = false;
    }

    /// Switch the last configured ground plane on or off.
    pub fn toggle_ground(&mut self) {
        self.ground_enabled = !self.ground_enabled;
    }

    pub fn add_sphere(&mut self, sphere: SphereCollider<F>) {
        self.spheres.push(sphere);
    }

    pub fn clear_spheres(&mut self) {
        self.spheres.clear();
    }

    /// Run every distance constraint `iterations` times, in order.
    pub fn solve<O: StepObserver>(&self, nodes: &mut [Node<F>], observer: &mut O) {
        for i in 0..self.iterations {
            for link in self.links.iter() {
                link.solve(nodes, self.stiffness);
            }
            observer.on_constraint_iteration(i);
        }
    }

    /// One contact pass: ground first, then spheres in insertion order.
    /// Returns the number of contacts resolved. Stiffness does not soften
    /// contacts.
    pub fn solve_collisions(&self, nodes: &mut [Node<F>]) -> usize {
        let mut contacts = 0;
        for constraint in self.collision_constraints() {
            contacts += constraint.solve(nodes, self.stiffness);
        }
        contacts
    }

    /// Distance relaxation followed by the contact pass.
    pub fn solve_with_collisions<O: StepObserver>(&self, nodes: &mut [Node<F>], observer: &mut O) -> usize {
        self.solve(nodes, observer);
        let contacts = self.solve_collisions(nodes);
        observer.on_collisions(contacts);
        contacts
    }

    fn collision_constraints(&self) -> impl Iterator<Item = Constraint<F>> + '_ {
        self.ground()
            .into_iter()
            .cloned()
            .map(Constraint::Ground)
            .chain(self.spheres.iter().cloned().map(Constraint::Sphere))
    }

    /// Largest absolute stretch over all distance constraints.
    pub fn max_error(&self, nodes: &[Node<F>]) -> F {
        self.links
            .iter()
            .map(|c| c.error(nodes).abs())
            .fold(F::zero(), |acc, e| acc.max(e))
    }

    pub fn iterations(&self) -> usize { self.iterations }
    pub fn stiffness(&self) -> F { self.stiffness }
    pub fn ground(&self) -> Option<&GroundPlane<F>> { self.ground_enabled.then_some(&self.ground) }
    pub fn spheres(&self) -> &[SphereCollider<F>] { &self.spheres }
    pub fn links(&self) -> &[DistanceConstraint<F>] { &self.links }
    pub fn constraint_count(&self) -> usize { self.links.len() }
}

impl<F: Float> Default for ConstraintSolver<F> {
    fn default() -> Self {
        ConstraintSolver::new(10, F::one())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoOpStepObserver;
    use crate::vec::Vec3;
    use alloc::vec;

    #[test]
    fn tuning_is_clamped() {
        let mut s: ConstraintSolver<f64> = ConstraintSolver::new(0, 2.0);
        assert_eq!(s.iterations(), 1);
        assert_eq!(s.stiffness(), 1.0);
        s.set_stiffness(-0.5);
        assert_eq!(s.stiffness(), 0.0);
        s.set_stiffness(f64::NAN);
        assert_eq!(s.stiffness(), 0.0);
    }

    #[test]
    fn zero_stiffness_leaves_links_stretched() {
        let mut nodes = vec![
            Node::anchor(Vec3::new(0.0f64, 0.0, 0.0), 1.0),
            Node::new(Vec3::new(3.0, 0.0, 0.0), 1.0),
        ];
        let mut s = ConstraintSolver::new(10, 0.0);
        s.add_constraint(Constraint::Distance(DistanceConstraint::new(0, 1, 1.0)));
        s.solve(&mut nodes, &mut NoOpStepObserver);
        assert_eq!(nodes[1].position.x, 3.0);
    }

    #[test]
    fn collision_set_routes_by_kind() {
        let mut s: ConstraintSolver<f64> = ConstraintSolver::default();
        s.add_constraint(Constraint::Ground(GroundPlane::default()));
        s.add_constraint(Constraint::Sphere(SphereCollider::new(Vec3::zero(), 1.0)));
        assert!(s.ground().is_some());
        assert_eq!(s.spheres().len(), 1);
        assert_eq!(s.constraint_count(), 0);
        s.disable_ground();
        s.clear_spheres();
        assert!(s.ground().is_none());
        assert!(s.spheres().is_empty());
    }

    #[test]
    fn toggled_ground_keeps_its_settings() {
        let mut s: ConstraintSolver<f64> = ConstraintSolver::default();
        s.enable_ground(2.0, 0.25);
        s.toggle_ground();
        assert!(s.ground().is_none());
        s.toggle_ground();
        assert_eq!(s.ground(), Some(&GroundPlane::new(2.0, 0.25)));
    }
}
