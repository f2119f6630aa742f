//! Per-frame driver composing topology, integrator and constraint solver.

use crate::config::SimulationConfig;
use crate::constraint::SphereCollider;
use crate::error::Result;
use crate::float::Float;
use crate::node::Node;
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::solver::ConstraintSolver;
use crate::topology::Topology;
use crate::vec::Vec3;
use alloc::vec::Vec as AllocVec;

/// Whether `update` advances the simulation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
}

/// A chain (or general linked structure) stepped once per external frame.
///
/// The simulation exclusively owns its nodes. `update` takes `&mut self`, so
/// overlapping calls are ruled out by the borrow checker; sharing across
/// threads needs an external lock.
#[derive(Clone, Debug)]
pub struct Simulation<F: Float> {
    nodes: AllocVec<Node<F>>,
    topology: Topology<F>,
    solver: ConstraintSolver<F>,
    config: SimulationConfig<F>,
    elapsed: F,
    state: RunState,
}

impl<F: Float> Simulation<F> {
    /// A vertical chain of `link_count` nodes hanging from a fixed anchor at
    /// `start`.
    pub fn chain(
        start: Vec3<F>,
        link_count: usize,
        link_length: F,
        link_mass: F,
        config: SimulationConfig<F>,
    ) -> Result<Self> {
        let topology = Topology::chain(start, link_count, link_length, link_mass)?;
        Ok(Self::from_topology(topology, config))
    }

    /// A general structure from explicit nodes and `(child, parent)` edges.
    pub fn from_edges(
        nodes: AllocVec<Node<F>>,
        edges: &[(usize, usize)],
        config: SimulationConfig<F>,
    ) -> Result<Self> {
        let topology = Topology::from_edges(nodes, edges)?;
        Ok(Self::from_topology(topology, config))
    }

    pub fn from_topology(topology: Topology<F>, config: SimulationConfig<F>) -> Self {
        let config = config.normalized();
        let mut solver = ConstraintSolver::new(config.iterations, config.stiffness);
        solver.rebuild(&topology);
        log::info!(
            "simulation created: {} nodes, {} links, {:?} topology, {:?} integrator",
            topology.nodes().len(),
            topology.links().len(),
            topology.kind(),
            config.integrator,
        );
        Simulation {
            nodes: topology.nodes().to_vec(),
            topology,
            solver,
            config,
            elapsed: F::zero(),
            state: RunState::Running,
        }
    }

    /// Advance by one external frame of length `dt`.
    pub fn update(&mut self, dt: F) {
        self.update_observed(dt, &mut NoOpStepObserver);
    }

    /// [`update`](Self::update) with progress reported to `observer`.
    ///
    /// A no-op while paused or for a non-positive or non-finite `dt`.
    /// Otherwise `dt` is capped at `max_frame_dt` and split into substeps,
    /// each of which applies gravity and wind, integrates, relaxes distance
    /// constraints (Verlet only) and resolves contacts.
    pub fn update_observed<O: StepObserver>(&mut self, dt: F, observer: &mut O) {
        if self.state == RunState::Paused {
            return;
        }
        if !dt.is_finite() || dt <= F::zero() {
            log::debug!("ignoring frame step {}", dt);
            return;
        }

        let dt = dt.min(self.config.max_frame_dt);
        let h = dt / F::from_usize(self.config.substeps);
        let integrator = self.config.integrator;

        for substep in 0..self.config.substeps {
            self.accumulate_external_forces();

            integrator.integrate(&mut self.nodes, self.topology.links(), h, self.config.damping);
            observer.on_integrate(substep);

            if integrator.uses_projection() {
                self.solver.solve(&mut self.nodes, observer);
            }
            let contacts = self.solver.solve_collisions(&mut self.nodes);
            observer.on_collisions(contacts);
        }

        self.elapsed = self.elapsed + dt;
        observer.on_step_complete();
    }

    fn accumulate_external_forces(&mut self) {
        let gravity = self.config.gravity;
        let wind = self.config.wind;
        for node in self.nodes.iter_mut() {
            let weight = gravity.scale(node.mass);
            node.apply_force(weight + wind);
        }
    }

    /// Put every node back at its initial offset from `start`, at rest.
    /// Fixed flags and the run state are kept; elapsed time restarts.
    pub fn reset(&mut self, start: Vec3<F>) {
        for (i, node) in self.nodes.iter_mut().enumerate() {
            node.reset_to(self.topology.initial_position(i, start));
        }
        self.elapsed = F::zero();
        log::debug!("simulation reset");
    }

    /// Fix or free one node. Out-of-range indices are ignored, as is freeing
    /// a node whose mass cannot be integrated.
    pub fn set_fixed(&mut self, index: usize, fixed: bool) {
        let count = self.nodes.len();
        let Some(node) = self.nodes.get_mut(index) else {
            log::warn!("set_fixed: node {} out of range ({} nodes)", index, count);
            return;
        };
        if !fixed && !node.has_valid_mass() {
            log::warn!("set_fixed: node {} has mass {} and cannot be freed", index, node.mass);
            return;
        }
        node.fixed = fixed;
        node.prev_position = node.position;
        if fixed {
            node.velocity = Vec3::zero();
            node.acceleration = Vec3::zero();
            node.clear_forces();
        }
    }

    /// Add `force` to every free node. It is consumed by the next substep.
    pub fn apply_impulse(&mut self, force: Vec3<F>) {
        for node in self.nodes.iter_mut() {
            node.apply_force(force);
        }
    }

    /// Add the weight `mass * gravity` to every free node once.
    pub fn apply_gravity(&mut self, gravity: Vec3<F>) {
        for node in self.nodes.iter_mut() {
            let weight = gravity.scale(node.mass);
            node.apply_force(weight);
        }
    }

    /// Replace the gravity applied every substep.
    pub fn set_gravity(&mut self, gravity: Vec3<F>) {
        self.config.gravity = gravity;
    }

    /// Replace the constant wind force applied every substep.
    pub fn set_wind(&mut self, wind: Vec3<F>) {
        self.config.wind = wind;
    }

    pub fn pause(&mut self) {
        self.state = RunState::Paused;
        log::debug!("simulation paused");
    }

    pub fn resume(&mut self) {
        self.state = RunState::Running;
        log::debug!("simulation resumed");
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            RunState::Running => self.pause(),
            RunState::Paused => self.resume(),
        }
    }

    // -- solver tuning ------------------------------------------------------

    /// Clamped to at least 1.
    pub fn set_iterations(&mut self, iterations: usize) {
        self.solver.set_iterations(iterations);
        self.config.iterations = self.solver.iterations();
    }

    /// Clamped to [0, 1].
    pub fn set_stiffness(&mut self, stiffness: F) {
        self.solver.set_stiffness(stiffness);
        self.config.stiffness = self.solver.stiffness();
    }

    pub fn enable_ground(&mut self, height: F, restitution: F) {
        self.solver.enable_ground(height, restitution);
    }

    pub fn disable_ground(&mut self) {
        self.solver.disable_ground();
    }

    /// Switch the ground on or off, keeping the last height and restitution.
    pub fn toggle_ground(&mut self) {
        self.solver.toggle_ground();
    }

    /// Add a sphere obstacle with the default restitution.
    pub fn add_collision_sphere(&mut self, center: Vec3<F>, radius: F) {
        self.solver.add_sphere(SphereCollider::new(center, radius));
    }

    pub fn add_sphere(&mut self, sphere: SphereCollider<F>) {
        self.solver.add_sphere(sphere);
    }

    pub fn clear_collision_spheres(&mut self) {
        self.solver.clear_spheres();
    }

    // -- read-back ----------------------------------------------------------

    /// Snapshot of every node position, in node order.
    pub fn positions(&self) -> AllocVec<Vec3<F>> {
        self.nodes.iter().map(|n| n.position).collect()
    }

    pub fn velocities(&self) -> AllocVec<Vec3<F>> {
        self.nodes.iter().map(|n| n.velocity).collect()
    }

    /// `(parent, child)` position pairs, one per link, for line rendering.
    pub fn connection_pairs(&self) -> AllocVec<(Vec3<F>, Vec3<F>)> {
        self.topology
            .links()
            .iter()
            .map(|l| (self.nodes[l.parent].position, self.nodes[l.node].position))
            .collect()
    }

    /// Kinetic energy of the free nodes.
    pub fn kinetic_energy(&self) -> F {
        self.nodes
            .iter()
            .filter(|n| !n.fixed)
            .fold(F::zero(), |acc, n| acc + n.kinetic_energy())
    }

    /// Potential energy of the free nodes in the configured gravity field.
    pub fn potential_energy(&self) -> F {
        let g = self.config.gravity;
        self.nodes
            .iter()
            .filter(|n| !n.fixed)
            .fold(F::zero(), |acc, n| acc - n.mass * g.dot(n.position))
    }

    /// Kinetic plus potential energy. Diagnostic only.
    pub fn total_energy(&self) -> F {
        self.kinetic_energy() + self.potential_energy()
    }

    pub fn node(&self, index: usize) -> Option<&Node<F>> { self.nodes.get(index) }
    pub fn nodes(&self) -> &[Node<F>] { &self.nodes }
    pub fn len(&self) -> usize { self.nodes.len() }
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }
    pub fn topology(&self) -> &Topology<F> { &self.topology }
    pub fn solver(&self) -> &ConstraintSolver<F> { &self.solver }
    pub fn config(&self) -> &SimulationConfig<F> { &self.config }
    pub fn elapsed(&self) -> F { self.elapsed }
    pub fn state(&self) -> RunState { self.state }
    pub fn is_paused(&self) -> bool { self.state == RunState::Paused }
    pub fn iterations(&self) -> usize { self.solver.iterations() }
    pub fn stiffness(&self) -> F { self.solver.stiffness() }
}
