//! Chain dynamics for ropes, pendula and tethered structures.
//!
//! `catena` simulates point masses joined by elastic links under gravity,
//! damping and contact with static geometry. A caller steps it once per frame
//! and reads node positions back for rendering.
//!
//! # Features
//!
//! - **Verlet + projection**: position-based integration with Jakobsen-style
//!   iterative distance relaxation; stiffness and iteration count trade
//!   rigidity against cost
//! - **Spring-damper**: Hooke springs with relative-velocity damping,
//!   semi-implicit Euler, no projection pass
//! - **Topologies**: linear chains or general structures where a node hangs
//!   from several parents
//! - **Contacts**: ground plane with restitution and friction, sphere obstacles
//! - **Observable**: monitor substeps via the `StepObserver` trait
//! - **`no_std` compatible**: needs only `alloc`
//!
//! ```
//! use catena::{Simulation, SimulationConfig, Vec3};
//!
//! let mut sim: Simulation<f64> =
//!     Simulation::chain(Vec3::new(0.0, 0.0, 5.0), 7, 0.5, 1.0, SimulationConfig::new()).unwrap();
//! sim.enable_ground(0.0, 0.3);
//! sim.update(1.0 / 60.0);
//! assert_eq!(sim.positions().len(), 7);
//! ```

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod node;
pub mod constraint;
pub mod topology;
pub mod integrator;
pub mod solver;
pub mod simulation;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::Vec3;
pub use node::Node;
pub use constraint::{Constraint, DistanceConstraint, GroundPlane, SphereCollider};
pub use topology::{Link, Topology, TopologyKind};
pub use integrator::Integrator;
pub use solver::ConstraintSolver;
pub use simulation::{RunState, Simulation};
pub use config::SimulationConfig;
pub use observer::{NoOpStepObserver, StepObserver};
pub use error::ChainError;
