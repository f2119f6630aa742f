//! Constraints: distance links, ground plane and sphere contacts.

use crate::float::Float;
use crate::node::Node;
use crate::vec::Vec3;

/// Distances below this are treated as coincident and skipped.
pub const DEGENERATE_EPSILON: f64 = 1e-6;

/// Horizontal velocity scale applied on ground impact.
pub const GROUND_FRICTION: f64 = 0.9;

/// Restitution used when none is given.
pub const DEFAULT_RESTITUTION: f64 = 0.5;

/// A constraint the solver knows how to resolve.
#[derive(Clone, Debug, PartialEq)]
pub enum Constraint<F: Float> {
    Distance(DistanceConstraint<F>),
    Ground(GroundPlane<F>),
    Sphere(SphereCollider<F>),
}

impl<F: Float> Constraint<F> {
    /// Resolve against the node table. Returns the number of nodes corrected
    /// by a contact; distance constraints always report zero.
    ///
    /// `stiffness` scales distance corrections only. Contacts always project
    /// penetrating nodes fully onto the surface.
    pub fn solve(&self, nodes: &mut [Node<F>], stiffness: F) -> usize {
        match self {
            Constraint::Distance(c) => {
                c.solve(nodes, stiffness);
                0
            }
            Constraint::Ground(g) => nodes.iter_mut().map(|n| g.resolve(n)).filter(|&hit| hit).count(),
            Constraint::Sphere(s) => nodes.iter_mut().map(|n| s.resolve(n)).filter(|&hit| hit).count(),
        }
    }
}

/// Keeps nodes `a` and `b` at `rest_length` apart.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceConstraint<F: Float> {
    pub a: usize,
    pub b: usize,
    pub rest_length: F,
    /// Per-link stiffness in [0, 1], multiplied with the solver's global value.
    pub stiffness: F,
}

impl<F: Float> DistanceConstraint<F> {
    pub fn new(a: usize, b: usize, rest_length: F) -> Self {
        DistanceConstraint { a, b, rest_length, stiffness: F::one() }
    }

    pub fn with_stiffness(mut self, stiffness: F) -> Self {
        self.stiffness = stiffness.clamp(F::zero(), F::one());
        self
    }

    /// Jakobsen relaxation: split the correction between free endpoints.
    pub fn solve(&self, nodes: &mut [Node<F>], stiffness: F) {
        let a_fixed = nodes[self.a].fixed;
        let b_fixed = nodes[self.b].fixed;
        if a_fixed && b_fixed {
            return;
        }

        let delta = nodes[self.b].position - nodes[self.a].position;
        let dist = delta.length();
        if dist < F::from_f64(DEGENERATE_EPSILON) {
            log::trace!("skipping degenerate link {} - {}", self.a, self.b);
            return;
        }

        let diff = (dist - self.rest_length) / dist;
        let correction = delta.scale(diff * stiffness * self.stiffness * F::half());

        match (a_fixed, b_fixed) {
            (false, false) => {
                nodes[self.a].position += correction;
                nodes[self.b].position -= correction;
            }
            (false, true) => nodes[self.a].position += correction.scale(F::two()),
            (true, false) => nodes[self.b].position -= correction.scale(F::two()),
            (true, true) => {}
        }
    }

    /// Signed stretch: positive when longer than rest length.
    pub fn error(&self, nodes: &[Node<F>]) -> F {
        nodes[self.a].position.distance(nodes[self.b].position) - self.rest_length
    }
}

/// Horizontal plane at `z = height`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroundPlane<F: Float> {
    pub height: F,
    pub restitution: F,
}

impl<F: Float> GroundPlane<F> {
    pub fn new(height: F, restitution: F) -> Self {
        GroundPlane { height, restitution: restitution.clamp(F::zero(), F::one()) }
    }

    /// Push a penetrating node up to the plane and bounce its velocity.
    /// Returns true if the node was below the plane.
    pub fn resolve(&self, node: &mut Node<F>) -> bool {
        if node.fixed || node.position.z >= self.height {
            return false;
        }
        node.position.z = self.height;

        if node.velocity.z < F::zero() {
            let friction = F::from_f64(GROUND_FRICTION);
            node.velocity.z = node.velocity.z * -self.restitution;
            node.velocity.x = node.velocity.x * friction;
            node.velocity.y = node.velocity.y * friction;
        }
        true
    }
}

impl<F: Float> Default for GroundPlane<F> {
    fn default() -> Self {
        GroundPlane::new(F::zero(), F::from_f64(DEFAULT_RESTITUTION))
    }
}

/// Static spherical obstacle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SphereCollider<F: Float> {
    pub center: Vec3<F>,
    pub radius: F,
    pub restitution: F,
}

impl<F: Float> SphereCollider<F> {
    pub fn new(center: Vec3<F>, radius: F) -> Self {
        SphereCollider { center, radius, restitution: F::from_f64(DEFAULT_RESTITUTION) }
    }

    pub fn with_restitution(mut self, restitution: F) -> Self {
        self.restitution = restitution.clamp(F::zero(), F::one());
        self
    }

    /// Project a penetrating node onto the surface along the outward normal.
    /// A node sitting exactly at the center has no normal and is left alone.
    pub fn resolve(&self, node: &mut Node<F>) -> bool {
        if node.fixed {
            return false;
        }
        let delta = node.position - self.center;
        let dist = delta.length();
        if dist >= self.radius {
            return false;
        }
        if dist <= F::from_f64(DEGENERATE_EPSILON) {
            log::trace!("node at sphere center, no contact normal");
            return false;
        }

        let normal = delta.scale(F::one() / dist);
        node.position += normal.scale(self.radius - dist);

        let vn = node.velocity.dot(normal);
        if vn < F::zero() {
            node.velocity -= normal.scale(vn * (F::one() + self.restitution));
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn distance_moves_only_free_endpoint() {
        let mut nodes = vec![
            Node::anchor(Vec3::new(0.0f64, 0.0, 0.0), 1.0),
            Node::new(Vec3::new(2.0, 0.0, 0.0), 1.0),
        ];
        DistanceConstraint::new(0, 1, 1.0).solve(&mut nodes, 1.0);
        assert_eq!(nodes[0].position, Vec3::zero());
        assert!((nodes[1].position.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn distance_splits_equally() {
        let mut nodes = vec![
            Node::new(Vec3::new(0.0f64, 0.0, 0.0), 1.0),
            Node::new(Vec3::new(4.0, 0.0, 0.0), 5.0),
        ];
        DistanceConstraint::new(0, 1, 2.0).solve(&mut nodes, 1.0);
        assert!((nodes[0].position.x - 1.0).abs() < 1e-12);
        assert!((nodes[1].position.x - 3.0).abs() < 1e-12);
    }

    #[test]
    fn fixed_second_endpoint_moves_first_by_full_correction() {
        let mut nodes = vec![
            Node::new(Vec3::new(0.0f64, 0.0, 0.0), 1.0),
            Node::anchor(Vec3::new(0.0, 0.0, 3.0), 1.0),
        ];
        DistanceConstraint::new(0, 1, 1.0).solve(&mut nodes, 1.0);
        assert_eq!(nodes[1].position, Vec3::new(0.0, 0.0, 3.0));
        assert!((nodes[0].position.z - 2.0).abs() < 1e-12);
        assert!(nodes[0].position.x.abs() < 1e-12);
    }

    #[test]
    fn contacts_ignore_stiffness() {
        let mut nodes = vec![Node::new(Vec3::new(0.0f64, 0.0, -1.0), 1.0)];
        let c = Constraint::Ground(GroundPlane::default());
        assert_eq!(c.solve(&mut nodes, 0.0), 1);
        assert_eq!(nodes[0].position.z, 0.0);
    }

    #[test]
    fn coincident_endpoints_skipped() {
        let mut nodes = vec![
            Node::new(Vec3::new(1.0f64, 1.0, 1.0), 1.0),
            Node::new(Vec3::new(1.0, 1.0, 1.0), 1.0),
        ];
        DistanceConstraint::new(0, 1, 1.0).solve(&mut nodes, 1.0);
        assert_eq!(nodes[0].position, nodes[1].position);
    }

    #[test]
    fn both_fixed_untouched() {
        let mut nodes = vec![
            Node::anchor(Vec3::new(0.0f64, 0.0, 0.0), 1.0),
            Node::anchor(Vec3::new(3.0, 0.0, 0.0), 1.0),
        ];
        let c = Constraint::Distance(DistanceConstraint::new(0, 1, 1.0));
        assert_eq!(c.solve(&mut nodes, 1.0), 0);
        assert_eq!(nodes[1].position.x, 3.0);
    }

    #[test]
    fn ground_counts_contacts() {
        let mut nodes = vec![
            Node::new(Vec3::new(0.0f64, 0.0, -1.0), 1.0),
            Node::new(Vec3::new(0.0, 0.0, 1.0), 1.0),
            Node::anchor(Vec3::new(0.0, 0.0, -2.0), 1.0),
        ];
        let c = Constraint::Ground(GroundPlane::default());
        assert_eq!(c.solve(&mut nodes, 1.0), 1);
        assert_eq!(nodes[0].position.z, 0.0);
        assert_eq!(nodes[2].position.z, -2.0);
    }

    #[test]
    fn sphere_center_node_ignored() {
        let mut node = Node::new(Vec3::<f64>::zero(), 1.0);
        let s = SphereCollider::new(Vec3::zero(), 1.0);
        assert!(!s.resolve(&mut node));
        assert_eq!(node.position, Vec3::zero());
    }
}
