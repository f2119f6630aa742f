//! Node graphs: linear chains and general parent-linked structures.

use crate::constraint::DistanceConstraint;
use crate::error::{ChainError, Result};
use crate::float::Float;
use crate::node::Node;
use crate::vec::Vec3;
use alloc::vec::Vec as AllocVec;

/// How the topology was built.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TopologyKind {
    /// Every node after the first hangs from its predecessor.
    Linear,
    /// Nodes may hang from any number of parents.
    General,
}

/// Elastic link from `node` to one of its parents.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Link<F: Float> {
    pub node: usize,
    pub parent: usize,
    pub rest_length: F,
}

/// Nodes plus the parent links between them.
///
/// Parents are stored as indices into the node table. `offsets` records each
/// node's initial position relative to node 0 so the structure can be
/// re-placed anywhere on reset.
#[derive(Clone, Debug)]
pub struct Topology<F: Float> {
    kind: TopologyKind,
    nodes: AllocVec<Node<F>>,
    links: AllocVec<Link<F>>,
    offsets: AllocVec<Vec3<F>>,
    origin: Vec3<F>,
}

impl<F: Float> Topology<F> {
    /// A chain of `link_count` nodes hanging straight down from `start`,
    /// `link_length` apart. Node 0 is the fixed anchor.
    pub fn chain(start: Vec3<F>, link_count: usize, link_length: F, link_mass: F) -> Result<Self> {
        if link_count == 0 {
            return Err(ChainError::EmptyTopology);
        }
        if !link_length.is_finite() || link_length < F::zero() {
            return Err(ChainError::InvalidLinkLength(link_length.to_f64()));
        }

        let offsets: AllocVec<Vec3<F>> = (0..link_count)
            .map(|i| Vec3::up(-(F::from_usize(i) * link_length)))
            .collect();

        let nodes: AllocVec<Node<F>> = offsets
            .iter()
            .enumerate()
            .map(|(i, &offset)| {
                if i == 0 {
                    Node::anchor(start + offset, link_mass)
                } else {
                    Node::new(start + offset, link_mass)
                }
            })
            .collect();
        validate_masses(&nodes)?;

        let links = (1..link_count)
            .map(|i| Link { node: i, parent: i - 1, rest_length: link_length })
            .collect();

        Ok(Topology { kind: TopologyKind::Linear, nodes, links, offsets, origin: start })
    }

    /// A general structure from explicit nodes and `(child, parent)` edges.
    ///
    /// Each edge's rest length is the distance between its endpoints as
    /// given. A node with two parents forms a triangulated junction.
    pub fn from_edges(nodes: AllocVec<Node<F>>, edges: &[(usize, usize)]) -> Result<Self> {
        if nodes.is_empty() {
            return Err(ChainError::EmptyTopology);
        }
        validate_masses(&nodes)?;

        let count = nodes.len();
        let mut links = AllocVec::with_capacity(edges.len());
        for &(child, parent) in edges {
            if child >= count || parent >= count {
                return Err(ChainError::InvalidEdge { child, parent, count });
            }
            if child == parent {
                return Err(ChainError::SelfLink { index: child });
            }
            let rest_length = nodes[child].position.distance(nodes[parent].position);
            links.push(Link { node: child, parent, rest_length });
        }

        let origin = nodes[0].position;
        let offsets = nodes.iter().map(|n| n.position - origin).collect();

        Ok(Topology { kind: TopologyKind::General, nodes, links, offsets, origin })
    }

    pub fn kind(&self) -> TopologyKind { self.kind }

    pub fn nodes(&self) -> &[Node<F>] { &self.nodes }

    pub fn links(&self) -> &[Link<F>] { &self.links }

    /// Links from `node` to each of its parents.
    pub fn parents_of(&self, node: usize) -> impl Iterator<Item = &Link<F>> + '_ {
        self.links.iter().filter(move |l| l.node == node)
    }

    /// Initial position of `index` when the structure is rooted at `start`.
    pub fn initial_position(&self, index: usize, start: Vec3<F>) -> Vec3<F> {
        start + self.offsets[index]
    }

    /// Position of node 0 as constructed.
    pub fn origin(&self) -> Vec3<F> { self.origin }

    /// One distance constraint per link, parent first.
    pub fn distance_constraints(&self) -> AllocVec<DistanceConstraint<F>> {
        self.links
            .iter()
            .map(|l| DistanceConstraint::new(l.parent, l.node, l.rest_length))
            .collect()
    }
}

fn validate_masses<F: Float>(nodes: &[Node<F>]) -> Result<()> {
    match nodes.iter().position(|n| !n.fixed && !n.has_valid_mass()) {
        Some(index) => Err(ChainError::InvalidMass { index, mass: nodes[index].mass.to_f64() }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn chain_hangs_down_from_anchor() {
        let t = Topology::chain(Vec3::new(1.0f64, 2.0, 5.0), 4, 0.5, 1.0).unwrap();
        assert_eq!(t.kind(), TopologyKind::Linear);
        assert_eq!(t.nodes().len(), 4);
        assert_eq!(t.links().len(), 3);
        assert!(t.nodes()[0].fixed);
        assert!(!t.nodes()[1].fixed);
        assert_eq!(t.nodes()[3].position, Vec3::new(1.0, 2.0, 3.5));
    }

    #[test]
    fn rest_lengths_captured_from_geometry() {
        let nodes = vec![
            Node::anchor(Vec3::new(0.0f64, 0.0, 2.0), 1.0),
            Node::new(Vec3::new(0.0, 1.0, 1.0), 1.0),
            Node::new(Vec3::new(2.0, 0.0, 0.0), 1.0),
        ];
        let t = Topology::from_edges(nodes, &[(1, 0), (2, 1), (2, 0)]).unwrap();
        assert_eq!(t.parents_of(2).count(), 2);
        let l = t.links()[0];
        assert!((l.rest_length - 2.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn free_node_with_zero_mass_rejected() {
        let err = Topology::chain(Vec3::<f64>::zero(), 3, 1.0, 0.0).unwrap_err();
        assert_eq!(err, ChainError::InvalidMass { index: 1, mass: 0.0 });
    }

    #[test]
    fn single_anchor_with_zero_mass_allowed() {
        assert!(Topology::chain(Vec3::<f64>::zero(), 1, 1.0, 0.0).is_ok());
    }

    #[test]
    fn bad_edges_rejected() {
        let nodes = vec![Node::new(Vec3::<f64>::zero(), 1.0), Node::new(Vec3::up(1.0), 1.0)];
        assert_eq!(
            Topology::from_edges(nodes.clone(), &[(1, 5)]).unwrap_err(),
            ChainError::InvalidEdge { child: 1, parent: 5, count: 2 }
        );
        assert_eq!(
            Topology::from_edges(nodes, &[(1, 1)]).unwrap_err(),
            ChainError::SelfLink { index: 1 }
        );
    }
}
