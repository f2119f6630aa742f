//! Construction errors.
//!
//! Per-frame calls never fail: out-of-range tuning is clamped and bad indices
//! are ignored. Only building a topology or simulation can return an error.

use thiserror::Error;

/// Errors raised while building a chain or general topology.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChainError {
    /// A free node was given a mass that is not positive and finite.
    #[error("node {index} is free but has invalid mass {mass} (must be positive and finite)")]
    InvalidMass { index: usize, mass: f64 },
    /// No nodes were supplied, or a chain was requested with zero links.
    #[error("topology must contain at least one node")]
    EmptyTopology,
    /// Chain link length must be non-negative and finite.
    #[error("link length {0} must be non-negative and finite")]
    InvalidLinkLength(f64),
    /// A parent edge refers to a node that does not exist.
    #[error("edge ({child} -> {parent}) out of bounds (node count: {count})")]
    InvalidEdge { child: usize, parent: usize, count: usize },
    /// A node was listed as its own parent.
    #[error("node {index} cannot be its own parent")]
    SelfLink { index: usize },
}

/// Convenience alias for `Result<T, ChainError>`.
pub type Result<T> = core::result::Result<T, ChainError>;
