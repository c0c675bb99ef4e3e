//! Error types for orbit generation and basis construction.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClusterError {
    #[error("lattice is degenerate (determinant {determinant:e})")]
    DegenerateLattice { determinant: f64 },

    #[error("tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),

    #[error("structure has no basis sites")]
    EmptyBasis,

    #[error("basis site {site} has a degree of freedom with no allowed states")]
    EmptyDoF { site: usize },

    #[error("symmetry group is empty")]
    EmptySymmetryGroup,

    #[error("symmetry group does not contain the identity operation")]
    MissingIdentity,

    #[error("symmetry operations are not closed under composition (product {left} * {right})")]
    GroupNotClosed { left: usize, right: usize },

    #[error("symmetry operation {op} does not map basis site {site} onto a basis site")]
    SymmetryMismatch { op: usize, site: usize },

    #[error("supercell transformation is singular")]
    InvalidSupercell,

    #[error("invalid cluster specs: {0}")]
    InvalidSpecs(String),

    #[error("expected a cluster of {expected} sites, found {found}")]
    ClusterSizeMismatch { expected: usize, found: usize },

    #[error("branch or orbit is bound to a different lattice")]
    LatticeMismatch,

    #[error("site references sublattice {sublattice}, structure has {num_basis} basis sites")]
    UnknownSublattice { sublattice: usize, num_basis: usize },

    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}
