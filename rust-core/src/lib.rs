//! Cluster enumeration library
//!
//! This library enumerates clusters of sites in periodic crystals, groups them into
//! symmetry orbits, and builds symmetry-adapted cluster basis functions for cluster expansions.

pub mod basis_set;
pub mod clusterography;
pub mod config;
pub mod error;
pub mod interfaces;
pub mod lattice;
pub mod structure;
pub mod symmetries;

pub use error::ClusterError;

/// Common result type used throughout the library
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
