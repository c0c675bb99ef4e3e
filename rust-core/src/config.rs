// Constants and generation parameters

use serde::{Deserialize, Serialize};

use crate::error::ClusterError;
use crate::Result;

// Tolerances
pub const BASE_VECTOR_TOLERANCE: f64 = 1e-10; // For lattice construction checks
pub const LATTICE_TOLERANCE: f64 = 1e-8; // For metric / translation checks on lattices
pub const CLUSTER_TOLERANCE: f64 = 1e-5; // Default for site / cluster comparisons
pub const BASIS_TOLERANCE: f64 = 1e-8; // Linear independence of cluster functions

// Defaults taken from the classic cluster-expansion workflow
pub const DEFAULT_MIN_LENGTH: f64 = CLUSTER_TOLERANCE;
pub const DEFAULT_MIN_NUM_COMPONENTS: usize = 2;

/// Cutoffs for a single branch (all clusters with the same number of sites).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchSpecs {
    /// Maximum distance allowed between any two sites of a cluster.
    pub max_length: f64,
    /// Minimum distance allowed between any two sites of a cluster.
    /// Negative values allow repeated (coincident) sites.
    #[serde(default = "default_min_length")]
    pub min_length: f64,
    /// Keep at most this many orbits (the shortest ones) after sorting.
    #[serde(default)]
    pub num_clusters: Option<usize>,
}

impl BranchSpecs {
    pub fn new(max_length: f64) -> Self {
        Self {
            max_length,
            min_length: DEFAULT_MIN_LENGTH,
            num_clusters: None,
        }
    }

    /// True if repeated / overlapping sites are allowed.
    pub fn allows_repeated_sites(&self) -> bool {
        self.min_length < 0.0
    }
}

/// Generation parameters of an orbitree.
///
/// `branches[i]` holds the cutoffs for clusters of `i + 1` sites, so the
/// number of branches is the maximum cluster size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSpecs {
    pub branches: Vec<BranchSpecs>,
    /// Number of periodic image shells searched around the home cell.
    /// Derived from the branch max length when absent.
    #[serde(default)]
    pub search_radius: Option<usize>,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Sites whose occupation DoF has fewer allowed states are skipped.
    #[serde(default = "default_min_num_components")]
    pub min_num_components: usize,
    /// Highest total polynomial degree of cluster functions.
    #[serde(default)]
    pub max_poly_order: Option<usize>,
}

fn default_min_length() -> f64 {
    DEFAULT_MIN_LENGTH
}

fn default_tolerance() -> f64 {
    CLUSTER_TOLERANCE
}

fn default_min_num_components() -> usize {
    DEFAULT_MIN_NUM_COMPONENTS
}

impl ClusterSpecs {
    /// Specs with one branch per entry of `max_lengths`.
    pub fn new(max_lengths: &[f64]) -> Self {
        Self {
            branches: max_lengths.iter().map(|&l| BranchSpecs::new(l)).collect(),
            search_radius: None,
            tolerance: CLUSTER_TOLERANCE,
            min_num_components: DEFAULT_MIN_NUM_COMPONENTS,
            max_poly_order: None,
        }
    }

    /// Set the same minimum length on every branch.
    pub fn with_min_length(mut self, min_length: f64) -> Self {
        for branch in &mut self.branches {
            branch.min_length = min_length;
        }
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_search_radius(mut self, radius: usize) -> Self {
        self.search_radius = Some(radius);
        self
    }

    pub fn with_min_num_components(mut self, n: usize) -> Self {
        self.min_num_components = n;
        self
    }

    pub fn max_num_sites(&self) -> usize {
        self.branches.len()
    }

    pub fn branch(&self, np: usize) -> Option<&BranchSpecs> {
        self.branches.get(np)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(ClusterError::InvalidTolerance(self.tolerance));
        }
        for (np, branch) in self.branches.iter().enumerate() {
            if !branch.max_length.is_finite() || !branch.min_length.is_finite() {
                return Err(ClusterError::InvalidSpecs(format!(
                    "branch {} has a non-finite length cutoff",
                    np
                )));
            }
        }
        Ok(())
    }
}
