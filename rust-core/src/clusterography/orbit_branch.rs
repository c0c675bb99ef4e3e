use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::cluster::Cluster;
use super::orbit::Orbit;
use crate::config::BranchSpecs;
use crate::error::ClusterError;
use crate::interfaces::Periodicity;
use crate::lattice::Lattice;
use crate::Result;

/// All orbits whose clusters have the same number of sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitBranch {
    num_sites: usize,
    specs: BranchSpecs,
    lattice: Arc<Lattice>,
    orbits: Vec<Orbit>,
}

impl OrbitBranch {
    pub fn new(num_sites: usize, specs: BranchSpecs, lattice: Arc<Lattice>) -> Self {
        Self {
            num_sites,
            specs,
            lattice,
            orbits: Vec::new(),
        }
    }

    pub fn num_sites(&self) -> usize {
        self.num_sites
    }

    pub fn specs(&self) -> &BranchSpecs {
        &self.specs
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn shared_lattice(&self) -> Arc<Lattice> {
        Arc::clone(&self.lattice)
    }

    pub fn orbits(&self) -> &[Orbit] {
        &self.orbits
    }

    pub fn orbits_mut(&mut self) -> &mut [Orbit] {
        &mut self.orbits
    }

    pub fn orbit(&self, index: usize) -> Option<&Orbit> {
        self.orbits.get(index)
    }

    pub fn len(&self) -> usize {
        self.orbits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orbits.is_empty()
    }

    /// Append an orbit. Its clusters must have `num_sites` sites.
    pub fn push(&mut self, orbit: Orbit) -> Result<usize> {
        if orbit.num_sites() != self.num_sites {
            return Err(ClusterError::ClusterSizeMismatch {
                expected: self.num_sites,
                found: orbit.num_sites(),
            });
        }
        self.orbits.push(orbit);
        Ok(self.orbits.len() - 1)
    }

    /// Index of the orbit containing `cluster`, first match in branch order.
    pub fn find(&self, cluster: &Cluster, periodicity: Periodicity, tol: f64) -> Option<usize> {
        if cluster.size() != self.num_sites {
            return None;
        }
        self.orbits
            .iter()
            .position(|o| o.contains(cluster, periodicity, &self.lattice, tol))
    }

    pub fn find_orbit(&self, orbit: &Orbit, periodicity: Periodicity, tol: f64) -> Option<usize> {
        self.find(orbit.prototype(), periodicity, tol)
    }

    /// Stable sort by prototype (max length, min length). Lengths are
    /// bucketed on a grid of `tol` so nearly equal lengths keep their order.
    pub fn sort(&mut self, tol: f64) {
        self.orbits.sort_by_key(|o| length_key(o, tol));
    }

    /// Keep the first `count` orbits.
    pub fn truncate(&mut self, count: usize) {
        self.orbits.truncate(count);
    }
}

fn length_key(orbit: &Orbit, tol: f64) -> (i64, i64) {
    let bucket = |x: f64| (x / tol).round() as i64;
    (bucket(orbit.max_length()), bucket(orbit.min_length()))
}
