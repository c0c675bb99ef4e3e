use std::sync::Arc;

use log::{debug, info};
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

use super::candidates::CandidateStrategy;
use super::cluster::Cluster;
use super::orbit::Orbit;
use super::orbit_branch::OrbitBranch;
use crate::basis_set::BasisSet;
use crate::config::{BranchSpecs, ClusterSpecs};
use crate::error::ClusterError;
use crate::interfaces::Periodicity;
use crate::lattice::Lattice;
use crate::structure::Structure;
use crate::symmetries::{GroupAction, SymGroup};
use crate::Result;

/// Orbits of clusters grouped into branches by cluster size.
///
/// Branch `np` holds the orbits of `np + 1`-site clusters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Orbitree {
    lattice: Arc<Lattice>,
    specs: ClusterSpecs,
    /// Comparison used to decide whether a cluster is already in the tree.
    periodicity: Periodicity,
    branches: Vec<OrbitBranch>,
}

impl Orbitree {
    /// Empty tree with one empty branch per entry of `specs.branches`.
    pub fn new(lattice: Arc<Lattice>, specs: ClusterSpecs, periodicity: Periodicity) -> Result<Self> {
        specs.validate()?;
        let branches = specs
            .branches
            .iter()
            .enumerate()
            .map(|(np, b)| OrbitBranch::new(np + 1, b.clone(), Arc::clone(&lattice)))
            .collect();
        Ok(Orbitree {
            lattice,
            specs,
            periodicity,
            branches,
        })
    }

    // ======================== GENERATION ========================

    /// Orbits of a periodic crystal under `group`.
    pub fn generate(structure: &Structure, group: &SymGroup, specs: &ClusterSpecs) -> Result<Self> {
        Self::generate_with(structure, group, specs, &CandidateStrategy::Periodic)
    }

    /// Orbits in the neighbourhood of `phenomenal`, under the operations of
    /// `group` that leave the phenomenal cluster in place.
    pub fn generate_local(
        structure: &Structure,
        group: &SymGroup,
        specs: &ClusterSpecs,
        phenomenal: &Cluster,
        include_phenomenal_sites: bool,
    ) -> Result<Self> {
        let strategy = CandidateStrategy::Local {
            phenomenal: phenomenal.clone(),
            include_phenomenal_sites,
        };
        Self::generate_with(structure, group, specs, &strategy)
    }

    /// Orbits of clusters that fit in the supercell `supercell` without
    /// overlapping their own periodic images.
    pub fn generate_in_cell(
        structure: &Structure,
        group: &SymGroup,
        specs: &ClusterSpecs,
        supercell: &Matrix3<i32>,
    ) -> Result<Self> {
        let strategy = CandidateStrategy::InCell {
            supercell: *supercell,
        };
        Self::generate_with(structure, group, specs, &strategy)
    }

    /// Build every branch from candidates drawn by `strategy`. Fails as a
    /// whole: no partially generated tree is returned.
    pub fn generate_with(
        structure: &Structure,
        group: &SymGroup,
        specs: &ClusterSpecs,
        strategy: &CandidateStrategy,
    ) -> Result<Self> {
        specs.validate()?;
        let tol = specs.tolerance;
        let action = Self::acting_group(structure, group, strategy, tol)?;
        let mut tree = Orbitree::new(structure.shared_lattice(), specs.clone(), strategy.periodicity())?;

        info!(
            "generating orbitree: {} branches, {} symmetry operations",
            specs.max_num_sites(),
            action.len()
        );
        for np in 0..tree.branches.len() {
            let branch_specs = tree.branches[np].specs().clone();
            let candidates = strategy.candidates(structure, np + 1, &branch_specs, specs)?;
            let mut num_new = 0;
            for candidate in &candidates {
                if tree.branches[np].find(candidate, tree.periodicity, tol).is_some() {
                    continue;
                }
                let orbit = Orbit::generate(candidate, &action, tree.periodicity, tol)?;
                tree.branches[np].push(orbit)?;
                num_new += 1;
            }
            tree.sort_branch(np)?;
            if let Some(limit) = branch_specs.num_clusters {
                tree.branches[np].truncate(limit);
            }
            debug!(
                "branch {}: {} candidates, {} orbits ({} kept)",
                np,
                candidates.len(),
                num_new,
                tree.branches[np].len()
            );
        }
        info!("orbitree has {} orbits", tree.total_orbits());
        Ok(tree)
    }

    // Local trees act with the stabilizer of the phenomenal cluster only
    fn acting_group(
        structure: &Structure,
        group: &SymGroup,
        strategy: &CandidateStrategy,
        tol: f64,
    ) -> Result<GroupAction> {
        let action = GroupAction::new(group, structure, tol)?;
        match strategy {
            CandidateStrategy::Local { phenomenal, .. } => {
                for site in phenomenal.sites() {
                    structure.site(site.sublattice)?;
                }
                let local = action.cluster_group(phenomenal, Periodicity::Periodic, tol)?;
                debug!("phenomenal cluster group has {} operations", local.len());
                Ok(local)
            }
            _ => Ok(action),
        }
    }

    // ======================== ACCESSORS ========================

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn specs(&self) -> &ClusterSpecs {
        &self.specs
    }

    pub fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    pub fn tolerance(&self) -> f64 {
        self.specs.tolerance
    }

    pub fn branches(&self) -> &[OrbitBranch] {
        &self.branches
    }

    pub fn branch(&self, np: usize) -> Result<&OrbitBranch> {
        self.branches.get(np).ok_or(ClusterError::IndexOutOfRange {
            index: np,
            len: self.branches.len(),
        })
    }

    /// Number of branches (largest cluster size).
    pub fn branch_len(&self) -> usize {
        self.branches.len()
    }

    /// Number of orbits in branch `np`.
    pub fn orbit_len(&self, np: usize) -> Result<usize> {
        Ok(self.branch(np)?.len())
    }

    pub fn total_orbits(&self) -> usize {
        self.branches.iter().map(OrbitBranch::len).sum()
    }

    pub fn orbit(&self, np: usize, no: usize) -> Result<&Orbit> {
        let branch = self.branch(np)?;
        branch.orbit(no).ok_or(ClusterError::IndexOutOfRange {
            index: no,
            len: branch.len(),
        })
    }

    pub fn prototype(&self, np: usize, no: usize) -> Result<&Cluster> {
        Ok(self.orbit(np, no)?.prototype())
    }

    pub fn equiv(&self, np: usize, no: usize, ne: usize) -> Result<&Cluster> {
        let orbit = self.orbit(np, no)?;
        orbit.equivalent(ne).ok_or(ClusterError::IndexOutOfRange {
            index: ne,
            len: orbit.multiplicity(),
        })
    }

    /// Orbits in branch-major order with their `(np, no)` position.
    pub fn iter_orbits(&self) -> impl Iterator<Item = ((usize, usize), &Orbit)> {
        self.branches.iter().enumerate().flat_map(|(np, branch)| {
            branch
                .orbits()
                .iter()
                .enumerate()
                .map(move |(no, orbit)| ((np, no), orbit))
        })
    }

    /// Total number of cluster functions over all orbits.
    pub fn basis_set_size(&self) -> usize {
        self.branches
            .iter()
            .flat_map(|b| b.orbits())
            .map(Orbit::basis_set_size)
            .sum()
    }

    // ======================== LOOKUP ========================

    /// `(np, no)` of the orbit containing `cluster`.
    pub fn find_cluster(&self, cluster: &Cluster) -> Option<(usize, usize)> {
        let np = cluster.size().checked_sub(1)?;
        let no = self
            .branches
            .get(np)?
            .find(cluster, self.periodicity, self.specs.tolerance)?;
        Some((np, no))
    }

    pub fn contains_cluster(&self, cluster: &Cluster) -> bool {
        self.find_cluster(cluster).is_some()
    }

    pub fn find_orbit(&self, orbit: &Orbit) -> Option<(usize, usize)> {
        self.find_cluster(orbit.prototype())
    }

    pub fn contains_orbit(&self, orbit: &Orbit) -> bool {
        self.find_orbit(orbit).is_some()
    }

    // ======================== MODIFICATION ========================

    /// Set the number of branches. New branches are empty with zero cutoffs.
    pub fn resize(&mut self, max_num_sites: usize) {
        self.specs.branches.resize(max_num_sites, BranchSpecs::new(0.0));
        self.branches.truncate(max_num_sites);
        while self.branches.len() < max_num_sites {
            let np = self.branches.len();
            self.branches.push(OrbitBranch::new(
                np + 1,
                self.specs.branches[np].clone(),
                Arc::clone(&self.lattice),
            ));
        }
    }

    /// Append `orbit` to the branch of its cluster size, growing the tree if needed.
    pub fn push_orbit(&mut self, orbit: Orbit) -> Result<(usize, usize)> {
        let np = orbit
            .num_sites()
            .checked_sub(1)
            .ok_or(ClusterError::ClusterSizeMismatch { expected: 1, found: 0 })?;
        if np >= self.branches.len() {
            self.resize(np + 1);
        }
        let no = self.branches[np].push(orbit)?;
        Ok((np, no))
    }

    /// Append a branch holding the next cluster size.
    pub fn push_branch(&mut self, branch: OrbitBranch) -> Result<()> {
        if branch.lattice() != self.lattice.as_ref() {
            return Err(ClusterError::LatticeMismatch);
        }
        let expected = self.branches.len() + 1;
        if branch.num_sites() != expected {
            return Err(ClusterError::ClusterSizeMismatch {
                expected,
                found: branch.num_sites(),
            });
        }
        self.specs.branches.push(branch.specs().clone());
        self.branches.push(branch);
        Ok(())
    }

    pub fn sort(&mut self) {
        let tol = self.specs.tolerance;
        for branch in &mut self.branches {
            branch.sort(tol);
        }
    }

    pub fn sort_branch(&mut self, np: usize) -> Result<()> {
        let tol = self.specs.tolerance;
        let len = self.branches.len();
        self.branches
            .get_mut(np)
            .ok_or(ClusterError::IndexOutOfRange { index: np, len })?
            .sort(tol);
        Ok(())
    }

    /// Add the orbits of `cluster` and of all its sub-clusters that the tree
    /// does not hold yet. Returns the number of orbits added.
    pub fn add_subclusters(&mut self, cluster: &Cluster, action: &GroupAction) -> Result<usize> {
        let tol = self.specs.tolerance;
        let mut added = 0;
        for size in 1..=cluster.size() {
            for sub in cluster.subclusters(size) {
                if self.contains_cluster(&sub) {
                    continue;
                }
                self.push_orbit(Orbit::generate(&sub, action, self.periodicity, tol)?)?;
                added += 1;
            }
        }
        debug!("added {} orbits from a {}-site cluster", added, cluster.size());
        Ok(added)
    }

    // ======================== BASIS SETS ========================

    /// Attach a basis set to every orbit, symmetrized over the cluster group
    /// recorded on the orbit when it was closed.
    ///
    /// `max_poly_order` falls back to the specs, then to the cluster size.
    pub fn generate_clust_bases(&mut self, structure: &Structure, max_poly_order: Option<usize>) -> Result<()> {
        let order = max_poly_order.or(self.specs.max_poly_order);
        for branch in &mut self.branches {
            for orbit in branch.orbits_mut() {
                let prototype = orbit.prototype();
                let basis = BasisSet::construct(
                    prototype,
                    structure,
                    orbit.cluster_group(),
                    order.unwrap_or(prototype.size()),
                )?;
                orbit.set_basis_set(basis);
            }
        }
        info!("attached {} cluster functions", self.basis_set_size());
        Ok(())
    }
}
