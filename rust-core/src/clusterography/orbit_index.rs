// Derived index tables of an orbitree.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::orbit::Orbit;
use super::orbitree::Orbitree;

/// Dense linear numbering of the orbits of a tree and its subcluster table.
///
/// Built from a tree by [`OrbitIndex::build`]; rebuild after the tree changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbitIndex {
    /// Linear index of the first orbit of each branch.
    offsets: Vec<usize>,
    /// `(np, no)` of each linear index.
    positions: Vec<(usize, usize)>,
    /// Linear indices of the subcluster orbits of each orbit, ascending.
    subclusters: Vec<Vec<usize>>,
}

impl OrbitIndex {
    /// Number orbits branch by branch and find, for every orbit, the orbits
    /// of smaller clusters that have an equivalent inside its prototype.
    pub fn build(tree: &Orbitree) -> OrbitIndex {
        let mut offsets = Vec::with_capacity(tree.branch_len());
        let mut positions = Vec::with_capacity(tree.total_orbits());
        let mut orbits: Vec<&Orbit> = Vec::with_capacity(tree.total_orbits());
        for ((np, no), orbit) in tree.iter_orbits() {
            while offsets.len() <= np {
                offsets.push(positions.len());
            }
            positions.push((np, no));
            orbits.push(orbit);
        }
        while offsets.len() < tree.branch_len() {
            offsets.push(positions.len());
        }

        let subclusters_of = |index: usize| subcluster_indices(tree, &orbits, index);
        #[cfg(feature = "parallel")]
        let subclusters = (0..orbits.len()).into_par_iter().map(subclusters_of).collect();
        #[cfg(not(feature = "parallel"))]
        let subclusters = (0..orbits.len()).map(subclusters_of).collect();

        OrbitIndex {
            offsets,
            positions,
            subclusters,
        }
    }

    /// Total number of indexed orbits.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Linear index of orbit `no` of branch `np`.
    pub fn linear_index(&self, np: usize, no: usize) -> Option<usize> {
        let start = *self.offsets.get(np)?;
        let end = self.offsets.get(np + 1).copied().unwrap_or(self.positions.len());
        let index = start + no;
        (index < end).then_some(index)
    }

    /// `(np, no)` of a linear index.
    pub fn position(&self, index: usize) -> Option<(usize, usize)> {
        self.positions.get(index).copied()
    }

    pub fn to_branch(&self, index: usize) -> Option<usize> {
        self.position(index).map(|(np, _)| np)
    }

    pub fn to_orbit(&self, index: usize) -> Option<usize> {
        self.position(index).map(|(_, no)| no)
    }

    /// Linear indices of the subclusters of orbit `index`.
    pub fn subclusters(&self, index: usize) -> &[usize] {
        self.subclusters.get(index).map_or(&[], Vec::as_slice)
    }

    pub fn is_subcluster(&self, sub: usize, index: usize) -> bool {
        self.subclusters(index).binary_search(&sub).is_ok()
    }
}

fn subcluster_indices(tree: &Orbitree, orbits: &[&Orbit], index: usize) -> Vec<usize> {
    let parent = orbits[index].prototype();
    let (periodicity, lattice, tol) = (tree.periodicity(), tree.lattice(), tree.tolerance());
    orbits
        .iter()
        .enumerate()
        .filter(|(_, candidate)| candidate.num_sites() < parent.size())
        .filter(|(_, candidate)| {
            candidate
                .equivalents()
                .iter()
                .any(|e| parent.contains(e, periodicity, lattice, tol))
        })
        .map(|(i, _)| i)
        .collect()
}
