use std::cmp::Ordering;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::interfaces::Periodicity;
use crate::lattice::Lattice;
use crate::structure::Structure;
use crate::symmetries::SiteAction;
use crate::Result;

/// A site of a cluster: a basis site (sublattice) placed at a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSite {
    /// Index of the basis site this position belongs to.
    pub sublattice: usize,
    /// Fractional coordinates.
    pub frac: Vector3<f64>,
    /// Cartesian coordinates.
    pub cart: Vector3<f64>,
}

impl ClusterSite {
    pub fn new(sublattice: usize, frac: Vector3<f64>, lattice: &Lattice) -> Self {
        Self {
            sublattice,
            cart: lattice.frac_to_cart(&frac),
            frac,
        }
    }

    /// Basis site `sublattice` of `structure` in cell `cell`.
    pub fn from_cell(structure: &Structure, sublattice: usize, cell: &Vector3<i32>) -> Self {
        Self::new(
            sublattice,
            structure.site_frac(sublattice, cell),
            structure.lattice(),
        )
    }

    pub fn translate(&self, cell: &Vector3<i32>, lattice: &Lattice) -> Self {
        Self::new(self.sublattice, self.frac + cell.map(f64::from), lattice)
    }

    pub fn distance(&self, other: &ClusterSite) -> f64 {
        (self.cart - other.cart).norm()
    }

    /// Same sublattice and same position within `tol`.
    pub fn matches(&self, other: &ClusterSite, tol: f64) -> bool {
        self.sublattice == other.sublattice && self.distance(other) < tol
    }

    // Canonical ordering: sublattice, then cartesian x, y, z (ties within tol)
    fn canonical_cmp(&self, other: &ClusterSite, tol: f64) -> Ordering {
        self.sublattice.cmp(&other.sublattice).then_with(|| {
            for i in 0..3 {
                let (a, b) = (self.cart[i], other.cart[i]);
                if (a - b).abs() >= tol {
                    return a.total_cmp(&b);
                }
            }
            Ordering::Equal
        })
    }
}

/// An ordered collection of sites treated as one geometric motif.
///
/// The centroid and the sorted pairwise distances are derived once at
/// construction and used to reject non-matching clusters cheaply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<ClusterSite>", into = "Vec<ClusterSite>")]
pub struct Cluster {
    sites: Vec<ClusterSite>,
    centroid: Vector3<f64>,
    /// Pairwise distances, ascending.
    lengths: Vec<f64>,
}

impl From<Vec<ClusterSite>> for Cluster {
    fn from(sites: Vec<ClusterSite>) -> Self {
        Cluster::new(sites)
    }
}

impl From<Cluster> for Vec<ClusterSite> {
    fn from(cluster: Cluster) -> Self {
        cluster.sites
    }
}

impl Cluster {
    pub fn new(sites: Vec<ClusterSite>) -> Self {
        let centroid = if sites.is_empty() {
            Vector3::zeros()
        } else {
            sites.iter().map(|s| s.cart).sum::<Vector3<f64>>() / sites.len() as f64
        };

        let mut lengths = Vec::with_capacity(sites.len() * sites.len().saturating_sub(1) / 2);
        for i in 0..sites.len() {
            for j in (i + 1)..sites.len() {
                lengths.push(sites[i].distance(&sites[j]));
            }
        }
        lengths.sort_by(f64::total_cmp);

        Cluster {
            sites,
            centroid,
            lengths,
        }
    }

    /// Cluster of basis sites `(sublattice, cell)` of `structure`.
    pub fn from_cells(structure: &Structure, sites: &[(usize, Vector3<i32>)]) -> Self {
        Cluster::new(
            sites
                .iter()
                .map(|(b, cell)| ClusterSite::from_cell(structure, *b, cell))
                .collect(),
        )
    }

    pub fn size(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn sites(&self) -> &[ClusterSite] {
        &self.sites
    }

    pub fn site(&self, index: usize) -> &ClusterSite {
        &self.sites[index]
    }

    pub fn centroid(&self) -> &Vector3<f64> {
        &self.centroid
    }

    /// Sorted pairwise distances.
    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    /// Largest pairwise distance (0 for clusters of fewer than two sites).
    pub fn max_length(&self) -> f64 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Smallest pairwise distance (0 for clusters of fewer than two sites).
    pub fn min_length(&self) -> f64 {
        self.lengths.first().copied().unwrap_or(0.0)
    }

    /// Reorder sites canonically. Returns `order` with
    /// `new.sites[k] == old.sites[order[k]]`.
    pub fn sort_sites(&mut self, tol: f64) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.sites.len()).collect();
        order.sort_by(|&a, &b| self.sites[a].canonical_cmp(&self.sites[b], tol));
        self.sites = order.iter().map(|&i| self.sites[i].clone()).collect();
        order
    }

    pub fn translate(&self, cell: &Vector3<i32>, lattice: &Lattice) -> Cluster {
        Cluster::new(self.sites.iter().map(|s| s.translate(cell, lattice)).collect())
    }

    /// Image of the cluster under a symmetry operation bound to the structure.
    /// Site `i` of the image is the image of site `i`.
    pub fn apply(&self, action: &SiteAction, lattice: &Lattice) -> Result<Cluster> {
        let sites = self
            .sites
            .iter()
            .map(|s| {
                Ok(ClusterSite::new(
                    action.map_sublattice(s.sublattice)?,
                    action.op().apply(&s.frac),
                    lattice,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Cluster::new(sites))
    }

    fn sublattices_sorted(&self) -> Vec<usize> {
        let mut sublattices: Vec<usize> = self.sites.iter().map(|s| s.sublattice).collect();
        sublattices.sort_unstable();
        sublattices
    }

    // Translation invariant checks: size, sublattice multiset, pairwise distances
    fn same_shape(&self, other: &Cluster, tol: f64) -> bool {
        self.sites.len() == other.sites.len()
            && self
                .lengths
                .iter()
                .zip(&other.lengths)
                .all(|(a, b)| (a - b).abs() < tol)
            && self.sublattices_sorted() == other.sublattices_sorted()
    }

    /// Permutation `p` with `self.sites[i]` matching `other.sites[p[i]]`, if the
    /// clusters hold the same sites within `tol`.
    pub fn map_onto(&self, other: &Cluster, tol: f64) -> Option<Vec<usize>> {
        if !self.same_shape(other, tol) {
            return None;
        }
        if (self.centroid - other.centroid).norm() >= tol {
            return None;
        }
        self.match_sites(other, tol)
    }

    // Greedy one-to-one assignment; sites closer than tol are interchangeable
    fn match_sites(&self, other: &Cluster, tol: f64) -> Option<Vec<usize>> {
        let mut used = vec![false; other.sites.len()];
        let mut permutation = Vec::with_capacity(self.sites.len());
        for site in &self.sites {
            let j = other
                .sites
                .iter()
                .enumerate()
                .position(|(j, o)| !used[j] && site.matches(o, tol))?;
            used[j] = true;
            permutation.push(j);
        }
        Some(permutation)
    }

    /// Lattice translation `n` and permutation `p` such that
    /// `self.translate(n)` maps onto `other` with `p`.
    pub fn map_onto_periodic(
        &self,
        other: &Cluster,
        lattice: &Lattice,
        tol: f64,
    ) -> Option<(Vector3<i32>, Vec<usize>)> {
        if !self.same_shape(other, tol) {
            return None;
        }
        let first = self.sites.first()?;
        for target in other.sites.iter().filter(|o| o.sublattice == first.sublattice) {
            let Some(cell) = lattice.lattice_translation(&(target.frac - first.frac), tol) else {
                continue;
            };
            let translated = self.translate(&cell, lattice);
            if let Some(permutation) = translated.map_onto(other, tol) {
                return Some((cell, permutation));
            }
        }
        None
    }

    /// Equality under the given periodicity.
    pub fn is_equivalent(
        &self,
        other: &Cluster,
        periodicity: Periodicity,
        lattice: &Lattice,
        tol: f64,
    ) -> bool {
        match periodicity {
            Periodicity::Local => self.map_onto(other, tol).is_some(),
            Periodicity::Periodic => self.map_onto_periodic(other, lattice, tol).is_some(),
        }
    }

    /// True if the sites of `sub` form a sub-multiset of the sites of `self`,
    /// up to a lattice translation of `sub` when periodic.
    pub fn contains(
        &self,
        sub: &Cluster,
        periodicity: Periodicity,
        lattice: &Lattice,
        tol: f64,
    ) -> bool {
        if sub.size() > self.size() {
            return false;
        }
        let Some(first) = sub.sites.first() else {
            return true;
        };
        match periodicity {
            Periodicity::Local => sub.match_sites(self, tol).is_some(),
            Periodicity::Periodic => self
                .sites
                .iter()
                .filter(|s| s.sublattice == first.sublattice)
                .filter_map(|s| lattice.lattice_translation(&(s.frac - first.frac), tol))
                .any(|cell| sub.translate(&cell, lattice).match_sites(self, tol).is_some()),
        }
    }

    /// All clusters made of `size` of this cluster's sites, in index order.
    pub fn subclusters(&self, size: usize) -> Vec<Cluster> {
        let mut result = Vec::new();
        if size > self.size() {
            return result;
        }
        let mut chosen: Vec<usize> = Vec::with_capacity(size);
        self.collect_subclusters(0, size, &mut chosen, &mut result);
        result
    }

    fn collect_subclusters(
        &self,
        start: usize,
        size: usize,
        chosen: &mut Vec<usize>,
        result: &mut Vec<Cluster>,
    ) {
        if chosen.len() == size {
            result.push(Cluster::new(
                chosen.iter().map(|&i| self.sites[i].clone()).collect(),
            ));
            return;
        }
        for i in start..self.sites.len() {
            chosen.push(i);
            self.collect_subclusters(i + 1, size, chosen, result);
            chosen.pop();
        }
    }
}
