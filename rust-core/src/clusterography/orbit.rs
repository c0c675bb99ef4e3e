use serde::{Deserialize, Serialize};

use super::cluster::Cluster;
use crate::basis_set::BasisSet;
use crate::interfaces::Periodicity;
use crate::lattice::Lattice;
use crate::symmetries::{ClusterSymmetry, GroupAction, SymOp};
use crate::Result;

/// How an equivalent cluster was produced from the prototype.
///
/// `equivalent.sites[permutation[i]]` is the image of `prototype.sites[i]` under `op`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymRecord {
    /// Index of the operation in the group that generated the orbit.
    pub op_index: usize,
    pub op: SymOp,
    pub permutation: Vec<usize>,
}

/// A prototype cluster and its distinct images under a symmetry group.
///
/// The prototype is always equivalent 0, generated by the identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    prototype: Cluster,
    equivalents: Vec<Cluster>,
    records: Vec<SymRecord>,
    /// Operations of the generating group that map the prototype onto itself.
    cluster_group: Vec<ClusterSymmetry>,
    #[serde(default)]
    basis_set: Option<BasisSet>,
}

impl Orbit {
    /// Close the orbit of `seed` under `action`.
    ///
    /// The seed is put in canonical site order and becomes the prototype.
    /// Images are compared literally when the group closes literally and up
    /// to lattice translations otherwise; the first operation producing an
    /// image wins, with the identity tried first.
    ///
    /// The operations that map the prototype onto itself are recorded as the
    /// cluster group, comparing with `periodicity`: `Periodic` when the
    /// clusters live in a periodic crystal, `Local` around a fixed cluster.
    pub fn generate(seed: &Cluster, action: &GroupAction, periodicity: Periodicity, tol: f64) -> Result<Orbit> {
        let lattice = action.lattice();
        let closure = action.periodicity();

        let mut prototype = seed.clone();
        prototype.sort_sites(tol);

        let identity = action.identity().op_index();
        let order = std::iter::once(identity).chain((0..action.len()).filter(|&i| i != identity));

        let mut equivalents: Vec<Cluster> = Vec::new();
        let mut records: Vec<SymRecord> = Vec::new();
        let mut cluster_group: Vec<ClusterSymmetry> = Vec::new();
        for index in order {
            let site_action = action.action(index);
            let mut image = prototype.apply(site_action, lattice)?;
            cluster_group.extend(site_action.stabilizes(&prototype, &image, periodicity, lattice, tol));
            if equivalents
                .iter()
                .any(|e| image.is_equivalent(e, closure, lattice, tol))
            {
                continue;
            }
            let sorted = image.sort_sites(tol);
            let mut permutation = vec![0; sorted.len()];
            for (k, &old) in sorted.iter().enumerate() {
                permutation[old] = k;
            }
            equivalents.push(image);
            records.push(SymRecord {
                op_index: site_action.op_index(),
                op: site_action.op().clone(),
                permutation,
            });
        }

        Ok(Orbit {
            prototype,
            equivalents,
            records,
            cluster_group,
            basis_set: None,
        })
    }

    pub fn prototype(&self) -> &Cluster {
        &self.prototype
    }

    pub fn equivalents(&self) -> &[Cluster] {
        &self.equivalents
    }

    pub fn equivalent(&self, index: usize) -> Option<&Cluster> {
        self.equivalents.get(index)
    }

    pub fn records(&self) -> &[SymRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&SymRecord> {
        self.records.get(index)
    }

    /// Number of distinct equivalent clusters.
    ///
    /// Under a literally closed group (a point group) this counts every image,
    /// e.g. 6 nearest neighbour pairs around a simple cubic site. Under a
    /// group closed only modulo lattice translations (a factor group with
    /// fractional translations) images are counted once per lattice
    /// translation, i.e. per unit cell.
    pub fn multiplicity(&self) -> usize {
        self.equivalents.len()
    }

    /// Number of sites of every cluster in the orbit.
    pub fn num_sites(&self) -> usize {
        self.prototype.size()
    }

    /// Operations mapping the prototype onto itself, with the site permutation
    /// each induces. Always holds the identity.
    pub fn cluster_group(&self) -> &[ClusterSymmetry] {
        &self.cluster_group
    }

    pub fn max_length(&self) -> f64 {
        self.prototype.max_length()
    }

    pub fn min_length(&self) -> f64 {
        self.prototype.min_length()
    }

    /// Index of the equivalent that `cluster` matches, if any.
    pub fn find(
        &self,
        cluster: &Cluster,
        periodicity: Periodicity,
        lattice: &Lattice,
        tol: f64,
    ) -> Option<usize> {
        if cluster.size() != self.num_sites() {
            return None;
        }
        self.equivalents
            .iter()
            .position(|e| cluster.is_equivalent(e, periodicity, lattice, tol))
    }

    pub fn contains(
        &self,
        cluster: &Cluster,
        periodicity: Periodicity,
        lattice: &Lattice,
        tol: f64,
    ) -> bool {
        self.find(cluster, periodicity, lattice, tol).is_some()
    }

    /// Same orbit: the prototype of `other` is one of our equivalents.
    pub fn is_equivalent(
        &self,
        other: &Orbit,
        periodicity: Periodicity,
        lattice: &Lattice,
        tol: f64,
    ) -> bool {
        self.contains(&other.prototype, periodicity, lattice, tol)
    }

    pub fn basis_set(&self) -> Option<&BasisSet> {
        self.basis_set.as_ref()
    }

    pub fn set_basis_set(&mut self, basis_set: BasisSet) {
        self.basis_set = Some(basis_set);
    }

    /// Number of cluster functions attached (0 without a basis set).
    pub fn basis_set_size(&self) -> usize {
        self.basis_set.as_ref().map_or(0, |b| b.len())
    }
}
