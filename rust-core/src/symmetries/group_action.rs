// Symmetry operations bound to a structure: how each operation permutes basis sites.

use std::sync::Arc;

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use super::symmetry_group::SymGroup;
use super::symmetry_operations::SymOp;
use crate::clusterography::Cluster;
use crate::error::ClusterError;
use crate::interfaces::{Closure, Periodicity};
use crate::lattice::Lattice;
use crate::structure::Structure;
use crate::Result;

/// One operation of a group acting on the sites of a structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteAction {
    op: SymOp,
    /// Index of the operation in the group it was taken from.
    op_index: usize,
    /// `sublattice_map[b]` is the basis site that basis site `b` is sent to.
    sublattice_map: Vec<usize>,
    cart_rotation: Matrix3<f64>,
}

impl SiteAction {
    pub fn op(&self) -> &SymOp {
        &self.op
    }

    pub fn op_index(&self) -> usize {
        self.op_index
    }

    pub fn sublattice_map(&self) -> &[usize] {
        &self.sublattice_map
    }

    pub fn map_sublattice(&self, sublattice: usize) -> Result<usize> {
        self.sublattice_map
            .get(sublattice)
            .copied()
            .ok_or(ClusterError::UnknownSublattice {
                sublattice,
                num_basis: self.sublattice_map.len(),
            })
    }

    pub fn cart_rotation(&self) -> &Matrix3<f64> {
        &self.cart_rotation
    }

    // Same action followed by a lattice translation
    fn translated(&self, cell: &Vector3<i32>) -> SiteAction {
        let mut action = self.clone();
        action.op.translation += cell.map(f64::from);
        action
    }

    /// The cluster symmetry this action induces on `cluster`, given `image`,
    /// the image of `cluster` under this action. `None` if the action does not
    /// map `cluster` onto itself (onto a lattice translate of itself with
    /// `Periodicity::Periodic`, the translation then being folded in).
    pub fn stabilizes(
        &self,
        cluster: &Cluster,
        image: &Cluster,
        periodicity: Periodicity,
        lattice: &Lattice,
        tol: f64,
    ) -> Option<ClusterSymmetry> {
        let (action, permutation) = match periodicity {
            Periodicity::Local => (self.clone(), image.map_onto(cluster, tol)?),
            Periodicity::Periodic => {
                let (cell, permutation) = image.map_onto_periodic(cluster, lattice, tol)?;
                (self.translated(&cell), permutation)
            }
        };
        Some(ClusterSymmetry {
            action,
            permutation,
        })
    }
}

/// Operation of the cluster group: `action` sends site `i` of the cluster
/// onto site `permutation[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSymmetry {
    pub action: SiteAction,
    pub permutation: Vec<usize>,
}

/// A symmetry group acting on the sites of one structure.
#[derive(Debug, Clone)]
pub struct GroupAction {
    lattice: Arc<Lattice>,
    actions: Vec<SiteAction>,
    closure: Closure,
    /// Position of the identity in `actions`.
    identity: usize,
}

impl GroupAction {
    /// Bind `group` to `structure`. Fails if an operation sends a basis site
    /// somewhere that is not a basis site.
    pub fn new(group: &SymGroup, structure: &Structure, tol: f64) -> Result<Self> {
        let lattice = structure.lattice();
        let mut actions = Vec::with_capacity(group.len());
        for (op_index, op) in group.iter().enumerate() {
            let sublattice_map = structure
                .basis()
                .iter()
                .enumerate()
                .map(|(b, site)| {
                    structure
                        .find_site(&op.apply(&site.position), tol)
                        .map(|(image, _)| image)
                        .ok_or(ClusterError::SymmetryMismatch { op: op_index, site: b })
                })
                .collect::<Result<Vec<_>>>()?;
            actions.push(SiteAction {
                cart_rotation: op.cart_rotation(lattice),
                op: op.clone(),
                op_index,
                sublattice_map,
            });
        }

        Ok(GroupAction {
            lattice: structure.shared_lattice(),
            actions,
            closure: group.closure(),
            identity: group.identity_index(),
        })
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn actions(&self) -> &[SiteAction] {
        &self.actions
    }

    pub fn action(&self, index: usize) -> &SiteAction {
        &self.actions[index]
    }

    pub fn closure(&self) -> Closure {
        self.closure
    }

    /// Cluster comparison consistent with this group's action.
    pub fn periodicity(&self) -> Periodicity {
        self.closure.periodicity()
    }

    pub fn identity(&self) -> &SiteAction {
        &self.actions[self.identity]
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn apply(&self, index: usize, cluster: &Cluster) -> Result<Cluster> {
        cluster.apply(&self.actions[index], &self.lattice)
    }

    /// Operations that map `cluster` onto itself, each with the site permutation it induces.
    /// Fails if a site of `cluster` is not on a basis site of the structure.
    ///
    /// With `Periodicity::Periodic`, an operation that maps the cluster onto a
    /// lattice translate of itself is kept, with that translation folded into
    /// its translation part so that it fixes the cluster literally.
    pub fn stabilizer(
        &self,
        cluster: &Cluster,
        periodicity: Periodicity,
        tol: f64,
    ) -> Result<Vec<ClusterSymmetry>> {
        let mut symmetries = Vec::new();
        for action in &self.actions {
            let image = cluster.apply(action, &self.lattice)?;
            symmetries.extend(action.stabilizes(cluster, &image, periodicity, &self.lattice, tol));
        }
        Ok(symmetries)
    }

    /// Cluster group of `cluster`: the stabilizer as a literally closed group
    /// acting on the same structure.
    pub fn cluster_group(&self, cluster: &Cluster, periodicity: Periodicity, tol: f64) -> Result<GroupAction> {
        let identity_op = self.actions[self.identity].op_index;
        let actions: Vec<SiteAction> = self
            .stabilizer(cluster, periodicity, tol)?
            .into_iter()
            .map(|s| s.action)
            .collect();
        // The identity always stabilizes, so it is present
        let identity = actions
            .iter()
            .position(|a| a.op_index == identity_op)
            .unwrap_or(0);

        Ok(GroupAction {
            lattice: Arc::clone(&self.lattice),
            actions,
            closure: Closure::Literal,
            identity,
        })
    }
}
