use std::sync::Arc;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::site_dof::SiteDoF;
use crate::error::ClusterError;
use crate::lattice::Lattice;
use crate::Result;

/// One site of the primitive cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasisSite {
    pub label: String,
    /// Fractional position within the cell.
    pub position: Vector3<f64>,
    pub dof: SiteDoF,
}

impl BasisSite {
    pub fn new(label: impl Into<String>, position: Vector3<f64>, dof: SiteDoF) -> Self {
        Self {
            label: label.into(),
            position,
            dof,
        }
    }
}

/// A periodic crystal: a lattice plus an ordered list of basis sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StructureData", into = "StructureData")]
pub struct Structure {
    lattice: Arc<Lattice>,
    basis: Vec<BasisSite>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StructureData {
    lattice: Lattice,
    basis: Vec<BasisSite>,
}

impl TryFrom<StructureData> for Structure {
    type Error = ClusterError;

    fn try_from(data: StructureData) -> Result<Self> {
        Structure::new(data.lattice, data.basis)
    }
}

impl From<Structure> for StructureData {
    fn from(structure: Structure) -> Self {
        StructureData {
            lattice: (*structure.lattice).clone(),
            basis: structure.basis,
        }
    }
}

impl Structure {
    pub fn new(lattice: Lattice, basis: Vec<BasisSite>) -> Result<Self> {
        Self::from_shared(Arc::new(lattice), basis)
    }

    pub fn from_shared(lattice: Arc<Lattice>, basis: Vec<BasisSite>) -> Result<Self> {
        if basis.is_empty() {
            return Err(ClusterError::EmptyBasis);
        }
        if let Some(site) = basis.iter().position(|b| !b.dof.is_valid()) {
            return Err(ClusterError::EmptyDoF { site });
        }
        Ok(Structure { lattice, basis })
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn shared_lattice(&self) -> Arc<Lattice> {
        Arc::clone(&self.lattice)
    }

    pub fn basis(&self) -> &[BasisSite] {
        &self.basis
    }

    pub fn num_sites(&self) -> usize {
        self.basis.len()
    }

    pub fn site(&self, sublattice: usize) -> Result<&BasisSite> {
        self.basis.get(sublattice).ok_or(ClusterError::UnknownSublattice {
            sublattice,
            num_basis: self.basis.len(),
        })
    }

    /// Fractional position of basis site `sublattice` translated into `cell`.
    pub fn site_frac(&self, sublattice: usize, cell: &Vector3<i32>) -> Vector3<f64> {
        self.basis[sublattice].position + cell.map(f64::from)
    }

    /// Identify which basis site (and cell) a fractional position belongs to.
    pub fn find_site(&self, frac: &Vector3<f64>, tol: f64) -> Option<(usize, Vector3<i32>)> {
        self.basis.iter().enumerate().find_map(|(b, site)| {
            self.lattice
                .lattice_translation(&(frac - site.position), tol)
                .map(|cell| (b, cell))
        })
    }

    /// Indices of basis sites that take part in cluster generation.
    pub fn active_sites(&self, min_num_components: usize) -> Vec<usize> {
        self.basis
            .iter()
            .enumerate()
            .filter(|(_, site)| site.dof.is_active(min_num_components))
            .map(|(b, _)| b)
            .collect()
    }
}
