use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::clusterography::Cluster;
use crate::structure::{SiteDoF, Structure};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    /// Site function of a discrete occupation.
    Occupation,
    /// Cartesian displacement component, rotates with the operation.
    Displacement,
    /// Scalar invariant under every operation.
    Scalar,
}

/// One variable of a cluster function: component `component` of the DoF on cluster site `site`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteVariable {
    pub site: usize,
    pub component: usize,
    pub kind: VariableKind,
    pub name: String,
}

impl SiteVariable {
    /// Label such as `phi1[0]` or `dx[2]`.
    pub fn label(&self) -> String {
        format!("{}[{}]", self.name, self.site)
    }
}

fn kind_of(dof: &SiteDoF) -> VariableKind {
    match dof {
        SiteDoF::Occupation { .. } => VariableKind::Occupation,
        SiteDoF::Displacement => VariableKind::Displacement,
        SiteDoF::Scalar { .. } => VariableKind::Scalar,
    }
}

/// Variables of the sites of `cluster`, ordered by site, then by DoF component.
pub fn site_variables(cluster: &Cluster, structure: &Structure) -> Result<Vec<SiteVariable>> {
    let mut variables = Vec::new();
    for (site, cluster_site) in cluster.sites().iter().enumerate() {
        let dof = &structure.site(cluster_site.sublattice)?.dof;
        for component in 0..dof.num_variables() {
            variables.push(SiteVariable {
                site,
                component,
                kind: kind_of(dof),
                name: dof.variable_name(component),
            });
        }
    }
    Ok(variables)
}

/// Occupation site functions for `num_occupants` states.
///
/// Row `k` holds the values of function `k + 1` on each occupant. The
/// functions are orthonormal under the uniform average over occupants and
/// orthogonal to the constant, which is left out. They are polynomials in the
/// centered occupant index (Chebyshev-like), so two occupants give `-1, +1`.
pub fn occupation_site_functions(num_occupants: usize) -> DMatrix<f64> {
    let m = num_occupants;
    if m < 2 {
        return DMatrix::zeros(0, m);
    }
    let center = (m as f64 - 1.0) / 2.0;
    let inner = |a: &[f64], b: &[f64]| a.iter().zip(b).map(|(x, y)| x * y).sum::<f64>() / m as f64;

    let mut basis: Vec<Vec<f64>> = Vec::with_capacity(m);
    for power in 0..m {
        let mut v: Vec<f64> = (0..m).map(|s| (s as f64 - center).powi(power as i32)).collect();
        for q in &basis {
            let projection = inner(&v, q);
            for (x, y) in v.iter_mut().zip(q) {
                *x -= projection * y;
            }
        }
        let norm = inner(&v, &v).sqrt();
        v.iter_mut().for_each(|x| *x /= norm);
        basis.push(v);
    }

    DMatrix::from_fn(m - 1, m, |k, s| basis[k + 1][s])
}
