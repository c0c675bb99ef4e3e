use log::trace;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use super::polynomial::{LinearMap, Polynomial};
use super::site_basis::{occupation_site_functions, site_variables, SiteVariable, VariableKind};
use crate::clusterography::Cluster;
use crate::config::BASIS_TOLERANCE;
use crate::error::ClusterError;
use crate::structure::{SiteDoF, Structure};
use crate::symmetries::ClusterSymmetry;
use crate::Result;

/// A symmetry-adapted polynomial of the site variables of a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterFunction {
    polynomial: Polynomial,
}

impl ClusterFunction {
    pub fn polynomial(&self) -> &Polynomial {
        &self.polynomial
    }

    pub fn degree(&self) -> u32 {
        self.polynomial.degree()
    }

    /// Value for the given site variable values, in basis set variable order.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.polynomial.evaluate(values)
    }
}

/// Cluster functions of one orbit prototype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasisSet {
    variables: Vec<SiteVariable>,
    /// Occupation site functions of each cluster site (`None` for continuous DoFs).
    site_functions: Vec<Option<DMatrix<f64>>>,
    max_poly_order: usize,
    functions: Vec<ClusterFunction>,
}

impl BasisSet {
    /// Build the functions of `prototype` that are invariant under `symmetries`.
    ///
    /// Candidate monomials contain every site, exactly one occupation
    /// variable per occupation site, and have total degree at most
    /// `max_poly_order`. Each is averaged over the symmetries and kept when
    /// linearly independent of the functions kept before it.
    pub fn construct(
        prototype: &Cluster,
        structure: &Structure,
        symmetries: &[ClusterSymmetry],
        max_poly_order: usize,
    ) -> Result<BasisSet> {
        let variables = site_variables(prototype, structure)?;
        let site_functions = prototype
            .sites()
            .iter()
            .map(|s| {
                structure.site(s.sublattice).map(|site| match &site.dof {
                    SiteDoF::Occupation { occupants } => Some(occupation_site_functions(occupants.len())),
                    _ => None,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let maps = symmetries
            .iter()
            .map(|s| transform_variables(&variables, s))
            .collect::<Result<Vec<_>>>()?;

        let mut orthonormal: Vec<Polynomial> = Vec::new();
        let mut functions = Vec::new();
        for exponents in candidate_monomials(&variables, prototype.size(), max_poly_order) {
            let averaged = reynolds(&Polynomial::monomial(exponents), &maps);
            if averaged.norm() <= BASIS_TOLERANCE {
                continue;
            }
            let residual = orthonormal.iter().fold(averaged.clone(), |r, q| {
                let projection = r.dot(q);
                r.add_scaled(q, -projection, BASIS_TOLERANCE * 1e-3)
            });
            let residual_norm = residual.norm();
            if residual_norm <= BASIS_TOLERANCE {
                continue;
            }
            orthonormal.push(residual.scaled(1.0 / residual_norm));
            let scale = averaged.max_abs_coefficient();
            functions.push(ClusterFunction {
                polynomial: averaged.scaled(1.0 / scale),
            });
        }
        trace!(
            "{}-site cluster: {} variables, {} functions",
            prototype.size(),
            variables.len(),
            functions.len()
        );

        Ok(BasisSet {
            variables,
            site_functions,
            max_poly_order,
            functions,
        })
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn functions(&self) -> &[ClusterFunction] {
        &self.functions
    }

    pub fn function(&self, index: usize) -> Option<&ClusterFunction> {
        self.functions.get(index)
    }

    pub fn variables(&self) -> &[SiteVariable] {
        &self.variables
    }

    pub fn max_poly_order(&self) -> usize {
        self.max_poly_order
    }

    /// Variable values for an occupation of the cluster sites (`occupation[i]`
    /// is the occupant index on site `i`). Continuous variables are zero.
    pub fn occupation_values(&self, occupation: &[usize]) -> Result<Vec<f64>> {
        if occupation.len() != self.site_functions.len() {
            return Err(ClusterError::ClusterSizeMismatch {
                expected: self.site_functions.len(),
                found: occupation.len(),
            });
        }
        self.variables
            .iter()
            .map(|v| match (&self.site_functions[v.site], v.kind) {
                (Some(functions), VariableKind::Occupation) => {
                    let occupant = occupation[v.site];
                    if occupant >= functions.ncols() {
                        return Err(ClusterError::IndexOutOfRange {
                            index: occupant,
                            len: functions.ncols(),
                        });
                    }
                    Ok(functions[(v.component, occupant)])
                }
                _ => Ok(0.0),
            })
            .collect()
    }

    /// Value of every cluster function for an occupation of the cluster sites.
    pub fn correlations(&self, occupation: &[usize]) -> Result<Vec<f64>> {
        let values = self.occupation_values(occupation)?;
        Ok(self.functions.iter().map(|f| f.evaluate(&values)).collect())
    }
}

/// How a cluster symmetry acts on the variables: `x(site, a)` becomes
/// `Σ_b R[b][a] x(permutation[site], b)` for displacements and
/// `x(permutation[site], a)` otherwise. This is the action of the inverse
/// operation, so the maps of a group form a group.
pub fn transform_variables(variables: &[SiteVariable], symmetry: &ClusterSymmetry) -> Result<LinearMap> {
    let mut offsets: Vec<Option<usize>> = vec![None; symmetry.permutation.len()];
    for (index, v) in variables.iter().enumerate() {
        if offsets[v.site].is_none() {
            offsets[v.site] = Some(index);
        }
    }
    let mismatch = |site: usize| ClusterError::SymmetryMismatch {
        op: symmetry.action.op_index(),
        site,
    };

    let rotation = symmetry.action.cart_rotation();
    variables
        .iter()
        .map(|v| {
            let target = symmetry.permutation[v.site];
            let offset = offsets[target].ok_or_else(|| mismatch(v.site))?;
            let image = |component: usize| {
                variables
                    .get(offset + component)
                    .filter(|w| w.site == target && w.kind == v.kind)
                    .map(|_| offset + component)
                    .ok_or_else(|| mismatch(v.site))
            };
            match v.kind {
                VariableKind::Displacement => (0..3)
                    .map(|b| Ok((image(b)?, rotation[(b, v.component)])))
                    .collect::<Result<Vec<_>>>(),
                VariableKind::Occupation | VariableKind::Scalar => Ok(vec![(image(v.component)?, 1.0)]),
            }
        })
        .collect()
}

// Average of the images of `polynomial` over the group
fn reynolds(polynomial: &Polynomial, maps: &[LinearMap]) -> Polynomial {
    if maps.is_empty() {
        return polynomial.clone();
    }
    let weight = 1.0 / maps.len() as f64;
    let terms = maps.iter().flat_map(|map| {
        polynomial
            .substitute(map, 0.0)
            .terms()
            .iter()
            .map(|t| (t.exponents.clone(), t.coefficient * weight))
            .collect::<Vec<_>>()
    });
    Polynomial::from_terms(polynomial.num_variables(), terms, BASIS_TOLERANCE * 1e-3)
}

/// Exponent vectors of the candidate monomials, by degree, then by variable order.
fn candidate_monomials(variables: &[SiteVariable], num_sites: usize, max_poly_order: usize) -> Vec<Vec<u32>> {
    let per_site: Vec<Vec<(Vec<u32>, usize)>> = (0..num_sites)
        .map(|site| {
            let indices: Vec<usize> = variables
                .iter()
                .enumerate()
                .filter(|(_, v)| v.site == site)
                .map(|(i, _)| i)
                .collect();
            site_monomials(variables, &indices, max_poly_order)
        })
        .collect();

    let mut result: Vec<(usize, Vec<u32>)> = Vec::new();
    let mut current = vec![0u32; variables.len()];
    combine_sites(&per_site, 0, 0, max_poly_order, &mut current, &mut result);
    result.sort_by(|(da, a), (db, b)| da.cmp(db).then_with(|| b.cmp(a)));
    result.into_iter().map(|(_, exponents)| exponents).collect()
}

// Monomials of one site as (sparse exponents over `indices`, degree); at least degree 1
fn site_monomials(variables: &[SiteVariable], indices: &[usize], max_degree: usize) -> Vec<(Vec<u32>, usize)> {
    let Some(&first) = indices.first() else {
        return Vec::new();
    };
    if variables[first].kind == VariableKind::Occupation {
        return indices
            .iter()
            .map(|&i| {
                let mut exponents = vec![0; variables.len()];
                exponents[i] = 1;
                (exponents, 1)
            })
            .collect();
    }

    let mut monomials = Vec::new();
    let mut exponents = vec![0u32; variables.len()];
    distribute(indices, 0, max_degree, &mut exponents, &mut monomials);
    monomials.retain(|(_, degree)| *degree >= 1);
    monomials
}

// All exponent assignments to `indices[k..]` with total degree <= budget
fn distribute(
    indices: &[usize],
    k: usize,
    budget: usize,
    exponents: &mut Vec<u32>,
    out: &mut Vec<(Vec<u32>, usize)>,
) {
    if k == indices.len() {
        let degree = indices.iter().map(|&i| exponents[i] as usize).sum();
        out.push((exponents.clone(), degree));
        return;
    }
    for e in 0..=budget {
        exponents[indices[k]] = e as u32;
        distribute(indices, k + 1, budget - e, exponents, out);
    }
    exponents[indices[k]] = 0;
}

fn combine_sites(
    per_site: &[Vec<(Vec<u32>, usize)>],
    site: usize,
    degree: usize,
    max_degree: usize,
    current: &mut Vec<u32>,
    out: &mut Vec<(usize, Vec<u32>)>,
) {
    if site == per_site.len() {
        out.push((degree, current.clone()));
        return;
    }
    // Every remaining site needs at least degree 1
    let remaining = per_site.len() - site - 1;
    for (exponents, d) in &per_site[site] {
        if degree + d + remaining > max_degree {
            continue;
        }
        for (c, e) in current.iter_mut().zip(exponents) {
            *c += e;
        }
        combine_sites(per_site, site + 1, degree + d, max_degree, current, out);
        for (c, e) in current.iter_mut().zip(exponents) {
            *c -= e;
        }
    }
}
