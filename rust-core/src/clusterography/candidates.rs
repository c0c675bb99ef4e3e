// Candidate cluster enumeration for the orbitree front-ends.

use std::collections::BTreeSet;

use log::trace;
use nalgebra::{Matrix3, Vector3};

use super::cluster::{Cluster, ClusterSite};
use crate::config::{BranchSpecs, ClusterSpecs};
use crate::error::ClusterError;
use crate::interfaces::Periodicity;
use crate::structure::Structure;
use crate::Result;

/// Where candidate clusters are drawn from.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateStrategy {
    /// Periodic crystal: every candidate has at least one site in the home cell.
    Periodic,
    /// Neighbourhood of a fixed phenomenal cluster.
    Local {
        phenomenal: Cluster,
        /// Whether the phenomenal cluster's own sites may appear in candidates.
        include_phenomenal_sites: bool,
    },
    /// Sites of one supercell, each placed at its minimum image relative to
    /// the first site of the candidate.
    InCell { supercell: Matrix3<i32> },
}

impl CandidateStrategy {
    /// Comparison used when checking whether a candidate is already covered by the tree.
    pub fn periodicity(&self) -> Periodicity {
        match self {
            CandidateStrategy::Local { .. } => Periodicity::Local,
            CandidateStrategy::Periodic | CandidateStrategy::InCell { .. } => Periodicity::Periodic,
        }
    }

    /// Candidate clusters of `num_sites` sites satisfying the cutoffs of `branch`,
    /// in deterministic enumeration order.
    pub fn candidates(
        &self,
        structure: &Structure,
        num_sites: usize,
        branch: &BranchSpecs,
        specs: &ClusterSpecs,
    ) -> Result<Vec<Cluster>> {
        if num_sites == 0 || (num_sites > 1 && branch.max_length <= 0.0) {
            return Ok(Vec::new());
        }
        let active = structure.active_sites(specs.min_num_components);
        if active.is_empty() {
            return Ok(Vec::new());
        }

        let pool = match self {
            CandidateStrategy::Periodic => periodic_pool(structure, &active, num_sites, branch, specs),
            CandidateStrategy::Local {
                phenomenal,
                include_phenomenal_sites,
            } => local_pool(structure, &active, phenomenal, *include_phenomenal_sites, branch, specs)?,
            CandidateStrategy::InCell { supercell } => in_cell_pool(structure, &active, supercell)?,
        };
        trace!("candidate pool of {} sites for {}-site clusters", pool.sites.len(), num_sites);

        let allow_repeats = branch.allows_repeated_sites() && pool.images.is_none();
        let mut enumerator = Enumerator {
            pool: &pool,
            structure,
            num_sites,
            max_length: branch.max_length,
            min_length: (!branch.allows_repeated_sites()).then_some(branch.min_length),
            allow_repeats,
            tol: specs.tolerance,
            chosen: Vec::with_capacity(num_sites),
            result: Vec::new(),
        };
        for anchor in 0..pool.num_anchors {
            enumerator.extend(anchor);
        }
        Ok(enumerator.result)
    }
}

struct CandidatePool {
    sites: Vec<ClusterSite>,
    /// Only the first `num_anchors` sites may be the first site of a candidate.
    num_anchors: usize,
    /// Supercell transformation and its inverse when sites are re-imaged.
    images: Option<(Matrix3<f64>, Matrix3<f64>)>,
}

impl CandidatePool {
    // Position of `site` used in a candidate whose first site is `anchor`
    fn place(&self, anchor: &ClusterSite, site: &ClusterSite, structure: &Structure, tol: f64) -> Option<ClusterSite> {
        let Some((transformation, inverse)) = &self.images else {
            return Some(site.clone());
        };
        let lattice = structure.lattice();
        let relative = inverse * (site.frac - anchor.frac);
        let reduced = relative.map(|x| x - x.round());

        let mut best: Option<(f64, Vector3<f64>)> = None;
        let mut ties = 0;
        for i in -1..=1 {
            for j in -1..=1 {
                for k in -1..=1 {
                    let shifted = reduced + Vector3::new(i as f64, j as f64, k as f64);
                    let frac = anchor.frac + transformation * shifted;
                    let distance = (lattice.frac_to_cart(&frac) - anchor.cart).norm();
                    match best {
                        Some((d, _)) if distance > d + tol => {}
                        Some((d, _)) if (distance - d).abs() <= tol => ties += 1,
                        _ => {
                            best = Some((distance, frac));
                            ties = 1;
                        }
                    }
                }
            }
        }
        // Several images at the same distance overlap in the supercell
        match best {
            Some((_, frac)) if ties == 1 => Some(ClusterSite::new(site.sublattice, frac, lattice)),
            _ => None,
        }
    }
}

struct Enumerator<'a> {
    pool: &'a CandidatePool,
    structure: &'a Structure,
    num_sites: usize,
    max_length: f64,
    /// `None` disables the minimum length check.
    min_length: Option<f64>,
    allow_repeats: bool,
    tol: f64,
    chosen: Vec<ClusterSite>,
    result: Vec<Cluster>,
}

impl Enumerator<'_> {
    fn extend(&mut self, index: usize) {
        let pool = self.pool;
        let site = &pool.sites[index];
        let placed = match self.chosen.first() {
            Some(anchor) => match pool.place(anchor, site, self.structure, self.tol) {
                Some(placed) => placed,
                None => return,
            },
            None => site.clone(),
        };
        if self.num_sites > 1 && !self.admissible(&placed) {
            return;
        }

        self.chosen.push(placed);
        if self.chosen.len() == self.num_sites {
            self.result.push(Cluster::new(self.chosen.clone()));
        } else {
            let start = if self.allow_repeats { index } else { index + 1 };
            for next in start..pool.sites.len() {
                self.extend(next);
            }
        }
        self.chosen.pop();
    }

    // Pairwise cutoffs against the sites chosen so far
    fn admissible(&self, site: &ClusterSite) -> bool {
        self.chosen.iter().all(|other| {
            let d = site.distance(other);
            d <= self.max_length + self.tol && self.min_length.map_or(true, |min| d + self.tol >= min)
        })
    }
}

fn search_cells(structure: &Structure, radius: f64, specs: &ClusterSpecs) -> Vec<Vector3<i32>> {
    let shells = specs.search_radius.unwrap_or_else(|| {
        let extent = structure.lattice().image_extent(radius);
        extent.iter().copied().max().unwrap_or(0) as usize + 1
    });
    structure.lattice().lattice_points_by_shell(shells)
}

fn periodic_pool(
    structure: &Structure,
    active: &[usize],
    num_sites: usize,
    branch: &BranchSpecs,
    specs: &ClusterSpecs,
) -> CandidatePool {
    let home: Vec<ClusterSite> = active
        .iter()
        .map(|&b| ClusterSite::from_cell(structure, b, &Vector3::zeros()))
        .collect();
    let num_anchors = home.len();
    let mut sites = home.clone();

    if num_sites > 1 {
        for cell in search_cells(structure, branch.max_length, specs) {
            if cell == Vector3::zeros() {
                continue;
            }
            for &b in active {
                let site = ClusterSite::from_cell(structure, b, &cell);
                if home
                    .iter()
                    .any(|h| h.distance(&site) <= branch.max_length + specs.tolerance)
                {
                    sites.push(site);
                }
            }
        }
    }

    CandidatePool {
        sites,
        num_anchors,
        images: None,
    }
}

fn local_pool(
    structure: &Structure,
    active: &[usize],
    phenomenal: &Cluster,
    include_phenomenal_sites: bool,
    branch: &BranchSpecs,
    specs: &ClusterSpecs,
) -> Result<CandidatePool> {
    if phenomenal.is_empty() {
        return Err(ClusterError::InvalidSpecs("phenomenal cluster is empty".to_string()));
    }
    for site in phenomenal.sites() {
        structure.site(site.sublattice)?;
    }
    let tol = specs.tolerance;
    let radius = branch.max_length.max(0.0);

    let mut seen: BTreeSet<(usize, [i32; 3])> = BTreeSet::new();
    let mut sites: Vec<ClusterSite> = Vec::new();
    for phenomenal_site in phenomenal.sites() {
        let origin = phenomenal_site.frac.map(|x| x.floor() as i32);
        for offset in search_cells(structure, radius, specs) {
            let cell = origin + offset;
            for &b in active {
                if !seen.insert((b, [cell.x, cell.y, cell.z])) {
                    continue;
                }
                let site = ClusterSite::from_cell(structure, b, &cell);
                let near = phenomenal
                    .sites()
                    .iter()
                    .any(|p| p.distance(&site) <= radius + tol);
                let own = phenomenal.sites().iter().any(|p| p.matches(&site, tol));
                if near && (include_phenomenal_sites || !own) {
                    sites.push(site);
                }
            }
        }
    }

    // Closest to the phenomenal cluster first
    let centroid = *phenomenal.centroid();
    sites.sort_by_key(|s| ((s.cart - centroid).norm() / tol).round() as i64);

    Ok(CandidatePool {
        num_anchors: sites.len(),
        sites,
        images: None,
    })
}

fn in_cell_pool(
    structure: &Structure,
    active: &[usize],
    supercell: &Matrix3<i32>,
) -> Result<CandidatePool> {
    let transformation = supercell.map(f64::from);
    let inverse = transformation
        .try_inverse()
        .filter(|_| transformation.determinant().abs() > 0.5)
        .ok_or(ClusterError::InvalidSupercell)?;

    // Bounding box of the supercell in primitive cell coordinates
    let mut lower = [0i32; 3];
    let mut upper = [0i32; 3];
    for corner in 0..8 {
        for (row, (lo, hi)) in lower.iter_mut().zip(upper.iter_mut()).enumerate() {
            let coordinate: i32 = (0..3)
                .filter(|axis| corner & (1 << axis) != 0)
                .map(|axis| supercell[(row, axis)])
                .sum();
            *lo = (*lo).min(coordinate);
            *hi = (*hi).max(coordinate);
        }
    }

    let eps = 1e-9;
    let mut sites = Vec::new();
    for i in lower[0]..=upper[0] {
        for j in lower[1]..=upper[1] {
            for k in lower[2]..=upper[2] {
                let cell = Vector3::new(i, j, k);
                let inside = inverse * cell.map(f64::from);
                if inside.iter().all(|&u| u > -eps && u < 1.0 - eps) {
                    for &b in active {
                        sites.push(ClusterSite::from_cell(structure, b, &cell));
                    }
                }
            }
        }
    }

    Ok(CandidatePool {
        num_anchors: sites.len(),
        sites,
        images: Some((transformation, inverse)),
    })
}
