// Clusterography module: clusters, orbits, branches and the orbitree

// ======================== MODULE DECLARATIONS ========================
pub mod candidates;
pub mod cluster;
pub mod orbit;
pub mod orbit_branch;
pub mod orbit_index;
pub mod orbitree;

// Test modules
mod _tests_cluster;

// ======================== CLUSTERS ========================
pub use cluster::{
    Cluster,     // struct - ordered sites with derived centroid and sorted pairwise lengths
    ClusterSite, // struct - sublattice index + fractional and cartesian position
};
// Cluster impl methods:
//   new(sites: Vec<ClusterSite>) -> Self                                  - computes centroid and lengths
//   from_cells(structure: &Structure, sites: &[(usize, Vector3<i32>)])    - cluster of basis sites in given cells
//   sort_sites(&mut self, tol: f64) -> Vec<usize>                         - canonical order, returns reordering
//   apply(&self, action: &SiteAction, lattice: &Lattice) -> Cluster      - image under a symmetry operation
//   map_onto(&self, other: &Cluster, tol: f64) -> Option<Vec<usize>>     - literal match with permutation
//   map_onto_periodic(&self, other, lattice, tol)                         - match up to a lattice translation
//   contains(&self, sub: &Cluster, periodicity, lattice, tol) -> bool    - sub-multiset test

// ======================== ORBITS ========================
pub use orbit::{
    Orbit,     // struct - prototype + distinct symmetric images + optional basis set
    SymRecord, // struct - generating operation and site permutation of one equivalent
};
// Orbit impl methods:
//   generate(seed, action, periodicity, tol) -> Result<Orbit>             - orbit closure, identity first
//   multiplicity(&self) -> usize                                          - number of equivalents
//   cluster_group(&self) -> &[ClusterSymmetry]                            - operations fixing the prototype
//   find(&self, cluster, periodicity, lattice, tol) -> Option<usize>      - equivalent matching cluster

pub use orbit_branch::OrbitBranch; // struct - orbits sharing one cluster size + branch cutoffs

// ======================== ORBITREE ========================
pub use candidates::CandidateStrategy; // enum - Periodic | Local { phenomenal, .. } | InCell { supercell }
pub use orbit_index::OrbitIndex; // struct - linear indices and subcluster table derived from a tree
pub use orbitree::Orbitree; // struct - branches indexed by cluster size
// Orbitree impl methods:
//   generate(structure, group, specs) -> Result<Orbitree>                          - periodic crystal
//   generate_local(structure, group, specs, phenomenal, include_phenomenal_sites)  - around a phenomenal cluster
//   generate_in_cell(structure, group, specs, supercell) -> Result<Orbitree>      - inside one supercell
//   find_cluster(&self, cluster: &Cluster) -> Option<(usize, usize)>               - (branch, orbit) lookup
//   add_subclusters(&mut self, cluster, action) -> Result<usize>                   - custom clusters
//   generate_clust_bases(&mut self, structure, max_poly_order) -> Result<()>       - bases over each orbit's cluster group
