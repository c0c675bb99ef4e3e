// Basis set module: site variables and symmetry-adapted cluster functions

// ======================== MODULE DECLARATIONS ========================
pub mod cluster_basis;
pub mod polynomial;
pub mod site_basis;

// Test modules
mod _tests_basis_set;

// ======================== SITE VARIABLES ========================
pub use site_basis::{
    occupation_site_functions, // fn(num_occupants: usize) -> DMatrix<f64> - orthonormal occupation functions, constant dropped
    site_variables,            // fn(cluster: &Cluster, structure: &Structure) -> Result<Vec<SiteVariable>>
    SiteVariable,              // struct - (cluster site, DoF component, kind, name)
    VariableKind,              // enum - Occupation | Displacement | Scalar
};

// ======================== POLYNOMIALS ========================
pub use polynomial::{
    LinearMap,  // type - image of each variable as a linear combination of variables
    Polynomial, // struct - sparse polynomial, sorted terms
    Term,       // struct - exponents + coefficient
};

// ======================== CLUSTER FUNCTIONS ========================
pub use cluster_basis::{
    transform_variables, // fn(variables: &[SiteVariable], symmetry: &ClusterSymmetry) -> Result<LinearMap>
    BasisSet,            // struct - cluster functions of one orbit prototype
    ClusterFunction,     // struct - one symmetrized polynomial
};
// BasisSet impl methods:
//   construct(prototype, structure, symmetries, max_poly_order) -> Result<BasisSet> - Reynolds average + independence check
//   len(&self) -> usize                                                              - number of functions
//   correlations(&self, occupation: &[usize]) -> Result<Vec<f64>>                    - function values for an occupation
