// Symmetries module: symmetry operations, groups, and their action on structures and clusters

// ======================== MODULE DECLARATIONS ========================
pub mod group_action;
pub mod symmetry_group;
pub mod symmetry_operations;
pub mod symmetry_point_groups;

// Test modules
mod _tests_symmetry_group;

// ======================== SYMMETRY OPERATIONS ========================
pub use symmetry_operations::SymOp; // struct - affine operation in fractional coordinates (integer rotation + translation)
// SymOp impl methods:
//   new(rotation: Matrix3<i32>, translation: Vector3<f64>) -> Self - creates operation
//   identity() -> Self                                             - creates identity operation
//   apply(&self, point: &Vector3<f64>) -> Vector3<f64>             - applies operation to fractional point
//   compose(&self, other: &Self) -> Self                           - self ∘ other
//   inverse(&self) -> Self                                         - returns inverse operation
//   cart_rotation(&self, lattice: &Lattice) -> Matrix3<f64>        - rotation in cartesian coordinates
//   order(&self, lattice: &Lattice, tol: f64) -> usize             - order up to lattice translations

// ======================== SYMMETRY GROUPS ========================
pub use symmetry_group::SymGroup; // struct - closed, ordered set of operations with multiplication table
// SymGroup impl methods:
//   new(ops: Vec<SymOp>, lattice: &Lattice, tol: f64) -> Result<Self>        - validates identity and closure
//   from_generators(generators: &[SymOp], lattice: &Lattice, tol: f64) -> Result<Self> - group closure
//   identity_group(lattice: &Lattice, tol: f64) -> Result<Self>              - trivial group
//   closure(&self) -> Closure                                                - literal or modulo lattice
//   product_index(&self, i, j) / inverse_index(&self, i)                     - table lookups

pub use symmetry_point_groups::{
    factor_group,              // fn(structure: &Structure, tol: f64) -> Result<SymGroup> - operations mapping the basis onto itself
    generate_cubic_operations, // fn() -> Vec<SymOp> - the 48 operations of Oh in a cubic basis
    lattice_point_group,       // fn(lattice: &Lattice) -> Result<SymGroup> - metric preserving operations
};

// ======================== GROUP ACTION ON STRUCTURES ========================
pub use group_action::{
    ClusterSymmetry, // struct - stabilizing operation with its site permutation
    GroupAction,     // struct - group bound to a structure (sublattice maps, cartesian rotations)
    SiteAction,      // struct - one operation acting on basis sites
};
