//! Lattice module: periodic repeat units, coordinate conversion and periodic images.
//!
//! Quick reference
//! - Types: [`Lattice`]
//! - Construction: [`simple_cubic_lattice`], [`body_centered_cubic_lattice`], [`face_centered_cubic_lattice`],
//!   [`hexagonal_lattice`], [`tetragonal_lattice`], [`orthorhombic_lattice`], [`scale_lattice`]

// ======================== MODULE DECLARATIONS ========================
pub mod lattice3d;
pub mod lattice_construction;


// ======================== 3D LATTICE STRUCTURE ========================
pub use lattice3d::Lattice; // struct - 3D lattice with fractional <-> cartesian conversion
// Lattice impl methods:
//   new(direct: Matrix3<f64>, tol: f64) -> Result<Self>            - constructs lattice, rejects degenerate bases
//   from_vectors(a, b, c, tol) -> Result<Self>                      - constructs lattice from three vectors
//   frac_to_cart(&self, v_frac: &Vector3<f64>) -> Vector3<f64>      - converts fractional to cartesian coordinates
//   cart_to_frac(&self, v_cart: &Vector3<f64>) -> Vector3<f64>      - converts cartesian to fractional coordinates
//   lattice_translation(&self, frac, tol) -> Option<Vector3<i32>>   - integer translation if frac is one
//   image_extent(&self, radius: f64) -> [i32; 3]                    - cells per axis needed to cover a sphere
//   lattice_points_by_shell(&self, shells: usize) -> Vec<Vector3<i32>> - all cells of a cube of shells
//   lattice_points_within_radius(&self, radius: f64) -> Vec<Vector3<i32>> - cells within a cartesian radius
//   supercell(&self, transformation: &Matrix3<i32>) -> Result<Lattice> - supercell lattice

// ======================== LATTICE CONSTRUCTION UTILITIES ========================
pub use lattice_construction::{
    body_centered_cubic_lattice, // fn(a: f64) -> Result<Lattice> - primitive bcc lattice
    face_centered_cubic_lattice, // fn(a: f64) -> Result<Lattice> - primitive fcc lattice
    hexagonal_lattice,           // fn(a: f64, c: f64) -> Result<Lattice> - hexagonal lattice
    orthorhombic_lattice,        // fn(a: f64, b: f64, c: f64) -> Result<Lattice> - orthorhombic lattice
    scale_lattice,               // fn(lattice: &Lattice, scale: f64) -> Result<Lattice> - uniform scaling
    simple_cubic_lattice,        // fn(a: f64) -> Result<Lattice> - simple cubic lattice
    tetragonal_lattice,          // fn(a: f64, c: f64) -> Result<Lattice> - tetragonal lattice
};
