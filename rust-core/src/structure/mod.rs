// Structure module: the primitive crystal (lattice + basis sites) and per-site degrees of freedom

// ======================== MODULE DECLARATIONS ========================
pub mod prim;
pub mod site_dof;

// Test modules
mod _tests_structure;

pub use prim::{BasisSite, Structure};
pub use site_dof::SiteDoF;
