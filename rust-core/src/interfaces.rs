// Definitions that are used throughout all modules

use serde::{Deserialize, Serialize};

// How two clusters are compared when deciding whether they are "the same"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Periodicity {
    /// Positions must match literally.
    Local,
    /// Positions must match after some lattice translation.
    Periodic,
}

// How a symmetry group composes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Closure {
    /// Products of operations are operations of the group, translations included.
    Literal,
    /// Products are operations of the group up to a lattice translation (factor groups).
    ModuloLattice,
}

impl Closure {
    /// Cluster comparison that is consistent with the group action.
    pub fn periodicity(self) -> Periodicity {
        match self {
            Closure::Literal => Periodicity::Local,
            Closure::ModuloLattice => Periodicity::Periodic,
        }
    }
}
