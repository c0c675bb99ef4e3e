use log::debug;
use serde::{Deserialize, Serialize};

use super::symmetry_operations::SymOp;
use crate::error::ClusterError;
use crate::interfaces::Closure;
use crate::lattice::Lattice;
use crate::Result;

/// Guard against runaway closure when generators do not form a finite group.
const MAX_GROUP_ORDER: usize = 192;

/// An ordered, closed set of symmetry operations.
///
/// The group either composes literally (point groups, cluster groups) or only
/// modulo lattice translations (factor groups with fractional translations).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymGroup {
    ops: Vec<SymOp>,
    closure: Closure,
    identity: usize,
    /// `table[i][j]` is the index of `ops[i] ∘ ops[j]`.
    table: Vec<Vec<usize>>,
    inverses: Vec<usize>,
    tol: f64,
}

impl SymGroup {
    /// Validate and index an ordered list of operations.
    pub fn new(ops: Vec<SymOp>, lattice: &Lattice, tol: f64) -> Result<Self> {
        if !(tol > 0.0 && tol.is_finite()) {
            return Err(ClusterError::InvalidTolerance(tol));
        }
        if ops.is_empty() {
            return Err(ClusterError::EmptySymmetryGroup);
        }
        let identity = ops
            .iter()
            .position(|op| op.is_identity(lattice, tol))
            .ok_or(ClusterError::MissingIdentity)?;

        let mut closure = Closure::Literal;
        let mut table = vec![vec![0; ops.len()]; ops.len()];
        for (i, a) in ops.iter().enumerate() {
            for (j, b) in ops.iter().enumerate() {
                let product = a.compose(b);
                let index = match ops.iter().position(|op| op.approx_eq(&product, lattice, tol)) {
                    Some(k) => k,
                    None => {
                        closure = Closure::ModuloLattice;
                        ops.iter()
                            .position(|op| op.eq_modulo_lattice(&product, lattice, tol))
                            .ok_or(ClusterError::GroupNotClosed { left: i, right: j })?
                    }
                };
                table[i][j] = index;
            }
        }

        let mut inverses = Vec::with_capacity(ops.len());
        for (i, row) in table.iter().enumerate() {
            let inverse = row
                .iter()
                .position(|&k| k == identity)
                .ok_or(ClusterError::GroupNotClosed { left: i, right: i })?;
            inverses.push(inverse);
        }

        debug!(
            "symmetry group of order {} ({:?} closure)",
            ops.len(),
            closure
        );

        Ok(SymGroup {
            ops,
            closure,
            identity,
            table,
            inverses,
            tol,
        })
    }

    /// Group containing only the identity.
    pub fn identity_group(lattice: &Lattice, tol: f64) -> Result<Self> {
        Self::new(vec![SymOp::identity()], lattice, tol)
    }

    /// Close a set of generators under composition. Translations are kept
    /// inside the unit cell, so factor groups close as well.
    pub fn from_generators(generators: &[SymOp], lattice: &Lattice, tol: f64) -> Result<Self> {
        let mut ops = vec![SymOp::identity()];
        for generator in generators {
            let op = generator.within_cell(lattice, tol);
            if !ops.iter().any(|o| o.approx_eq(&op, lattice, tol)) {
                ops.push(op);
            }
        }

        let mut start = 0;
        while start < ops.len() {
            let end = ops.len();
            for i in 0..end {
                for j in 0..end {
                    if i < start && j < start {
                        continue;
                    }
                    let product = ops[i].compose(&ops[j]).within_cell(lattice, tol);
                    if !ops.iter().any(|o| o.approx_eq(&product, lattice, tol)) {
                        ops.push(product);
                        if ops.len() > MAX_GROUP_ORDER {
                            return Err(ClusterError::GroupNotClosed { left: i, right: j });
                        }
                    }
                }
            }
            start = end;
        }

        Self::new(ops, lattice, tol)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[SymOp] {
        &self.ops
    }

    pub fn op(&self, index: usize) -> &SymOp {
        &self.ops[index]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SymOp> {
        self.ops.iter()
    }

    pub fn closure(&self) -> Closure {
        self.closure
    }

    pub fn identity_index(&self) -> usize {
        self.identity
    }

    pub fn inverse_index(&self, index: usize) -> usize {
        self.inverses[index]
    }

    pub fn product_index(&self, left: usize, right: usize) -> usize {
        self.table[left][right]
    }

    pub fn tolerance(&self) -> f64 {
        self.tol
    }
}
