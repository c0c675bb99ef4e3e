use log::{debug, warn};
use nalgebra::{Matrix3, Vector3};

use super::symmetry_group::SymGroup;
use super::symmetry_operations::SymOp;
use crate::lattice::Lattice;
use crate::structure::Structure;
use crate::Result;

/// Point group of a lattice: all integer matrices with entries in {-1, 0, 1}
/// that preserve the metric tensor (R^T G R = G).
///
/// Entries in {-1, 0, 1} cover every operation for reduced cells. The
/// identity is listed first; the remaining operations follow enumeration order.
pub fn lattice_point_group(lattice: &Lattice) -> Result<SymGroup> {
    let metric = lattice.metric_tensor();
    let scale = metric.amax().max(1.0);
    let tol = lattice.tolerance();

    let mut ops = vec![SymOp::identity()];
    let mut entries = [-1i32; 9];
    loop {
        let rotation = Matrix3::from_row_slice(&entries);
        if rotation != Matrix3::identity() {
            let r = rotation.map(f64::from);
            let transformed = r.transpose() * metric * r;
            if (transformed - metric).amax() < tol * scale {
                ops.push(SymOp::point(rotation));
            }
        }
        if !next_entries(&mut entries) {
            break;
        }
    }

    debug!("lattice point group has {} operations", ops.len());
    SymGroup::new(ops, lattice, tol)
}

// Odometer over {-1, 0, 1}^9
fn next_entries(entries: &mut [i32; 9]) -> bool {
    for e in entries.iter_mut().rev() {
        if *e < 1 {
            *e += 1;
            return true;
        }
        *e = -1;
    }
    false
}

/// Factor group of a structure: lattice point operations combined with the
/// translations that map every basis site onto a basis site with the same DoF.
///
/// Translations are reduced into the unit cell; the result closes modulo
/// lattice translations when any of them is fractional.
pub fn factor_group(structure: &Structure, tol: f64) -> Result<SymGroup> {
    let lattice = structure.lattice();
    let point_group = lattice_point_group(lattice)?;
    let basis = structure.basis();
    let reference = &basis[0];

    let mut ops: Vec<SymOp> = Vec::new();
    for point_op in point_group.iter() {
        let rotated_reference = point_op.apply(&reference.position);
        for target in basis.iter().filter(|b| b.dof == reference.dof) {
            let op = SymOp::new(point_op.rotation, target.position - rotated_reference)
                .within_cell(lattice, tol);
            if ops.iter().any(|o| o.approx_eq(&op, lattice, tol)) {
                continue;
            }
            let maps_basis = basis.iter().all(|site| {
                structure
                    .find_site(&op.apply(&site.position), tol)
                    .is_some_and(|(b, _)| basis[b].dof == site.dof)
            });
            if maps_basis {
                ops.push(op);
            }
        }
    }

    if ops.len() < point_group.len() {
        debug!(
            "factor group has {} operations (lattice point group {})",
            ops.len(),
            point_group.len()
        );
    }
    if ops.len() > point_group.len() {
        warn!("factor group larger than the lattice point group; the cell is not primitive");
    }
    SymGroup::new(ops, lattice, tol)
}

/// The 48 operations of the full cubic point group (Oh) as signed permutation
/// matrices, valid in any basis aligned with cubic axes.
pub fn generate_cubic_operations() -> Vec<SymOp> {
    const PERMUTATIONS: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];

    let mut ops = Vec::with_capacity(48);
    for perm in PERMUTATIONS {
        for signs in 0..8 {
            let mut rotation = Matrix3::zeros();
            for (row, &col) in perm.iter().enumerate() {
                rotation[(row, col)] = if signs & (1 << row) == 0 { 1 } else { -1 };
            }
            ops.push(SymOp::new(rotation, Vector3::zeros()));
        }
    }
    ops
}
