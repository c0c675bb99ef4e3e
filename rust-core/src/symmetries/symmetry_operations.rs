use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::lattice::Lattice;

/// Highest order a crystallographic operation can have before it repeats.
const MAX_OPERATION_ORDER: usize = 12;

/// A single symmetry operation in fractional coordinates: integer rotation + translation.
///
/// Acts on a fractional coordinate as `x -> rotation * x + translation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymOp {
    /// Rotation in the lattice basis, determinant ±1
    pub rotation: Matrix3<i32>,
    /// Fractional translation shift
    pub translation: Vector3<f64>,
}

impl SymOp {
    pub fn new(rotation: Matrix3<i32>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self {
            rotation: Matrix3::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// Pure rotation (no translation).
    pub fn point(rotation: Matrix3<i32>) -> Self {
        Self::new(rotation, Vector3::zeros())
    }

    /// Apply symmetry operation to a fractional point
    pub fn apply(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.rotation_f64() * point + self.translation
    }

    pub fn rotation_f64(&self) -> Matrix3<f64> {
        self.rotation.map(f64::from)
    }

    /// Rotation expressed in Cartesian coordinates: A R A^-1.
    pub fn cart_rotation(&self, lattice: &Lattice) -> Matrix3<f64> {
        lattice.direct_basis() * self.rotation_f64() * lattice.inverse_basis()
    }

    /// `self ∘ other`: apply `other` first, then `self`.
    pub fn compose(&self, other: &SymOp) -> SymOp {
        SymOp {
            rotation: self.rotation * other.rotation,
            translation: self.rotation_f64() * other.translation + self.translation,
        }
    }

    /// Inverse operation. The rotation is unimodular, so its inverse is an integer matrix.
    pub fn inverse(&self) -> SymOp {
        let rotation = integer_inverse(&self.rotation);
        let translation = -(rotation.map(f64::from) * self.translation);
        SymOp {
            rotation,
            translation,
        }
    }

    pub fn determinant(&self) -> i32 {
        integer_determinant(&self.rotation)
    }

    /// Proper rotations have determinant +1.
    pub fn is_proper(&self) -> bool {
        self.determinant() == 1
    }

    /// Same operation within `tol` (translation difference measured in Cartesian length).
    pub fn approx_eq(&self, other: &SymOp, lattice: &Lattice, tol: f64) -> bool {
        self.rotation == other.rotation
            && lattice
                .frac_to_cart(&(self.translation - other.translation))
                .norm()
                < tol
    }

    /// Same operation up to a lattice translation.
    pub fn eq_modulo_lattice(&self, other: &SymOp, lattice: &Lattice, tol: f64) -> bool {
        self.rotation == other.rotation
            && lattice
                .lattice_translation(&(self.translation - other.translation), tol)
                .is_some()
    }

    /// Check if this is the identity operation
    pub fn is_identity(&self, lattice: &Lattice, tol: f64) -> bool {
        self.approx_eq(&SymOp::identity(), lattice, tol)
    }

    /// Same operation with its translation reduced into [0, 1).
    pub fn within_cell(&self, lattice: &Lattice, tol: f64) -> SymOp {
        let mut translation = self.translation.map(|t| t - t.floor());
        for i in 0..3 {
            let mut shifted = Vector3::zeros();
            shifted[i] = translation[i] - 1.0;
            if lattice.frac_to_cart(&shifted).norm() < tol {
                translation[i] = 0.0;
            }
        }
        SymOp::new(self.rotation, translation)
    }

    /// Number of applications needed to return to the identity, up to lattice translations.
    pub fn order(&self, lattice: &Lattice, tol: f64) -> usize {
        let identity = SymOp::identity();
        let mut power = self.clone();
        for n in 1..=MAX_OPERATION_ORDER {
            if power.eq_modulo_lattice(&identity, lattice, tol) {
                return n;
            }
            power = self.compose(&power);
        }
        MAX_OPERATION_ORDER
    }
}

fn integer_determinant(m: &Matrix3<i32>) -> i32 {
    m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
        - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
        + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])
}

/// Inverse of a unimodular integer matrix via its adjugate.
fn integer_inverse(m: &Matrix3<i32>) -> Matrix3<i32> {
    let det = integer_determinant(m);
    let cofactor = |r0: usize, r1: usize, c0: usize, c1: usize| {
        m[(r0, c0)] * m[(r1, c1)] - m[(r0, c1)] * m[(r1, c0)]
    };
    // adj(M)[i][j] = cofactor C[j][i]
    let adjugate = Matrix3::new(
        cofactor(1, 2, 1, 2),
        -cofactor(0, 2, 1, 2),
        cofactor(0, 1, 1, 2),
        -cofactor(1, 2, 0, 2),
        cofactor(0, 2, 0, 2),
        -cofactor(0, 1, 0, 2),
        cofactor(1, 2, 0, 1),
        -cofactor(0, 2, 0, 1),
        cofactor(0, 1, 0, 1),
    );
    adjugate * det
}
