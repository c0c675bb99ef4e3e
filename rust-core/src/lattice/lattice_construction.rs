use nalgebra::Matrix3;

use super::lattice3d::Lattice;
use crate::config::LATTICE_TOLERANCE;
use crate::Result;

/// Simple cubic lattice with lattice parameter `a`.
pub fn simple_cubic_lattice(a: f64) -> Result<Lattice> {
    let direct = Matrix3::new(
        a, 0.0, 0.0,
        0.0, a, 0.0,
        0.0, 0.0, a,
    );
    Lattice::new(direct, LATTICE_TOLERANCE)
}

/// Primitive body-centered cubic lattice of conventional parameter `a`.
pub fn body_centered_cubic_lattice(a: f64) -> Result<Lattice> {
    let h = a / 2.0;
    let direct = Matrix3::new(
        -h, h, h,
        h, -h, h,
        h, h, -h,
    );
    Lattice::new(direct, LATTICE_TOLERANCE)
}

/// Primitive face-centered cubic lattice of conventional parameter `a`.
pub fn face_centered_cubic_lattice(a: f64) -> Result<Lattice> {
    let h = a / 2.0;
    let direct = Matrix3::new(
        0.0, h, h,
        h, 0.0, h,
        h, h, 0.0,
    );
    Lattice::new(direct, LATTICE_TOLERANCE)
}

/// Hexagonal lattice, γ = 120° between a1 and a2.
pub fn hexagonal_lattice(a: f64, c: f64) -> Result<Lattice> {
    let direct = Matrix3::new(
        a, -a / 2.0, 0.0,
        0.0, a * 3.0_f64.sqrt() / 2.0, 0.0,
        0.0, 0.0, c,
    );
    Lattice::new(direct, LATTICE_TOLERANCE)
}

pub fn tetragonal_lattice(a: f64, c: f64) -> Result<Lattice> {
    orthorhombic_lattice(a, a, c)
}

pub fn orthorhombic_lattice(a: f64, b: f64, c: f64) -> Result<Lattice> {
    let direct = Matrix3::new(
        a, 0.0, 0.0,
        0.0, b, 0.0,
        0.0, 0.0, c,
    );
    Lattice::new(direct, LATTICE_TOLERANCE)
}

/// Scale all lattice vectors by `scale`.
pub fn scale_lattice(lattice: &Lattice, scale: f64) -> Result<Lattice> {
    Lattice::new(lattice.direct_basis() * scale, lattice.tolerance())
}
