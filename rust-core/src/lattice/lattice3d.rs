use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::config::BASE_VECTOR_TOLERANCE;
use crate::error::ClusterError;
use crate::Result;

/// A 3D periodic lattice.
///
/// The direct basis stores the lattice vectors as columns, so a fractional
/// coordinate `f` maps to `direct * f` in Cartesian space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LatticeData", into = "LatticeData")]
pub struct Lattice {
    /// Real-space basis vectors (columns).
    direct: Matrix3<f64>,
    /// Inverse of `direct`, maps Cartesian to fractional.
    inverse: Matrix3<f64>,
    /// Metric tensor G = A^T * A.
    metric: Matrix3<f64>,
    /// Unit cell volume = det(direct).
    cell_volume: f64,
    /// Tolerance for float comparisons on lattice quantities.
    tol: f64,
}

/// Serialized form: the three lattice vectors and the tolerance.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LatticeData {
    vectors: [[f64; 3]; 3],
    tol: f64,
}

impl TryFrom<LatticeData> for Lattice {
    type Error = ClusterError;

    fn try_from(data: LatticeData) -> Result<Self> {
        let [a, b, c] = data.vectors;
        Lattice::from_vectors(a.into(), b.into(), c.into(), data.tol)
    }
}

impl From<Lattice> for LatticeData {
    fn from(lattice: Lattice) -> Self {
        let column = |i: usize| -> [f64; 3] {
            let v = lattice.direct.column(i);
            [v[0], v[1], v[2]]
        };
        LatticeData {
            vectors: [column(0), column(1), column(2)],
            tol: lattice.tol,
        }
    }
}

impl Lattice {
    /// Construct a lattice from a basis matrix whose columns are the lattice vectors.
    pub fn new(direct: Matrix3<f64>, tol: f64) -> Result<Self> {
        if !(tol > 0.0 && tol.is_finite()) {
            return Err(ClusterError::InvalidTolerance(tol));
        }

        let cell_volume = direct.determinant();
        if !cell_volume.is_finite() || cell_volume.abs() < BASE_VECTOR_TOLERANCE {
            return Err(ClusterError::DegenerateLattice {
                determinant: cell_volume,
            });
        }

        let inverse = direct
            .try_inverse()
            .ok_or(ClusterError::DegenerateLattice {
                determinant: cell_volume,
            })?;
        let metric = direct.transpose() * direct;

        Ok(Lattice {
            direct,
            inverse,
            metric,
            cell_volume,
            tol,
        })
    }

    pub fn from_vectors(
        a: Vector3<f64>,
        b: Vector3<f64>,
        c: Vector3<f64>,
        tol: f64,
    ) -> Result<Self> {
        Self::new(Matrix3::from_columns(&[a, b, c]), tol)
    }

    /// Convert fractional (u,v,w) coords → cartesian.
    pub fn frac_to_cart(&self, v_frac: &Vector3<f64>) -> Vector3<f64> {
        self.direct * v_frac
    }

    /// Convert cartesian coords → fractional (u,v,w).
    pub fn cart_to_frac(&self, v_cart: &Vector3<f64>) -> Vector3<f64> {
        self.inverse * v_cart
    }

    /// Get lattice parameters: a, b, c (lengths)
    pub fn lattice_parameters(&self) -> (f64, f64, f64) {
        let a = self.metric[(0, 0)].sqrt();
        let b = self.metric[(1, 1)].sqrt();
        let c = self.metric[(2, 2)].sqrt();
        (a, b, c)
    }

    /// Get lattice angles: α, β, γ (in radians)
    pub fn lattice_angles(&self) -> (f64, f64, f64) {
        let (a, b, c) = self.lattice_parameters();
        let alpha = (self.metric[(1, 2)] / (b * c)).acos();
        let beta = (self.metric[(0, 2)] / (a * c)).acos();
        let gamma = (self.metric[(0, 1)] / (a * b)).acos();
        (alpha, beta, gamma)
    }

    pub fn primitive_vectors(&self) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
        (
            self.direct.column(0).into(),
            self.direct.column(1).into(),
            self.direct.column(2).into(),
        )
    }

    pub fn cell_volume(&self) -> f64 {
        self.cell_volume
    }

    pub fn metric_tensor(&self) -> &Matrix3<f64> {
        &self.metric
    }

    pub fn tolerance(&self) -> f64 {
        self.tol
    }

    pub fn direct_basis(&self) -> &Matrix3<f64> {
        &self.direct
    }

    pub fn inverse_basis(&self) -> &Matrix3<f64> {
        &self.inverse
    }

    /// If `frac` is a lattice translation (integer within `tol`, measured in
    /// Cartesian length), return the integer translation.
    pub fn lattice_translation(&self, frac: &Vector3<f64>, tol: f64) -> Option<Vector3<i32>> {
        let rounded = frac.map(f64::round);
        let residual = self.frac_to_cart(&(frac - rounded));
        if residual.norm() < tol {
            Some(rounded.map(|x| x as i32))
        } else {
            None
        }
    }

    /// Number of cells along each axis needed to cover a sphere of `radius`.
    ///
    /// A point at Cartesian distance `r` from the origin has fractional
    /// component `i` bounded by `r * |row_i(A^-1)|`.
    pub fn image_extent(&self, radius: f64) -> [i32; 3] {
        let mut extent = [0; 3];
        for (i, e) in extent.iter_mut().enumerate() {
            let row_norm = self.inverse.row(i).norm();
            *e = (radius.max(0.0) * row_norm + self.tol).ceil() as i32;
        }
        extent
    }

    /// All cell translations with |n_i| <= shells, in lexicographic order.
    pub fn lattice_points_by_shell(&self, shells: usize) -> Vec<Vector3<i32>> {
        let s = shells as i32;
        let mut points = Vec::with_capacity((2 * shells + 1).pow(3));
        for i in -s..=s {
            for j in -s..=s {
                for k in -s..=s {
                    points.push(Vector3::new(i, j, k));
                }
            }
        }
        points
    }

    /// Lattice translations whose Cartesian length is at most `radius`,
    /// ordered by length, then lexicographically.
    pub fn lattice_points_within_radius(&self, radius: f64) -> Vec<Vector3<i32>> {
        if radius < 0.0 {
            return Vec::new();
        }

        let [ei, ej, ek] = self.image_extent(radius);
        let mut points: Vec<(f64, Vector3<i32>)> = Vec::new();
        for i in -ei..=ei {
            for j in -ej..=ej {
                for k in -ek..=ek {
                    let n = Vector3::new(i, j, k);
                    let length = self.frac_to_cart(&n.map(f64::from)).norm();
                    if length <= radius + self.tol {
                        points.push((length, n));
                    }
                }
            }
        }

        let tol = self.tol;
        points.sort_by(|(la, na), (lb, nb)| {
            if (la - lb).abs() < tol {
                (na.x, na.y, na.z).cmp(&(nb.x, nb.y, nb.z))
            } else {
                la.total_cmp(lb)
            }
        });
        points.into_iter().map(|(_, n)| n).collect()
    }

    /// Shortest non-zero lattice translation length.
    pub fn shortest_translation(&self) -> f64 {
        let (a, b, c) = self.lattice_parameters();
        let guess = a.min(b).min(c);
        self.lattice_points_within_radius(guess)
            .into_iter()
            .filter(|n| *n != Vector3::zeros())
            .map(|n| self.frac_to_cart(&n.map(f64::from)).norm())
            .fold(guess, f64::min)
    }

    /// Supercell lattice with vectors `direct * transformation`.
    pub fn supercell(&self, transformation: &Matrix3<i32>) -> Result<Lattice> {
        let t = transformation.map(f64::from);
        if t.determinant().abs() < 0.5 {
            return Err(ClusterError::InvalidSupercell);
        }
        Lattice::new(self.direct * t, self.tol)
    }
}
