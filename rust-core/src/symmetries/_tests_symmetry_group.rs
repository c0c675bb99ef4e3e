#[cfg(test)]
mod _tests_symmetry_group {
    use super::super::*;
    use crate::error::ClusterError;
    use crate::interfaces::Closure;
    use crate::lattice::*;
    use crate::structure::{BasisSite, SiteDoF, Structure};
    use approx::assert_abs_diff_eq;
    use nalgebra::{Matrix3, Vector3};

    const TOL: f64 = 1e-5;

    fn hcp() -> Structure {
        let lattice = hexagonal_lattice(1.0, 1.633).unwrap();
        let dof = SiteDoF::occupation(&["A", "B"]);
        Structure::new(
            lattice,
            vec![
                BasisSite::new("A", Vector3::new(1.0 / 3.0, 2.0 / 3.0, 0.25), dof.clone()),
                BasisSite::new("A", Vector3::new(2.0 / 3.0, 1.0 / 3.0, 0.75), dof),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_lattice_point_group_orders() {
        let cases = [
            (simple_cubic_lattice(1.0).unwrap(), 48),
            (face_centered_cubic_lattice(3.6).unwrap(), 48),
            (body_centered_cubic_lattice(2.9).unwrap(), 48),
            (hexagonal_lattice(1.0, 1.633).unwrap(), 24),
            (tetragonal_lattice(1.0, 1.4).unwrap(), 16),
            (orthorhombic_lattice(1.0, 1.3, 1.7).unwrap(), 8),
        ];
        for (lattice, order) in cases {
            let group = lattice_point_group(&lattice).unwrap();
            assert_eq!(group.len(), order);
            assert_eq!(group.closure(), Closure::Literal);
            assert_eq!(group.identity_index(), 0);
        }
    }

    #[test]
    fn test_cubic_operations_form_a_group() {
        let lattice = simple_cubic_lattice(1.0).unwrap();
        let group = SymGroup::new(generate_cubic_operations(), &lattice, TOL).unwrap();
        assert_eq!(group.len(), 48);
        assert_eq!(group.identity_index(), 0);
        for i in 0..group.len() {
            let inverse = group.inverse_index(i);
            assert_eq!(group.product_index(i, inverse), group.identity_index());
            assert_eq!(group.product_index(inverse, i), group.identity_index());
        }
        let proper = group.iter().filter(|op| op.is_proper()).count();
        assert_eq!(proper, 24);
    }

    #[test]
    fn test_from_generators() {
        let lattice = simple_cubic_lattice(1.0).unwrap();
        let four_fold = SymOp::point(Matrix3::new(
            0, -1, 0,
            1, 0, 0,
            0, 0, 1,
        ));
        let mirror = SymOp::point(Matrix3::new(
            1, 0, 0,
            0, -1, 0,
            0, 0, 1,
        ));
        let group = SymGroup::from_generators(&[four_fold.clone(), mirror], &lattice, TOL).unwrap();
        assert_eq!(group.len(), 8);
        assert_eq!(four_fold.order(&lattice, TOL), 4);
    }

    #[test]
    fn test_screw_axis_closes_modulo_lattice() {
        let lattice = simple_cubic_lattice(1.0).unwrap();
        let screw = SymOp::new(
            Matrix3::new(
                -1, 0, 0,
                0, -1, 0,
                0, 0, 1,
            ),
            Vector3::new(0.0, 0.0, 0.5),
        );
        let group = SymGroup::from_generators(&[screw.clone()], &lattice, TOL).unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(group.closure(), Closure::ModuloLattice);
        assert_eq!(screw.order(&lattice, TOL), 2);
    }

    #[test]
    fn test_inverse_and_compose() {
        let lattice = hexagonal_lattice(1.0, 1.6).unwrap();
        let op = SymOp::new(
            Matrix3::new(
                1, -1, 0,
                1, 0, 0,
                0, 0, 1,
            ),
            Vector3::new(0.0, 0.0, 0.5),
        );
        let product = op.compose(&op.inverse());
        assert!(product.is_identity(&lattice, 1e-12));
        assert_eq!(op.determinant(), 1);

        let point = Vector3::new(0.1, 0.7, 0.3);
        let back = op.inverse().apply(&op.apply(&point));
        assert_abs_diff_eq!((back - point).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cart_rotation_is_orthogonal() {
        let lattice = hexagonal_lattice(1.0, 1.6).unwrap();
        let group = lattice_point_group(&lattice).unwrap();
        for op in group.iter() {
            let r = op.cart_rotation(&lattice);
            let should_be_identity = r.transpose() * r;
            assert_abs_diff_eq!((should_be_identity - Matrix3::identity()).norm(), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_group_errors() {
        let lattice = simple_cubic_lattice(1.0).unwrap();
        assert_eq!(
            SymGroup::new(vec![], &lattice, TOL),
            Err(ClusterError::EmptySymmetryGroup)
        );

        let mirror = SymOp::point(Matrix3::new(
            -1, 0, 0,
            0, 1, 0,
            0, 0, 1,
        ));
        assert_eq!(
            SymGroup::new(vec![mirror.clone()], &lattice, TOL),
            Err(ClusterError::MissingIdentity)
        );

        let four_fold = SymOp::point(Matrix3::new(
            0, -1, 0,
            1, 0, 0,
            0, 0, 1,
        ));
        match SymGroup::new(vec![SymOp::identity(), four_fold], &lattice, TOL) {
            Err(ClusterError::GroupNotClosed { .. }) => {}
            other => panic!("expected closure failure, got {:?}", other),
        }
    }

    #[test]
    fn test_factor_group_hcp() {
        let structure = hcp();
        let group = factor_group(&structure, TOL).unwrap();
        assert_eq!(group.len(), 24);
        assert_eq!(group.closure(), Closure::ModuloLattice);

        let action = GroupAction::new(&group, &structure, TOL).unwrap();
        assert_eq!(action.len(), 24);
        // Some operations exchange the two sublattices
        assert!(action.actions().iter().any(|a| a.map_sublattice(0) == Ok(1)));
    }

    #[test]
    fn test_group_action_rejects_non_symmetry() {
        let lattice = simple_cubic_lattice(1.0).unwrap();
        let structure = Structure::new(
            lattice.clone(),
            vec![
                BasisSite::new("A", Vector3::zeros(), SiteDoF::occupation(&["A", "B"])),
                BasisSite::new("C", Vector3::new(0.5, 0.0, 0.0), SiteDoF::occupation(&["C", "D"])),
            ],
        )
        .unwrap();
        let group = lattice_point_group(&lattice).unwrap();
        match GroupAction::new(&group, &structure, TOL) {
            Err(ClusterError::SymmetryMismatch { site: 1, .. }) => {}
            other => panic!("expected symmetry mismatch, got {:?}", other.map(|a| a.len())),
        }
        // The factor group of the same structure only keeps compatible operations
        let factor = factor_group(&structure, TOL).unwrap();
        assert_eq!(factor.len(), 16);
        assert!(GroupAction::new(&factor, &structure, TOL).is_ok());
    }
}
