#[cfg(test)]
mod _tests_basis_set {
    use super::super::*;
    use crate::clusterography::{Cluster, Orbitree};
    use crate::config::ClusterSpecs;
    use crate::interfaces::Periodicity;
    use crate::lattice::simple_cubic_lattice;
    use crate::structure::{BasisSite, SiteDoF, Structure};
    use crate::symmetries::{lattice_point_group, GroupAction};
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;

    const TOL: f64 = 1e-5;

    fn simple_cubic(dof: SiteDoF) -> Structure {
        Structure::new(
            simple_cubic_lattice(1.0).unwrap(),
            vec![BasisSite::new("A", Vector3::zeros(), dof)],
        )
        .unwrap()
    }

    fn cubic_action(structure: &Structure) -> GroupAction {
        let group = lattice_point_group(structure.lattice()).unwrap();
        GroupAction::new(&group, structure, TOL).unwrap()
    }

    fn nn_pair(structure: &Structure) -> Cluster {
        Cluster::from_cells(structure, &[(0, Vector3::zeros()), (0, Vector3::new(1, 0, 0))])
    }

    fn point(structure: &Structure) -> Cluster {
        Cluster::from_cells(structure, &[(0, Vector3::zeros())])
    }

    fn basis(structure: &Structure, cluster: &Cluster, periodicity: Periodicity, order: usize) -> BasisSet {
        let action = cubic_action(structure);
        let symmetries = action.stabilizer(cluster, periodicity, TOL).unwrap();
        BasisSet::construct(cluster, structure, &symmetries, order).unwrap()
    }

    #[test]
    fn test_occupation_site_functions() {
        let binary = occupation_site_functions(2);
        assert_eq!(binary.nrows(), 1);
        assert_abs_diff_eq!(binary[(0, 0)], -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(binary[(0, 1)], 1.0, epsilon = 1e-12);

        for m in 3..=5 {
            let phi = occupation_site_functions(m);
            assert_eq!(phi.nrows(), m - 1);
            for k in 0..m - 1 {
                assert_abs_diff_eq!(phi.row(k).sum(), 0.0, epsilon = 1e-10);
                for l in 0..m - 1 {
                    let overlap = phi.row(k).dot(&phi.row(l)) / m as f64;
                    let expected = if k == l { 1.0 } else { 0.0 };
                    assert_abs_diff_eq!(overlap, expected, epsilon = 1e-10);
                }
            }
        }
        assert_eq!(occupation_site_functions(1).nrows(), 0);
    }

    #[test]
    fn test_polynomial_substitution() {
        // (x0 + x1)^2 with x0 -> x0 + x1, x1 -> x1
        let p = Polynomial::monomial(vec![2, 0]);
        let map: LinearMap = vec![vec![(0, 1.0), (1, 1.0)], vec![(1, 1.0)]];
        let expanded = p.substitute(&map, 0.0);
        assert_eq!(expanded.terms().len(), 3);
        assert_abs_diff_eq!(expanded.evaluate(&[2.0, 3.0]), 25.0, epsilon = 1e-12);
        assert_eq!(expanded.degree(), 2);

        let q = Polynomial::from_terms(2, vec![(vec![1, 1], 2.0), (vec![2, 0], 1.0)], 0.0);
        assert_abs_diff_eq!(expanded.dot(&q), 5.0, epsilon = 1e-12);
        assert!(expanded.add_scaled(&expanded, -1.0, 1e-12).is_zero());
    }

    #[test]
    fn test_stabilizer_orders() {
        let structure = simple_cubic(SiteDoF::occupation(&["A", "B"]));
        let action = cubic_action(&structure);
        let pair = nn_pair(&structure);
        assert_eq!(action.stabilizer(&pair, Periodicity::Periodic, TOL).unwrap().len(), 16);
        assert_eq!(action.stabilizer(&pair, Periodicity::Local, TOL).unwrap().len(), 8);
        assert_eq!(action.stabilizer(&point(&structure), Periodicity::Local, TOL).unwrap().len(), 48);
    }

    #[test]
    fn test_binary_pair_has_one_function() {
        let structure = simple_cubic(SiteDoF::occupation(&["A", "B"]));
        let pair = nn_pair(&structure);
        let basis = basis(&structure, &pair, Periodicity::Periodic, 2);
        assert_eq!(basis.len(), 1);
        assert_eq!(basis.variables().len(), 2);

        let correlations = basis.correlations(&[0, 1]).unwrap();
        assert_abs_diff_eq!(correlations[0], -1.0, epsilon = 1e-12);
        let correlations = basis.correlations(&[1, 1]).unwrap();
        assert_abs_diff_eq!(correlations[0], 1.0, epsilon = 1e-12);
        assert!(basis.correlations(&[0]).is_err());
        assert!(basis.correlations(&[0, 2]).is_err());
    }

    #[test]
    fn test_ternary_pair_functions() {
        let structure = simple_cubic(SiteDoF::occupation(&["A", "B", "C"]));
        let pair = nn_pair(&structure);

        // The pair can be reversed up to a translation: phi1*phi2 and phi2*phi1 merge
        let periodic = basis(&structure, &pair, Periodicity::Periodic, 2);
        assert_eq!(periodic.len(), 3);
        let first = periodic.function(0).unwrap().polynomial();
        assert_eq!(first.terms().len(), 1);
        assert_eq!(first.terms()[0].exponents, vec![1, 0, 1, 0]);
        let mixed = periodic.function(1).unwrap().polynomial();
        assert_eq!(mixed.terms().len(), 2);

        let local = basis(&structure, &pair, Periodicity::Local, 2);
        assert_eq!(local.len(), 4);
    }

    #[test]
    fn test_ternary_point_functions() {
        let structure = simple_cubic(SiteDoF::occupation(&["A", "B", "C"]));
        let basis = basis(&structure, &point(&structure), Periodicity::Local, 1);
        assert_eq!(basis.len(), 2);
        assert!(basis.functions().iter().all(|f| f.degree() == 1));
    }

    #[test]
    fn test_displacement_point_functions() {
        let structure = simple_cubic(SiteDoF::Displacement);
        let site = point(&structure);

        let linear = basis(&structure, &site, Periodicity::Local, 1);
        assert!(linear.is_empty());

        let quadratic = basis(&structure, &site, Periodicity::Local, 2);
        assert_eq!(quadratic.len(), 1);
        let f = quadratic.function(0).unwrap();
        assert_eq!(f.degree(), 2);
        assert_abs_diff_eq!(f.evaluate(&[1.0, 0.0, 0.0]), f.evaluate(&[0.0, 0.0, 1.0]), epsilon = 1e-12);
        assert_abs_diff_eq!(f.evaluate(&[1.0, 1.0, 0.0]), 2.0 * f.evaluate(&[0.0, 1.0, 0.0]), epsilon = 1e-12);
    }

    #[test]
    fn test_scalar_point_functions() {
        let structure = simple_cubic(SiteDoF::Scalar { name: "m".to_string() });
        let site = point(&structure);
        assert_eq!(basis(&structure, &site, Periodicity::Local, 1).len(), 1);
        assert_eq!(basis(&structure, &site, Periodicity::Local, 3).len(), 3);
    }

    #[test]
    fn test_functions_are_invariant() {
        let cases = [
            (SiteDoF::occupation(&["A", "B", "C"]), 2),
            (SiteDoF::Displacement, 2),
        ];
        for (dof, order) in cases {
            let structure = simple_cubic(dof);
            let action = cubic_action(&structure);
            let pair = nn_pair(&structure);
            let symmetries = action.stabilizer(&pair, Periodicity::Periodic, TOL).unwrap();
            let basis = BasisSet::construct(&pair, &structure, &symmetries, order).unwrap();
            assert!(!basis.is_empty());

            for symmetry in &symmetries {
                let map = transform_variables(basis.variables(), symmetry).unwrap();
                for f in basis.functions() {
                    let image = f.polynomial().substitute(&map, 0.0);
                    let difference = image.add_scaled(f.polynomial(), -1.0, 1e-12);
                    assert!(difference.norm() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_orbitree_basis_sets() {
        let structure = simple_cubic(SiteDoF::occupation(&["A", "B"]));
        let group = lattice_point_group(structure.lattice()).unwrap();
        let mut tree = Orbitree::generate(&structure, &group, &ClusterSpecs::new(&[0.0, 1.5])).unwrap();
        assert_eq!(tree.basis_set_size(), 0);

        tree.generate_clust_bases(&structure, None).unwrap();
        assert_eq!(tree.basis_set_size(), 3);
        for (_, orbit) in tree.iter_orbits() {
            assert_eq!(orbit.basis_set_size(), 1);
        }

        let json = serde_json::to_string(&tree).unwrap();
        let back: Orbitree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn test_periodic_tree_bases_use_translated_symmetry() {
        let structure = simple_cubic(SiteDoF::occupation(&["A", "B", "C"]));
        let group = lattice_point_group(structure.lattice()).unwrap();
        let mut tree = Orbitree::generate(&structure, &group, &ClusterSpecs::new(&[0.0, 1.0])).unwrap();
        tree.generate_clust_bases(&structure, Some(2)).unwrap();

        // Reversing the pair needs a lattice translation on top of a point operation
        let pair = tree.orbit(1, 0).unwrap();
        assert_eq!(pair.cluster_group().len(), 16);
        assert_eq!(pair.basis_set_size(), 3);
        assert_eq!(tree.orbit(0, 0).unwrap().cluster_group().len(), 48);
    }

    #[test]
    fn test_local_tree_bases_use_phenomenal_symmetry() {
        let structure = simple_cubic(SiteDoF::occupation(&["A", "B", "C"]));
        let group = lattice_point_group(structure.lattice()).unwrap();
        let bond = nn_pair(&structure);
        let specs = ClusterSpecs::new(&[1.0, 1.0]);
        let mut tree = Orbitree::generate_local(&structure, &group, &specs, &bond, false).unwrap();
        tree.generate_clust_bases(&structure, Some(2)).unwrap();

        let side = Cluster::from_cells(&structure, &[(0, Vector3::new(0, 1, 0)), (0, Vector3::new(1, 1, 0))]);
        let (np, no) = tree.find_cluster(&side).unwrap();
        let orbit = tree.orbit(np, no).unwrap();

        // The mirror through the bond center reverses the side pair
        let bond_group = cubic_action(&structure)
            .cluster_group(&bond, Periodicity::Periodic, TOL)
            .unwrap();
        let expected = bond_group.stabilizer(orbit.prototype(), Periodicity::Local, TOL).unwrap();
        assert_eq!(orbit.cluster_group().len(), expected.len());
        assert_eq!(orbit.cluster_group().len(), 4);
        assert!(orbit.cluster_group().iter().any(|s| s.permutation == vec![1, 0]));
        assert_eq!(orbit.basis_set_size(), 3);

        // The point group alone fixes no reversal of this pair
        let point_group_only = basis(&structure, orbit.prototype(), Periodicity::Local, 2);
        assert_eq!(point_group_only.len(), 4);

        for symmetry in orbit.cluster_group() {
            let basis = orbit.basis_set().unwrap();
            let map = transform_variables(basis.variables(), symmetry).unwrap();
            for f in basis.functions() {
                let image = f.polynomial().substitute(&map, 0.0);
                assert!(image.add_scaled(f.polynomial(), -1.0, 1e-12).norm() < 1e-9);
            }
        }
    }
}
