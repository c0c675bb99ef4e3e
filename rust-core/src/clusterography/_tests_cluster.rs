#[cfg(test)]
mod _tests_cluster {
    use super::super::*;
    use crate::interfaces::Periodicity;
    use crate::lattice::simple_cubic_lattice;
    use crate::structure::{BasisSite, SiteDoF, Structure};
    use crate::symmetries::{lattice_point_group, GroupAction};
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    const TOL: f64 = 1e-5;

    fn simple_cubic() -> Structure {
        Structure::new(
            simple_cubic_lattice(2.0).unwrap(),
            vec![BasisSite::new("A", Vector3::zeros(), SiteDoF::occupation(&["A", "B"]))],
        )
        .unwrap()
    }

    fn pair(structure: &Structure, a: [i32; 3], b: [i32; 3]) -> Cluster {
        Cluster::from_cells(structure, &[(0, Vector3::from(a)), (0, Vector3::from(b))])
    }

    #[test]
    fn test_derived_geometry() {
        let structure = simple_cubic();
        let triplet = Cluster::from_cells(
            &structure,
            &[
                (0, Vector3::new(0, 0, 0)),
                (0, Vector3::new(1, 0, 0)),
                (0, Vector3::new(0, 1, 0)),
            ],
        );
        assert_eq!(triplet.size(), 3);
        assert_eq!(triplet.lengths().len(), 3);
        assert_relative_eq!(triplet.min_length(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(triplet.max_length(), 8.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(triplet.centroid().x, 2.0 / 3.0, epsilon = 1e-12);

        let single = Cluster::from_cells(&structure, &[(0, Vector3::zeros())]);
        assert_eq!(single.max_length(), 0.0);
        assert_eq!(single.min_length(), 0.0);
    }

    #[test]
    fn test_map_onto_returns_permutation() {
        let structure = simple_cubic();
        let forward = pair(&structure, [0, 0, 0], [1, 0, 0]);
        let backward = pair(&structure, [1, 0, 0], [0, 0, 0]);
        assert_eq!(forward.map_onto(&backward, TOL), Some(vec![1, 0]));
        assert_eq!(forward.map_onto(&forward, TOL), Some(vec![0, 1]));

        let other = pair(&structure, [0, 0, 0], [0, 1, 0]);
        assert_eq!(forward.map_onto(&other, TOL), None);
    }

    #[test]
    fn test_periodic_equivalence() {
        let structure = simple_cubic();
        let lattice = structure.lattice();
        let home = pair(&structure, [0, 0, 0], [1, 0, 0]);
        let shifted = pair(&structure, [3, -1, 2], [2, -1, 2]);

        assert!(!home.is_equivalent(&shifted, Periodicity::Local, lattice, TOL));
        assert!(home.is_equivalent(&shifted, Periodicity::Periodic, lattice, TOL));

        let (cell, permutation) = home.map_onto_periodic(&shifted, lattice, TOL).unwrap();
        let moved = home.translate(&cell, lattice);
        for (i, &j) in permutation.iter().enumerate() {
            assert!(moved.site(i).matches(shifted.site(j), TOL));
        }
    }

    #[test]
    fn test_contains() {
        let structure = simple_cubic();
        let lattice = structure.lattice();
        let triplet = Cluster::from_cells(
            &structure,
            &[
                (0, Vector3::new(0, 0, 0)),
                (0, Vector3::new(1, 0, 0)),
                (0, Vector3::new(1, 1, 0)),
            ],
        );
        let inside = pair(&structure, [1, 1, 0], [1, 0, 0]);
        let translated = pair(&structure, [5, 5, 5], [6, 5, 5]);
        let outside = pair(&structure, [0, 0, 0], [0, 0, 1]);

        assert!(triplet.contains(&inside, Periodicity::Local, lattice, TOL));
        assert!(!triplet.contains(&translated, Periodicity::Local, lattice, TOL));
        assert!(triplet.contains(&translated, Periodicity::Periodic, lattice, TOL));
        assert!(!triplet.contains(&outside, Periodicity::Periodic, lattice, TOL));
        assert!(!inside.contains(&triplet, Periodicity::Periodic, lattice, TOL));
    }

    #[test]
    fn test_sort_sites_reports_order() {
        let structure = simple_cubic();
        let mut cluster = Cluster::from_cells(
            &structure,
            &[
                (0, Vector3::new(1, 0, 0)),
                (0, Vector3::new(0, 0, 0)),
                (0, Vector3::new(0, 1, 0)),
            ],
        );
        let original = cluster.clone();
        let order = cluster.sort_sites(TOL);
        assert_eq!(order, vec![1, 2, 0]);
        for (k, &old) in order.iter().enumerate() {
            assert_eq!(cluster.site(k), original.site(old));
        }
        assert_eq!(cluster.lengths(), original.lengths());
    }

    #[test]
    fn test_subclusters() {
        let structure = simple_cubic();
        let quad = Cluster::from_cells(
            &structure,
            &[
                (0, Vector3::new(0, 0, 0)),
                (0, Vector3::new(1, 0, 0)),
                (0, Vector3::new(0, 1, 0)),
                (0, Vector3::new(0, 0, 1)),
            ],
        );
        assert_eq!(quad.subclusters(1).len(), 4);
        assert_eq!(quad.subclusters(2).len(), 6);
        assert_eq!(quad.subclusters(3).len(), 4);
        assert_eq!(quad.subclusters(4).len(), 1);
        assert!(quad.subclusters(5).is_empty());
    }

    #[test]
    fn test_apply_symmetry() {
        let structure = simple_cubic();
        let group = lattice_point_group(structure.lattice()).unwrap();
        let action = GroupAction::new(&group, &structure, TOL).unwrap();
        let cluster = pair(&structure, [0, 0, 0], [1, 0, 0]);

        let images: Vec<Cluster> = (0..action.len()).map(|i| action.apply(i, &cluster).unwrap()).collect();
        for image in &images {
            assert_relative_eq!(image.max_length(), cluster.max_length(), epsilon = 1e-12);
            assert!(image.site(0).matches(cluster.site(0), TOL));
        }
        let identity = action.apply(0, &cluster).unwrap();
        assert_eq!(identity.map_onto(&cluster, TOL), Some(vec![0, 1]));
    }

    #[test]
    fn test_cluster_serde_round_trip() {
        let structure = simple_cubic();
        let cluster = pair(&structure, [0, 0, 0], [1, 1, 0]);
        let json = serde_json::to_string(&cluster).unwrap();
        let back: Cluster = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cluster);
    }

    #[test]
    fn test_tolerance_boundary() {
        let structure = simple_cubic();
        let lattice = structure.lattice();
        let tol = 1e-3;
        let reference = pair(&structure, [0, 0, 0], [1, 0, 0]);
        // second site displaced along x by `offset` (cartesian)
        let displaced = |offset: f64| {
            Cluster::new(vec![
                ClusterSite::new(0, Vector3::zeros(), lattice),
                ClusterSite::new(0, Vector3::new(1.0 + offset / 2.0, 0.0, 0.0), lattice),
            ])
        };
        let inside = displaced(0.9 * tol);
        let outside = displaced(1.1 * tol);

        assert_eq!(inside.map_onto(&reference, tol), Some(vec![0, 1]));
        assert_eq!(outside.map_onto(&reference, tol), None);
        assert!(outside.map_onto(&reference, 10.0 * tol).is_some());

        let cell = Vector3::new(3, -1, 2);
        assert!(inside
            .translate(&cell, lattice)
            .is_equivalent(&reference, Periodicity::Periodic, lattice, tol));
        assert!(!outside
            .translate(&cell, lattice)
            .is_equivalent(&reference, Periodicity::Periodic, lattice, tol));
    }
}
