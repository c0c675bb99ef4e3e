#[cfg(test)]
mod _tests_structure {
    use super::super::{BasisSite, SiteDoF, Structure};
    use crate::error::ClusterError;
    use crate::lattice::{hexagonal_lattice, simple_cubic_lattice};
    use nalgebra::Vector3;

    fn binary() -> SiteDoF {
        SiteDoF::occupation(&["A", "B"])
    }

    #[test]
    fn test_empty_basis_is_rejected() {
        let lattice = simple_cubic_lattice(1.0).unwrap();
        assert_eq!(Structure::new(lattice, vec![]), Err(ClusterError::EmptyBasis));
    }

    #[test]
    fn test_empty_dof_is_rejected() {
        let lattice = simple_cubic_lattice(1.0).unwrap();
        let basis = vec![
            BasisSite::new("A", Vector3::zeros(), binary()),
            BasisSite::new(
                "X",
                Vector3::new(0.5, 0.5, 0.5),
                SiteDoF::Occupation { occupants: vec![] },
            ),
        ];
        assert_eq!(
            Structure::new(lattice, basis),
            Err(ClusterError::EmptyDoF { site: 1 })
        );
    }

    #[test]
    fn test_find_site_across_cells() {
        let lattice = hexagonal_lattice(1.0, 1.6).unwrap();
        let basis = vec![
            BasisSite::new("A", Vector3::new(1.0 / 3.0, 2.0 / 3.0, 0.25), binary()),
            BasisSite::new("B", Vector3::new(2.0 / 3.0, 1.0 / 3.0, 0.75), binary()),
        ];
        let structure = Structure::new(lattice, basis).unwrap();

        let frac = structure.site_frac(1, &Vector3::new(-1, 2, 0));
        assert_eq!(structure.find_site(&frac, 1e-5), Some((1, Vector3::new(-1, 2, 0))));
        assert_eq!(structure.find_site(&Vector3::new(0.1, 0.0, 0.0), 1e-5), None);
    }

    #[test]
    fn test_active_sites() {
        let lattice = simple_cubic_lattice(1.0).unwrap();
        let basis = vec![
            BasisSite::new("A", Vector3::zeros(), binary()),
            BasisSite::new("O", Vector3::new(0.5, 0.5, 0.5), SiteDoF::occupation(&["O"])),
            BasisSite::new("u", Vector3::new(0.5, 0.0, 0.0), SiteDoF::Displacement),
        ];
        let structure = Structure::new(lattice, basis).unwrap();
        assert_eq!(structure.active_sites(2), vec![0, 2]);
        assert_eq!(structure.active_sites(1), vec![0, 1, 2]);
    }

    #[test]
    fn test_site_dof_variables() {
        let ternary = SiteDoF::occupation(&["A", "B", "Va"]);
        assert_eq!(ternary.num_components(), 3);
        assert_eq!(ternary.num_variables(), 2);
        assert!(!ternary.is_continuous());
        assert_eq!(SiteDoF::Displacement.num_variables(), 3);
        assert_eq!(SiteDoF::Displacement.variable_name(2), "dz");
    }

    #[test]
    fn test_structure_json() {
        let json = r#"{
            "lattice": { "vectors": [[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]], "tol": 1e-8 },
            "basis": [
                { "label": "Cu", "position": [0.0, 0.0, 0.0],
                  "dof": { "type": "occupation", "occupants": ["Cu", "Au"] } }
            ]
        }"#;
        let structure: Structure = serde_json::from_str(json).unwrap();
        assert_eq!(structure.num_sites(), 1);
        assert_eq!(structure.basis()[0].dof, SiteDoF::occupation(&["Cu", "Au"]));

        let back: Structure =
            serde_json::from_str(&serde_json::to_string(&structure).unwrap()).unwrap();
        assert_eq!(back, structure);

        let empty = r#"{
            "lattice": { "vectors": [[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]], "tol": 1e-8 },
            "basis": []
        }"#;
        assert!(serde_json::from_str::<Structure>(empty).is_err());
    }
}
