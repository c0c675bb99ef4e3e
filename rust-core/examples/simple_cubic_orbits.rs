/// Example: cluster orbits and basis functions of a binary simple cubic alloy
///
/// Builds the orbitree up to quadruplets, prints the orbit table and the
/// cluster functions of the nearest neighbor pair.
use clusterography::clusterography::{OrbitIndex, Orbitree};
use clusterography::config::ClusterSpecs;
use clusterography::lattice::simple_cubic_lattice;
use clusterography::structure::{BasisSite, SiteDoF, Structure};
use clusterography::symmetries::factor_group;
use nalgebra::Vector3;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Simple cubic A/B alloy ===\n");

    let structure = Structure::new(
        simple_cubic_lattice(1.0)?,
        vec![BasisSite::new("A", Vector3::zeros(), SiteDoF::occupation(&["A", "B"]))],
    )?;
    let specs = ClusterSpecs::new(&[0.0, 2.1, 1.5, 1.5]);

    let group = factor_group(&structure, specs.tolerance)?;
    println!("Factor group: {} operations", group.len());

    let mut tree = Orbitree::generate(&structure, &group, &specs)?;
    tree.generate_clust_bases(&structure, None)?;

    let index = OrbitIndex::build(&tree);
    println!("\n{:>5} {:>5} {:>5} {:>10} {:>9}", "orbit", "sites", "mult", "max_len", "subclust");
    for ((np, no), orbit) in tree.iter_orbits() {
        let linear = index.linear_index(np, no).unwrap_or_default();
        println!(
            "{:>5} {:>5} {:>5} {:>10.4} {:>9}",
            linear,
            orbit.num_sites(),
            orbit.multiplicity(),
            orbit.max_length(),
            index.subclusters(linear).len()
        );
    }

    let pair = tree.orbit(1, 0)?;
    println!("\nNearest neighbor pair prototype:");
    for site in pair.prototype().sites() {
        println!("   sublattice {} at ({:.3}, {:.3}, {:.3})", site.sublattice, site.frac.x, site.frac.y, site.frac.z);
    }
    if let Some(basis) = pair.basis_set() {
        let labels: Vec<String> = basis.variables().iter().map(|v| v.label()).collect();
        for (i, f) in basis.functions().iter().enumerate() {
            let terms: Vec<String> = f
                .polynomial()
                .terms()
                .iter()
                .map(|t| {
                    let factors: Vec<&str> = t
                        .exponents
                        .iter()
                        .zip(&labels)
                        .filter(|(e, _)| **e > 0)
                        .map(|(_, l)| l.as_str())
                        .collect();
                    format!("{:+.3}*{}", t.coefficient, factors.join("*"))
                })
                .collect();
            println!("   f{} = {}", i, terms.join(" "));
        }
    }

    println!("\nTotal: {} orbits, {} cluster functions", tree.total_orbits(), tree.basis_set_size());
    Ok(())
}
