use clusterography::clusterography::{OrbitIndex, Orbitree};
use clusterography::config::ClusterSpecs;
use clusterography::lattice::{face_centered_cubic_lattice, simple_cubic_lattice};
use clusterography::structure::{BasisSite, SiteDoF, Structure};
use clusterography::symmetries::factor_group;
use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::Vector3;
use std::hint::black_box;

const TOL: f64 = 1e-5;

fn single_site(lattice: clusterography::lattice::Lattice, dof: SiteDoF) -> Structure {
    Structure::new(lattice, vec![BasisSite::new("A", Vector3::zeros(), dof)]).unwrap()
}

fn bench_orbitree_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("orbitree_generation");
    group.sample_size(20);

    let sc = single_site(simple_cubic_lattice(1.0).unwrap(), SiteDoF::occupation(&["A", "B"]));
    let sc_group = factor_group(&sc, TOL).unwrap();
    let sc_specs = ClusterSpecs::new(&[0.0, 2.5, 1.5, 1.5]);
    group.bench_function("sc_pairs_triplets_quads", |b| {
        b.iter(|| Orbitree::generate(black_box(&sc), &sc_group, &sc_specs).unwrap())
    });

    let fcc = single_site(face_centered_cubic_lattice(1.0).unwrap(), SiteDoF::occupation(&["A", "B"]));
    let fcc_group = factor_group(&fcc, TOL).unwrap();
    let fcc_specs = ClusterSpecs::new(&[0.0, 1.5, 1.0]);
    group.bench_function("fcc_pairs_triplets", |b| {
        b.iter(|| Orbitree::generate(black_box(&fcc), &fcc_group, &fcc_specs).unwrap())
    });

    group.finish();
}

fn bench_orbit_index(c: &mut Criterion) {
    let sc = single_site(simple_cubic_lattice(1.0).unwrap(), SiteDoF::occupation(&["A", "B"]));
    let sc_group = factor_group(&sc, TOL).unwrap();
    let tree = Orbitree::generate(&sc, &sc_group, &ClusterSpecs::new(&[0.0, 2.5, 1.5, 1.5])).unwrap();

    c.bench_function("orbit_index_build", |b| b.iter(|| OrbitIndex::build(black_box(&tree))));
}

fn bench_basis_sets(c: &mut Criterion) {
    let sc = single_site(simple_cubic_lattice(1.0).unwrap(), SiteDoF::occupation(&["A", "B", "C"]));
    let sc_group = factor_group(&sc, TOL).unwrap();
    let tree = Orbitree::generate(&sc, &sc_group, &ClusterSpecs::new(&[0.0, 1.5, 1.5])).unwrap();

    c.bench_function("ternary_clust_bases", |b| {
        b.iter(|| {
            let mut tree = tree.clone();
            tree.generate_clust_bases(black_box(&sc), None).unwrap();
            tree
        })
    });
}

criterion_group!(benches, bench_orbitree_generation, bench_orbit_index, bench_basis_sets);
criterion_main!(benches);
