use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clusterography::clusterography::{OrbitIndex, Orbitree};
use clusterography::config::ClusterSpecs;
use clusterography::structure::Structure;
use clusterography::symmetries::factor_group;
use env_logger::Env;
use log::{info, warn};

#[derive(Parser)]
#[command(name = "clusterography")]
#[command(about = "Cluster orbits and cluster basis sets for periodic crystals")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Number of threads to use (default: all available cores)
    #[arg(short, long)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the orbitree of a structure
    Generate {
        /// Structure (lattice + basis sites) as JSON
        #[arg(long)]
        prim: PathBuf,

        /// Cluster specs as JSON
        #[arg(long)]
        specs: PathBuf,

        /// Output file path
        #[arg(short, long, default_value = "orbitree.json")]
        output: PathBuf,

        /// Attach cluster basis functions to every orbit
        #[arg(long)]
        basis: bool,

        /// Highest polynomial order of the cluster functions
        #[arg(long)]
        max_poly_order: Option<usize>,
    },
    /// Summarize an orbitree JSON file
    Summary {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Set thread pool size if specified
    if let Some(threads) = cli.threads {
        #[cfg(feature = "parallel")]
        {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .context("failed to set thread pool size")?;
            info!("Using {} threads", threads);
        }
        #[cfg(not(feature = "parallel"))]
        {
            let _ = threads;
            warn!("Thread count specified but parallel feature not enabled. Ignoring.");
        }
    }

    info!("Starting clusterography v{}", clusterography::VERSION);

    match cli.command {
        Commands::Generate {
            prim,
            specs,
            output,
            basis,
            max_poly_order,
        } => generate(&prim, &specs, &output, basis, max_poly_order),
        Commands::Summary { input } => summary(&input),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn generate(
    prim: &PathBuf,
    specs: &PathBuf,
    output: &PathBuf,
    basis: bool,
    max_poly_order: Option<usize>,
) -> Result<()> {
    let structure: Structure = read_json(prim)?;
    let specs: ClusterSpecs = read_json(specs)?;
    let tol = specs.tolerance;

    let group = factor_group(&structure, tol).context("computing the factor group")?;
    info!("Factor group has {} operations", group.len());

    let mut tree = Orbitree::generate(&structure, &group, &specs).context("generating the orbitree")?;
    if basis {
        tree.generate_clust_bases(&structure, max_poly_order)
            .context("constructing cluster basis sets")?;
    }

    let json = serde_json::to_string_pretty(&tree)?;
    fs::write(output, json).with_context(|| format!("writing {}", output.display()))?;
    info!("Wrote {} orbits to {}", tree.total_orbits(), output.display());
    print_summary(&tree);
    Ok(())
}

fn summary(input: &PathBuf) -> Result<()> {
    let tree: Orbitree = read_json(input)?;
    print_summary(&tree);
    Ok(())
}

fn print_summary(tree: &Orbitree) {
    let index = OrbitIndex::build(tree);
    println!(
        "{:>6} {:>6} {:>6} {:>12} {:>12} {:>10} {:>8}",
        "index", "sites", "mult", "max_length", "min_length", "functions", "subclust"
    );
    for i in 0..index.len() {
        let Some((np, no)) = index.position(i) else {
            continue;
        };
        let Ok(orbit) = tree.orbit(np, no) else {
            continue;
        };
        println!(
            "{:>6} {:>6} {:>6} {:>12.6} {:>12.6} {:>10} {:>8}",
            i,
            orbit.num_sites(),
            orbit.multiplicity(),
            orbit.max_length(),
            orbit.min_length(),
            orbit.basis_set_size(),
            index.subclusters(i).len()
        );
    }
    println!(
        "{} branches, {} orbits, {} cluster functions",
        tree.branch_len(),
        tree.total_orbits(),
        tree.basis_set_size()
    );
}
