// ─────────────────────────────────────────────────────────────────────
// SCPN Stencil Bench — CLI
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Distributed halo-exchange stencil benchmark.
//!
//! Usage: stencil-bench <threads> <iterations> <n> [numa-nodes]
//!
//! The output is a validation verdict followed by timing statistics.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use stencil_core::driver::run;
use stencil_core::place::UniformPlacement;
use stencil_math::partition::process_grid;
use stencil_types::config::RunConfig;

#[derive(Parser)]
#[command(name = "stencil-bench")]
#[command(version)]
#[command(about = "Iterative cross stencil over a sharded 2D grid")]
struct Cli {
    /// Worker threads per shard
    threads: usize,

    /// Number of stencil iterations
    iterations: usize,

    /// Linear dimension of the square grid
    n: usize,

    /// NUMA node multiplier for the shard count
    #[arg(default_value = "1")]
    numa_nodes: usize,

    /// Number of SPMD shards (defaults to the available parallelism)
    #[arg(long)]
    shards: Option<usize>,

    /// Stencil radius
    #[arg(long, default_value = "2")]
    radius: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let shards = cli.shards.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1)
    });

    let config = RunConfig {
        threads: cli.threads,
        iterations: cli.iterations,
        n: cli.n,
        radius: cli.radius,
        shards,
        numa_nodes: cli.numa_nodes,
    };

    println!("SCPN Stencil Bench");
    println!("Stencil execution on 2D grid");
    println!("Number of shards       = {}", config.total_shards());
    println!("Grid size              = {}", config.n);
    println!("Number of threads      = {}", config.threads);
    println!("Number of NUMA nodes   = {}", config.numa_nodes);
    println!("Radius of stencil      = {}", config.radius);
    println!("Data type              = double precision");
    println!("Number of iterations   = {}", config.iterations);
    if config.validate().is_ok() {
        let (px, py) = process_grid(config.total_shards());
        println!("Tiles in x/y-direction = {px}/{py}");
    }

    // Size the compute pool for all shards' worker bands together.
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads * config.total_shards())
        .build_global()?;

    let placement = UniformPlacement {
        workers: config.threads,
    };
    match run(&config, &placement) {
        Ok(report) => {
            println!("Solution validates");
            println!(
                "Rate (MFlops/s): {:.6}  Avg time (s): {:.6}",
                report.mflops, report.avg_time_s
            );
            Ok(())
        }
        Err(err) => {
            eprintln!("ERROR: {err}");
            std::process::exit(1);
        }
    }
}
