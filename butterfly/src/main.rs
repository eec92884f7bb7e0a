//! Butterfly evaluation of a Fourier kernel sum over random sources and targets, optionally
//! checked against direct evaluation.
use std::process::ExitCode;

// Link a BLAS implementation into the binary; rlst calls BLAS routines.
#[cfg(any(
    all(target_arch = "x86_64", target_os = "linux", target_env = "gnu"),
    all(target_arch = "aarch64", target_os = "macos")
))]
extern crate blas_src;

use clap::Parser;
use rlst::RawAccess;

use butterfly::{
    oracle,
    traits::butterfly::{DataAccess, Evaluate},
    traversal::constants::DEFAULT_INTERPOLATION_ORDER,
    tree::{
        constants::DEFAULT_LEAF_CAPACITY,
        helpers::{charges_fixture, points_fixture},
    },
    ButterflyBuilder, ButterflyError, FourierKernel,
};

/// Struct for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(about = "Butterfly evaluation of a Fourier kernel sum")]
struct Args {
    /// Number of sources
    #[arg(short = 'N', default_value_t = 1000)]
    n_sources: usize,

    /// Number of targets
    #[arg(short = 'M', default_value_t = 1000)]
    n_targets: usize,

    /// Skip the comparison with direct evaluation
    #[arg(long, default_value_t = false)]
    nocheck: bool,

    /// Chebyshev interpolation order along each axis
    #[arg(long, default_value_t = DEFAULT_INTERPOLATION_ORDER)]
    order: usize,

    /// Maximum number of points per leaf
    #[arg(long, default_value_t = DEFAULT_LEAF_CAPACITY)]
    leaf_capacity: usize,

    /// Kernel frequency
    #[arg(long, default_value_t = 1.0)]
    frequency: f64,

    /// Spatial dimension
    #[arg(long, default_value_t = 1)]
    dim: usize,

    /// Random seed for points and charges
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn run(args: Args) -> Result<(), ButterflyError> {
    if args.n_sources == 0 || args.n_targets == 0 {
        return Err(ButterflyError::InvalidConfiguration(
            "N and M must be positive".to_string(),
        ));
    }

    let kernel = FourierKernel::new(args.dim, args.frequency);
    println!("{}", kernel);

    let sources = points_fixture::<f64>(args.n_sources, args.dim, None, None, Some(args.seed));
    let targets = points_fixture::<f64>(args.n_targets, args.dim, None, None, Some(args.seed + 1));
    let charges = charges_fixture(args.n_sources, Some(args.seed + 2));

    let mut butterfly = ButterflyBuilder::new()
        .tree(&sources, &targets, args.leaf_capacity)?
        .parameters(&charges, args.order, kernel)?
        .build()?;

    println!(
        "N = {}, M = {}, order = {}, max level = {}, split level = {}",
        args.n_sources,
        args.n_targets,
        butterfly.order(),
        butterfly.max_level(),
        butterfly.split_level()
    );

    butterfly.evaluate()?;
    let result = butterfly.results();

    if !args.nocheck {
        println!("Computing direct matvec...");
        let (report, exact) = oracle::verify(
            butterfly.kernel(),
            sources.data(),
            &charges,
            targets.data(),
            &result,
        )?;

        for (r, e) in result.iter().zip(&exact) {
            println!("{}\t{}", r, e);
        }
        println!("{}", report);
    }

    Ok(())
}

fn main() -> ExitCode {
    // Accept the single dash spelling of the check flag
    let args = std::env::args().map(|arg| {
        if arg == "-nocheck" {
            "--nocheck".to_string()
        } else {
            arg
        }
    });

    match run(Args::parse_from(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
