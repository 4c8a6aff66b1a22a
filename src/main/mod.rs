use std::path::PathBuf;

use bedsim::{commands::bedsim_score, overlaps::OverlapEngine, prelude::BedSimError};
use clap::Parser;
use log::info;

const INFO: &str = "\
bedsim: similarity scores of perturbed BED file replicates against their originals

For every sample in the project manifest, each replicate
<input>/<sample>/<sample>_rep*.bed is scored against the sample's original
file with the Jaccard, coverage, Euclidean and cosine metrics. One table per
metric is written to the output directory.
";

#[derive(Parser)]
#[clap(name = "bedsim")]
#[clap(about = INFO)]
struct Cli {
    /// the directory of replicate BED files, one subdirectory per sample
    #[arg(short, long, required = true)]
    input: PathBuf,

    /// the directory the results tables are written to
    #[arg(short, long, required = true)]
    output: PathBuf,

    /// the project manifest: a CSV sample table with sample_name, file and universe columns
    #[arg(short, long, required = true)]
    project: PathBuf,

    /// log per-replicate scores
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: Cli) -> Result<(), BedSimError> {
    let engine = OverlapEngine::default();
    let output = bedsim_score(&engine, &cli.input, &cli.output, &cli.project)?;
    let issues = output.report().issues();
    if !issues.is_empty() {
        info!("finished with {} issue(s)", issues.len());
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // progress and scores are program output
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    if let Err(e) = OverlapEngine::default().ensure_callable() {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    match run(cli) {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
