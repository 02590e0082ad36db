use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use case_core::dataset::CaseDb;
use case_core::grader;

/// Autograder: prints only a final score between 0 and 100.
#[derive(Parser)]
#[command(name = "grader", version)]
struct Cli {
    /// Path to the dataset (.cdb preferred, plain JSON also accepted)
    #[arg(short, long, default_value = "data/config.cdb")]
    dataset: PathBuf,

    /// Predictions JSON: { case_id: { "culprit": str, "steps": [{action, args}] } }
    #[arg(short, long)]
    predictions: PathBuf,

    /// Optional JSON map { case_id: optimal_steps } overriding dataset step counts
    #[arg(short, long)]
    ref_steps: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Diagnostics go to stderr so stdout carries nothing but the score.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db = CaseDb::from_file(&cli.dataset)?;
    let preds = grader::load_predictions(&cli.predictions)?;
    let ref_steps = match &cli.ref_steps {
        Some(path) => Some(grader::load_ref_steps(path)?),
        None => None,
    };

    let score = grader::compute_score(&db, &preds, ref_steps.as_ref());
    println!("{score}");
    Ok(())
}
