use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use effector_classifier::config::{project_root, PipelineConfig};
use effector_classifier::fasta::read_fasta;
use effector_classifier::report::{to_dataframe, write_csv};
use effector_classifier::{EffectorPipeline, LogisticEffectorModel};

#[derive(Parser)]
#[command(name = "effector_classifier")]
#[command(about = "Predict effector proteins from amino-acid sequences", long_about = None)]
struct Cli {
    /// FASTA file of predicted protein sequences
    #[arg(short, long)]
    input: PathBuf,

    /// Trained model (JSON)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Where to write the results CSV
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = PipelineConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(model) = cli.model {
        config.model_path = model;
    }
    if let Some(output) = cli.output {
        config.output_path = output;
    }
    let config = config.resolved(&project_root());

    info!("Starting effector prediction");

    // No model, no service
    let model = LogisticEffectorModel::load(&config.model_path)
        .with_context(|| format!("loading model from {}", config.model_path.display()))?;
    let pipeline = EffectorPipeline::new(Arc::new(model));

    let records = read_fasta(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let report = pipeline.run(&records)?;

    for failure in &report.failures {
        error!("record {} ('{}'): {}", failure.index + 1, failure.id, failure.error);
    }

    println!("{}", to_dataframe(&report.predictions)?);
    write_csv(&report.predictions, &config.output_path)?;

    if report.predictions.is_empty() && !report.failures.is_empty() {
        bail!("none of the {} sequences could be classified", report.failures.len());
    }
    Ok(())
}
