//! One-shot commands that load the estimator, use it once and exit.

use anyhow::{Context, Result};
use clap::Args;

use crate::config::AppConfig;
use crate::domain::RawTriage;
use crate::estimator::{FeatureVector, WaitTimeEstimator, WaitTimeReport, ARCHITECTURE};

#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    /// 1-indexed position in the arrival-ordered queue
    #[arg(long)]
    pub position: i64,

    /// Triage category 1..=5
    #[arg(long)]
    pub triage: String,

    /// Patients ahead at each triage level, e.g. 1,1,2,0,0
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub counts: Vec<i64>,

    /// Number of alternative labels to list (defaults to prediction.top_k)
    #[arg(long)]
    pub top: Option<usize>,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run_predict(config: &AppConfig, args: &PredictArgs) -> Result<()> {
    let estimator =
        WaitTimeEstimator::load(&config.model).context("failed to load model artifacts")?;

    let triage = RawTriage::Text(args.triage.clone()).level()?;
    let features = FeatureVector::from_raw(args.position, triage, &args.counts)?;
    let result = estimator.estimate(&features)?;

    let mut prediction = config.prediction.clone();
    if let Some(top) = args.top {
        prediction.top_k = top;
    }
    let report = WaitTimeReport::new(&result, &features, None, &prediction);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\x1b[36m═══ Wait-time estimate ═══\x1b[0m");
    println!(
        "  queue position {}  ·  triage {}  ·  ahead {:?}",
        report.queue_position,
        features.triage(),
        features.ahead().as_array()
    );
    println!(
        "  \x1b[32mestimated wait: {}\x1b[0m (p = {:.4})",
        report.estimated_wait, report.probability
    );
    println!("  expected wait:  {:.1}", report.expected_wait);
    println!(
        "  {:.0}% interval: {} – {}",
        report.confidence_interval.coverage * 100.0,
        report.confidence_interval.low,
        report.confidence_interval.high
    );
    println!("  alternatives:");
    for alt in &report.alternatives {
        println!("    {:>6}  {:.4}", alt.label, alt.probability);
    }

    Ok(())
}

pub fn check_artifacts(config: &AppConfig) -> Result<()> {
    let estimator =
        WaitTimeEstimator::load(&config.model).context("failed to load model artifacts")?;

    println!("\x1b[32m✓ artifacts valid\x1b[0m");
    println!("  format:        {}", estimator.format().as_str());
    println!("  architecture:  {:?}", ARCHITECTURE);
    println!("  normalizer:    {}", config.model.normalizer_path.display());
    println!("  weights:       {}", config.model.weights_path.display());
    println!(
        "  labels:        {} ({} buckets)",
        config.model.labels_path.display(),
        estimator.labels().len()
    );
    Ok(())
}
