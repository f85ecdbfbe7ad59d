//! Batch front-end for the districting pipeline.
//!
//! Reads acquisition output (JSON lines, one raw POI record per
//! line), runs the clustering and classification pipeline for each
//! requested city, and commits district documents to per-city JSONL
//! files or, with the `elastic` feature, to an Elasticsearch-style
//! backend.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use districting::{
    run_cities, ClassifierRules, ClusterParams, DistrictSink, JsonlSink, JsonlSource, PoiSource,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "atlas")]
#[command(about = "Cluster city POIs into labeled districts")]
struct Cli {
    /// JSON-lines file with raw POI records
    #[arg(long)]
    input: PathBuf,

    /// City to process (repeat the flag for several cities)
    #[arg(long = "city", required = true)]
    cities: Vec<String>,

    /// Clustering neighborhood radius in meters
    #[arg(long)]
    epsilon_meters: f64,

    /// Minimum neighborhood size (the point itself included) for a
    /// core point
    #[arg(long)]
    min_points: usize,

    /// Directory for per-city JSONL output
    #[arg(long, default_value = "districts")]
    output: PathBuf,

    /// Cities processed concurrently
    #[arg(long, default_value_t = 4)]
    concurrency: usize,

    /// Index into an Elasticsearch-compatible backend instead of
    /// writing files (reads ELASTIC_URL and ELASTIC_INDEX)
    #[cfg(feature = "elastic")]
    #[arg(long)]
    elastic: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so RUST_LOG and sink settings from it are honored
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,districting=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let params = ClusterParams::new(cli.epsilon_meters, cli.min_points);
    params.validate().context("Invalid clustering parameters")?;

    let source = Arc::new(JsonlSource::new(&cli.input));
    let rules = ClassifierRules::default();

    #[cfg(feature = "elastic")]
    if cli.elastic {
        let url = std::env::var("ELASTIC_URL")
            .context("ELASTIC_URL must be set when --elastic is given")?;
        let index =
            std::env::var("ELASTIC_INDEX").unwrap_or_else(|_| "urban_districts".to_string());
        let sink = Arc::new(districting::ElasticSink::new(url, index));
        return run_and_report(&cli, params, rules, source, sink).await;
    }

    let sink = Arc::new(JsonlSink::new(&cli.output));
    run_and_report(&cli, params, rules, source, sink).await
}

async fn run_and_report<S, K>(
    cli: &Cli,
    params: ClusterParams,
    rules: ClassifierRules,
    source: Arc<S>,
    sink: Arc<K>,
) -> Result<()>
where
    S: PoiSource + 'static,
    K: DistrictSink + 'static,
{
    let results = run_cities(&cli.cities, &params, &rules, source, sink, cli.concurrency).await;

    let mut failures = 0usize;
    for (city, outcome) in &results {
        match outcome {
            Ok(report) => tracing::info!(
                "{}: {} districts from {} POIs ({} noise, {} records dropped) in {} ms",
                city,
                report.districts,
                report.normalize.kept,
                report.noise_pois,
                report.normalize.dropped(),
                report.elapsed_ms
            ),
            Err(e) => {
                failures += 1;
                tracing::error!("{}: {}", city, e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} city runs failed", failures, results.len());
    }
    Ok(())
}
