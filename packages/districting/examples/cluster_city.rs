//! Cluster City - Minimal End-to-End Run
//!
//! Feeds a small in-memory POI set through the full pipeline and
//! prints the district documents it would commit. Useful as a first
//! look at what the library produces and as a template for wiring
//! your own source and sink.
//!
//! ```bash
//! cargo run --example cluster_city
//! ```

use districting::{
    run_city, ClassifierRules, ClusterParams, MemorySink, MemorySource, RawPoi,
};

fn sample_records() -> Vec<RawPoi> {
    vec![
        // A tight dining block
        RawPoi::new("Cafe Luna", 48.8600, 2.3300, "Paris").with_categories(["cafe"]),
        RawPoi::new("Chez Paul", 48.8603, 2.3301, "Paris").with_categories(["restaurant"]),
        RawPoi::new("Le Zinc", 48.8601, 2.3306, "Paris").with_categories(["restaurant", "bar"]),
        RawPoi::new("Boulangerie 9", 48.8598, 2.3303, "Paris").with_categories(["bakery"]),
        RawPoi::new("Petit Bistro", 48.8602, 2.3297, "Paris").with_categories(["restaurant"]),
        // A museum pair two kilometers east, too sparse to cluster
        RawPoi::new("Museum Rex", 48.8600, 2.3580, "Paris").with_categories(["museum"]),
        RawPoi::new("Grand Hotel", 48.8660, 2.3580, "Paris").with_categories(["hotel"]),
        // A record the normalizer will drop
        RawPoi {
            name: Some("No Coordinates Inn".to_string()),
            city: Some("Paris".to_string()),
            ..RawPoi::default()
        },
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let source = MemorySource::with_records(sample_records());
    let sink = MemorySink::new();
    let params = ClusterParams::new(150.0, 3);
    let rules = ClassifierRules::default();

    let report = run_city("Paris", &params, &rules, &source, &sink).await?;

    println!(
        "{}: {} districts, {} POIs clustered, {} noise, {} records dropped",
        report.city,
        report.districts,
        report.normalize.kept - report.noise_pois,
        report.noise_pois,
        report.normalize.dropped()
    );

    for document in sink.documents_for("Paris").unwrap_or_default() {
        println!("{}", serde_json::to_string_pretty(&document)?);
    }

    Ok(())
}
