//! End-to-end tests for the districting pipeline.
//!
//! Each test drives `run_city` through real sources and sinks and
//! checks the emitted documents, not intermediate state.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use districting::error::SinkResult;
use districting::{
    build_districts, cluster, extract_boundary, normalize, run_cities, run_city, AreaType,
    CityRunReport, ClassifierRules, ClusterParams, ConfigError, DistrictDocument, DistrictSink,
    GeoPoint, JsonlSink, JsonlSource, MemorySink, MemorySource, PipelineError, Poi, RawPoi,
    SinkError,
};
use proptest::prelude::*;

fn record(name: &str, lat: f64, lon: f64, city: &str, categories: &[&str]) -> RawPoi {
    RawPoi::new(name, lat, lon, city).with_categories(categories.iter().copied())
}

/// Five named dining POIs inside a ~100 m circle.
fn dense_dining_records(city: &str) -> Vec<RawPoi> {
    vec![
        record("Cafe Luna", 48.8600, 2.3300, city, &["cafe"]),
        record("Chez Paul", 48.8603, 2.3301, city, &["restaurant"]),
        record("Le Zinc", 48.8601, 2.3306, city, &["restaurant"]),
        record("Boulangerie 9", 48.8598, 2.3303, city, &["bakery"]),
        record("Petit Bistro", 48.8602, 2.3297, city, &["restaurant"]),
    ]
}

/// Three POIs pairwise ~5 km apart.
fn sparse_records(city: &str) -> Vec<RawPoi> {
    vec![
        record("Lone Diner", 48.8600, 2.3300, city, &["restaurant"]),
        record("North Kiosk", 48.9050, 2.3300, city, &["kiosk"]),
        record("East Stand", 48.8600, 2.3985, city, &["kiosk"]),
    ]
}

async fn run_in_memory(
    records: Vec<RawPoi>,
    city: &str,
    params: ClusterParams,
) -> (CityRunReport, Vec<DistrictDocument>) {
    let source = MemorySource::with_records(records);
    let sink = MemorySink::new();
    let rules = ClassifierRules::default();

    let report = run_city(city, &params, &rules, &source, &sink)
        .await
        .expect("run should succeed");
    let documents = sink.documents_for(city).expect("city should have committed");
    (report, documents)
}

#[tokio::test]
async fn test_sparse_city_produces_zero_districts() {
    let (report, documents) =
        run_in_memory(sparse_records("Paris"), "Paris", ClusterParams::new(200.0, 3)).await;

    assert_eq!(report.districts, 0);
    assert_eq!(report.noise_pois, 3);
    assert_eq!(report.documents_committed, 0);
    assert!(documents.is_empty(), "empty batch is still a commit");
}

#[tokio::test]
async fn test_dense_dining_city_produces_one_dining_district() {
    let (report, documents) = run_in_memory(
        dense_dining_records("Paris"),
        "Paris",
        ClusterParams::new(150.0, 3),
    )
    .await;

    assert_eq!(report.districts, 1);
    assert_eq!(report.noise_pois, 0);

    let document = &documents[0];
    assert_eq!(document.city, "Paris");
    assert_eq!(document.area_type, AreaType::Dining);
    assert_eq!(document.poi_count, 5);
    assert_eq!(document.category_counts.get("restaurant"), Some(&3));
    assert_eq!(document.category_counts.get("cafe"), Some(&1));
    assert_eq!(document.category_counts.get("bakery"), Some(&1));

    let outer = document.shape.outer().expect("polygon has an outer ring");
    assert_eq!(outer.first(), outer.last(), "ring must close");
    assert!(outer.len() >= 4);
}

#[tokio::test]
async fn test_restaurant_office_tie_goes_to_dining() {
    let records = vec![
        record("Cafe Nord", 48.8600, 2.3300, "Paris", &["restaurant"]),
        record("Cafe Sud", 48.8603, 2.3301, "Paris", &["restaurant"]),
        record("Acme HQ", 48.8601, 2.3306, "Paris", &["office"]),
        record("Orbit Labs", 48.8598, 2.3303, "Paris", &["office"]),
    ];
    let (report, documents) =
        run_in_memory(records, "Paris", ClusterParams::new(150.0, 3)).await;

    assert_eq!(report.districts, 1);
    assert_eq!(documents[0].area_type, AreaType::Dining);
}

#[tokio::test]
async fn test_identical_input_renders_byte_identical_documents() {
    let mut records = dense_dining_records("Paris");
    // A second blob two kilometers east, plus stragglers
    records.extend(vec![
        record("Museum Rex", 48.8600, 2.3580, "Paris", &["museum"]),
        record("Grand Hotel", 48.8603, 2.3581, "Paris", &["hotel"]),
        record("Monument aux Braves", 48.8601, 2.3586, "Paris", &["monument"]),
        record("Far Kiosk", 48.9100, 2.3300, "Paris", &["kiosk"]),
    ]);

    let params = ClusterParams::new(150.0, 3);
    let (_, first) = run_in_memory(records.clone(), "Paris", params.clone()).await;
    let (_, second) = run_in_memory(records, "Paris", params).await;

    let first_json = serde_json::to_string(&first).unwrap();
    let second_json = serde_json::to_string(&second).unwrap();
    assert_eq!(first_json, second_json);
}

#[tokio::test]
async fn test_unnamed_pois_shape_geometry_but_not_labels() {
    let mut records = vec![
        record("Cafe Luna", 48.8600, 2.3300, "Paris", &["restaurant"]),
        record("Chez Paul", 48.8603, 2.3301, "Paris", &["restaurant"]),
    ];
    // Three nameless office POIs in the same blob: they join the
    // district but must not outvote the two restaurants
    for (lat, lon) in [(48.8601, 2.3306), (48.8598, 2.3303), (48.8602, 2.3297)] {
        records.push(RawPoi::unnamed(lat, lon, "Paris").with_categories(["office"]));
    }

    let (report, documents) =
        run_in_memory(records, "Paris", ClusterParams::new(150.0, 3)).await;

    assert_eq!(report.districts, 1);
    let document = &documents[0];
    assert_eq!(document.poi_count, 5, "unnamed members still count");
    assert_eq!(document.area_type, AreaType::Dining);
    assert_eq!(document.category_counts.get("office"), None);
}

#[tokio::test]
async fn test_two_member_cluster_gets_degenerate_buffer_boundary() {
    let records = vec![
        record("North End", 48.86000, 2.33000, "Paris", &["restaurant"]),
        record("South End", 48.86036, 2.33000, "Paris", &["restaurant"]),
    ];
    let (report, documents) =
        run_in_memory(records, "Paris", ClusterParams::new(100.0, 2)).await;

    assert_eq!(report.districts, 1);
    let outer = documents[0].shape.outer().unwrap();
    // Octagonal buffer plus closing vertex
    assert_eq!(outer.len(), 9);
    assert_eq!(outer.first(), outer.last());

    // Both members inside
    let ring: Vec<GeoPoint> = outer.iter().map(|c| GeoPoint::new(c[1], c[0])).collect();
    assert!(districting::geo::ring_contains(
        &ring,
        &GeoPoint::new(48.86000, 2.33000)
    ));
    assert!(districting::geo::ring_contains(
        &ring,
        &GeoPoint::new(48.86036, 2.33000)
    ));
}

#[tokio::test]
async fn test_hull_contains_every_clustered_poi() {
    let mut records = dense_dining_records("Paris");
    records.push(record("Annex", 48.8605, 2.3309, "Paris", &["bar"]));
    records.push(record("Corner Shop", 48.8597, 2.3299, "Paris", &["convenience"]));

    let (pois, _) = normalize(&records, "Paris");
    let params = ClusterParams::new(150.0, 3);
    let rules = ClassifierRules::default();
    let (districts, _) = build_districts(&pois, "Paris", &params, &rules);

    assert!(!districts.is_empty());
    for district in &districts {
        for member_id in &district.members {
            let poi = pois.iter().find(|p| &p.id == member_id).unwrap();
            assert!(
                districting::geo::ring_contains(&district.boundary, &poi.location),
                "{} outside {}",
                member_id,
                district.id
            );
        }
    }
}

#[tokio::test]
async fn test_clustering_is_a_partition_of_normalized_pois() {
    let mut records = dense_dining_records("Paris");
    records.extend(sparse_records("Paris"));
    // The sparse set reuses a coordinate from the dense set under a
    // different name, which is allowed

    let (pois, stats) = normalize(&records, "Paris");
    let clustering = cluster(&pois, &ClusterParams::new(150.0, 3));

    let mut seen: Vec<usize> = clustering.noise.clone();
    for members in &clustering.clusters {
        seen.extend(members);
    }
    seen.sort_unstable();
    let expected: Vec<usize> = (0..stats.kept).collect();
    assert_eq!(seen, expected, "every POI in exactly one place");
}

#[tokio::test]
async fn test_invalid_config_is_rejected_before_any_io() {
    let source = MemorySource::with_records(dense_dining_records("Paris"));
    let sink = MemorySink::new();
    let rules = ClassifierRules::default();

    let err = run_city("Paris", &ClusterParams::new(0.0, 3), &rules, &source, &sink)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Config(ConfigError::InvalidEpsilon(_))
    ));

    let err = run_city("Paris", &ClusterParams::new(150.0, 0), &rules, &source, &sink)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Config(ConfigError::InvalidMinPoints)
    ));

    let err = run_city("  ", &ClusterParams::new(150.0, 3), &rules, &source, &sink)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Config(ConfigError::EmptyCity)));

    assert_eq!(sink.city_count(), 0, "nothing may reach the sink");
}

/// Sink that refuses one city and forwards the rest to a MemorySink.
struct GrudgeSink {
    inner: MemorySink,
    refuses: String,
}

#[async_trait]
impl DistrictSink for GrudgeSink {
    async fn commit_city(&self, city: &str, documents: &[DistrictDocument]) -> SinkResult<()> {
        if city == self.refuses {
            return Err(SinkError::Rejected {
                city: city.to_string(),
                failed: documents.len(),
                total: documents.len(),
            });
        }
        self.inner.commit_city(city, documents).await
    }

    fn name(&self) -> &str {
        "grudge"
    }
}

#[tokio::test]
async fn test_one_failing_city_does_not_disturb_the_others() {
    let mut records = dense_dining_records("Paris");
    records.extend(dense_dining_records("Milan"));

    let source = Arc::new(MemorySource::with_records(records));
    let sink = Arc::new(GrudgeSink {
        inner: MemorySink::new(),
        refuses: "Milan".to_string(),
    });

    let cities = vec!["Paris".to_string(), "Milan".to_string()];
    let results = run_cities(
        &cities,
        &ClusterParams::new(150.0, 3),
        &ClassifierRules::default(),
        Arc::clone(&source),
        Arc::clone(&sink),
        2,
    )
    .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0, "Paris");
    assert!(results[0].1.is_ok());
    assert_eq!(results[1].0, "Milan");
    assert!(matches!(
        &results[1].1,
        Err(PipelineError::Sink(SinkError::Rejected { .. }))
    ));

    assert!(sink.inner.documents_for("Paris").is_some());
    assert!(sink.inner.documents_for("Milan").is_none());
}

#[tokio::test]
async fn test_city_ids_are_namespaced_per_city() {
    let params = ClusterParams::new(150.0, 3);
    let rules = ClassifierRules::default();

    let (paris_pois, _) = normalize(&dense_dining_records("Paris"), "Paris");
    let (milan_pois, _) = normalize(&dense_dining_records("Milan"), "Milan");

    let (paris_districts, _) = build_districts(&paris_pois, "Paris", &params, &rules);
    let (milan_districts, _) = build_districts(&milan_pois, "Milan", &params, &rules);

    assert_eq!(paris_districts[0].id, "paris-0");
    assert_eq!(milan_districts[0].id, "milan-0");
}

#[tokio::test]
async fn test_jsonl_source_to_jsonl_sink_round() {
    let scratch = std::env::temp_dir().join(format!(
        "districting-integration-{}",
        std::process::id()
    ));
    std::fs::create_dir_all(&scratch).unwrap();

    // Write the acquisition file
    let input = scratch.join("pois.jsonl");
    let mut lines = String::new();
    for record in dense_dining_records("Paris") {
        lines.push_str(&serde_json::to_string(&record).unwrap());
        lines.push('\n');
    }
    std::fs::write(&input, lines).unwrap();

    let source = JsonlSource::new(&input);
    let sink = JsonlSink::new(scratch.join("out"));
    let rules = ClassifierRules::default();

    let report = run_city("Paris", &ClusterParams::new(150.0, 3), &rules, &source, &sink)
        .await
        .unwrap();
    assert_eq!(report.districts, 1);

    let written = std::fs::read_to_string(sink.file_for("Paris")).unwrap();
    let document: DistrictDocument = serde_json::from_str(written.lines().next().unwrap()).unwrap();
    assert_eq!(document.area_type, AreaType::Dining);
    assert_eq!(document.poi_count, 5);

    std::fs::remove_dir_all(&scratch).ok();
}

fn poi_grid(points: &[(f64, f64)]) -> Vec<Poi> {
    points
        .iter()
        .enumerate()
        .map(|(i, (lat, lon))| Poi {
            id: format!("p{i}"),
            name: Some(format!("P{i}")),
            location: GeoPoint::new(*lat, *lon),
            categories: BTreeSet::new(),
            city: "Testville".to_string(),
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_boundary_always_contains_its_members(
        points in prop::collection::vec((47.00f64..47.05, 8.00f64..8.05), 1..40)
    ) {
        let coordinates: Vec<GeoPoint> =
            points.iter().map(|(lat, lon)| GeoPoint::new(*lat, *lon)).collect();
        let ring = extract_boundary(&coordinates);

        prop_assert!(ring.len() >= 4);
        prop_assert_eq!(ring.first(), ring.last());
        for point in &coordinates {
            prop_assert!(
                districting::geo::ring_contains(&ring, point),
                "{:?} escaped its boundary",
                point
            );
        }
    }

    #[test]
    fn prop_clustering_partitions_every_input(
        points in prop::collection::vec((47.00f64..47.02, 8.00f64..8.02), 0..60),
        min_points in 1usize..6
    ) {
        let pois = poi_grid(&points);
        let clustering = cluster(&pois, &ClusterParams::new(250.0, min_points));

        let mut seen: Vec<usize> = clustering.noise.clone();
        for members in &clustering.clusters {
            prop_assert!(members.len() >= 1);
            seen.extend(members);
        }
        seen.sort_unstable();
        let expected: Vec<usize> = (0..pois.len()).collect();
        prop_assert_eq!(seen, expected);
    }
}
