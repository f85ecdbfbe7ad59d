//! The per-city districting pipeline.
//!
//! Stages run strictly in sequence: normalize, cluster, extract
//! boundaries, classify, emit. Each stage consumes the previous
//! stage's output and touches nothing else. I/O happens only at the
//! ends, one fetch from the source and one whole-batch commit to the
//! sink, so a failed run never leaves partial output behind.

pub mod boundary;
pub mod classify;
pub mod cluster;
pub mod emit;
pub mod normalize;

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, PipelineError, Result};
use crate::geo::{self, GeoPoint};
use crate::rules::ClassifierRules;
use crate::traits::sink::DistrictSink;
use crate::traits::source::PoiSource;
use crate::types::config::{CityRunReport, ClusterParams};
use crate::types::district::{city_slug, District, DistrictDocument};
use crate::types::poi::Poi;

/// Build enriched districts from one city's normalized POIs.
///
/// Pure computation, no I/O: callers with an in-memory POI set can
/// use this directly without source or sink plumbing. District ids
/// are `{city-slug}-{seq}` in cluster discovery order. Returns the
/// districts plus the count of POIs left as noise.
pub fn build_districts(
    pois: &[Poi],
    city: &str,
    params: &ClusterParams,
    rules: &ClassifierRules,
) -> (Vec<District>, usize) {
    let clustering = cluster::cluster(pois, params);
    let slug = city_slug(city);

    let districts = clustering
        .clusters
        .iter()
        .enumerate()
        .map(|(seq, member_indices)| {
            let members: Vec<&Poi> = member_indices.iter().map(|&i| &pois[i]).collect();
            let coordinates: Vec<GeoPoint> = members.iter().map(|p| p.location).collect();

            let centroid = geo::centroid(&coordinates);
            let boundary = boundary::extract_boundary(&coordinates);
            let category_counts = classify::count_categories(members.iter().copied());
            let area_type = classify::classify_area(&category_counts, rules);
            let real_estate_class = classify::classify_real_estate(&category_counts, rules);

            District {
                id: format!("{slug}-{seq}"),
                city: city.to_string(),
                members: members.iter().map(|p| p.id.clone()).collect(),
                centroid,
                boundary,
                area_type,
                real_estate_class,
                category_counts,
            }
        })
        .collect();

    (districts, clustering.noise.len())
}

/// Run the full pipeline for one city.
///
/// Fetches raw records, normalizes them, clusters, enriches, emits
/// and commits the city's documents as one batch. Configuration is
/// validated before any I/O; a sink error means nothing for this city
/// counts as committed. A city with zero districts is a valid outcome
/// and commits an empty batch.
pub async fn run_city<S, K>(
    city: &str,
    params: &ClusterParams,
    rules: &ClassifierRules,
    source: &S,
    sink: &K,
) -> Result<CityRunReport>
where
    S: PoiSource + ?Sized,
    K: DistrictSink + ?Sized,
{
    params.validate()?;
    if city.trim().is_empty() {
        return Err(ConfigError::EmptyCity.into());
    }

    let started_at = Utc::now();
    let timer = Instant::now();

    // 1. Fetch raw records
    info!("Districting {}: fetching records from {}", city, source.name());
    let records = source.fetch(city).await?;

    // 2. Normalize
    let (pois, normalize_stats) = normalize::normalize(&records, city);
    info!(
        "Normalized {}/{} records for {} ({} dropped, {} other-city)",
        normalize_stats.kept,
        normalize_stats.records_in,
        city,
        normalize_stats.dropped(),
        normalize_stats.other_city
    );

    // 3. Cluster, bound and classify
    let (districts, noise_pois) = build_districts(&pois, city, params, rules);
    for district in &districts {
        debug!(
            "{}: {:?}/{:?} with {} POIs over {:.3} km2",
            district.id,
            district.area_type,
            district.real_estate_class,
            district.poi_count(),
            geo::ring_area_km2(&district.boundary)
        );
    }

    // 4. Emit and commit the whole batch
    let documents: Vec<DistrictDocument> = districts.iter().map(emit::to_document).collect();
    sink.commit_city(city, &documents).await?;
    info!(
        "Committed {} districts for {} to {} ({} POIs clustered, {} noise)",
        documents.len(),
        city,
        sink.name(),
        pois.len() - noise_pois,
        noise_pois
    );

    Ok(CityRunReport {
        city: city.to_string(),
        normalize: normalize_stats,
        districts: districts.len(),
        noise_pois,
        documents_committed: documents.len(),
        started_at,
        elapsed_ms: timer.elapsed().as_millis() as u64,
    })
}

/// Run several cities as independent workers.
///
/// Each city owns its own id namespace and sink batch; one city's
/// failure is reported in its slot and never disturbs the others.
/// `concurrency` bounds how many cities are in flight at once.
/// Results come back in input order.
pub async fn run_cities<S, K>(
    cities: &[String],
    params: &ClusterParams,
    rules: &ClassifierRules,
    source: Arc<S>,
    sink: Arc<K>,
    concurrency: usize,
) -> Vec<(String, Result<CityRunReport>)>
where
    S: PoiSource + 'static,
    K: DistrictSink + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut handles = Vec::with_capacity(cities.len());

    for city in cities {
        let city = city.clone();
        let params = params.clone();
        let rules = rules.clone();
        let source = Arc::clone(&source);
        let sink = Arc::clone(&sink);
        let semaphore = Arc::clone(&semaphore);

        handles.push((
            city.clone(),
            tokio::spawn(async move {
                let _permit = semaphore.acquire().await.unwrap();
                run_city(&city, &params, &rules, source.as_ref(), sink.as_ref()).await
            }),
        ));
    }

    let mut results = Vec::with_capacity(handles.len());
    for (city, handle) in handles {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => Err(PipelineError::Worker(e.to_string())),
        };
        if let Err(e) = &outcome {
            warn!("District run failed for {}: {}", city, e);
        }
        results.push((city, outcome));
    }
    results
}
