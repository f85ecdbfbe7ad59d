//! Normalization: raw acquisition records to canonical POIs.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::geo::GeoPoint;
use crate::types::config::NormalizeStats;
use crate::types::poi::{Poi, RawPoi};

/// Clean one raw category tag. Empty after trimming means no tag.
fn clean_tag(raw: &str) -> Option<String> {
    let cleaned = raw.trim().to_lowercase();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Validate and canonicalize raw records for one city.
///
/// Records labeled with another city are skipped; malformed records
/// are dropped and counted per reason. This stage never fails: a
/// fully unusable input yields an empty POI set plus a stats block
/// saying why. Output order follows input order, which downstream
/// stages rely on for reproducible clustering.
pub fn normalize(records: &[RawPoi], city: &str) -> (Vec<Poi>, NormalizeStats) {
    let mut stats = NormalizeStats {
        records_in: records.len(),
        ..Default::default()
    };
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut pois: Vec<Poi> = Vec::new();

    for record in records {
        let record_city = record
            .city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let Some(record_city) = record_city else {
            stats.missing_city += 1;
            continue;
        };
        if !record_city.eq_ignore_ascii_case(city) {
            stats.other_city += 1;
            continue;
        }

        let (Some(raw_lat), Some(raw_lon)) = (&record.latitude, &record.longitude) else {
            stats.missing_coordinates += 1;
            continue;
        };
        let (Some(lat), Some(lon)) = (raw_lat.as_f64(), raw_lon.as_f64()) else {
            stats.invalid_coordinates += 1;
            continue;
        };
        let location = GeoPoint::new(lat, lon);
        if !location.is_valid() {
            stats.invalid_coordinates += 1;
            continue;
        }

        let name = record
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        let categories: BTreeSet<String> = record
            .categories
            .iter()
            .filter_map(|c| clean_tag(c))
            .collect();

        let id = Poi::derive_id(city, name.as_deref(), &location);
        if !seen_ids.insert(id.clone()) {
            stats.duplicates += 1;
            continue;
        }

        pois.push(Poi {
            id,
            name,
            location,
            categories,
            city: city.to_string(),
        });
    }

    stats.kept = pois.len();
    debug!(
        "Normalization for {} kept {} of {} ({} duplicates)",
        city, stats.kept, stats.records_in, stats.duplicates
    );
    (pois, stats)
}
