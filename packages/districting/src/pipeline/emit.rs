//! Emission: enriched districts to sink documents.

use crate::types::district::{District, DistrictDocument, PolygonShape};

/// Convert one district into the document shape sinks accept.
///
/// Geometry goes out as `[longitude, latitude]` pairs with the ring
/// closed; classification and counts are carried over as-is. The
/// document holds nothing else, so identical districts always render
/// identical bytes.
pub fn to_document(district: &District) -> DistrictDocument {
    DistrictDocument {
        city: district.city.clone(),
        shape: PolygonShape::from_ring(&district.boundary),
        area_type: district.area_type,
        real_estate_class: district.real_estate_class,
        poi_count: district.poi_count(),
        category_counts: district.category_counts.clone(),
    }
}
