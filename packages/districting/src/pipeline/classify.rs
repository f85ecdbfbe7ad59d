//! Classification: weighted keyword scoring over member categories.

use indexmap::IndexMap;

use crate::rules::{ClassifierRules, TagWeight};
use crate::types::district::{AreaType, RealEstateClass};
use crate::types::poi::Poi;

/// Tally category tags across a district's members.
///
/// Only named members contribute: a nameless POI still shapes the
/// district's geometry and count, but its tags carry no label weight.
/// Insertion order is first-seen order, which serializes stably.
pub fn count_categories<'a, I>(members: I) -> IndexMap<String, usize>
where
    I: IntoIterator<Item = &'a Poi>,
{
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for poi in members {
        if !poi.has_name() {
            continue;
        }
        for tag in &poi.categories {
            *counts.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Sum of `count * weight` over the tags a rule shares with the counts.
fn score_tags(counts: &IndexMap<String, usize>, tags: &[TagWeight]) -> f64 {
    tags.iter()
        .map(|tw| counts.get(&tw.tag).copied().unwrap_or(0) as f64 * tw.weight)
        .sum()
}

/// Pick the area label with the strictly highest score.
///
/// Ties resolve to the rule that appears first in the table; an
/// all-zero outcome resolves to [`AreaType::Other`].
pub fn classify_area(counts: &IndexMap<String, usize>, rules: &ClassifierRules) -> AreaType {
    let mut best: Option<(AreaType, f64)> = None;
    for rule in &rules.area_rules {
        let score = score_tags(counts, &rule.tags);
        if score <= 0.0 {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((rule.area_type, score)),
        }
    }
    best.map(|(label, _)| label).unwrap_or(AreaType::Other)
}

/// Pick the real-estate label, same contract as [`classify_area`] with
/// [`RealEstateClass::Middle`] as the all-zero fallback.
pub fn classify_real_estate(
    counts: &IndexMap<String, usize>,
    rules: &ClassifierRules,
) -> RealEstateClass {
    let mut best: Option<(RealEstateClass, f64)> = None;
    for rule in &rules.class_rules {
        let score = score_tags(counts, &rule.tags);
        if score <= 0.0 {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((rule.class, score)),
        }
    }
    best.map(|(label, _)| label).unwrap_or_default()
}
