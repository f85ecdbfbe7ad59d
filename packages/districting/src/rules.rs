//! Classification rule tables.
//!
//! Both classifiers are table-driven: a label owns a weighted tag set,
//! a district's score for the label is the sum over matching tags of
//! `count * weight`, and the highest score wins. Ties resolve to the
//! label that appears first in the table. Keeping the tables as plain
//! serde data makes them inspectable and swappable without touching
//! the scoring code.

use serde::{Deserialize, Serialize};

use crate::types::district::{AreaType, RealEstateClass};

/// One weighted category tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagWeight {
    pub tag: String,
    pub weight: f64,
}

impl TagWeight {
    pub fn new(tag: impl Into<String>, weight: f64) -> Self {
        Self {
            tag: tag.into(),
            weight,
        }
    }
}

/// The weighted tag set for one area label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaRule {
    pub area_type: AreaType,
    pub tags: Vec<TagWeight>,
}

/// The weighted tag set for one real-estate label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRule {
    pub class: RealEstateClass,
    pub tags: Vec<TagWeight>,
}

/// Full rule configuration for both classifiers.
///
/// Table order is the tie-break priority. The two tables are
/// independent: a tag may appear in both without the classifiers
/// interacting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierRules {
    pub area_rules: Vec<AreaRule>,
    pub class_rules: Vec<ClassRule>,
}

fn area(area_type: AreaType, tags: &[(&str, f64)]) -> AreaRule {
    AreaRule {
        area_type,
        tags: tags.iter().map(|(t, w)| TagWeight::new(*t, *w)).collect(),
    }
}

fn class(class: RealEstateClass, tags: &[(&str, f64)]) -> ClassRule {
    ClassRule {
        class,
        tags: tags.iter().map(|(t, w)| TagWeight::new(*t, *w)).collect(),
    }
}

impl Default for ClassifierRules {
    /// The vocabulary the pipeline ships with, built around common
    /// OSM-style category tags.
    fn default() -> Self {
        Self {
            area_rules: vec![
                area(
                    AreaType::Downtown,
                    &[
                        ("boutique", 1.0),
                        ("jewelry", 1.0),
                        ("department_store", 0.8),
                        ("perfumery", 0.8),
                        ("watches", 0.8),
                        ("shoes", 0.6),
                    ],
                ),
                area(
                    AreaType::University,
                    &[
                        ("university", 1.0),
                        ("college", 1.0),
                        ("school", 0.8),
                        ("dormitory", 0.8),
                        ("library", 0.6),
                    ],
                ),
                area(
                    AreaType::Nature,
                    &[
                        ("park", 1.0),
                        ("forest", 1.0),
                        ("garden", 0.8),
                        ("beach", 0.8),
                        ("waterway", 0.6),
                        ("playground", 0.4),
                    ],
                ),
                area(
                    AreaType::Ethnic,
                    &[
                        ("place_of_worship", 1.0),
                        ("church", 0.8),
                        ("mosque", 0.8),
                        ("synagogue", 0.8),
                        ("monastery", 0.8),
                        ("theatre", 0.6),
                    ],
                ),
                area(
                    AreaType::Tourist,
                    &[
                        ("attraction", 1.0),
                        ("museum", 1.0),
                        ("monument", 0.9),
                        ("viewpoint", 0.8),
                        ("hotel", 0.6),
                        ("marketplace", 0.6),
                    ],
                ),
                area(
                    AreaType::TechHub,
                    &[
                        ("coworking_space", 1.0),
                        ("research_institute", 0.9),
                        ("electronics", 0.6),
                        ("internet_cafe", 0.4),
                    ],
                ),
                area(
                    AreaType::Industrial,
                    &[
                        ("industrial", 1.0),
                        ("factory", 1.0),
                        ("warehouse", 0.9),
                        ("works", 0.8),
                        ("depot", 0.6),
                    ],
                ),
                area(
                    AreaType::Dining,
                    &[
                        ("restaurant", 1.0),
                        ("cafe", 1.0),
                        ("bakery", 0.8),
                        ("fast_food", 0.8),
                        ("food_court", 0.6),
                    ],
                ),
                area(
                    AreaType::Business,
                    &[
                        ("office", 1.0),
                        ("bank", 0.8),
                        ("company", 0.8),
                        ("commercial", 0.6),
                        ("conference_centre", 0.6),
                    ],
                ),
                area(
                    AreaType::Nightlife,
                    &[
                        ("bar", 1.0),
                        ("nightclub", 1.0),
                        ("pub", 0.9),
                        ("casino", 0.8),
                        ("biergarten", 0.6),
                    ],
                ),
            ],
            class_rules: vec![
                class(
                    RealEstateClass::Upper,
                    &[
                        ("skyscraper", 1.0),
                        ("penthouse", 1.0),
                        ("marina", 0.8),
                        ("golf_course", 0.8),
                        ("spa", 0.6),
                        ("lounge", 0.6),
                    ],
                ),
                class(
                    RealEstateClass::Middle,
                    &[
                        ("apartments", 0.8),
                        ("residential", 0.8),
                        ("convenience", 0.6),
                        ("hairdresser", 0.4),
                        ("parking", 0.4),
                    ],
                ),
                class(
                    RealEstateClass::Lower,
                    &[
                        ("prison", 1.0),
                        ("ruins", 0.9),
                        ("second_hand", 0.8),
                        ("grave_yard", 0.6),
                        ("supermarket", 0.6),
                        ("school", 0.6),
                    ],
                ),
            ],
        }
    }
}
