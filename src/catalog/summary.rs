//! Summary and aggregation
//!
//! Counting and distinct listings over any relation. Listings come back
//! sorted ascending and deduplicated; counts are over distinct view names.

use crate::catalog::governance::{complete_pipeline, incomplete_pipeline};
use crate::catalog::model::Layer;
use crate::catalog::predicates::{datasets_in_layer, datasets_in_subject_area};
use crate::catalog::store::FactStore;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Headline numbers for one store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSummary {
    pub subject_areas: Vec<String>,
    pub data_sources: Vec<String>,
    pub datasets_by_layer: BTreeMap<Layer, usize>,
    pub datasets_by_subject_area: BTreeMap<String, usize>,
    pub complete_pipelines: Vec<String>,
    pub incomplete_pipelines: Vec<String>,
}

/// Distinct values, sorted ascending
pub fn distinct_sorted<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    values
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Number of distinct view names in a relation
pub fn count_distinct<'a>(views: impl IntoIterator<Item = &'a str>) -> usize {
    views.into_iter().collect::<HashSet<_>>().len()
}

pub fn all_subject_areas(store: &FactStore) -> Vec<String> {
    distinct_sorted(store.datasets().iter().filter_map(|ds| ds.subject_area.as_deref()))
}

pub fn all_data_sources(store: &FactStore) -> Vec<String> {
    distinct_sorted(store.datasets().iter().filter_map(|ds| ds.data_source.as_deref()))
}

pub fn count_in_layer(store: &FactStore, layer: Layer) -> usize {
    count_distinct(datasets_in_layer(store, layer))
}

/// One entry per layer in pipeline order, zero counts included
pub fn count_by_layer(store: &FactStore) -> Vec<(Layer, usize)> {
    Layer::ALL
        .iter()
        .map(|&layer| (layer, count_in_layer(store, layer)))
        .collect()
}

/// One entry per present subject area, sorted by subject area
pub fn count_by_subject_area(store: &FactStore) -> Vec<(String, usize)> {
    all_subject_areas(store)
        .into_iter()
        .map(|area| {
            let count = count_distinct(datasets_in_subject_area(store, &area));
            (area, count)
        })
        .collect()
}

pub fn summarize(store: &FactStore) -> CatalogSummary {
    CatalogSummary {
        subject_areas: all_subject_areas(store),
        data_sources: all_data_sources(store),
        datasets_by_layer: count_by_layer(store).into_iter().collect(),
        datasets_by_subject_area: count_by_subject_area(store).into_iter().collect(),
        complete_pipelines: complete_pipeline(store),
        incomplete_pipelines: incomplete_pipeline(store),
    }
}
