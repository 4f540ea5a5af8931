//! Lineage Resolver
//!
//! Follows a datapoint's declared source edge upstream, one index lookup per
//! step, and records how the walk ended. A repeated pair ends the walk
//! without being appended, so malformed cyclic data still terminates.

use crate::catalog::model::{ColumnKey, Layer};
use crate::catalog::store::FactStore;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// How a lineage walk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Last pair is a datapoint with no source
    Root,
    /// Last pair has no datapoint in the store
    Dangling,
    /// Next source was already visited
    Cycle,
    /// Step bound reached before the chain ended
    DepthLimit,
}

/// Upstream chain, nearest source first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageChain {
    pub start: ColumnKey,
    pub steps: Vec<ColumnKey>,
    pub termination: Termination,
}

/// Source edge of the datapoint with this natural key. With duplicate keys
/// the first datapoint in load order that declares a source wins.
pub fn immediate_source<'a>(store: &'a FactStore, key: &ColumnKey) -> Option<&'a ColumnKey> {
    store.points_with_key(key).find_map(|dp| dp.source.as_ref())
}

/// Every declared edge as (datapoint, source), in load order
pub fn all_edges(store: &FactStore) -> impl Iterator<Item = (&ColumnKey, &ColumnKey)> {
    store
        .data_points()
        .iter()
        .filter_map(|dp| dp.source.as_ref().map(|source| (&dp.key, source)))
}

/// The edge `immediate_source` resolves to, once per natural key, in load order
pub fn resolved_edges(store: &FactStore) -> impl Iterator<Item = (&ColumnKey, &ColumnKey)> {
    let mut seen = HashSet::new();
    all_edges(store).filter(move |(target, _)| seen.insert(*target))
}

/// Layer of the first dataset carrying this view name
pub fn layer_of(store: &FactStore, view: &str) -> Option<Layer> {
    store.datasets_named(view).find_map(|ds| ds.layer)
}

/// Walk upstream from `start`, taking at most `max_depth` steps
pub fn lineage_chain(store: &FactStore, start: &ColumnKey, max_depth: usize) -> LineageChain {
    let mut visited: HashSet<&ColumnKey> = HashSet::from([start]);
    let mut steps: Vec<ColumnKey> = Vec::new();
    let mut current = start;

    let termination = loop {
        let Some(source) = immediate_source(store, current) else {
            break if store.contains_point(current) {
                Termination::Root
            } else {
                Termination::Dangling
            };
        };
        if !visited.insert(source) {
            break Termination::Cycle;
        }
        if steps.len() == max_depth {
            warn!("Lineage walk from {} stopped after {} steps", start, max_depth);
            break Termination::DepthLimit;
        }
        steps.push(source.clone());
        current = source;
    };

    LineageChain {
        start: start.clone(),
        steps,
        termination,
    }
}
