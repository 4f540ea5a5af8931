//! Impact Resolver
//!
//! "What breaks if this column changes?"
//! Walks the lineage edges in the downstream direction using the reverse
//! index built at load time: one hop, the transitive closure, and a
//! blast-radius style report over the closure.

use crate::catalog::model::ColumnKey;
use crate::catalog::store::FactStore;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use tracing::warn;

/// A column affected by a change to the source column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactedColumn {
    pub key: ColumnKey,
    /// The column it reads from directly
    pub via: ColumnKey,
    /// Hops from the source
    pub distance: u32,
    pub is_direct: bool,
}

/// Transitive closure of downstream impact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitiveImpact {
    pub source: ColumnKey,
    pub impacted: Vec<ImpactedColumn>,
    /// Set when the depth bound cut the walk short
    pub truncated: bool,
}

/// Natural keys whose immediate source is `source`, in load order. Exact
/// inverse of `immediate_source`, also under duplicate natural keys.
pub fn downstream_impact<'a>(store: &'a FactStore, source: &ColumnKey) -> Vec<&'a ColumnKey> {
    let mut seen = HashSet::new();
    store
        .dependents_of(source)
        .map(|dp| &dp.key)
        .filter(|key| seen.insert(*key))
        .collect()
}

/// Breadth-first downstream closure, at most `max_depth` hops from `source`
pub fn transitive_impact(store: &FactStore, source: &ColumnKey, max_depth: usize) -> TransitiveImpact {
    let mut visited: HashSet<&ColumnKey> = HashSet::from([source]);
    let mut impacted = Vec::new();
    let mut queue: VecDeque<(&ColumnKey, u32)> = VecDeque::from([(source, 0)]);
    let mut truncated = false;

    while let Some((current, distance)) = queue.pop_front() {
        for dependent in downstream_impact(store, current) {
            if visited.contains(dependent) {
                continue;
            }
            if distance as usize >= max_depth {
                truncated = true;
                continue;
            }
            visited.insert(dependent);
            impacted.push(ImpactedColumn {
                key: dependent.clone(),
                via: current.clone(),
                distance: distance + 1,
                is_direct: distance == 0,
            });
            queue.push_back((dependent, distance + 1));
        }
    }

    if truncated {
        warn!("Impact walk from {} stopped at depth {}", source, max_depth);
    }

    TransitiveImpact {
        source: source.clone(),
        impacted,
        truncated,
    }
}

// =============================================================================
// IMPACT REPORT
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactSummary {
    pub direct_columns: usize,
    pub transitive_columns: usize,
    pub total_columns: usize,
    pub affected_views: usize,
    pub max_depth: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactRiskLevel {
    /// Nothing reads from it
    None,
    /// Only direct dependents
    Contained,
    /// Has transitive dependents
    Spreading,
    /// More than half of all columns
    Widespread,
}

/// Complete impact analysis result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactReport {
    pub source: ColumnKey,
    pub impacted: Vec<ImpactedColumn>,
    pub truncated: bool,
    pub summary: ImpactSummary,
    pub risk_level: ImpactRiskLevel,
    pub explanation: String,
}

pub struct ImpactAnalyzer;

impl ImpactAnalyzer {
    pub fn analyze(store: &FactStore, source: &ColumnKey, max_depth: usize) -> ImpactReport {
        let closure = transitive_impact(store, source, max_depth);
        let summary = Self::calculate_summary(&closure.impacted);
        let risk_level = Self::assess_risk(&summary, store.data_points().len());
        let explanation = Self::generate_explanation(source, &summary, risk_level);

        ImpactReport {
            source: closure.source,
            impacted: closure.impacted,
            truncated: closure.truncated,
            summary,
            risk_level,
            explanation,
        }
    }

    fn calculate_summary(impacted: &[ImpactedColumn]) -> ImpactSummary {
        let direct_columns = impacted.iter().filter(|i| i.is_direct).count();
        let transitive_columns = impacted.len() - direct_columns;
        let affected_views = impacted
            .iter()
            .map(|i| i.key.view.as_str())
            .collect::<HashSet<_>>()
            .len();
        let max_depth = impacted.iter().map(|i| i.distance).max().unwrap_or(0);

        ImpactSummary {
            direct_columns,
            transitive_columns,
            total_columns: impacted.len(),
            affected_views,
            max_depth,
        }
    }

    fn assess_risk(summary: &ImpactSummary, total_columns: usize) -> ImpactRiskLevel {
        if summary.total_columns == 0 {
            return ImpactRiskLevel::None;
        }

        let impact_ratio = summary.total_columns as f64 / total_columns.max(1) as f64;

        if impact_ratio > 0.5 {
            ImpactRiskLevel::Widespread
        } else if summary.transitive_columns > 0 {
            ImpactRiskLevel::Spreading
        } else {
            ImpactRiskLevel::Contained
        }
    }

    fn generate_explanation(source: &ColumnKey, summary: &ImpactSummary, risk: ImpactRiskLevel) -> String {
        match risk {
            ImpactRiskLevel::None => format!("Nothing derives from {}. Safe to modify.", source),
            ImpactRiskLevel::Contained => format!(
                "Changes to {} directly affect {} column(s). No transitive dependents.",
                source, summary.direct_columns
            ),
            ImpactRiskLevel::Spreading => format!(
                "Changes to {} cascade to {} columns across {} views ({} direct, {} transitive).",
                source,
                summary.total_columns,
                summary.affected_views,
                summary.direct_columns,
                summary.transitive_columns
            ),
            ImpactRiskLevel::Widespread => format!(
                "Changes to {} reach {} columns, more than half of the catalog.",
                source, summary.total_columns
            ),
        }
    }
}
