//! Predicate Evaluator
//!
//! Pure filters over the fact store. Attribute filters yield view names in
//! dataset load order; sensitivity filters yield datapoints in load order.
//! Nothing here fails: an empty store or a missing attribute just means no
//! match.

use crate::catalog::model::{DataPoint, Dataset, Layer};
use crate::catalog::store::FactStore;
use serde::{Deserialize, Serialize};

/// Text that ingestion uses for a missing value
pub const ABSENT_SENTINEL: &str = "null";

pub const CONFIDENTIAL_LABELS: [&str; 2] = ["Confidential", "Restricted"];
pub const CRITICAL_AFFIRMATIVE: &str = "Yes";
pub const PRODUCTION_STATUS: &str = "Production";
pub const DEPRECATED_STATE: &str = "Deprecated";

/// Tunables for the evaluation rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationPolicy {
    /// Case-sensitive substrings that mark a sensitivity rationale as PII
    pub pii_markers: Vec<String>,
    /// Step bound for lineage and impact walks
    pub max_traversal_depth: usize,
}

impl Default for EvaluationPolicy {
    fn default() -> Self {
        Self {
            pii_markers: vec!["PII".to_string(), "personally identifiable".to_string()],
            max_traversal_depth: 1024,
        }
    }
}

pub fn is_absent(value: &str) -> bool {
    value.is_empty() || value == ABSENT_SENTINEL
}

pub fn is_present(value: &str) -> bool {
    !is_absent(value)
}

/// Present-ness of an optional attribute
pub fn has(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(is_present)
}

fn equals(value: &Option<String>, expected: &str) -> bool {
    value.as_deref() == Some(expected)
}

// =============================================================================
// DATASET FILTERS
// =============================================================================

pub fn datasets_in_layer(store: &FactStore, layer: Layer) -> impl Iterator<Item = &str> {
    select(store, move |ds| ds.layer == Some(layer))
}

pub fn datasets_in_subject_area<'a>(store: &'a FactStore, subject_area: &'a str) -> impl Iterator<Item = &'a str> {
    select(store, move |ds| equals(&ds.subject_area, subject_area))
}

pub fn datasets_from_source<'a>(store: &'a FactStore, source: &'a str) -> impl Iterator<Item = &'a str> {
    select(store, move |ds| equals(&ds.data_source, source))
}

/// Conjunction of layer and subject-area filters
pub fn datasets_filtered<'a>(
    store: &'a FactStore,
    layer: Layer,
    subject_area: &'a str,
) -> impl Iterator<Item = &'a str> {
    select(store, move |ds| {
        ds.layer == Some(layer) && equals(&ds.subject_area, subject_area)
    })
}

fn select<'a, F>(store: &'a FactStore, predicate: F) -> impl Iterator<Item = &'a str>
where
    F: Fn(&Dataset) -> bool + 'a,
{
    store
        .datasets()
        .iter()
        .filter(move |ds| predicate(*ds))
        .map(|ds| ds.view_name.as_str())
}

pub fn has_reviewer(ds: &Dataset) -> bool {
    has(&ds.reviewer)
}

pub fn has_validator(ds: &Dataset) -> bool {
    has(&ds.validator)
}

pub fn has_steward(dp: &DataPoint) -> bool {
    has(&dp.data_steward)
}

pub fn is_layer(ds: &Dataset, layer: Layer) -> bool {
    ds.layer == Some(layer)
}

// =============================================================================
// SENSITIVITY
// =============================================================================

pub fn is_confidential_or_restricted(dp: &DataPoint) -> bool {
    dp.sensitivity_label
        .as_deref()
        .is_some_and(|label| CONFIDENTIAL_LABELS.contains(&label))
}

/// Rationale present and mentioning any configured marker
pub fn is_pii(dp: &DataPoint, policy: &EvaluationPolicy) -> bool {
    match dp.sensitivity_rationale.as_deref() {
        Some(rationale) if is_present(rationale) => policy
            .pii_markers
            .iter()
            .any(|marker| !marker.is_empty() && rationale.contains(marker.as_str())),
        _ => false,
    }
}

pub fn is_critical(dp: &DataPoint) -> bool {
    equals(&dp.critical_indicator, CRITICAL_AFFIRMATIVE)
}

pub fn is_production(dp: &DataPoint) -> bool {
    equals(&dp.environment_status, PRODUCTION_STATUS)
}

pub fn is_deprecated(dp: &DataPoint) -> bool {
    equals(&dp.db_state, DEPRECATED_STATE)
}

/// Datapoints matching `predicate`, in load order
pub fn points_where<'a, F>(store: &'a FactStore, predicate: F) -> impl Iterator<Item = &'a DataPoint>
where
    F: Fn(&DataPoint) -> bool + 'a,
{
    store.data_points().iter().filter(move |dp| predicate(*dp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::tests::{dataset_row, point_row, store, with};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_absence_covers_empty_and_sentinel() {
        assert!(is_absent(""));
        assert!(is_absent("null"));
        assert!(is_present("Null"));
        assert!(is_present("Alice"));
        assert!(!has(&None));
        assert!(has(&Some("Alice".to_string())));
    }

    #[test]
    fn test_attribute_filters() {
        let store = store(
            vec![
                dataset_row("bronze_c", Some("Bronze"), Some("Customer"), Some("CRM"), None, None),
                dataset_row("gold_c", Some("Gold"), Some("Customer"), Some("CRM"), None, None),
                dataset_row("gold_o", Some("Gold"), Some("Order"), Some("ERP"), None, None),
                dataset_row("loose", None, None, None, None, None),
            ],
            vec![],
        );

        assert_eq!(datasets_in_layer(&store, Layer::Gold).collect::<Vec<_>>(), vec!["gold_c", "gold_o"]);
        assert_eq!(
            datasets_in_subject_area(&store, "Customer").collect::<Vec<_>>(),
            vec!["bronze_c", "gold_c"]
        );
        assert_eq!(datasets_from_source(&store, "ERP").collect::<Vec<_>>(), vec!["gold_o"]);
        assert_eq!(
            datasets_filtered(&store, Layer::Gold, "Customer").collect::<Vec<_>>(),
            vec!["gold_c"]
        );
    }

    #[test]
    fn test_filters_on_empty_store() {
        let store = FactStore::empty();
        assert_eq!(datasets_in_layer(&store, Layer::Bronze).count(), 0);
        assert_eq!(points_where(&store, is_critical).count(), 0);
    }

    #[test]
    fn test_pii_is_case_sensitive_substring() {
        let policy = EvaluationPolicy::default();
        let point = |rationale: &str| {
            crate::catalog::model::DataPoint::from_row(0, &with(point_row("v", "c", None), 16, rationale))
                .unwrap()
        };

        assert!(is_pii(&point("Contains personally identifiable information (PII)"), &policy));
        assert!(is_pii(&point("PII"), &policy));
        assert!(!is_pii(&point("contains pii"), &policy));
        assert!(!is_pii(&point("Non-sensitive business data"), &policy));
        assert!(!is_pii(&point("null"), &policy));
    }

    #[test]
    fn test_sensitivity_literals() {
        let row = point_row("v", "c", None);
        let row = with(row, 15, "Restricted");
        let row = with(row, 17, "Yes");
        let row = with(row, 6, "Production");
        let row = with(row, 7, "Deprecated");
        let dp = crate::catalog::model::DataPoint::from_row(0, &row).unwrap();

        assert!(is_confidential_or_restricted(&dp));
        assert!(is_critical(&dp));
        assert!(is_production(&dp));
        assert!(is_deprecated(&dp));
        assert!(!has_steward(&dp));

        let dp = crate::catalog::model::DataPoint::from_row(0, &with(point_row("v", "c", None), 17, "No")).unwrap();
        assert!(!is_critical(&dp));
        assert!(!is_confidential_or_restricted(&dp));
    }
}
