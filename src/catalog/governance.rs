//! Governance Rule Set
//!
//! Compound governance and sensitivity rules built only from the predicate
//! evaluator. Every rule has a stable id in the rule catalog so findings can
//! be grouped and reported.

use crate::catalog::model::{DataPoint, Layer};
use crate::catalog::predicates::{
    datasets_filtered, has_reviewer, has_steward, has_validator, is_confidential_or_restricted,
    is_layer, is_pii, is_production, points_where, EvaluationPolicy,
};
use crate::catalog::store::FactStore;
use crate::catalog::summary::all_subject_areas;
use serde::{Deserialize, Serialize};

/// Rule severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Ownership,
    Sensitivity,
    Pipeline,
}

/// A governance rule definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub severity: Severity,
    pub category: RuleCategory,
}

/// Per-dataset violation kinds, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MissingReviewer,
    MissingValidator,
}

impl ViolationKind {
    pub const ALL: [ViolationKind; 2] = [ViolationKind::MissingReviewer, ViolationKind::MissingValidator];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::MissingReviewer => "missing_reviewer",
            ViolationKind::MissingValidator => "missing_validator",
        }
    }

    pub fn rule_id(&self) -> &'static str {
        match self {
            ViolationKind::MissingReviewer => "G001",
            ViolationKind::MissingValidator => "G002",
        }
    }
}

/// One (view, violation kind) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceViolation {
    pub view_name: String,
    pub violation_type: ViolationKind,
}

/// Why a datapoint counts as high risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskReason {
    ConfidentialWithoutSteward,
}

impl RiskReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskReason::ConfidentialWithoutSteward => "confidential_without_steward",
        }
    }
}

// =============================================================================
// DATASET RULES
// =============================================================================

pub fn dataset_without_reviewer(store: &FactStore) -> impl Iterator<Item = &str> {
    store
        .datasets()
        .iter()
        .filter(|ds| !has_reviewer(ds))
        .map(|ds| ds.view_name.as_str())
}

pub fn dataset_without_validator(store: &FactStore) -> impl Iterator<Item = &str> {
    store
        .datasets()
        .iter()
        .filter(|ds| !has_validator(ds))
        .map(|ds| ds.view_name.as_str())
}

/// Missing both reviewer and validator
pub fn dataset_with_governance_gap(store: &FactStore) -> impl Iterator<Item = &str> {
    store
        .datasets()
        .iter()
        .filter(|ds| !has_reviewer(ds) && !has_validator(ds))
        .map(|ds| ds.view_name.as_str())
}

/// Gold datasets missing a reviewer or a validator
pub fn gold_without_governance(store: &FactStore) -> impl Iterator<Item = &str> {
    store
        .datasets()
        .iter()
        .filter(|ds| is_layer(ds, Layer::Gold) && (!has_reviewer(ds) || !has_validator(ds)))
        .map(|ds| ds.view_name.as_str())
}

/// All missing-reviewer entries, then all missing-validator entries, each
/// class in dataset load order
pub fn governance_violation(store: &FactStore) -> Vec<GovernanceViolation> {
    ViolationKind::ALL
        .iter()
        .flat_map(|&kind| {
            let views: Box<dyn Iterator<Item = &str> + '_> = match kind {
                ViolationKind::MissingReviewer => Box::new(dataset_without_reviewer(store)),
                ViolationKind::MissingValidator => Box::new(dataset_without_validator(store)),
            };
            views.map(move |view| GovernanceViolation {
                view_name: view.to_string(),
                violation_type: kind,
            })
        })
        .collect()
}

// =============================================================================
// DATAPOINT RULES
// =============================================================================

pub fn datapoint_without_steward(store: &FactStore) -> impl Iterator<Item = &DataPoint> {
    points_where(store, |dp| !has_steward(dp))
}

pub fn high_risk_data(store: &FactStore) -> impl Iterator<Item = (&DataPoint, RiskReason)> {
    points_where(store, |dp| is_confidential_or_restricted(dp) && !has_steward(dp))
        .map(|dp| (dp, RiskReason::ConfidentialWithoutSteward))
}

pub fn production_pii_without_steward<'a>(
    store: &'a FactStore,
    policy: &'a EvaluationPolicy,
) -> impl Iterator<Item = &'a DataPoint> {
    points_where(store, move |dp| {
        is_production(dp) && is_pii(dp, policy) && !has_steward(dp)
    })
}

// =============================================================================
// PIPELINE COMPLETENESS
// =============================================================================

/// True iff the subject area has at least one dataset on every layer
pub fn is_complete_pipeline(store: &FactStore, subject_area: &str) -> bool {
    Layer::ALL
        .iter()
        .all(|&layer| datasets_filtered(store, layer, subject_area).next().is_some())
}

/// Subject areas with every layer populated, sorted
pub fn complete_pipeline(store: &FactStore) -> Vec<String> {
    all_subject_areas(store)
        .into_iter()
        .filter(|area| is_complete_pipeline(store, area))
        .collect()
}

/// Subject areas that exist but miss at least one layer, sorted
pub fn incomplete_pipeline(store: &FactStore) -> Vec<String> {
    all_subject_areas(store)
        .into_iter()
        .filter(|area| !is_complete_pipeline(store, area))
        .collect()
}

// =============================================================================
// RULE CATALOG AND REPORT
// =============================================================================

/// Findings count for one rule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleFinding {
    pub rule_id: String,
    pub rule_name: String,
    pub severity: Severity,
    pub count: usize,
}

/// Result of running every rule against one store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceReport {
    pub violations: Vec<GovernanceViolation>,
    pub findings: Vec<RuleFinding>,
    pub has_errors: bool,
    pub has_warnings: bool,
}

/// The governance rule catalog
pub struct GovernanceRules {
    rules: Vec<Rule>,
}

impl GovernanceRules {
    pub fn new() -> Self {
        Self {
            rules: Self::default_rules(),
        }
    }

    pub fn list_rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Count every rule's matches
    pub fn evaluate(&self, store: &FactStore, policy: &EvaluationPolicy) -> GovernanceReport {
        let findings: Vec<RuleFinding> = self
            .rules
            .iter()
            .map(|rule| RuleFinding {
                rule_id: rule.id.clone(),
                rule_name: rule.name.clone(),
                severity: rule.severity,
                count: Self::count_matches(&rule.id, store, policy),
            })
            .collect();

        let has_errors = findings
            .iter()
            .any(|f| f.count > 0 && f.severity == Severity::Error);
        let has_warnings = findings
            .iter()
            .any(|f| f.count > 0 && f.severity == Severity::Warning);

        GovernanceReport {
            violations: governance_violation(store),
            findings,
            has_errors,
            has_warnings,
        }
    }

    fn count_matches(rule_id: &str, store: &FactStore, policy: &EvaluationPolicy) -> usize {
        match rule_id {
            "G001" => dataset_without_reviewer(store).count(),
            "G002" => dataset_without_validator(store).count(),
            "G003" => dataset_with_governance_gap(store).count(),
            "G004" => gold_without_governance(store).count(),
            "G005" => datapoint_without_steward(store).count(),
            "G006" => high_risk_data(store).count(),
            "G007" => production_pii_without_steward(store, policy).count(),
            "G008" => incomplete_pipeline(store).len(),
            _ => 0,
        }
    }

    fn default_rules() -> Vec<Rule> {
        let rule = |id: &str, name: &str, description: &str, severity, category| Rule {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            severity,
            category,
        };

        vec![
            rule(
                ViolationKind::MissingReviewer.rule_id(),
                "Dataset Without Reviewer",
                "Dataset has no assigned reviewer",
                Severity::Warning,
                RuleCategory::Ownership,
            ),
            rule(
                ViolationKind::MissingValidator.rule_id(),
                "Dataset Without Validator",
                "Dataset has no assigned validator",
                Severity::Warning,
                RuleCategory::Ownership,
            ),
            rule(
                "G003",
                "Governance Gap",
                "Dataset has neither reviewer nor validator",
                Severity::Error,
                RuleCategory::Ownership,
            ),
            rule(
                "G004",
                "Gold Without Governance",
                "Gold-layer dataset is missing a reviewer or a validator",
                Severity::Error,
                RuleCategory::Ownership,
            ),
            rule(
                "G005",
                "Datapoint Without Steward",
                "Column has no data steward",
                Severity::Warning,
                RuleCategory::Ownership,
            ),
            rule(
                "G006",
                "High Risk Data",
                "Confidential or restricted column without a data steward",
                Severity::Error,
                RuleCategory::Sensitivity,
            ),
            rule(
                "G007",
                "Production PII Without Steward",
                "Production column carrying PII without a data steward",
                Severity::Error,
                RuleCategory::Sensitivity,
            ),
            rule(
                "G008",
                "Incomplete Pipeline",
                "Subject area lacks a dataset on at least one of Bronze, Silver, Gold",
                Severity::Info,
                RuleCategory::Pipeline,
            ),
        ]
    }
}

impl Default for GovernanceRules {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::tests::{dataset_row, point_row, store, with};
    use pretty_assertions::assert_eq;

    fn contains<'a>(mut views: impl Iterator<Item = &'a str>, view: &str) -> bool {
        views.any(|v| v == view)
    }

    #[test]
    fn test_gold_dataset_missing_reviewer_only() {
        let store = store(
            vec![dataset_row("gold_a", Some("Gold"), None, None, None, Some("Bob"))],
            vec![],
        );

        assert!(contains(dataset_without_reviewer(&store), "gold_a"));
        assert!(contains(gold_without_governance(&store), "gold_a"));
        assert!(!contains(dataset_with_governance_gap(&store), "gold_a"));
    }

    #[test]
    fn test_gold_without_governance_is_gold_only() {
        let store = store(
            vec![
                dataset_row("gold_ok", Some("Gold"), None, None, Some("Ann"), Some("Bob")),
                dataset_row("gold_no_validator", Some("Gold"), None, None, Some("Ann"), None),
                dataset_row("silver_bare", Some("Silver"), None, None, None, None),
            ],
            vec![],
        );

        assert_eq!(
            gold_without_governance(&store).collect::<Vec<_>>(),
            vec!["gold_no_validator"]
        );
        assert_eq!(
            dataset_with_governance_gap(&store).collect::<Vec<_>>(),
            vec!["silver_bare"]
        );
    }

    #[test]
    fn test_governance_violation_order_and_multiplicity() {
        let store = store(
            vec![
                dataset_row("a", None, None, None, None, None),
                dataset_row("b", None, None, None, Some("Ann"), None),
                dataset_row("c", None, None, None, None, Some("Bob")),
                dataset_row("d", None, None, None, Some("Ann"), Some("Bob")),
            ],
            vec![],
        );

        let pairs: Vec<(String, &str)> = governance_violation(&store)
            .into_iter()
            .map(|v| (v.view_name, v.violation_type.as_str()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "missing_reviewer"),
                ("c".to_string(), "missing_reviewer"),
                ("a".to_string(), "missing_validator"),
                ("b".to_string(), "missing_validator"),
            ]
        );
    }

    #[test]
    fn test_datapoint_rules() {
        let policy = EvaluationPolicy::default();
        let confidential = with(point_row("v", "email", None), 15, "Confidential");
        let pii_prod = with(
            with(point_row("v", "phone", None), 16, "Contains PII"),
            6,
            "Production",
        );
        let stewarded = with(with(point_row("v", "ssn", None), 15, "Restricted"), 13, "Alice");

        let store = store(vec![], vec![confidential, pii_prod, stewarded]);

        let unstewarded: Vec<String> = datapoint_without_steward(&store)
            .map(|dp| dp.key.to_string())
            .collect();
        assert_eq!(unstewarded, vec!["v.email", "v.phone"]);

        let risky: Vec<(String, &str)> = high_risk_data(&store)
            .map(|(dp, reason)| (dp.key.to_string(), reason.as_str()))
            .collect();
        assert_eq!(risky, vec![("v.email".to_string(), "confidential_without_steward")]);

        let pii: Vec<String> = production_pii_without_steward(&store, &policy)
            .map(|dp| dp.key.to_string())
            .collect();
        assert_eq!(pii, vec!["v.phone"]);
    }

    #[test]
    fn test_pipeline_completeness() {
        let store = store(
            vec![
                dataset_row("b_cust", Some("Bronze"), Some("Customer"), None, None, None),
                dataset_row("s_cust", Some("Silver"), Some("Customer"), None, None, None),
                dataset_row("g_cust", Some("Gold"), Some("Customer"), None, None, None),
                dataset_row("b_ord", Some("Bronze"), Some("Order"), None, None, None),
                dataset_row("g_ord", Some("Gold"), Some("Order"), None, None, None),
                dataset_row("nowhere", None, None, None, None, None),
            ],
            vec![],
        );

        assert_eq!(complete_pipeline(&store), vec!["Customer"]);
        assert_eq!(incomplete_pipeline(&store), vec!["Order"]);
    }

    #[test]
    fn test_report_counts_rules() {
        let store = store(
            vec![dataset_row("gold_a", Some("Gold"), Some("Customer"), None, None, Some("Bob"))],
            vec![],
        );
        let report = GovernanceRules::new().evaluate(&store, &EvaluationPolicy::default());

        let count = |id: &str| report.findings.iter().find(|f| f.rule_id == id).unwrap().count;
        assert_eq!(count("G001"), 1);
        assert_eq!(count("G002"), 0);
        assert_eq!(count("G004"), 1);
        assert_eq!(count("G008"), 1);
        assert!(report.has_errors);
        assert_eq!(report.violations.len(), 1);
    }
}
