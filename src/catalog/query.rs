//! Query boundary
//!
//! Every derived relation is addressable by name with bound arguments and
//! requested output fields, relational style. Bound fields filter by exact
//! text equality, unbound fields are wildcards. A malformed request is a
//! `QueryError`; no matches is an empty, successful result.

use crate::catalog::error::QueryError;
use crate::catalog::governance::{
    complete_pipeline, datapoint_without_steward, dataset_with_governance_gap,
    dataset_without_reviewer, dataset_without_validator, gold_without_governance,
    governance_violation, high_risk_data, incomplete_pipeline, production_pii_without_steward,
};
use crate::catalog::impact::{downstream_impact, transitive_impact};
use crate::catalog::lineage::{immediate_source, lineage_chain, resolved_edges};
use crate::catalog::model::{ColumnKey, DataPoint, Layer};
use crate::catalog::predicates::{
    datasets_filtered, datasets_from_source, datasets_in_layer, datasets_in_subject_area,
    is_confidential_or_restricted, is_critical, is_deprecated, is_pii, is_production,
    points_where, EvaluationPolicy,
};
use crate::catalog::store::FactStore;
use crate::catalog::summary::{all_data_sources, all_subject_areas, count_by_layer, count_by_subject_area};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Every relation the engine answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    DatasetsInLayer,
    DatasetsInSubjectArea,
    DatasetsFromSource,
    DatasetsFiltered,
    DatasetWithoutReviewer,
    DatasetWithoutValidator,
    DatasetWithGovernanceGap,
    GoldWithoutGovernance,
    GovernanceViolation,
    DatapointWithoutSteward,
    ConfidentialData,
    PiiData,
    CriticalData,
    ProductionData,
    DeprecatedData,
    HighRiskData,
    ProductionPiiWithoutSteward,
    ImmediateSource,
    FullLineage,
    DownstreamImpact,
    TransitiveImpact,
    CompletePipeline,
    IncompletePipeline,
    AllSubjectAreas,
    AllDataSources,
    CountByLayer,
    CountBySubjectArea,
}

const VIEW: &[&str] = &["view_name"];
const VIEW_COLUMN: &[&str] = &["view_name", "column_name"];

impl Relation {
    pub const ALL: [Relation; 27] = [
        Relation::DatasetsInLayer,
        Relation::DatasetsInSubjectArea,
        Relation::DatasetsFromSource,
        Relation::DatasetsFiltered,
        Relation::DatasetWithoutReviewer,
        Relation::DatasetWithoutValidator,
        Relation::DatasetWithGovernanceGap,
        Relation::GoldWithoutGovernance,
        Relation::GovernanceViolation,
        Relation::DatapointWithoutSteward,
        Relation::ConfidentialData,
        Relation::PiiData,
        Relation::CriticalData,
        Relation::ProductionData,
        Relation::DeprecatedData,
        Relation::HighRiskData,
        Relation::ProductionPiiWithoutSteward,
        Relation::ImmediateSource,
        Relation::FullLineage,
        Relation::DownstreamImpact,
        Relation::TransitiveImpact,
        Relation::CompletePipeline,
        Relation::IncompletePipeline,
        Relation::AllSubjectAreas,
        Relation::AllDataSources,
        Relation::CountByLayer,
        Relation::CountBySubjectArea,
    ];

    pub fn parse(name: &str) -> Result<Self, QueryError> {
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.name() == name)
            .ok_or_else(|| QueryError::UnknownRelation(name.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Relation::DatasetsInLayer => "datasets_in_layer",
            Relation::DatasetsInSubjectArea => "datasets_in_subject_area",
            Relation::DatasetsFromSource => "datasets_from_source",
            Relation::DatasetsFiltered => "datasets_filtered",
            Relation::DatasetWithoutReviewer => "dataset_without_reviewer",
            Relation::DatasetWithoutValidator => "dataset_without_validator",
            Relation::DatasetWithGovernanceGap => "dataset_with_governance_gap",
            Relation::GoldWithoutGovernance => "gold_without_governance",
            Relation::GovernanceViolation => "governance_violation",
            Relation::DatapointWithoutSteward => "datapoint_without_steward",
            Relation::ConfidentialData => "confidential_data",
            Relation::PiiData => "pii_data",
            Relation::CriticalData => "critical_data",
            Relation::ProductionData => "production_data",
            Relation::DeprecatedData => "deprecated_data",
            Relation::HighRiskData => "high_risk_data",
            Relation::ProductionPiiWithoutSteward => "production_pii_without_steward",
            Relation::ImmediateSource => "immediate_source",
            Relation::FullLineage => "full_lineage",
            Relation::DownstreamImpact => "downstream_impact",
            Relation::TransitiveImpact => "transitive_impact",
            Relation::CompletePipeline => "complete_pipeline",
            Relation::IncompletePipeline => "incomplete_pipeline",
            Relation::AllSubjectAreas => "all_subject_areas",
            Relation::AllDataSources => "all_data_sources",
            Relation::CountByLayer => "count_by_layer",
            Relation::CountBySubjectArea => "count_by_subject_area",
        }
    }

    /// Output fields, in row order
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Relation::DatasetsInLayer => &["layer", "view_name"],
            Relation::DatasetsInSubjectArea => &["subject_area", "view_name"],
            Relation::DatasetsFromSource => &["data_source", "view_name"],
            Relation::DatasetsFiltered => &["layer", "subject_area", "view_name"],
            Relation::DatasetWithoutReviewer
            | Relation::DatasetWithoutValidator
            | Relation::DatasetWithGovernanceGap
            | Relation::GoldWithoutGovernance => VIEW,
            Relation::GovernanceViolation => &["view_name", "violation_type"],
            Relation::DatapointWithoutSteward
            | Relation::ConfidentialData
            | Relation::PiiData
            | Relation::CriticalData
            | Relation::ProductionData
            | Relation::DeprecatedData
            | Relation::ProductionPiiWithoutSteward => VIEW_COLUMN,
            Relation::HighRiskData => &["view_name", "column_name", "reason"],
            Relation::ImmediateSource => &["view_name", "column_name", "source_view", "source_column"],
            Relation::FullLineage => &["view_name", "column_name", "step", "source_view", "source_column"],
            Relation::DownstreamImpact => &["source_view", "source_column", "view_name", "column_name"],
            Relation::TransitiveImpact => &[
                "source_view",
                "source_column",
                "view_name",
                "column_name",
                "distance",
            ],
            Relation::CompletePipeline | Relation::IncompletePipeline | Relation::AllSubjectAreas => {
                &["subject_area"]
            }
            Relation::AllDataSources => &["data_source"],
            Relation::CountByLayer => &["layer", "count"],
            Relation::CountBySubjectArea => &["subject_area", "count"],
        }
    }

    /// Fields that must be bound for the relation to be finite and cheap
    pub fn required(&self) -> &'static [&'static str] {
        match self {
            Relation::FullLineage => VIEW_COLUMN,
            Relation::TransitiveImpact => &["source_view", "source_column"],
            _ => &[],
        }
    }
}

/// One cell of a result row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Term {
    Atom(String),
    Int(u64),
}

impl Term {
    fn matches(&self, bound: &str) -> bool {
        match self {
            Term::Atom(s) => s == bound,
            Term::Int(n) => n.to_string() == bound,
        }
    }
}

impl From<&str> for Term {
    fn from(s: &str) -> Self {
        Term::Atom(s.to_string())
    }
}

impl From<usize> for Term {
    fn from(n: usize) -> Self {
        Term::Int(n as u64)
    }
}

/// A structured question against one relation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub relation: String,
    #[serde(default)]
    pub bindings: BTreeMap<String, String>,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl Query {
    pub fn new(relation: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
            ..Self::default()
        }
    }

    pub fn bind(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.bindings.insert(field.into(), value.into());
        self
    }

    pub fn select(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }
}

/// Ordered answer tuples
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub relation: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Term>>,
}

/// Validate the request shape, evaluate the relation, filter and project
pub fn execute(store: &FactStore, policy: &EvaluationPolicy, query: &Query) -> Result<QueryResult, QueryError> {
    let relation = Relation::parse(&query.relation)?;
    let fields = relation.fields();

    let position = |field: &str| {
        fields
            .iter()
            .position(|f| *f == field)
            .ok_or_else(|| QueryError::UnknownField {
                relation: relation.name(),
                field: field.to_string(),
            })
    };

    let mut filters = Vec::with_capacity(query.bindings.len());
    for (field, value) in &query.bindings {
        let value = match field.as_str() {
            "layer" => Layer::parse(value).map(|l| l.as_str().to_string()).unwrap_or_else(|| value.clone()),
            _ => value.clone(),
        };
        filters.push((position(field.as_str())?, value));
    }

    let projection = if query.fields.is_empty() {
        (0..fields.len()).collect::<Vec<_>>()
    } else {
        query
            .fields
            .iter()
            .map(|f| position(f.as_str()))
            .collect::<Result<Vec<_>, _>>()?
    };

    for &required in relation.required() {
        if !query.bindings.contains_key(required) {
            return Err(QueryError::MissingBinding {
                relation: relation.name(),
                field: required,
            });
        }
    }

    let bound = Bindings(&query.bindings);
    let rows: Vec<Vec<Term>> = evaluate(relation, store, policy, &bound)
        .into_iter()
        .filter(|row| filters.iter().all(|(i, value)| row[*i].matches(value)))
        .map(|row| projection.iter().map(|&i| row[i].clone()).collect())
        .collect();

    debug!("Query {} returned {} rows", relation.name(), rows.len());

    Ok(QueryResult {
        relation: relation.name().to_string(),
        columns: projection.iter().map(|&i| fields[i].to_string()).collect(),
        rows,
    })
}

struct Bindings<'a>(&'a BTreeMap<String, String>);

impl Bindings<'_> {
    fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    fn key(&self, view: &str, column: &str) -> Option<ColumnKey> {
        Some(ColumnKey::new(self.get(view)?, self.get(column)?))
    }

    /// The bound layer, or every layer
    fn layers(&self) -> Vec<Layer> {
        match self.get("layer") {
            Some(value) => Layer::parse(value).into_iter().collect(),
            None => Layer::ALL.to_vec(),
        }
    }

    /// The bound value, or every value of the listing
    fn values(&self, field: &str, all: impl FnOnce() -> Vec<String>) -> Vec<String> {
        match self.get(field) {
            Some(value) => vec![value.to_string()],
            None => all(),
        }
    }
}

fn view_column(dp: &DataPoint) -> Vec<Term> {
    vec![Term::from(dp.view_name()), Term::from(dp.column_name())]
}

fn views<'a>(it: impl Iterator<Item = &'a str>) -> Vec<Vec<Term>> {
    it.map(|v| vec![Term::from(v)]).collect()
}

fn points<'a>(it: impl Iterator<Item = &'a DataPoint>) -> Vec<Vec<Term>> {
    it.map(view_column).collect()
}

fn edge_row(first: &ColumnKey, second: &ColumnKey) -> Vec<Term> {
    vec![
        Term::from(first.view.as_str()),
        Term::from(first.column.as_str()),
        Term::from(second.view.as_str()),
        Term::from(second.column.as_str()),
    ]
}

fn evaluate(relation: Relation, store: &FactStore, policy: &EvaluationPolicy, bound: &Bindings) -> Vec<Vec<Term>> {
    match relation {
        Relation::DatasetsInLayer => {
            let mut rows = Vec::new();
            for layer in bound.layers() {
                rows.extend(
                    datasets_in_layer(store, layer).map(|v| vec![Term::from(layer.as_str()), Term::from(v)]),
                );
            }
            rows
        }
        Relation::DatasetsInSubjectArea => {
            let mut rows = Vec::new();
            for area in bound.values("subject_area", || all_subject_areas(store)) {
                rows.extend(
                    datasets_in_subject_area(store, &area).map(|v| vec![Term::from(area.as_str()), Term::from(v)]),
                );
            }
            rows
        }
        Relation::DatasetsFromSource => {
            let mut rows = Vec::new();
            for source in bound.values("data_source", || all_data_sources(store)) {
                rows.extend(
                    datasets_from_source(store, &source).map(|v| vec![Term::from(source.as_str()), Term::from(v)]),
                );
            }
            rows
        }
        Relation::DatasetsFiltered => {
            let areas = bound.values("subject_area", || all_subject_areas(store));
            let mut rows = Vec::new();
            for layer in bound.layers() {
                for area in &areas {
                    rows.extend(datasets_filtered(store, layer, area).map(|v| {
                        vec![Term::from(layer.as_str()), Term::from(area.as_str()), Term::from(v)]
                    }));
                }
            }
            rows
        }
        Relation::DatasetWithoutReviewer => views(dataset_without_reviewer(store)),
        Relation::DatasetWithoutValidator => views(dataset_without_validator(store)),
        Relation::DatasetWithGovernanceGap => views(dataset_with_governance_gap(store)),
        Relation::GoldWithoutGovernance => views(gold_without_governance(store)),
        Relation::GovernanceViolation => governance_violation(store)
            .iter()
            .map(|v| vec![Term::from(v.view_name.as_str()), Term::from(v.violation_type.as_str())])
            .collect(),
        Relation::DatapointWithoutSteward => points(datapoint_without_steward(store)),
        Relation::ConfidentialData => points(points_where(store, is_confidential_or_restricted)),
        Relation::PiiData => points(points_where(store, |dp| is_pii(dp, policy))),
        Relation::CriticalData => points(points_where(store, is_critical)),
        Relation::ProductionData => points(points_where(store, is_production)),
        Relation::DeprecatedData => points(points_where(store, is_deprecated)),
        Relation::HighRiskData => high_risk_data(store)
            .map(|(dp, reason)| {
                let mut row = view_column(dp);
                row.push(Term::from(reason.as_str()));
                row
            })
            .collect(),
        Relation::ProductionPiiWithoutSteward => points(production_pii_without_steward(store, policy)),
        Relation::ImmediateSource => match bound.key("view_name", "column_name") {
            Some(target) => immediate_source(store, &target)
                .map(|source| edge_row(&target, source))
                .into_iter()
                .collect(),
            None => resolved_edges(store)
                .map(|(target, source)| edge_row(target, source))
                .collect(),
        },
        Relation::FullLineage => {
            let Some(start) = bound.key("view_name", "column_name") else {
                return Vec::new();
            };
            lineage_chain(store, &start, policy.max_traversal_depth)
                .steps
                .iter()
                .enumerate()
                .map(|(i, step)| {
                    vec![
                        Term::from(start.view.as_str()),
                        Term::from(start.column.as_str()),
                        Term::from(i + 1),
                        Term::from(step.view.as_str()),
                        Term::from(step.column.as_str()),
                    ]
                })
                .collect()
        }
        Relation::DownstreamImpact => match bound.key("source_view", "source_column") {
            Some(source) => downstream_impact(store, &source)
                .into_iter()
                .map(|target| edge_row(&source, target))
                .collect(),
            None => resolved_edges(store)
                .map(|(target, source)| edge_row(source, target))
                .collect(),
        },
        Relation::TransitiveImpact => {
            let Some(source) = bound.key("source_view", "source_column") else {
                return Vec::new();
            };
            transitive_impact(store, &source, policy.max_traversal_depth)
                .impacted
                .iter()
                .map(|i| {
                    let mut row = edge_row(&source, &i.key);
                    row.push(Term::Int(u64::from(i.distance)));
                    row
                })
                .collect()
        }
        Relation::CompletePipeline => single_column(complete_pipeline(store)),
        Relation::IncompletePipeline => single_column(incomplete_pipeline(store)),
        Relation::AllSubjectAreas => single_column(all_subject_areas(store)),
        Relation::AllDataSources => single_column(all_data_sources(store)),
        Relation::CountByLayer => count_by_layer(store)
            .into_iter()
            .map(|(layer, count)| vec![Term::from(layer.as_str()), Term::from(count)])
            .collect(),
        Relation::CountBySubjectArea => count_by_subject_area(store)
            .into_iter()
            .map(|(area, count)| vec![Term::Atom(area), Term::from(count)])
            .collect(),
    }
}

fn single_column(values: Vec<String>) -> Vec<Vec<Term>> {
    values.into_iter().map(|v| vec![Term::Atom(v)]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::tests::{dataset_row, point_row, store, with};
    use pretty_assertions::assert_eq;

    fn catalog() -> FactStore {
        store(
            vec![
                dataset_row("bronze_c", Some("Bronze"), Some("Customer"), Some("CRM"), Some("Ann"), Some("Bob")),
                dataset_row("silver_c", Some("Silver"), Some("Customer"), Some("CRM"), None, Some("Bob")),
                dataset_row("gold_c", Some("Gold"), Some("Customer"), Some("CRM"), None, None),
                dataset_row("gold_o", Some("Gold"), Some("Order"), Some("ERP"), Some("Ann"), Some("Bob")),
            ],
            vec![
                point_row("bronze_c", "email", None),
                with(point_row("silver_c", "email", Some(("bronze_c", "email"))), 15, "Confidential"),
                point_row("gold_c", "email", Some(("silver_c", "email"))),
            ],
        )
    }

    fn run(query: Query) -> Result<QueryResult, QueryError> {
        execute(&catalog(), &EvaluationPolicy::default(), &query)
    }

    fn atoms(row: &[&str]) -> Vec<Term> {
        row.iter().map(|s| Term::from(*s)).collect()
    }

    #[test]
    fn test_unbound_relation_lists_everything() {
        let result = run(Query::new("datasets_in_layer")).unwrap();
        assert_eq!(result.columns, vec!["layer", "view_name"]);
        assert_eq!(
            result.rows,
            vec![
                atoms(&["Bronze", "bronze_c"]),
                atoms(&["Silver", "silver_c"]),
                atoms(&["Gold", "gold_c"]),
                atoms(&["Gold", "gold_o"]),
            ]
        );
    }

    #[test]
    fn test_bindings_filter_and_normalize_layer() {
        let result = run(Query::new("datasets_in_layer").bind("layer", "gold").select(&["view_name"])).unwrap();
        assert_eq!(result.columns, vec!["view_name"]);
        assert_eq!(result.rows, vec![atoms(&["gold_c"]), atoms(&["gold_o"])]);

        let result = run(
            Query::new("datasets_filtered")
                .bind("layer", "Gold")
                .bind("subject_area", "Customer"),
        )
        .unwrap();
        assert_eq!(result.rows, vec![atoms(&["Gold", "Customer", "gold_c"])]);
    }

    #[test]
    fn test_membership_check_by_binding() {
        let hit = run(Query::new("gold_without_governance").bind("view_name", "gold_c")).unwrap();
        assert_eq!(hit.rows.len(), 1);

        let miss = run(Query::new("gold_without_governance").bind("view_name", "gold_o")).unwrap();
        assert!(miss.rows.is_empty());
    }

    #[test]
    fn test_full_lineage_rows() {
        let result = run(
            Query::new("full_lineage")
                .bind("view_name", "gold_c")
                .bind("column_name", "email")
                .select(&["step", "source_view"]),
        )
        .unwrap();

        assert_eq!(
            result.rows,
            vec![
                vec![Term::Int(1), Term::from("silver_c")],
                vec![Term::Int(2), Term::from("bronze_c")],
            ]
        );
    }

    #[test]
    fn test_downstream_impact_bound_and_unbound() {
        let bound = run(
            Query::new("downstream_impact")
                .bind("source_view", "bronze_c")
                .bind("source_column", "email"),
        )
        .unwrap();
        assert_eq!(bound.rows, vec![atoms(&["bronze_c", "email", "silver_c", "email"])]);

        let all = run(Query::new("downstream_impact")).unwrap();
        assert_eq!(all.rows.len(), 2);
    }

    #[test]
    fn test_binding_only_filters_edges_under_duplicate_keys() {
        let store = store(
            vec![],
            vec![
                point_row("v", "c", Some(("s1", "c"))),
                point_row("v", "c", Some(("s2", "c"))),
            ],
        );
        let policy = EvaluationPolicy::default();
        let rows = |query: Query| execute(&store, &policy, &query).unwrap().rows;

        for source in ["s1", "s2"] {
            let bound = rows(
                Query::new("downstream_impact")
                    .bind("source_view", source)
                    .bind("source_column", "c"),
            );
            let unbound: Vec<Vec<Term>> = rows(Query::new("downstream_impact"))
                .into_iter()
                .filter(|row| row[0] == Term::from(source))
                .collect();
            assert_eq!(bound, unbound, "{source}");
        }

        let bound = rows(
            Query::new("immediate_source")
                .bind("view_name", "v")
                .bind("column_name", "c"),
        );
        assert_eq!(bound, rows(Query::new("immediate_source")));
        assert_eq!(bound, vec![atoms(&["v", "c", "s1", "c"])]);
    }

    #[test]
    fn test_transitive_impact_and_counts() {
        let result = run(
            Query::new("transitive_impact")
                .bind("source_view", "bronze_c")
                .bind("source_column", "email")
                .select(&["view_name", "distance"]),
        )
        .unwrap();
        assert_eq!(
            result.rows,
            vec![
                vec![Term::from("silver_c"), Term::Int(1)],
                vec![Term::from("gold_c"), Term::Int(2)],
            ]
        );

        let counts = run(Query::new("count_by_layer").bind("count", "2")).unwrap();
        assert_eq!(counts.rows, vec![vec![Term::from("Gold"), Term::Int(2)]]);
    }

    #[test]
    fn test_governance_and_sensitivity_relations() {
        let violations = run(Query::new("governance_violation").bind("view_name", "gold_c")).unwrap();
        assert_eq!(
            violations.rows,
            vec![
                atoms(&["gold_c", "missing_reviewer"]),
                atoms(&["gold_c", "missing_validator"]),
            ]
        );

        let risky = run(Query::new("high_risk_data")).unwrap();
        assert_eq!(risky.rows, vec![atoms(&["silver_c", "email", "confidential_without_steward"])]);

        let pipelines = run(Query::new("incomplete_pipeline")).unwrap();
        assert_eq!(pipelines.rows, vec![atoms(&["Order"])]);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let result = execute(&FactStore::empty(), &EvaluationPolicy::default(), &Query::new("pii_data")).unwrap();
        assert!(result.rows.is_empty());
        assert_eq!(result.columns, vec!["view_name", "column_name"]);
    }

    #[test]
    fn test_query_shape_errors() {
        assert_eq!(
            run(Query::new("who_knows")).unwrap_err(),
            QueryError::UnknownRelation("who_knows".to_string())
        );
        assert_eq!(
            run(Query::new("pii_data").select(&["reason"])).unwrap_err(),
            QueryError::UnknownField {
                relation: "pii_data",
                field: "reason".to_string(),
            }
        );
        assert_eq!(
            run(Query::new("pii_data").bind("layer", "Gold")).unwrap_err(),
            QueryError::UnknownField {
                relation: "pii_data",
                field: "layer".to_string(),
            }
        );
        assert_eq!(
            run(Query::new("full_lineage").bind("view_name", "gold_c")).unwrap_err(),
            QueryError::MissingBinding {
                relation: "full_lineage",
                field: "column_name",
            }
        );
    }

    #[test]
    fn test_every_relation_answers_and_is_idempotent() {
        let store = catalog();
        let policy = EvaluationPolicy::default();
        for relation in Relation::ALL {
            let mut query = Query::new(relation.name());
            for field in relation.required() {
                query = query.bind(*field, "x");
            }
            let first = execute(&store, &policy, &query).unwrap();
            let second = execute(&store, &policy, &query).unwrap();
            assert_eq!(first, second, "{}", relation.name());
            assert_eq!(first.columns.len(), relation.fields().len());
        }
    }
}
