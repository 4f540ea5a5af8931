//! Catalog error types
//!
//! Load errors and query-shape errors are the only failures the core reports.
//! Missing metadata, dangling lineage and cyclic lineage are ordinary data
//! states and never surface here.

use thiserror::Error;

/// Which base relation a rejected row belonged to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Dataset,
    DataPoint,
}

impl std::fmt::Display for RowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowKind::Dataset => write!(f, "dataset"),
            RowKind::DataPoint => write!(f, "datapoint"),
        }
    }
}

/// Rejection of a whole load. Nothing from a rejected load is ever published.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("{kind} row {row}: expected {expected} fields, found {found}")]
    Arity {
        kind: RowKind,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{kind} row {row}: missing natural key field `{field}`")]
    MissingKey {
        kind: RowKind,
        row: usize,
        field: &'static str,
    },

    #[error("dataset row {row}: unknown layer `{value}`")]
    UnknownLayer { row: usize, value: String },
}

/// Caller error in the shape of a query, distinct from an empty answer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("unknown relation `{0}`")]
    UnknownRelation(String),

    #[error("relation `{relation}` has no field `{field}`")]
    UnknownField { relation: &'static str, field: String },

    #[error("relation `{relation}` requires `{field}` to be bound")]
    MissingBinding {
        relation: &'static str,
        field: &'static str,
    },

    #[error("compound query has no goals")]
    EmptyCompound,

    #[error("alternatives must produce the same fields, found {expected:?} and {found:?}")]
    MismatchedAlternatives {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("no goal produces field `{0}`")]
    UnboundField(String),
}
