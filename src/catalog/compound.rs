//! Compound queries
//!
//! Goals over the fixed relations, all of which must hold, plus an optional
//! group of alternatives of which at least one must hold. Goals are joined on
//! equal field names, so `view_name` in `datasets_in_layer` and in
//! `dataset_without_reviewer` refer to the same dataset. Goals without a
//! shared field combine as a cross product.

use crate::catalog::error::QueryError;
use crate::catalog::predicates::EvaluationPolicy;
use crate::catalog::query::{execute, Query, QueryResult, Term};
use crate::catalog::store::FactStore;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Conjunction of goals with an optional disjunction group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundQuery {
    #[serde(default)]
    pub all_of: Vec<Query>,
    /// Empty means no disjunction group
    #[serde(default)]
    pub any_of: Vec<Query>,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl CompoundQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, goal: Query) -> Self {
        self.all_of.push(goal);
        self
    }

    pub fn or(mut self, goal: Query) -> Self {
        self.any_of.push(goal);
        self
    }

    pub fn select(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// `a, b, (c ; d)` rendering of the goal structure
    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = self.all_of.iter().map(|g| g.relation.clone()).collect();
        if !self.any_of.is_empty() {
            let group: Vec<&str> = self.any_of.iter().map(|g| g.relation.as_str()).collect();
            parts.push(format!("({})", group.join(" ; ")));
        }
        parts.join(", ")
    }
}

struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Term>>,
}

impl From<QueryResult> for Table {
    fn from(result: QueryResult) -> Self {
        Self {
            columns: result.columns,
            rows: result.rows,
        }
    }
}

/// Evaluate every goal, join left to right and project
pub fn execute_compound(
    store: &FactStore,
    policy: &EvaluationPolicy,
    query: &CompoundQuery,
) -> Result<QueryResult, QueryError> {
    let mut tables = query
        .all_of
        .iter()
        .map(|goal| execute(store, policy, goal).map(Table::from))
        .collect::<Result<Vec<_>, _>>()?;

    if !query.any_of.is_empty() {
        let alternatives = query
            .any_of
            .iter()
            .map(|goal| execute(store, policy, goal).map(Table::from))
            .collect::<Result<Vec<_>, _>>()?;
        tables.push(union(alternatives)?);
    }

    let mut tables = tables.into_iter();
    let Some(first) = tables.next() else {
        return Err(QueryError::EmptyCompound);
    };
    let joined = tables.fold(first, join);

    let projection = if query.fields.is_empty() {
        (0..joined.columns.len()).collect::<Vec<_>>()
    } else {
        query
            .fields
            .iter()
            .map(|f| {
                joined
                    .columns
                    .iter()
                    .position(|c| c == f)
                    .ok_or_else(|| QueryError::UnboundField(f.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    let rows: Vec<Vec<Term>> = joined
        .rows
        .iter()
        .map(|row| projection.iter().map(|&i| row[i].clone()).collect())
        .collect();

    let relation = query.describe();
    debug!("Compound query {} returned {} rows", relation, rows.len());

    Ok(QueryResult {
        relation,
        columns: projection.iter().map(|&i| joined.columns[i].clone()).collect(),
        rows,
    })
}

/// Rows of any alternative, in alternative order, each row once. Every
/// alternative must produce the same set of fields.
fn union(alternatives: Vec<Table>) -> Result<Table, QueryError> {
    let mut alternatives = alternatives.into_iter();
    let Some(first) = alternatives.next() else {
        return Err(QueryError::EmptyCompound);
    };

    let mut seen: HashSet<Vec<Term>> = HashSet::new();
    let mut rows: Vec<Vec<Term>> = first.rows.into_iter().filter(|row| seen.insert(row.clone())).collect();

    for table in alternatives {
        let order: Option<Vec<usize>> = if table.columns.len() == first.columns.len() {
            first
                .columns
                .iter()
                .map(|c| table.columns.iter().position(|t| t == c))
                .collect()
        } else {
            None
        };
        let order = order.ok_or_else(|| QueryError::MismatchedAlternatives {
            expected: first.columns.clone(),
            found: table.columns.clone(),
        })?;

        for row in table.rows {
            let row: Vec<Term> = order.iter().map(|&i| row[i].clone()).collect();
            if seen.insert(row.clone()) {
                rows.push(row);
            }
        }
    }

    Ok(Table {
        columns: first.columns,
        rows,
    })
}

/// Natural join, left row order first, right order within
fn join(left: Table, right: Table) -> Table {
    let shared: Vec<(usize, usize)> = right
        .columns
        .iter()
        .enumerate()
        .filter_map(|(r, c)| left.columns.iter().position(|l| l == c).map(|l| (l, r)))
        .collect();
    let extra: Vec<usize> = (0..right.columns.len())
        .filter(|r| !shared.iter().any(|(_, s)| s == r))
        .collect();

    let mut index: HashMap<Vec<&Term>, Vec<&Vec<Term>>> = HashMap::new();
    for row in &right.rows {
        let key = shared.iter().map(|&(_, r)| &row[r]).collect();
        index.entry(key).or_default().push(row);
    }

    let mut rows = Vec::new();
    for row in &left.rows {
        let key: Vec<&Term> = shared.iter().map(|&(l, _)| &row[l]).collect();
        for matched in index.get(&key).into_iter().flatten() {
            let mut joined = row.clone();
            joined.extend(extra.iter().map(|&r| matched[r].clone()));
            rows.push(joined);
        }
    }

    let mut columns = left.columns;
    columns.extend(extra.iter().map(|&r| right.columns[r].clone()));
    Table { columns, rows }
}
