//! Catalog request models

use crate::catalog::{CompoundQuery, Query, RawRow};
use crate::error::{validation_error, AppError};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use validator::Validate;

/// Ingestion rows for a full catalog replacement
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadCatalogRequest {
    #[serde(default)]
    pub datasets: Vec<RawRow>,
    #[serde(default)]
    pub datapoints: Vec<RawRow>,
}

/// Structured question against one relation
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    #[validate(length(min = 1, max = 64, message = "Relation name is required"))]
    pub relation: String,
    /// Field -> value; numbers bind by their decimal text
    #[serde(default)]
    pub bindings: BTreeMap<String, Value>,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl QueryRequest {
    pub fn into_query(self) -> Result<Query, AppError> {
        let mut query = Query::new(self.relation);
        for (field, value) in self.bindings {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                other => {
                    return Err(validation_error(format!(
                        "Binding `{field}` must be a string or a number, got {other}"
                    )))
                }
            };
            query = query.bind(field, text);
        }
        query.fields = self.fields;
        Ok(query)
    }
}

/// Goals joined on shared field names, plus an optional group of alternatives
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompoundQueryRequest {
    #[serde(default)]
    #[validate(nested)]
    pub all_of: Vec<QueryRequest>,
    #[serde(default)]
    #[validate(nested)]
    pub any_of: Vec<QueryRequest>,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl CompoundQueryRequest {
    pub fn into_query(self) -> Result<CompoundQuery, AppError> {
        Ok(CompoundQuery {
            all_of: self
                .all_of
                .into_iter()
                .map(QueryRequest::into_query)
                .collect::<Result<_, _>>()?,
            any_of: self
                .any_of
                .into_iter()
                .map(QueryRequest::into_query)
                .collect::<Result<_, _>>()?,
            fields: self.fields,
        })
    }
}
