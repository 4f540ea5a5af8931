//! Query Routes
//!
//! Relation discovery, relation-by-name queries and compound queries.

use crate::catalog::compound::execute_compound;
use crate::catalog::query::{execute, QueryResult, Relation};
use crate::error::{validation_error, ApiResult};
use crate::models::{CompoundQueryRequest, QueryRequest};
use crate::state::SharedState;
use axum::{extract::State, Json};
use serde::Serialize;
use validator::Validate;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationInfo {
    pub name: &'static str,
    pub fields: &'static [&'static str],
    pub required: &'static [&'static str],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationsResponse {
    pub success: bool,
    pub relations: Vec<RelationInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub success: bool,
    pub generation: u64,
    #[serde(flatten)]
    pub result: QueryResult,
}

pub async fn list_relations() -> Json<RelationsResponse> {
    let relations = Relation::ALL
        .iter()
        .map(|r| RelationInfo {
            name: r.name(),
            fields: r.fields(),
            required: r.required(),
        })
        .collect();

    Json(RelationsResponse {
        success: true,
        relations,
    })
}

/// Evaluate one relation against the current snapshot
pub async fn run_query(
    State(state): State<SharedState>,
    Json(payload): Json<QueryRequest>,
) -> ApiResult<Json<QueryResponse>> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;
    let query = payload.into_query()?;

    let store = state.catalog.snapshot().await;
    let result = execute(&store, &state.policy, &query)?;

    Ok(Json(QueryResponse {
        success: true,
        generation: store.status().generation,
        result,
    }))
}

/// Join several relations against one snapshot
pub async fn run_compound_query(
    State(state): State<SharedState>,
    Json(payload): Json<CompoundQueryRequest>,
) -> ApiResult<Json<QueryResponse>> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;
    let query = payload.into_query()?;

    let store = state.catalog.snapshot().await;
    let result = execute_compound(&store, &state.policy, &query)?;

    Ok(Json(QueryResponse {
        success: true,
        generation: store.status().generation,
        result,
    }))
}

#[cfg(test)]
mod tests {
    use crate::routes::tests::{app, loaded_app, send};
    use axum::http::{Method, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_relations_are_listed() {
        let (status, body) = send(&app(), Method::GET, "/api/relations", None).await;
        assert_eq!(status, StatusCode::OK);

        let relations = body["relations"].as_array().unwrap();
        assert_eq!(relations.len(), 27);
        let lineage = relations
            .iter()
            .find(|r| r["name"] == json!("full_lineage"))
            .unwrap();
        assert_eq!(lineage["required"], json!(["view_name", "column_name"]));
    }

    #[tokio::test]
    async fn test_query_with_bindings_and_fields() {
        let app = loaded_app().await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/query",
            Some(json!({
                "relation": "full_lineage",
                "bindings": { "view_name": "dim_customer", "column_name": "email" },
                "fields": ["step", "source_view"]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["columns"], json!(["step", "source_view"]));
        assert_eq!(
            body["rows"],
            json!([[1, "stg_customer"], [2, "raw_customer"]])
        );
    }

    #[tokio::test]
    async fn test_gold_without_governance_over_http() {
        let app = loaded_app().await;
        let (_, body) = send(
            &app,
            Method::POST,
            "/api/query",
            Some(json!({ "relation": "gold_without_governance" })),
        )
        .await;
        assert_eq!(body["rows"], json!([["dim_customer"]]));
    }

    #[tokio::test]
    async fn test_query_errors_are_400() {
        let app = app();

        let (status, body) = send(&app, Method::POST, "/api/query", Some(json!({ "relation": "nope" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("QUERY_ERROR"));

        let (status, body) = send(&app, Method::POST, "/api/query", Some(json!({ "relation": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("VALIDATION_ERROR"));

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/query",
            Some(json!({ "relation": "transitive_impact", "bindings": { "source_view": "a" } })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_compound_query_over_http() {
        let app = loaded_app().await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/query/compound",
            Some(json!({
                "allOf": [{ "relation": "datasets_in_layer", "bindings": { "layer": "gold" } }],
                "anyOf": [
                    { "relation": "dataset_without_reviewer" },
                    { "relation": "dataset_without_validator" }
                ],
                "fields": ["view_name"]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rows"], json!([["dim_customer"]]));

        let (status, body) = send(&app, Method::POST, "/api/query/compound", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("QUERY_ERROR"));
    }

    #[tokio::test]
    async fn test_empty_catalog_gives_empty_rows() {
        let (status, body) = send(&app(), Method::POST, "/api/query", Some(json!({ "relation": "pii_data" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rows"], json!([]));
        assert_eq!(body["generation"], json!(0));
    }
}
