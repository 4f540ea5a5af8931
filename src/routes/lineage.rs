//! Lineage and Impact Routes
//!
//! Upstream chains and downstream blast radius for one column.

use crate::catalog::impact::{downstream_impact, ImpactAnalyzer, ImpactReport};
use crate::catalog::lineage::{immediate_source, layer_of, lineage_chain, Termination};
use crate::catalog::{ColumnKey, Layer};
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

/// One upstream step, tagged with the layer of its view
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageHop {
    pub view: String,
    pub column: String,
    pub layer: Option<Layer>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageResponse {
    pub success: bool,
    pub known: bool,
    pub start: LineageHop,
    pub immediate_source: Option<ColumnKey>,
    pub steps: Vec<LineageHop>,
    pub termination: Termination,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactResponse {
    pub success: bool,
    pub known: bool,
    /// One hop downstream
    pub downstream: Vec<ColumnKey>,
    pub report: ImpactReport,
}

pub async fn get_lineage(
    State(state): State<SharedState>,
    Path((view, column)): Path<(String, String)>,
) -> Json<LineageResponse> {
    let store = state.catalog.snapshot().await;
    let key = ColumnKey::new(view, column);
    let chain = lineage_chain(&store, &key, state.policy.max_traversal_depth);

    let hop = |key: ColumnKey| LineageHop {
        layer: layer_of(&store, &key.view),
        view: key.view,
        column: key.column,
    };

    Json(LineageResponse {
        success: true,
        known: store.contains_point(&key),
        immediate_source: immediate_source(&store, &key).cloned(),
        steps: chain.steps.into_iter().map(&hop).collect(),
        termination: chain.termination,
        start: hop(chain.start),
    })
}

pub async fn get_impact(
    State(state): State<SharedState>,
    Path((view, column)): Path<(String, String)>,
) -> Json<ImpactResponse> {
    let store = state.catalog.snapshot().await;
    let key = ColumnKey::new(view, column);

    let report = ImpactAnalyzer::analyze(&store, &key, state.policy.max_traversal_depth);
    tracing::debug!(
        "Impact of {}: {} columns, risk {:?}",
        key,
        report.summary.total_columns,
        report.risk_level
    );

    Json(ImpactResponse {
        success: true,
        known: store.contains_point(&key),
        downstream: downstream_impact(&store, &key).into_iter().cloned().collect(),
        report,
    })
}

#[cfg(test)]
mod tests {
    use crate::routes::tests::{loaded_app, send};
    use axum::http::{Method, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_lineage_endpoint() {
        let app = loaded_app().await;
        let (status, body) = send(&app, Method::GET, "/api/lineage/dim_customer/email", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["known"], json!(true));
        assert_eq!(
            body["immediateSource"],
            json!({ "view": "stg_customer", "column": "email" })
        );
        assert_eq!(body["termination"], json!("root"));
        assert_eq!(body["start"]["layer"], json!("Gold"));
        assert_eq!(
            body["steps"],
            json!([
                { "view": "stg_customer", "column": "email", "layer": "Silver" },
                { "view": "raw_customer", "column": "email", "layer": "Bronze" }
            ])
        );
    }

    #[tokio::test]
    async fn test_unknown_column_is_not_an_error() {
        let app = loaded_app().await;
        let (status, body) = send(&app, Method::GET, "/api/lineage/ghost/col", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["known"], json!(false));
        assert_eq!(body["termination"], json!("dangling"));
        assert_eq!(body["steps"], json!([]));
    }

    #[tokio::test]
    async fn test_impact_endpoint() {
        let app = loaded_app().await;
        let (status, body) = send(&app, Method::GET, "/api/impact/raw_customer/email", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["downstream"], json!([{ "view": "stg_customer", "column": "email" }]));
        assert_eq!(body["report"]["summary"]["totalColumns"], json!(2));
        assert_eq!(body["report"]["riskLevel"], json!("widespread"));
    }
}
