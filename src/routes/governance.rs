//! Governance Routes

use crate::catalog::governance::{GovernanceReport, Rule};
use crate::state::SharedState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesResponse {
    pub success: bool,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationsResponse {
    pub success: bool,
    pub generation: u64,
    #[serde(flatten)]
    pub report: GovernanceReport,
}

/// The governance rule catalog
pub async fn list_rules(State(state): State<SharedState>) -> Json<RulesResponse> {
    Json(RulesResponse {
        success: true,
        rules: state.rules.list_rules().to_vec(),
    })
}

/// Run every rule against the current snapshot
pub async fn list_violations(State(state): State<SharedState>) -> Json<ViolationsResponse> {
    let store = state.catalog.snapshot().await;
    let report = state.rules.evaluate(&store, &state.policy);

    Json(ViolationsResponse {
        success: true,
        generation: store.status().generation,
        report,
    })
}
