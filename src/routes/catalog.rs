//! Catalog Routes
//!
//! Full-replacement loads and read-only views of the published catalog.

use crate::catalog::summary::{summarize, CatalogSummary};
use crate::catalog::CatalogStatus;
use crate::error::ApiResult;
use crate::models::{LoadCatalogRequest, SuccessResponse};
use crate::state::SharedState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub success: bool,
    pub status: CatalogStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub success: bool,
    pub generation: u64,
    pub summary: CatalogSummary,
}

/// Replace the whole catalog with the given ingestion rows
pub async fn load_catalog(
    State(state): State<SharedState>,
    Json(req): Json<LoadCatalogRequest>,
) -> ApiResult<Json<SuccessResponse<CatalogStatus>>> {
    let status = state.catalog.load(&req.datasets, &req.datapoints).await?;

    Ok(Json(SuccessResponse::with_data(
        format!(
            "Catalog generation {} loaded: {} datasets, {} datapoints",
            status.generation, status.dataset_count, status.datapoint_count
        ),
        status,
    )))
}

pub async fn catalog_status(State(state): State<SharedState>) -> Json<StatusResponse> {
    let store = state.catalog.snapshot().await;

    Json(StatusResponse {
        success: true,
        status: store.status().clone(),
    })
}

pub async fn catalog_summary(State(state): State<SharedState>) -> Json<SummaryResponse> {
    let store = state.catalog.snapshot().await;

    Json(SummaryResponse {
        success: true,
        generation: store.status().generation,
        summary: summarize(&store),
    })
}
