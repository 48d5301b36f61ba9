//! Sale routes
//!
//! ```text
//! GET   /api/sales                       newest first
//! POST  /api/sales                       record a sale (201)
//! GET   /api/sales/debts                 sales with an open balance
//! GET   /api/sales/dates/{start}/{end}   inclusive date range
//! GET   /api/sales/{id}
//! PATCH /api/sales/{id}/status           { "status": "Refunded" }
//! ```

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use salesflow_core::validation::parse_date_range;
use salesflow_core::{NewSale, Sale, SaleStatus};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: SaleStatus,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/debts", get(debts))
        .route("/dates/{start}/{end}", get(between))
        .route("/{id}", get(fetch))
        .route("/{id}/status", patch(update_status))
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Sale>>> {
    Ok(Json(state.db.sales().list().await?))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewSale>,
) -> ApiResult<(StatusCode, Json<Sale>)> {
    let sale = state.db.sales().create(input).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

async fn debts(State(state): State<AppState>) -> ApiResult<Json<Vec<Sale>>> {
    Ok(Json(state.db.sales().list_debts().await?))
}

async fn between(
    State(state): State<AppState>,
    ApiPath((start, end)): ApiPath<(String, String)>,
) -> ApiResult<Json<Vec<Sale>>> {
    let (start, end) = parse_date_range(&start, &end)?;
    Ok(Json(state.db.sales().between(start, end).await?))
}

async fn fetch(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<Sale>> {
    Ok(Json(state.db.sales().get(&id).await?))
}

async fn update_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(update): ApiJson<StatusUpdate>,
) -> ApiResult<Json<Sale>> {
    Ok(Json(state.db.sales().update_status(&id, update.status).await?))
}
