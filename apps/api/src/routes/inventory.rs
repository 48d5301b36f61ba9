//! Inventory ledger routes

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use salesflow_core::{InventoryItem, RestockRequest, StockMovement};

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/low-stock", get(low_stock))
        .route("/{id}", get(fetch))
        .route("/{id}/movements", get(movements))
        .route("/{id}/restock", post(restock))
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<InventoryItem>>> {
    Ok(Json(state.db.inventory().list().await?))
}

async fn low_stock(State(state): State<AppState>) -> ApiResult<Json<Vec<InventoryItem>>> {
    Ok(Json(state.db.inventory().low_stock().await?))
}

async fn fetch(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<InventoryItem>> {
    Ok(Json(state.db.inventory().get(&id).await?))
}

async fn movements(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<Vec<StockMovement>>> {
    Ok(Json(state.db.inventory().movements(&id).await?))
}

async fn restock(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(request): ApiJson<RestockRequest>,
) -> ApiResult<Json<InventoryItem>> {
    Ok(Json(state.db.inventory().restock(&id, request).await?))
}
