//! Product catalog routes
//!
//! ```text
//! GET    /api/products            active products, newest first
//! POST   /api/products            create (201)
//! GET    /api/products/low-stock  active products at or below threshold
//! GET    /api/products/{id}
//! PUT    /api/products/{id}       partial update
//! DELETE /api/products/{id}       soft delete
//! ```

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use salesflow_core::{NewProduct, ProductPatch, ProductView};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/low-stock", get(low_stock))
        .route("/{id}", get(fetch).put(update).delete(remove))
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<ProductView>>> {
    let products = state.db.products().list().await?;
    Ok(Json(products.into_iter().map(ProductView::from).collect()))
}

async fn low_stock(State(state): State<AppState>) -> ApiResult<Json<Vec<ProductView>>> {
    let products = state.db.products().list_low_stock().await?;
    Ok(Json(products.into_iter().map(ProductView::from).collect()))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewProduct>,
) -> ApiResult<(StatusCode, Json<ProductView>)> {
    let product = state.db.products().create(input).await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

async fn fetch(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<ProductView>> {
    Ok(Json(state.db.products().get(&id).await?.into()))
}

async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(patch): ApiJson<ProductPatch>,
) -> ApiResult<Json<ProductView>> {
    Ok(Json(state.db.products().update(&id, patch).await?.into()))
}

async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<Value>> {
    state.db.products().delete(&id).await?;
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
