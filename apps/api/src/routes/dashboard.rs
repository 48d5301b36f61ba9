//! Dashboard routes

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use salesflow_core::report::{
    DashboardDay, DashboardStats, RecentSale, TopProduct, DASHBOARD_TOP_PRODUCTS,
    DEFAULT_DASHBOARD_DAYS, MAX_DAYS, RECENT_SALES,
};
use salesflow_core::validation::bounded;

use crate::error::ApiResult;
use crate::extract::ApiPath;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/daily-sales", get(daily_sales_default))
        .route("/daily-sales/{days}", get(daily_sales))
        .route("/top-products", get(top_products))
        .route("/recent-sales", get(recent_sales))
}

async fn stats(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    Ok(Json(state.db.reports().dashboard_stats(Utc::now()).await?))
}

async fn daily_sales_default(State(state): State<AppState>) -> ApiResult<Json<Vec<DashboardDay>>> {
    chart(&state, DEFAULT_DASHBOARD_DAYS).await
}

async fn daily_sales(
    State(state): State<AppState>,
    ApiPath(days): ApiPath<i64>,
) -> ApiResult<Json<Vec<DashboardDay>>> {
    let days = bounded("days", Some(days), DEFAULT_DASHBOARD_DAYS, 1, MAX_DAYS)?;
    chart(&state, days).await
}

async fn chart(state: &AppState, days: i64) -> ApiResult<Json<Vec<DashboardDay>>> {
    let rows = state.db.reports().daily_sales(days, Utc::now()).await?;
    Ok(Json(rows.into_iter().map(DashboardDay::from_daily).collect()))
}

async fn top_products(State(state): State<AppState>) -> ApiResult<Json<Vec<TopProduct>>> {
    Ok(Json(
        state
            .db
            .reports()
            .top_products_by_quantity(DASHBOARD_TOP_PRODUCTS)
            .await?,
    ))
}

async fn recent_sales(State(state): State<AppState>) -> ApiResult<Json<Vec<RecentSale>>> {
    Ok(Json(state.db.reports().recent_sales(RECENT_SALES).await?))
}
