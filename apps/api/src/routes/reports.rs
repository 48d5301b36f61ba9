//! Report routes
//!
//! ```text
//! GET /api/reports/sales-summary?startDate=2024-01-01&endDate=2024-01-31
//! GET /api/reports/top-products?limit=10
//! GET /api/reports/daily-sales?days=30
//! ```

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use salesflow_core::report::{
    DailySales, SalesSummary, TopProduct, DEFAULT_REPORT_DAYS, DEFAULT_TOP_PRODUCTS, MAX_DAYS,
    MAX_TOP_PRODUCTS,
};
use salesflow_core::validation::{bounded, parse_date_bound, parse_date_range, DateBound};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::extract::ApiQuery;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DaysQuery {
    pub days: Option<i64>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sales-summary", get(sales_summary))
        .route("/top-products", get(top_products))
        .route("/daily-sales", get(daily_sales))
}

async fn sales_summary(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SummaryQuery>,
) -> ApiResult<Json<SalesSummary>> {
    let (start, end) = match (query.start_date.as_deref(), query.end_date.as_deref()) {
        (Some(start), Some(end)) => {
            let (start, end) = parse_date_range(start, end)?;
            (Some(start), Some(end))
        }
        (Some(start), None) => (
            Some(parse_date_bound("startDate", start, DateBound::Start)?),
            None,
        ),
        (None, Some(end)) => (None, Some(parse_date_bound("endDate", end, DateBound::End)?)),
        (None, None) => (None, None),
    };

    Ok(Json(state.db.reports().sales_summary(start, end).await?))
}

async fn top_products(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> ApiResult<Json<Vec<TopProduct>>> {
    let limit = bounded("limit", query.limit, DEFAULT_TOP_PRODUCTS, 1, MAX_TOP_PRODUCTS)?;
    Ok(Json(state.db.reports().top_products(limit).await?))
}

async fn daily_sales(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DaysQuery>,
) -> ApiResult<Json<Vec<DailySales>>> {
    let days = bounded("days", query.days, DEFAULT_REPORT_DAYS, 1, MAX_DAYS)?;
    Ok(Json(state.db.reports().daily_sales(days, Utc::now()).await?))
}
