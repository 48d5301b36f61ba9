//! HTTP routes.
//!
//! Handlers stay thin: parse and validate input, call a repository, shape
//! the JSON answer. Every write happens inside `salesflow-db`.

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod inventory;
pub mod products;
pub mod reports;
pub mod sales;

use axum::routing::get;
use axum::Router;

use crate::AppState;

/// Combined router, state not yet attached.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/products", products::router())
        .nest("/api/inventory", inventory::router())
        .nest("/api/sales", sales::router())
        .nest("/api/dashboard", dashboard::router())
        .nest("/api/reports", reports::router())
        .nest("/api/auth", auth::router())
}
