//! # SalesFlow API
//!
//! REST server for the SalesFlow point-of-sale backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          API Server                                     │
//! │                                                                         │
//! │  Browser ───► HTTP (5000) ───► CORS / Trace / Timeout layers            │
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌─────────────┐ │
//! │  │ /api/products│  │/api/inventory│  │  /api/sales  │  │ /api/auth   │ │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └─────────────┘ │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐                  │
//! │  │/api/dashboard│  │ /api/reports │  │   /health    │                  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘                  │
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │                          salesflow-db (SQLite)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `HTTP_PORT` - listen port (default: 5000)
//! - `DATABASE_PATH` - SQLite file (default: ./salesflow.db)
//! - `DB_MAX_CONNECTIONS` - pool size (default: 5)
//! - `JWT_SECRET` - Secret for JWT signing
//! - `JWT_LIFETIME_SECS` - token lifetime (default: 2592000)
//! - `REQUEST_TIMEOUT_SECS` - per-request timeout (default: 30)
//! - `CURRENCY_LABEL` - display currency (default: USD)

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use salesflow_db::Database;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use auth::JwtManager;
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};

/// Shared application state, cloned into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: JwtManager,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        AppState {
            db,
            jwt: JwtManager::new(config.jwt_secret.clone(), config.jwt_lifetime_secs),
            config: Arc::new(config),
        }
    }
}

/// Builds the full router with middleware.
pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    routes::router()
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
