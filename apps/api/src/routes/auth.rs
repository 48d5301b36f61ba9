//! Identity routes
//!
//! ```text
//! POST /api/auth/register           owner account, no business
//! POST /api/auth/register-business  business + owner in one step
//! POST /api/auth/join-business      staff account of an existing business
//! POST /api/auth/login
//! GET  /api/auth/profile            bearer token required
//! ```

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use salesflow_core::validation::validate_password;
use salesflow_core::{Business, Role, User};
use salesflow_db::{NewBusiness, NewUser};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::{hash_password, verify_password, CurrentUser};
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBusinessRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub business_name: String,
    pub business_description: Option<String>,
    pub business_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinBusinessRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub business_code: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business: Option<Business>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/register-business", post(register_business))
        .route("/join-business", post(join_business))
        .route("/login", post(login))
        .route("/profile", get(profile))
}

async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let password_hash = checked_hash(req.password).await?;
    let user = state
        .db
        .users()
        .create_user(NewUser {
            name: req.name,
            email: req.email,
            password_hash,
            role: Role::Owner,
            business_code: None,
        })
        .await?;

    respond(&state, user, None)
}

async fn register_business(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterBusinessRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let password_hash = checked_hash(req.password).await?;
    let business = NewBusiness {
        name: req.business_name,
        description: req.business_description,
        business_code: req.business_code.clone(),
    };
    let owner = NewUser {
        name: req.name,
        email: req.email,
        password_hash,
        role: Role::Owner,
        business_code: Some(req.business_code),
    };

    let (business, user) = state
        .db
        .users()
        .create_business_with_owner(business, owner)
        .await?;

    respond(&state, user, Some(business))
}

async fn join_business(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<JoinBusinessRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let password_hash = checked_hash(req.password).await?;
    let user = state
        .db
        .users()
        .create_user(NewUser {
            name: req.name,
            email: req.email,
            password_hash,
            role: Role::Staff,
            business_code: Some(req.business_code.clone()),
        })
        .await?;
    let business = state.db.users().get_business(&req.business_code).await?;

    respond(&state, user, Some(business))
}

async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let user = state.db.users().find_by_email(&req.email).await?;
    let stored = user.as_ref().map(|u| u.password_hash.clone());
    let verified = verify_password(req.password, stored).await?;

    let Some(user) = user.filter(|_| verified) else {
        warn!(email = %req.email, "Login failed");
        return Err(ApiError::unauthorized("Invalid email or password"));
    };

    let token = state.jwt.issue(&user)?;
    info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        token,
        user,
        business: None,
    }))
}

async fn profile(State(state): State<AppState>, CurrentUser(claims): CurrentUser) -> ApiResult<Json<User>> {
    Ok(Json(state.db.users().get(&claims.sub).await?))
}

async fn checked_hash(password: String) -> ApiResult<String> {
    validate_password(&password)?;
    hash_password(password).await
}

fn respond(
    state: &AppState,
    user: User,
    business: Option<Business>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let token = state.jwt.issue(&user)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user,
            business,
        }),
    ))
}
