//! # User Repository
//!
//! Accounts and the businesses they belong to. Passwords arrive already
//! hashed; this layer never sees plain text.

use chrono::Utc;
use salesflow_core::validation::{
    normalize_business_code, normalize_email, optional_text, required_text,
};
use salesflow_core::{Business, Role, User};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use super::new_id;
use crate::error::{DbError, DbResult};
use crate::pool::WriteGate;

const USER_COLUMNS: &str = "id, name, email, password_hash, role, business_code, created_at";
const BUSINESS_COLUMNS: &str = "id, name, description, business_code, created_at, updated_at";

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// PHC string produced by the caller's password hasher.
    pub password_hash: String,
    pub role: Role,
    /// Business to join. Must already exist.
    pub business_code: Option<String>,
}

/// Input for creating a business.
#[derive(Debug, Clone)]
pub struct NewBusiness {
    pub name: String,
    pub description: Option<String>,
    pub business_code: String,
}

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
    write_gate: WriteGate,
}

impl UserRepository {
    pub fn new(pool: SqlitePool, write_gate: WriteGate) -> Self {
        UserRepository { pool, write_gate }
    }

    pub async fn get(&self, id: &str) -> DbResult<User> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))
    }

    /// Looks a user up by email, case-insensitively.
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn get_business(&self, code: &str) -> DbResult<Business> {
        let sql = format!(
            "SELECT {} FROM businesses WHERE business_code = ?1",
            BUSINESS_COLUMNS
        );
        sqlx::query_as::<_, Business>(&sql)
            .bind(code.trim().to_ascii_uppercase())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Business", code))
    }

    /// Creates a user, optionally joining an existing business.
    ///
    /// ## Errors
    /// - `NotFound` when the business code is unknown
    /// - `UniqueViolation` when the email is taken
    pub async fn create_user(&self, input: NewUser) -> DbResult<User> {
        let business_code = input
            .business_code
            .as_deref()
            .map(normalize_business_code)
            .transpose()?;
        let user = prepare_user(input, business_code)?;

        debug!(email = %user.email, "Creating user");

        let _gate = self.write_gate.lock().await;
        let mut tx = self.pool.begin().await?;

        if let Some(code) = &user.business_code {
            let exists: Option<String> =
                sqlx::query_scalar("SELECT id FROM businesses WHERE business_code = ?1")
                    .bind(code)
                    .fetch_optional(&mut *tx)
                    .await?;
            if exists.is_none() {
                return Err(DbError::not_found("Business", code.as_str()));
            }
        }

        insert_user(&mut *tx, &user).await?;
        tx.commit().await?;

        info!(
            user_id = %user.id,
            role = user.role.as_str(),
            business_code = ?user.business_code,
            "User created"
        );

        Ok(user)
    }

    /// Creates a business and its owner together.
    pub async fn create_business_with_owner(
        &self,
        business: NewBusiness,
        owner: NewUser,
    ) -> DbResult<(Business, User)> {
        let code = normalize_business_code(&business.business_code)?;
        let now = Utc::now();
        let business = Business {
            id: new_id(),
            name: required_text("businessName", &business.name, 200)?,
            description: optional_text(
                "businessDescription",
                business.description.as_deref(),
                1000,
            )?,
            business_code: code.clone(),
            created_at: now,
            updated_at: now,
        };
        let owner = prepare_user(
            NewUser {
                role: Role::Owner,
                ..owner
            },
            Some(code),
        )?;

        debug!(business_code = %business.business_code, "Registering business");

        let _gate = self.write_gate.lock().await;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO businesses (id, name, description, business_code, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&business.id)
        .bind(&business.name)
        .bind(&business.description)
        .bind(&business.business_code)
        .bind(business.created_at)
        .bind(business.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(&business.business_code))?;

        insert_user(&mut *tx, &owner).await?;
        tx.commit().await?;

        info!(
            business_id = %business.id,
            business_code = %business.business_code,
            owner_id = %owner.id,
            "Business registered"
        );

        Ok((business, owner))
    }
}

fn prepare_user(input: NewUser, business_code: Option<String>) -> DbResult<User> {
    Ok(User {
        id: new_id(),
        name: required_text("name", &input.name, 100)?,
        email: normalize_email(&input.email)?,
        password_hash: input.password_hash,
        role: input.role,
        business_code,
        created_at: Utc::now(),
    })
}

async fn insert_user(conn: &mut SqliteConnection, user: &User) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, name, email, password_hash, role, business_code, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role)
    .bind(&user.business_code)
    .bind(user.created_at)
    .execute(conn)
    .await
    .map_err(|e| DbError::from(e).with_duplicate_value(&user.email))?;
    Ok(())
}
