//! MySQL implementation of the UserRepository trait.
//!
//! UUIDs are stored as `CHAR(36)`. Soft-deleted rows stay in the table with
//! `deleted_at` set and are filtered out of every read.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{MySqlPool, Row};
use std::str::FromStr;
use uuid::Uuid;

use dl_core::domain::entities::user::{Gender, Role, User};
use dl_core::errors::{AuthError, DomainError};
use dl_core::repositories::UserRepository;

const USER_COLUMNS: &str = r#"
    id, first_name, last_name, date_of_birth, gender, email,
    password_hash, role, created_at, updated_at, deleted_at
"#;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to User entity
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row.try_get("id").map_err(column_error)?;
        let gender: String = row.try_get("gender").map_err(column_error)?;
        let role: String = row.try_get("role").map_err(column_error)?;

        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::fatal(format!("Invalid user UUID: {}", e)))?,
            first_name: row.try_get("first_name").map_err(column_error)?,
            last_name: row.try_get("last_name").map_err(column_error)?,
            date_of_birth: row
                .try_get::<NaiveDate, _>("date_of_birth")
                .map_err(column_error)?,
            gender: Gender::from_str(&gender).map_err(DomainError::fatal)?,
            email: row.try_get("email").map_err(column_error)?,
            password_hash: row.try_get("password_hash").map_err(column_error)?,
            role: Role::from_str(&role).map_err(DomainError::fatal)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(column_error)?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(column_error)?,
            deleted_at: row
                .try_get::<Option<DateTime<Utc>>, _>("deleted_at")
                .map_err(column_error)?,
        })
    }

    async fn fetch_one_active(&self, filter: &str, value: String) -> Result<Option<User>, DomainError> {
        let query = format!(
            "SELECT {} FROM users WHERE {} = ? AND deleted_at IS NULL LIMIT 1",
            USER_COLUMNS, filter
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("find user", e))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn active_row_exists(&self, id: Uuid) -> Result<bool, DomainError> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = ? AND deleted_at IS NULL) AS found",
        )
        .bind(id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| query_error("check user", e))?;

        let found: i64 = row.try_get("found").map_err(column_error)?;
        Ok(found == 1)
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.fetch_one_active("id", id.to_string()).await
    }

    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_active("email", email.to_string()).await
    }

    async fn exists_active_email(&self, email: &str) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE active_email = ?) AS taken")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_error("check email", e))?;

        let taken: i64 = row.try_get("taken").map_err(column_error)?;
        Ok(taken == 1)
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (
                id, first_name, last_name, date_of_birth, gender, email,
                password_hash, role, created_at, updated_at, deleted_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.date_of_birth)
            .bind(user.gender.as_str())
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.created_at)
            .bind(user.updated_at)
            .bind(user.deleted_at)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error("create user", e))?;

        tracing::debug!(user_id = %user.id, "User row inserted");
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let query = r#"
            UPDATE users
            SET first_name = ?, last_name = ?, date_of_birth = ?, gender = ?,
                email = ?, password_hash = ?, role = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
        "#;

        let result = sqlx::query(query)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.date_of_birth)
            .bind(user.gender.as_str())
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.updated_at)
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| write_error("update user", e))?;

        // MySQL reports changed rows, so an update writing identical values
        // affects zero rows without the user being gone.
        if result.rows_affected() == 0 && !self.active_row_exists(user.id).await? {
            return Err(AuthError::UserNotFound.into());
        }

        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE users SET deleted_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| query_error("delete user", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_active(&self) -> Result<Vec<User>, DomainError> {
        let query = format!(
            "SELECT {} FROM users WHERE deleted_at IS NULL ORDER BY created_at ASC",
            USER_COLUMNS
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error("list users", e))?;

        rows.iter().map(Self::row_to_user).collect()
    }
}

fn column_error(e: sqlx::Error) -> DomainError {
    DomainError::fatal(format!("Failed to decode user row: {}", e))
}

fn query_error(operation: &str, e: sqlx::Error) -> DomainError {
    tracing::error!(operation, error = %e, "User store query failed");
    DomainError::transient(format!("Failed to {}", operation))
}

/// Like `query_error`, but a unique-index violation on `active_email`
/// means the address is already held by an active user.
fn write_error(operation: &str, e: sqlx::Error) -> DomainError {
    if is_unique_violation(&e) {
        return AuthError::EmailAlreadyRegistered.into();
    }
    query_error(operation, e)
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}
