//! Account queries.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use sc_protocol::{User, UserRole};

/// User row returned from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            password: row.password,
            role: UserRole::from_db(&row.role),
            created_at: row.created_at,
        }
    }
}

/// Get a user by ID.
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Get a user by email address.
pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Insert a new user. Fails with a unique violation if the email is taken.
pub async fn insert(pool: &PgPool, user: &User) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (id, email, password, role, created_at) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.password)
    .bind(user.role.as_str())
    .bind(user.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Insert a user unless the email already exists. Returns whether a row was written.
pub async fn insert_if_absent(pool: &PgPool, user: &User) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO users (id, email, password, role, created_at) VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.password)
    .bind(user.role.as_str())
    .bind(user.created_at)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
