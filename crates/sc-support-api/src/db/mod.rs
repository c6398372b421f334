//! Database access layer for PostgreSQL.
//!
//! Each sub-module provides typed query functions over a `PgPool`.

pub mod chats;
pub mod escalations;
pub mod products;
pub mod users;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Connect to PostgreSQL and run migrations.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    tracing::info!("running database migrations");
    sqlx::raw_sql(include_str!("../../migrations/001_users.sql"))
        .execute(&pool)
        .await?;
    sqlx::raw_sql(include_str!("../../migrations/002_products.sql"))
        .execute(&pool)
        .await?;
    sqlx::raw_sql(include_str!("../../migrations/003_chats.sql"))
        .execute(&pool)
        .await?;
    sqlx::raw_sql(include_str!("../../migrations/004_escalations.sql"))
        .execute(&pool)
        .await?;
    tracing::info!("migrations complete");

    Ok(pool)
}

/// Insert the demo accounts and catalogue if they are missing.
pub async fn seed_demo_data(pool: &PgPool) -> Result<(), sqlx::Error> {
    for user in crate::store::memory::demo_users() {
        let inserted = users::insert_if_absent(pool, &user).await?;
        if inserted {
            tracing::info!(email = %user.email, "demo user created");
        }
    }

    if products::count(pool).await? == 0 {
        let catalogue = sc_protocol::demo_products();
        for product in &catalogue {
            products::insert(pool, product).await?;
        }
        tracing::info!(count = catalogue.len(), "demo products created");
    }

    Ok(())
}
