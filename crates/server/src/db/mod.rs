mod accounts;
mod entities;
mod professionals;
mod repository;

pub use accounts::{AccountRepository, LoginAccount};
pub use professionals::ProfessionalRepository;
pub use repository::{Entity, Link, Repository};

use deadpool_postgres::{Config, Pool, Runtime};
use tokio_postgres::NoTls;

use crate::error::AppError;

const SCHEMA: &str = include_str!("schema.sql");

/// Create a connection pool from a database URL
pub async fn create_pool(database_url: &str) -> Result<Pool, deadpool_postgres::CreatePoolError> {
    let mut cfg = Config::new();
    cfg.url = Some(database_url.to_string());
    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
}

/// Create any missing tables. Safe to run on every start.
pub async fn migrate(pool: &Pool) -> Result<(), AppError> {
    let client = pool.get().await?;
    client.batch_execute(SCHEMA).await?;
    tracing::info!("Database schema is up to date");
    Ok(())
}
