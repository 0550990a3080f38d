//! PostgreSQL store. Every call checks a connection out of the pool for one statement.

use super::CustomerStore;
use crate::error::AppError;
use crate::model::{Customer, CustomerPatch};
use crate::sql::{self, bind_params, QueryBuf};
use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

#[derive(Clone)]
pub struct PgCustomerStore {
    pool: PgPool,
    table: String,
}

impl PgCustomerStore {
    /// `schema` must already be a valid identifier (see `ServiceConfig`).
    pub fn new(pool: PgPool, schema: &str) -> Self {
        PgCustomerStore {
            pool,
            table: sql::qualified_table(schema, sql::CUSTOMERS_TABLE),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_optional(&self, q: &QueryBuf) -> Result<Option<Customer>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_params(sqlx::query_as::<_, Customer>(&q.sql), &q.params)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;
        Ok(row)
    }
}

/// Create schema if not exists, then the customers table. Idempotent; call before serving.
pub async fn ensure_customer_table(pool: &PgPool, schema: &str) -> Result<(), AppError> {
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", sql::quoted(schema)))
        .execute(pool)
        .await?;
    let table = sql::qualified_table(schema, sql::CUSTOMERS_TABLE);
    sqlx::query(&sql::create_customers_table(&table))
        .execute(pool)
        .await?;
    tracing::info!(table = %table, "customer table ready");
    Ok(())
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn get_by_id(&self, id: &str) -> Result<Option<Customer>, AppError> {
        self.fetch_optional(&sql::select_by_id(&self.table, id)).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Customer>, AppError> {
        self.fetch_optional(&sql::select_by_email(&self.table, email)).await
    }

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Customer>, AppError> {
        let q = sql::select_list(&self.table, skip, limit);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_params(sqlx::query_as::<_, Customer>(&q.sql), &q.params)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert(&self, customer: &Customer) -> Result<Customer, AppError> {
        self.fetch_optional(&sql::insert(&self.table, customer))
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    async fn update(&self, id: &str, patch: &CustomerPatch) -> Result<Customer, AppError> {
        let row = match sql::update(&self.table, id, patch) {
            Some(q) => self.fetch_optional(&q).await?,
            None => self.get_by_id(id).await?,
        };
        row.ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let q = sql::delete(&self.table, id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let deleted: Option<(String,)> = bind_params(sqlx::query_as(&q.sql), &q.params)
            .fetch_optional(&self.pool)
            .await?;
        deleted.map(|_| ()).ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Unique violations become `StorageConstraintViolation`; CHECK violations are invalid input.
fn map_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return AppError::StorageConstraintViolation(
                db.constraint().unwrap_or("unique constraint").to_string(),
            );
        }
        if db.is_check_violation() {
            return AppError::Validation(format!(
                "rejected by {}",
                db.constraint().unwrap_or("check constraint")
            ));
        }
    }
    AppError::Db(e)
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let Some((admin, db_name)) = admin_target(database_url)? else {
        return Ok(());
    };
    let mut conn: sqlx::PgConnection = admin.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", sql::quoted(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "created database");
    }
    Ok(())
}

/// Options for the `postgres` admin database plus the database to create.
/// None when the URL names no database or names `postgres` itself.
fn admin_target(database_url: &str) -> Result<Option<(PgConnectOptions, String)>, AppError> {
    let opts = PgConnectOptions::from_str(database_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let db_name = match opts.get_database() {
        None | Some("") | Some("postgres") => return Ok(None),
        Some(name) => name.to_string(),
    };
    Ok(Some((opts.database("postgres"), db_name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_target_swaps_database_name() {
        let (admin, name) = admin_target("postgres://u:p@db.internal:5432/customers?sslmode=disable")
            .expect("url")
            .expect("database named");
        assert_eq!(name, "customers");
        assert_eq!(admin.get_database(), Some("postgres"));
        assert_eq!(admin.get_host(), "db.internal");
        assert_eq!(admin.get_port(), 5432);
        assert_eq!(admin.get_username(), "u");
    }

    #[test]
    fn url_without_database_needs_no_create() {
        // PGDATABASE would supply a name the URL lacks.
        if std::env::var("PGDATABASE").is_ok() {
            return;
        }
        assert!(admin_target("postgres://u:p@localhost:5432").expect("url").is_none());
        assert!(admin_target("postgres://u:p@localhost:5432/").expect("url").is_none());
    }

    #[test]
    fn admin_database_is_left_alone() {
        assert!(admin_target("postgres://u:p@localhost/postgres").expect("url").is_none());
    }

    #[test]
    fn unparseable_url_is_rejected() {
        assert!(matches!(admin_target("not a url"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn non_database_errors_pass_through() {
        assert!(matches!(map_write_error(sqlx::Error::PoolTimedOut), AppError::Db(_)));
    }
}
