//! Customer API server: loads config, prepares the store, serves the routes.
//!
//! Run from repo root: `cargo run -p customer-server`

use customer_service::{
    app, ensure_customer_table, ensure_database_exists, AppState, CustomerStore, MemoryCustomerStore,
    PgCustomerStore, ServiceConfig,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("customer_service=info,customer_server=info")
            }),
        )
        .init();

    let config = ServiceConfig::from_env()?;

    let store: Arc<dyn CustomerStore> = match &config.database_url {
        Some(database_url) => {
            ensure_database_exists(database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(database_url)
                .await?;
            ensure_customer_table(&pool, &config.schema).await?;
            Arc::new(PgCustomerStore::new(pool, &config.schema))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, customers are kept in memory and lost on exit");
            Arc::new(MemoryCustomerStore::new())
        }
    };

    let state = AppState::new(store);
    let router = app(state, config.body_limit_bytes);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Customer API listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
