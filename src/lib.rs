//! Customer service: CRUD over customer records, exposed as a JSON HTTP API.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::ServiceConfig;
pub use error::{AppError, ConfigError};
pub use model::{Customer, CustomerChanges, CustomerPatch, NewCustomer};
pub use routes::{common_routes, customer_routes, openapi_routes, ApiDoc, CUSTOMERS_PREFIX};
pub use service::CustomerService;
pub use state::AppState;
pub use store::{
    ensure_customer_table, ensure_database_exists, CustomerStore, MemoryCustomerStore, PgCustomerStore,
};

use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

/// Full application: common routes at the root, customers under [`CUSTOMERS_PREFIX`].
pub fn app(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(openapi_routes())
        .nest(CUSTOMERS_PREFIX, customer_routes(state))
        .layer(ServiceBuilder::new().layer(RequestBodyLimitLayer::new(body_limit_bytes)))
}
