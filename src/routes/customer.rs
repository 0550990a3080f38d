//! Customer CRUD routes, mounted by the server under [`CUSTOMERS_PREFIX`].

use crate::handlers::customer::{create, delete as delete_handler, list, read, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub const CUSTOMERS_PREFIX: &str = "/customers";

pub fn customer_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route(
            "/:id",
            get(read).put(update).patch(update).delete(delete_handler),
        )
        .with_state(state)
}
