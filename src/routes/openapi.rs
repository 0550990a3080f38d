//! OpenAPI document for the customer API.

use crate::handlers::customer;
use crate::model::{Customer, CustomerChanges, NewCustomer};
use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Customer API Service"),
    paths(customer::list, customer::create, customer::read, customer::update, customer::delete),
    components(schemas(Customer, NewCustomer, CustomerChanges)),
    tags((name = "customers", description = "Customer records"))
)]
pub struct ApiDoc;

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// GET /openapi.json
pub fn openapi_routes() -> Router {
    Router::new().route("/openapi.json", get(openapi))
}
