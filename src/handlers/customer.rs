//! Customer CRUD handlers: create, list, read, update, delete.

use crate::error::AppError;
use crate::model::{Customer, CustomerChanges, NewCustomer};
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Rows to skip (default 0).
    pub skip: Option<u32>,
    /// Maximum rows to return (default 100).
    pub limit: Option<u32>,
}

/// Well-formed JSON with missing or mistyped fields is a validation failure,
/// anything else wrong with the body is a bad request.
fn body_error(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(e) => AppError::Validation(e.body_text()),
        other if other.status() == StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(other.body_text()),
        other => AppError::BadRequest(other.body_text()),
    }
}

fn query_error(rejection: QueryRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}

#[utoipa::path(
    get,
    path = "/customers",
    tag = "customers",
    params(ListParams),
    responses(
        (status = 200, description = "Customers in insertion order", body = Vec<Customer>),
        (status = 422, description = "skip or limit is not a non-negative integer")
    )
)]
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params.map_err(query_error)?;
    let rows = state.customers.list_customers(params.skip, params.limit).await?;
    Ok((StatusCode::OK, Json(rows)))
}

#[utoipa::path(
    post,
    path = "/customers",
    tag = "customers",
    request_body = NewCustomer,
    responses(
        (status = 201, description = "Customer created", body = Customer),
        (status = 400, description = "Email already in use"),
        (status = 422, description = "Missing or invalid field")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewCustomer>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(input) = body.map_err(body_error)?;
    let row = state.customers.create_customer(input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[utoipa::path(
    get,
    path = "/customers/{id}",
    tag = "customers",
    params(("id" = String, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer", body = Customer),
        (status = 404, description = "No customer with this id")
    )
)]
pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let row = state
        .customers
        .get_customer(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(id))?;
    Ok((StatusCode::OK, Json(row)))
}

#[utoipa::path(
    put,
    path = "/customers/{id}",
    tag = "customers",
    params(("id" = String, Path, description = "Customer id")),
    request_body = CustomerChanges,
    responses(
        (status = 200, description = "Updated customer", body = Customer),
        (status = 400, description = "Email already in use by another customer"),
        (status = 404, description = "No customer with this id"),
        (status = 422, description = "A supplied field is invalid")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<CustomerChanges>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(changes) = body.map_err(body_error)?;
    let row = state.customers.update_customer(&id, changes).await?;
    Ok((StatusCode::OK, Json(row)))
}

#[utoipa::path(
    delete,
    path = "/customers/{id}",
    tag = "customers",
    params(("id" = String, Path, description = "Customer id")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 404, description = "No customer with this id")
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.customers.delete_customer(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
