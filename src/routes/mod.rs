//! Route tables.

mod common;
mod customer;
mod openapi;

pub use common::common_routes;
pub use customer::{customer_routes, CUSTOMERS_PREFIX};
pub use openapi::{openapi_routes, ApiDoc};
