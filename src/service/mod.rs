//! CustomerService: mediates between request-shaped input and the record store.

mod customer;
pub use customer::{new_customer_id, CustomerService, DEFAULT_LIMIT};
