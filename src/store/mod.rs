//! Record store: the single owner of persisted customers.
//!
//! Both implementations enforce primary-key and email uniqueness themselves, so a
//! write that slips past the service's pre-check still fails with
//! [`AppError::StorageConstraintViolation`] instead of storing a duplicate.

mod memory;
mod postgres;

pub use memory::MemoryCustomerStore;
pub use postgres::{ensure_customer_table, ensure_database_exists, PgCustomerStore};

use crate::error::AppError;
use crate::model::{Customer, CustomerPatch};
use async_trait::async_trait;

#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn get_by_id(&self, id: &str) -> Result<Option<Customer>, AppError>;

    async fn get_by_email(&self, email: &str) -> Result<Option<Customer>, AppError>;

    /// Customers in insertion order, `skip` rows skipped, at most `limit` returned.
    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Customer>, AppError>;

    /// Persist a fully-formed record. Fails with `StorageConstraintViolation` when
    /// the id or email is already taken.
    async fn insert(&self, customer: &Customer) -> Result<Customer, AppError>;

    /// Apply only the supplied fields. Fails with `NotFound` when `id` is absent.
    async fn update(&self, id: &str, patch: &CustomerPatch) -> Result<Customer, AppError>;

    /// Fails with `NotFound` when `id` is absent.
    async fn delete(&self, id: &str) -> Result<(), AppError>;

    /// Cheap liveness check used by readiness.
    async fn ping(&self) -> Result<(), AppError>;
}
