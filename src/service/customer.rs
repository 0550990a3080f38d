//! Customer lifecycle: id assignment, validation, email pre-checks.

use crate::error::AppError;
use crate::model::{Customer, CustomerChanges, NewCustomer};
use crate::store::CustomerStore;
use std::sync::Arc;

pub const DEFAULT_LIMIT: u32 = 100;

/// Stateless between calls; cloning shares the store.
#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn CustomerStore>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn CustomerStore>) -> Self {
        CustomerService { store }
    }

    pub fn store(&self) -> &Arc<dyn CustomerStore> {
        &self.store
    }

    /// Validate, reject a known email, assign a fresh id and insert. A concurrent
    /// create that wins the race surfaces as `StorageConstraintViolation` from the store.
    pub async fn create_customer(&self, input: NewCustomer) -> Result<Customer, AppError> {
        input.validate()?;
        if self.store.get_by_email(&input.email).await?.is_some() {
            return Err(AppError::DuplicateEmail(input.email));
        }
        let customer = input.into_customer(new_customer_id());
        let stored = self.store.insert(&customer).await?;
        tracing::info!(id = %stored.id, "customer created");
        Ok(stored)
    }

    pub async fn get_customer(&self, id: &str) -> Result<Option<Customer>, AppError> {
        self.store.get_by_id(id).await
    }

    pub async fn get_customer_by_email(&self, email: &str) -> Result<Option<Customer>, AppError> {
        self.store.get_by_email(email).await
    }

    /// `skip` defaults to 0, `limit` to 100; both pass through to the store otherwise.
    pub async fn list_customers(
        &self,
        skip: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<Customer>, AppError> {
        let skip = skip.unwrap_or(0);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        self.store.list(skip, limit).await
    }

    /// Apply only the supplied fields. Changing to an email held by another
    /// customer fails with `DuplicateEmail`; keeping one's own email is fine.
    pub async fn update_customer(
        &self,
        id: &str,
        changes: CustomerChanges,
    ) -> Result<Customer, AppError> {
        let patch = changes.into_patch()?;
        let current = self
            .store
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        if let Some(email) = patch.email.as_deref().filter(|e| *e != current.email) {
            if self.store.get_by_email(email).await?.is_some_and(|other| other.id != id) {
                return Err(AppError::DuplicateEmail(email.to_string()));
            }
        }
        let updated = self.store.update(id, &patch).await?;
        tracing::info!(id = %id, "customer updated");
        Ok(updated)
    }

    pub async fn delete_customer(&self, id: &str) -> Result<(), AppError> {
        self.store.delete(id).await?;
        tracing::info!(id = %id, "customer deleted");
        Ok(())
    }
}

/// Random 128-bit id rendered as a hyphenated UUID.
pub fn new_customer_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
