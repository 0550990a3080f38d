//! In-process store. Used by tests and by the server when no database is configured.

use super::CustomerStore;
use crate::error::AppError;
use crate::model::{Customer, CustomerPatch};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    next_seq: u64,
    /// Insertion sequence -> record; iteration order is list order.
    rows: BTreeMap<u64, Customer>,
    seq_by_id: HashMap<String, u64>,
    /// Unique index: email -> id.
    id_by_email: HashMap<String, String>,
}

/// Every write checks and mutates under one lock, so the email index can never
/// disagree with the rows.
#[derive(Default)]
pub struct MemoryCustomerStore {
    tables: RwLock<Tables>,
}

impl MemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CustomerStore for MemoryCustomerStore {
    async fn get_by_id(&self, id: &str) -> Result<Option<Customer>, AppError> {
        let t = self.read();
        Ok(t.seq_by_id.get(id).and_then(|seq| t.rows.get(seq)).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Customer>, AppError> {
        let t = self.read();
        Ok(t.id_by_email
            .get(email)
            .and_then(|id| t.seq_by_id.get(id))
            .and_then(|seq| t.rows.get(seq))
            .cloned())
    }

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Customer>, AppError> {
        let t = self.read();
        Ok(t.rows
            .values()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn insert(&self, customer: &Customer) -> Result<Customer, AppError> {
        let mut t = self.write();
        if t.seq_by_id.contains_key(&customer.id) {
            return Err(AppError::StorageConstraintViolation("customers_pkey".into()));
        }
        if t.id_by_email.contains_key(&customer.email) {
            return Err(AppError::StorageConstraintViolation("customers_email_key".into()));
        }
        let seq = t.next_seq;
        t.next_seq += 1;
        t.seq_by_id.insert(customer.id.clone(), seq);
        t.id_by_email.insert(customer.email.clone(), customer.id.clone());
        t.rows.insert(seq, customer.clone());
        Ok(customer.clone())
    }

    async fn update(&self, id: &str, patch: &CustomerPatch) -> Result<Customer, AppError> {
        let mut t = self.write();
        let seq = *t
            .seq_by_id
            .get(id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        let old_email = match t.rows.get(&seq) {
            Some(row) => row.email.clone(),
            None => return Err(AppError::NotFound(id.to_string())),
        };
        if let Some(email) = &patch.email {
            if t.id_by_email.get(email).is_some_and(|owner| owner != id) {
                return Err(AppError::StorageConstraintViolation("customers_email_key".into()));
            }
        }
        let updated = {
            let row = t
                .rows
                .get_mut(&seq)
                .ok_or_else(|| AppError::NotFound(id.to_string()))?;
            patch.apply_to(row);
            row.clone()
        };
        if updated.email != old_email {
            t.id_by_email.remove(&old_email);
            t.id_by_email.insert(updated.email.clone(), id.to_string());
        }
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut t = self.write();
        let seq = t
            .seq_by_id
            .remove(id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        if let Some(row) = t.rows.remove(&seq) {
            t.id_by_email.remove(&row.email);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
