//! Customer record and the request shapes that create or change it.

use crate::error::AppError;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// A stored customer. `id` is assigned on create and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Customer {
    pub id: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

/// Body of a create request. Callers never supply the id.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewCustomer {
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

impl NewCustomer {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("first_name", &self.first_name)?;
        require_text("last_name", &self.last_name)?;
        require_email(&self.email)?;
        Ok(())
    }

    pub fn into_customer(self, id: String) -> Customer {
        Customer {
            id,
            first_name: self.first_name,
            middle_name: self.middle_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
        }
    }
}

/// Body of a partial update. The outer `Option` is "was the key present",
/// the inner one is "was it null".
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CustomerChanges {
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub middle_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub phone_number: Option<Option<String>>,
}

impl CustomerChanges {
    /// Validate each supplied field and produce the store-level patch.
    /// Only `middle_name` may be cleared with an explicit null.
    pub fn into_patch(self) -> Result<CustomerPatch, AppError> {
        let first_name = required_field("first_name", self.first_name)?;
        if let Some(v) = &first_name {
            require_text("first_name", v)?;
        }
        let last_name = required_field("last_name", self.last_name)?;
        if let Some(v) = &last_name {
            require_text("last_name", v)?;
        }
        let email = required_field("email", self.email)?;
        if let Some(v) = &email {
            require_email(v)?;
        }
        let phone_number = required_field("phone_number", self.phone_number)?;
        Ok(CustomerPatch {
            first_name,
            middle_name: self.middle_name,
            last_name,
            email,
            phone_number,
        })
    }
}

/// Field-level changes applied by the store. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerPatch {
    pub first_name: Option<String>,
    pub middle_name: Option<Option<String>>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

impl CustomerPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.middle_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone_number.is_none()
    }

    pub fn apply_to(&self, customer: &mut Customer) {
        if let Some(v) = &self.first_name {
            customer.first_name = v.clone();
        }
        if let Some(v) = &self.middle_name {
            customer.middle_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            customer.last_name = v.clone();
        }
        if let Some(v) = &self.email {
            customer.email = v.clone();
        }
        if let Some(v) = &self.phone_number {
            customer.phone_number = v.clone();
        }
    }
}

fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn required_field(col: &str, v: Option<Option<String>>) -> Result<Option<String>, AppError> {
    match v {
        None => Ok(None),
        Some(None) => Err(AppError::Validation(format!("{} cannot be null", col))),
        Some(Some(s)) => Ok(Some(s)),
    }
}

fn require_text(col: &str, v: &str) -> Result<(), AppError> {
    if v.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", col)));
    }
    Ok(())
}

fn require_email(v: &str) -> Result<(), AppError> {
    if !v.contains('@') {
        return Err(AppError::Validation("email must be a valid email".into()));
    }
    Ok(())
}
