//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for the customers table.

use super::SqlParam;
use crate::model::{Customer, CustomerPatch};

pub const CUSTOMERS_TABLE: &str = "customers";

/// Columns returned for every customer read, in `Customer` field order.
const CUSTOMER_COLUMNS: &[&str] = &["id", "first_name", "middle_name", "last_name", "email", "phone_number"];

/// Quote identifier for PostgreSQL.
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: impl Into<SqlParam>) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v.into());
        n
    }
}

fn select_column_list() -> String {
    CUSTOMER_COLUMNS.iter().map(|c| quoted(c)).collect::<Vec<_>>().join(", ")
}

/// CREATE TABLE for customers. `seq` orders listings by insertion and is never returned.
pub fn create_customers_table(table: &str) -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            seq BIGSERIAL NOT NULL,
            id TEXT PRIMARY KEY,
            first_name TEXT NOT NULL CHECK (btrim(first_name) <> ''),
            middle_name TEXT,
            last_name TEXT NOT NULL CHECK (btrim(last_name) <> ''),
            email TEXT NOT NULL UNIQUE CHECK (strpos(email, '@') > 0),
            phone_number TEXT NOT NULL
        )
        "#,
        table
    )
}

pub fn select_by_id(table: &str, id: &str) -> QueryBuf {
    select_where(table, "id", id)
}

pub fn select_by_email(table: &str, email: &str) -> QueryBuf {
    select_where(table, "email", email)
}

fn select_where(table: &str, column: &str, value: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(value);
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        select_column_list(),
        table,
        quoted(column),
        n
    );
    q
}

/// SELECT list in insertion order with LIMIT/OFFSET.
pub fn select_list(table: &str, skip: u32, limit: u32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let l = q.push_param(SqlParam::Int(i64::from(limit)));
    let o = q.push_param(SqlParam::Int(i64::from(skip)));
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY seq LIMIT ${} OFFSET ${}",
        select_column_list(),
        table,
        l,
        o
    );
    q
}

/// INSERT one customer, RETURNING the stored row.
pub fn insert(table: &str, customer: &Customer) -> QueryBuf {
    let mut q = QueryBuf::new();
    let values = [
        q.push_param(customer.id.as_str()),
        q.push_param(customer.first_name.as_str()),
        q.push_param(customer.middle_name.clone()),
        q.push_param(customer.last_name.as_str()),
        q.push_param(customer.email.as_str()),
        q.push_param(customer.phone_number.as_str()),
    ];
    let placeholders: Vec<String> = values.iter().map(|n| format!("${}", n)).collect();
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        table,
        select_column_list(),
        placeholders.join(", "),
        select_column_list()
    );
    q
}

/// UPDATE only the supplied columns. Returns None when the patch is empty.
pub fn update(table: &str, id: &str, patch: &CustomerPatch) -> Option<QueryBuf> {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    if let Some(v) = &patch.first_name {
        let n = q.push_param(v.as_str());
        sets.push(format!("{} = ${}", quoted("first_name"), n));
    }
    if let Some(v) = &patch.middle_name {
        let n = q.push_param(v.clone());
        sets.push(format!("{} = ${}", quoted("middle_name"), n));
    }
    if let Some(v) = &patch.last_name {
        let n = q.push_param(v.as_str());
        sets.push(format!("{} = ${}", quoted("last_name"), n));
    }
    if let Some(v) = &patch.email {
        let n = q.push_param(v.as_str());
        sets.push(format!("{} = ${}", quoted("email"), n));
    }
    if let Some(v) = &patch.phone_number {
        let n = q.push_param(v.as_str());
        sets.push(format!("{} = ${}", quoted("phone_number"), n));
    }
    if sets.is_empty() {
        return None;
    }
    let id_n = q.push_param(id);
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        table,
        sets.join(", "),
        quoted("id"),
        id_n,
        select_column_list()
    );
    Some(q)
}

pub fn delete(table: &str, id: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id);
    q.sql = format!("DELETE FROM {} WHERE {} = ${} RETURNING {}", table, quoted("id"), n, quoted("id"));
    q
}
