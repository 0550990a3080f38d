//! Values bound to a customer query.

use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::Postgres;

/// A value that can be bound to a PostgreSQL query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SqlParam {
    /// Text column; `None` binds SQL NULL.
    Text(Option<String>),
    Int(i64),
}

impl From<&str> for SqlParam {
    fn from(s: &str) -> Self {
        SqlParam::Text(Some(s.to_string()))
    }
}

impl From<Option<String>> for SqlParam {
    fn from(s: Option<String>) -> Self {
        SqlParam::Text(s)
    }
}

/// Bind params in order ($1, $2, ...).
pub fn bind_params<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &'q [SqlParam],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for p in params {
        query = match p {
            SqlParam::Text(s) => query.bind(s.as_deref()),
            SqlParam::Int(n) => query.bind(*n),
        };
    }
    query
}
