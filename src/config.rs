//! Service configuration read from the environment.

use crate::error::ConfigError;
use regex::Regex;

pub const DEFAULT_SCHEMA: &str = "public";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// `DATABASE_URL`. When unset the server keeps customers in memory.
    pub database_url: Option<String>,
    /// `CUSTOMER_SCHEMA`: PostgreSQL schema holding the customers table.
    pub schema: String,
    /// `BIND_ADDR`
    pub bind_addr: String,
    /// `DB_MAX_CONNECTIONS`
    pub max_connections: u32,
    /// `BODY_LIMIT_BYTES`
    pub body_limit_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            database_url: None,
            schema: DEFAULT_SCHEMA.into(),
            bind_addr: DEFAULT_BIND_ADDR.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = ServiceConfig::default();

        let schema = get("CUSTOMER_SCHEMA").unwrap_or(defaults.schema);
        validate_identifier("CUSTOMER_SCHEMA", &schema)?;

        Ok(ServiceConfig {
            database_url: get("DATABASE_URL"),
            schema,
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            max_connections: parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), defaults.max_connections)?,
            body_limit_bytes: parse_or("BODY_LIMIT_BYTES", get("BODY_LIMIT_BYTES"), defaults.body_limit_bytes)?,
        })
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(s) => s.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            message: format!("'{}': {}", s, e),
        }),
    }
}

fn validate_identifier(key: &'static str, value: &str) -> Result<(), ConfigError> {
    let re = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").map_err(|e| ConfigError::InvalidValue {
        key,
        message: e.to_string(),
    })?;
    if !re.is_match(value) {
        return Err(ConfigError::InvalidValue {
            key,
            message: format!("'{}' is not a plain identifier", value),
        });
    }
    Ok(())
}
