//! Persistence gateway: a generic row store addressed by table and equality filters.
//!
//! Rows travel as whole JSON objects shaped like the domain aggregates. There
//! is no version token and no multi-row transaction; every write stands alone.

mod memory;
mod postgres;

pub use memory::MemoryGateway;
pub use postgres::PgGateway;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Table { Customers, Carts, Addresses, Orders, MenuItems }

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Customers => "customers",
            Table::Carts => "carts",
            Table::Addresses => "addresses",
            Table::Orders => "orders",
            Table::MenuItems => "menu_items",
        }
    }
}

/// Conjunction of `field == value` conditions on top-level row fields.
/// The empty filter matches every row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub fn all() -> Self { Self::default() }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and(field, value)
    }

    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, Value)] { &self.conditions }

    pub fn matches(&self, row: &Value) -> bool {
        row.as_object().is_some_and(|row| self.matches_object(row))
    }

    pub fn matches_object(&self, row: &Map<String, Value>) -> bool {
        self.conditions.iter().all(|(field, value)| row.get(field) == Some(value))
    }
}

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("malformed row: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("row is not a JSON object")]
    NotAnObject,

    #[error("write rejected: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Value>, GatewayError>;

    /// Inserts one row and returns it as stored, with its generated `id`.
    async fn insert(&self, table: Table, row: Value) -> Result<Vec<Value>, GatewayError>;

    /// Shallow-merges `patch` into every matching row and returns the updated rows.
    async fn update(&self, table: Table, patch: Value, filter: &Filter) -> Result<Vec<Value>, GatewayError>;

    /// Removes every matching row. Matching nothing is not an error.
    async fn delete(&self, table: Table, filter: &Filter) -> Result<(), GatewayError>;
}

/// Serializes an entity into its row shape.
pub fn encode<T: Serialize>(entity: &T) -> Result<Value, GatewayError> {
    Ok(serde_json::to_value(entity)?)
}

/// Decodes returned rows into typed entities.
pub fn decode<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, GatewayError> {
    rows.into_iter().map(|row| serde_json::from_value(row).map_err(GatewayError::from)).collect()
}

/// Decodes the first returned row, if any.
pub fn decode_first<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Option<T>, GatewayError> {
    Ok(decode(rows)?.into_iter().next())
}

/// Gives the row an `id` unless it already carries one, returning the key as text.
pub(crate) fn assign_id(row: &mut Map<String, Value>) -> String {
    match row.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            let id = Uuid::now_v7().to_string();
            row.insert("id".into(), Value::String(id.clone()));
            id
        }
    }
}

pub(crate) fn into_object(row: Value) -> Result<Map<String, Value>, GatewayError> {
    match row {
        Value::Object(map) => Ok(map),
        _ => Err(GatewayError::NotAnObject),
    }
}
