//! PostgreSQL row store: one `(id TEXT, row JSONB)` table per entity

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::Postgres;

use super::{assign_id, into_object, Filter, GatewayError, PersistenceGateway, Table};

#[derive(Clone, Debug)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self { Self { pool } }

    /// Connects and runs the bundled migrations.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, GatewayError> {
        let pool = PgPoolOptions::new().max_connections(max_connections).connect(url).await?;
        sqlx::migrate!("./migrations").run(&pool).await.map_err(sqlx::Error::from)?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool { &self.pool }
}

/// `WHERE` clause for `filter`, numbering placeholders from `first`.
fn where_clause(filter: &Filter, first: usize) -> String {
    if filter.conditions().is_empty() {
        return String::new();
    }
    let conditions: Vec<String> = (0..filter.conditions().len())
        .map(|i| format!("row -> ${}::text = ${}::jsonb", first + 2 * i, first + 2 * i + 1))
        .collect();
    format!(" WHERE {}", conditions.join(" AND "))
}

#[async_trait]
impl PersistenceGateway for PgGateway {
    async fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Value>, GatewayError> {
        let sql = format!("SELECT row FROM {}{} ORDER BY id", table.as_str(), where_clause(filter, 1));
        let mut query = sqlx::query_scalar::<Postgres, Json<Value>>(&sql);
        for (field, value) in filter.conditions() {
            query = query.bind(field).bind(Json(value));
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|Json(row)| row).collect())
    }

    async fn insert(&self, table: Table, row: Value) -> Result<Vec<Value>, GatewayError> {
        let mut row = into_object(row)?;
        let id = assign_id(&mut row);
        let sql = format!("INSERT INTO {} (id, row) VALUES ($1, $2) RETURNING row", table.as_str());
        let Json(stored) = sqlx::query_scalar::<Postgres, Json<Value>>(&sql)
            .bind(id)
            .bind(Json(Value::Object(row)))
            .fetch_one(&self.pool)
            .await?;
        Ok(vec![stored])
    }

    async fn update(&self, table: Table, patch: Value, filter: &Filter) -> Result<Vec<Value>, GatewayError> {
        let patch = into_object(patch)?;
        let sql = format!("UPDATE {} SET row = row || $1::jsonb{} RETURNING row", table.as_str(), where_clause(filter, 2));
        let mut query = sqlx::query_scalar::<Postgres, Json<Value>>(&sql).bind(Json(Value::Object(patch)));
        for (field, value) in filter.conditions() {
            query = query.bind(field).bind(Json(value));
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|Json(row)| row).collect())
    }

    async fn delete(&self, table: Table, filter: &Filter) -> Result<(), GatewayError> {
        let sql = format!("DELETE FROM {}{}", table.as_str(), where_clause(filter, 1));
        let mut query = sqlx::query::<Postgres>(&sql);
        for (field, value) in filter.conditions() {
            query = query.bind(field).bind(Json(value));
        }
        query.execute(&self.pool).await?;
        Ok(())
    }
}
