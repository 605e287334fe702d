//! In-process row store for development and tests

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tokio::sync::Mutex;

use super::{assign_id, into_object, Filter, GatewayError, PersistenceGateway, Table};

#[derive(Debug, Default)]
pub struct MemoryGateway {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    tables: HashMap<Table, Vec<Map<String, Value>>>,
    /// Writes still allowed before every further write is rejected.
    remaining_writes: Option<usize>,
}

impl Inner {
    fn take_write(&mut self) -> Result<(), GatewayError> {
        match self.remaining_writes.as_mut() {
            Some(0) => Err(GatewayError::Rejected("storage unavailable".into())),
            Some(n) => {
                *n -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl MemoryGateway {
    pub fn new() -> Self { Self::default() }

    /// A store holding a small demo menu.
    pub fn with_demo_menu() -> Self {
        let menu = [
            (1, "Margherita", "Tomato, mozzarella, basil", 274, 5),
            (2, "Funghi", "Tomato, mozzarella, mushrooms", 160, 5),
            (3, "Diavola", "Tomato, mozzarella, spicy salami", 310, 3),
            (4, "Quattro Formaggi", "Four cheeses", 289, 3),
        ];
        let rows = menu.into_iter().map(|(id, name, description, price, max)| {
            json!({
                "id": id, "name": name, "description": description,
                "image_url": format!("/images/pizza-{id}.jpg"), "sold_out": false,
                "price": price, "max_order_quantity": max, "currency": "CZK",
            })
        });
        let mut tables = HashMap::new();
        tables.insert(Table::MenuItems, rows.filter_map(|row| into_object(row).ok()).collect());
        Self { inner: Mutex::new(Inner { tables, remaining_writes: None }) }
    }

    /// Lets `writes` more inserts/updates/deletes through, then rejects every write.
    pub async fn fail_writes_after(&self, writes: usize) {
        self.inner.lock().await.remaining_writes = Some(writes);
    }

    pub async fn heal(&self) {
        self.inner.lock().await.remaining_writes = None;
    }

    pub async fn row_count(&self, table: Table) -> usize {
        self.inner.lock().await.tables.get(&table).map_or(0, Vec::len)
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Value>, GatewayError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .tables
            .get(&table)
            .into_iter()
            .flatten()
            .filter(|row| filter.matches_object(row))
            .map(|row| Value::Object(row.clone()))
            .collect())
    }

    async fn insert(&self, table: Table, row: Value) -> Result<Vec<Value>, GatewayError> {
        let mut row = into_object(row)?;
        let mut inner = self.inner.lock().await;
        inner.take_write()?;
        assign_id(&mut row);
        inner.tables.entry(table).or_default().push(row.clone());
        Ok(vec![Value::Object(row)])
    }

    async fn update(&self, table: Table, patch: Value, filter: &Filter) -> Result<Vec<Value>, GatewayError> {
        let patch = into_object(patch)?;
        let mut inner = self.inner.lock().await;
        inner.take_write()?;
        let mut updated = vec![];
        for row in inner.tables.entry(table).or_default().iter_mut() {
            if filter.matches_object(row) {
                row.extend(patch.clone());
                updated.push(Value::Object(row.clone()));
            }
        }
        Ok(updated)
    }

    async fn delete(&self, table: Table, filter: &Filter) -> Result<(), GatewayError> {
        let mut inner = self.inner.lock().await;
        inner.take_write()?;
        inner.tables.entry(table).or_default().retain(|row| !filter.matches_object(row));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_id_and_select_filters() {
        let db = MemoryGateway::new();
        let inserted = db.insert(Table::Addresses, json!({"customer_id": "c1", "city": "Praha"})).await.unwrap();
        let id = inserted[0]["id"].as_str().unwrap().to_string();
        db.insert(Table::Addresses, json!({"customer_id": "c2", "city": "Brno"})).await.unwrap();

        let rows = db.select(Table::Addresses, &Filter::eq("customer_id", "c1")).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], Value::String(id));
        assert_eq!(db.select(Table::Addresses, &Filter::all()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_merges_patch_shallowly() {
        let db = MemoryGateway::new();
        db.insert(Table::Carts, json!({"id": "k", "customer_id": "c1", "itemsCount": 2})).await.unwrap();
        let updated = db.update(Table::Carts, json!({"itemsCount": 0}), &Filter::eq("id", "k")).await.unwrap();
        assert_eq!(updated[0]["itemsCount"], 0);
        assert_eq!(updated[0]["customer_id"], "c1");
    }

    #[tokio::test]
    async fn test_update_without_match_returns_nothing() {
        let db = MemoryGateway::new();
        let updated = db.update(Table::Carts, json!({"itemsCount": 0}), &Filter::eq("id", "nope")).await.unwrap();
        assert!(updated.is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_lenient() {
        let db = MemoryGateway::new();
        db.insert(Table::Addresses, json!({"id": "a"})).await.unwrap();
        db.delete(Table::Addresses, &Filter::eq("id", "zzz")).await.unwrap();
        db.delete(Table::Addresses, &Filter::eq("id", "a")).await.unwrap();
        assert_eq!(db.row_count(Table::Addresses).await, 0);
    }

    #[tokio::test]
    async fn test_write_failure_injection() {
        let db = MemoryGateway::new();
        db.fail_writes_after(1).await;
        db.insert(Table::Orders, json!({"n": 1})).await.unwrap();
        let err = db.insert(Table::Orders, json!({"n": 2})).await.unwrap_err();
        assert!(matches!(err, GatewayError::Rejected(_)));
        db.heal().await;
        db.insert(Table::Orders, json!({"n": 3})).await.unwrap();
        assert_eq!(db.row_count(Table::Orders).await, 2);
    }

    #[tokio::test]
    async fn test_demo_menu() {
        let db = MemoryGateway::with_demo_menu();
        assert_eq!(db.row_count(Table::MenuItems).await, 4);
    }
}
