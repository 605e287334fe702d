//! Menu catalog

use std::sync::Arc;

use crate::domain::aggregates::{MenuItem, MenuQuery};
use crate::gateway::{decode, decode_first, Filter, PersistenceGateway, Table};
use crate::{Result, StorefrontError};

#[derive(Clone)]
pub struct Catalog {
    gateway: Arc<dyn PersistenceGateway>,
}

impl Catalog {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self { Self { gateway } }

    pub async fn fetch_menu(&self, query: &MenuQuery) -> Result<Vec<MenuItem>> {
        let rows = self
            .gateway
            .select(Table::MenuItems, &Filter::all())
            .await
            .map_err(StorefrontError::persistence("Failed fetching menu"))?;
        let items = decode(rows).map_err(StorefrontError::persistence("Failed fetching menu"))?;
        Ok(query.apply(items))
    }

    pub async fn menu_item(&self, id: i64) -> Result<MenuItem> {
        let rows = self
            .gateway
            .select(Table::MenuItems, &Filter::eq("id", id))
            .await
            .map_err(StorefrontError::persistence("Failed fetching menu"))?;
        decode_first(rows)
            .map_err(StorefrontError::persistence("Failed fetching menu"))?
            .ok_or_else(|| StorefrontError::NotFound(format!("Menu item {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::MenuSort;
    use crate::gateway::MemoryGateway;

    fn catalog() -> Catalog { Catalog::new(Arc::new(MemoryGateway::with_demo_menu())) }

    #[tokio::test]
    async fn test_fetch_menu_sorted_and_paged() {
        let query = MenuQuery { sort: Some(MenuSort::PriceAsc), page: Some(1), per_page: Some(2), ..Default::default() };
        let items = catalog().fetch_menu(&query).await.unwrap();
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Funghi", "Margherita"]);
    }

    #[tokio::test]
    async fn test_menu_item_lookup() {
        let catalog = catalog();
        assert_eq!(catalog.menu_item(3).await.unwrap().name, "Diavola");
        assert!(matches!(catalog.menu_item(42).await, Err(StorefrontError::NotFound(_))));
    }
}
