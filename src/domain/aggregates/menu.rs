//! Menu items and the listing query applied to them

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sold_out: bool,
    pub price: Decimal,
    pub max_order_quantity: u32,
    pub currency: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuSort {
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MenuQuery {
    pub sort: Option<MenuSort>,
    #[serde(default)]
    pub only_available: bool,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl MenuQuery {
    /// Filters, sorts, then cuts out the requested page.
    pub fn apply(&self, mut items: Vec<MenuItem>) -> Vec<MenuItem> {
        if self.only_available {
            items.retain(|i| !i.sold_out);
        }
        match self.sort {
            Some(MenuSort::NameAsc) => items.sort_by(|a, b| a.name.cmp(&b.name)),
            Some(MenuSort::NameDesc) => items.sort_by(|a, b| b.name.cmp(&a.name)),
            Some(MenuSort::PriceAsc) => items.sort_by(|a, b| a.price.cmp(&b.price)),
            Some(MenuSort::PriceDesc) => items.sort_by(|a, b| b.price.cmp(&a.price)),
            None => {}
        }
        match self.per_page {
            Some(per_page) => paginate(&items, self.page.unwrap_or(1), per_page).to_vec(),
            None => items,
        }
    }
}

/// Page `page` (1-based) of `items`. Out-of-range pages come back empty.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(per_page).min(items.len());
    let end = start.saturating_add(per_page).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> Vec<MenuItem> {
        [("Margherita", 274, false), ("Funghi", 160, true), ("Diavola", 310, false)]
            .into_iter()
            .enumerate()
            .map(|(i, (name, price, sold_out))| MenuItem {
                id: i as i64 + 1,
                name: name.into(),
                image_url: String::new(),
                description: String::new(),
                sold_out,
                price: Decimal::from(price),
                max_order_quantity: 5,
                currency: "CZK".into(),
            })
            .collect()
    }

    fn names(items: &[MenuItem]) -> Vec<&str> { items.iter().map(|i| i.name.as_str()).collect() }

    #[test]
    fn test_default_query_keeps_everything() {
        assert_eq!(MenuQuery::default().apply(menu()).len(), 3);
    }

    #[test]
    fn test_only_available_and_price_sort() {
        let query = MenuQuery { sort: Some(MenuSort::PriceDesc), only_available: true, ..Default::default() };
        assert_eq!(names(&query.apply(menu())), ["Diavola", "Margherita"]);
    }

    #[test]
    fn test_name_sort() {
        let query = MenuQuery { sort: Some(MenuSort::NameAsc), ..Default::default() };
        assert_eq!(names(&query.apply(menu())), ["Diavola", "Funghi", "Margherita"]);
    }

    #[test]
    fn test_paginate_bounds() {
        let items = [1, 2, 3, 4, 5];
        assert_eq!(paginate(&items, 1, 2), &[1, 2]);
        assert_eq!(paginate(&items, 3, 2), &[5]);
        assert!(paginate(&items, 4, 2).is_empty());
        assert_eq!(paginate(&items, 0, 2), &[1, 2]);
    }

    #[test]
    fn test_row_shape_is_snake_case() {
        let row = serde_json::json!({
            "id": 3, "name": "Diavola", "image_url": "d.jpg", "description": "spicy",
            "sold_out": false, "price": 310, "max_order_quantity": 4, "currency": "CZK"
        });
        let item: MenuItem = serde_json::from_value(row).unwrap();
        assert_eq!(item.max_order_quantity, 4);
        assert_eq!(item.price, Decimal::from(310));
    }
}
