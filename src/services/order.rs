//! Order assembler: turns a checkout draft into a stored order and empties the cart

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::domain::aggregates::{Cart, Order, OrderDraft};
use crate::domain::value_objects::format_currency;
use crate::gateway::{decode, decode_first, encode, Filter, PersistenceGateway, Table};
use crate::services::CartEngine;
use crate::{Result, StorefrontError};

/// The stored order together with the cart as it looks after the reset.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    pub order: Order,
    pub reset_cart: Cart,
}

#[derive(Clone)]
pub struct OrderAssembler {
    gateway: Arc<dyn PersistenceGateway>,
    carts: CartEngine,
}

impl OrderAssembler {
    pub fn new(gateway: Arc<dyn PersistenceGateway>, carts: CartEngine) -> Self {
        Self { gateway, carts }
    }

    /// Stores the draft with embedded copies of cart, customer and address,
    /// then resets the cart it was placed from.
    #[instrument(skip_all, fields(customer_id = %draft.customer_id))]
    pub async fn create_order(&self, draft: OrderDraft) -> Result<PlacedOrder> {
        let cart_id = draft.cart.id.clone().ok_or(StorefrontError::MissingCartReference)?;

        let mut row = encode(&draft).map_err(StorefrontError::persistence("Failed to create order"))?;
        if let Value::Object(fields) = &mut row {
            fields.insert("created_at".into(), json!(Utc::now()));
        }
        let rows = self
            .gateway
            .insert(Table::Orders, row)
            .await
            .map_err(StorefrontError::persistence("Failed to create order"))?;
        let order: Order = decode_first(rows)
            .map_err(StorefrontError::persistence("Failed to create order"))?
            .ok_or_else(|| StorefrontError::NotFound("Order".into()))?;
        let currency = order.cart.items.first().map_or("", |i| i.currency.as_str());
        info!(
            order_id = %order.id,
            grand_total = %format_currency(order.cart.cart_summary.grand_total, currency),
            "order placed"
        );

        let reset_cart = self.carts.reset_cart(&cart_id).await?;
        Ok(PlacedOrder { order, reset_cart })
    }

    pub async fn fetch_orders(&self, customer_id: &str) -> Result<Vec<Order>> {
        let rows = self
            .gateway
            .select(Table::Orders, &Filter::eq("customer_id", customer_id))
            .await
            .map_err(StorefrontError::persistence("Failed fetching orders"))?;
        decode(rows).map_err(StorefrontError::persistence("Failed fetching orders"))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::aggregates::{Customer, PaymentMethod, PaymentStatus};
    use crate::fixtures::{address, cart, pizza};
    use crate::gateway::MemoryGateway;

    struct Shop {
        db: Arc<MemoryGateway>,
        carts: CartEngine,
        orders: OrderAssembler,
    }

    async fn shop() -> Shop {
        let db = Arc::new(MemoryGateway::new());
        db.insert(Table::Carts, encode(&cart("cart-1")).unwrap()).await.unwrap();
        let carts = CartEngine::new(db.clone());
        let orders = OrderAssembler::new(db.clone(), carts.clone());
        Shop { db, carts, orders }
    }

    fn customer() -> Customer {
        Customer { id: Some("cust-1".into()), ..Customer::new("uuid-1", "Jana", "Novak", "jana@example.com") }
    }

    async fn filled_cart(shop: &Shop) -> Cart {
        let cart = shop.carts.fetch("cart-1").await.unwrap();
        let cart = shop.carts.add_or_update_item(&pizza(1, 274, 5), &cart).await.unwrap();
        shop.carts.add_or_update_item(&pizza(2, 160, 5), &cart).await.unwrap()
    }

    #[tokio::test]
    async fn test_order_without_cart_id_writes_nothing() {
        let shop = shop().await;
        let mut unsaved = filled_cart(&shop).await;
        unsaved.id = None;

        let draft = OrderDraft::paid(unsaved, customer(), address("A", true), PaymentMethod::Cash);
        let err = shop.orders.create_order(draft).await.unwrap_err();

        assert!(matches!(err, StorefrontError::MissingCartReference));
        assert_eq!(shop.db.row_count(Table::Orders).await, 0);
        assert_eq!(shop.carts.fetch("cart-1").await.unwrap().items_count, 2);
    }

    #[tokio::test]
    async fn test_order_embeds_snapshot_and_resets_cart() {
        let shop = shop().await;
        let cart = filled_cart(&shop).await;

        let draft = OrderDraft::paid(cart.clone(), customer(), address("A", true), PaymentMethod::CreditDebitVisa);
        let placed = shop.orders.create_order(draft).await.unwrap();

        assert!(!placed.order.id.is_empty());
        assert_eq!(placed.order.customer_id, "cust-1");
        assert_eq!(placed.order.payment_status, PaymentStatus::Paid);
        assert_eq!(placed.order.cart, cart);
        assert_eq!(placed.order.cart.cart_summary.grand_total, Decimal::new(4824, 1));
        assert!(placed.reset_cart.items.is_empty());
        assert_eq!(placed.reset_cart.items_quantity, 0);
        assert_eq!(shop.carts.fetch("cart-1").await.unwrap(), placed.reset_cart);
    }

    #[tokio::test]
    async fn test_later_cart_changes_do_not_touch_history() {
        let shop = shop().await;
        let cart = filled_cart(&shop).await;
        let draft = OrderDraft::paid(cart, customer(), address("A", true), PaymentMethod::Paypal);
        let placed = shop.orders.create_order(draft).await.unwrap();

        shop.carts.add_or_update_item(&pizza(3, 310, 2), &placed.reset_cart).await.unwrap();

        let history = shop.orders.fetch_orders("cust-1").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0], placed.order);
        assert_eq!(history[0].cart.items_count, 2);
        assert!(history[0].cart.item(3).is_none());
    }

    #[tokio::test]
    async fn test_failed_insert_leaves_cart_alone() {
        let shop = shop().await;
        let cart = filled_cart(&shop).await;
        shop.db.fail_writes_after(0).await;

        let draft = OrderDraft::paid(cart.clone(), customer(), address("A", true), PaymentMethod::Cash);
        let err = shop.orders.create_order(draft).await.unwrap_err();
        assert!(matches!(err, StorefrontError::Persistence { ref context, .. } if context == "Failed to create order"));

        shop.db.heal().await;
        assert_eq!(shop.carts.fetch("cart-1").await.unwrap(), cart);
    }

    #[tokio::test]
    async fn test_fetch_orders_for_unknown_customer() {
        let shop = shop().await;
        assert!(shop.orders.fetch_orders("nobody").await.unwrap().is_empty());
    }
}
