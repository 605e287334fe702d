//! Cart mutation engine
//!
//! Each operation copies the caller's snapshot, applies one change, re-derives
//! the summary and counters, writes the whole row and hands back the row the
//! store returned. Two calls started from the same snapshot race: the later
//! write wins and silently drops the earlier change.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::domain::aggregates::{Cart, CartItem, MenuItem};
use crate::domain::pricing::{coupon_discount, reset_summary};
use crate::gateway::{decode_first, encode, Filter, PersistenceGateway, Table};
use crate::{Result, StorefrontError};

#[derive(Clone)]
pub struct CartEngine {
    gateway: Arc<dyn PersistenceGateway>,
}

impl CartEngine {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self { Self { gateway } }

    pub async fn fetch(&self, cart_id: &str) -> Result<Cart> {
        let rows = self
            .gateway
            .select(Table::Carts, &Filter::eq("id", cart_id))
            .await
            .map_err(StorefrontError::persistence("Failed fetching cart items"))?;
        decode_first(rows)
            .map_err(StorefrontError::persistence("Failed fetching cart items"))?
            .ok_or_else(|| StorefrontError::NotFound(format!("Cart {cart_id}")))
    }

    /// Adds one unit of `menu_item`. Fails without writing anything when the
    /// line already sits at its order limit.
    #[instrument(skip_all, fields(cart_id = ?cart.id, item_id = menu_item.id))]
    pub async fn add_or_update_item(&self, menu_item: &MenuItem, cart: &Cart) -> Result<Cart> {
        let updated = cart.with_item_added(menu_item).inspect_err(|e| warn!("{e}"))?;
        let saved = self.persist(&updated, "Failed to Update cart").await?;
        info!(items_quantity = saved.items_quantity, "item added to cart");
        Ok(saved)
    }

    /// Replaces the matching line with `item` as given. Range checks on the
    /// quantity are the caller's job.
    #[instrument(skip_all, fields(cart_id = ?cart.id, item_id = item.item_id, quantity = item.quantity))]
    pub async fn update_item_quantity(&self, item: &CartItem, cart: &Cart) -> Result<Cart> {
        let saved = self.persist(&cart.with_item_replaced(item), "Failed to increase item quantity").await?;
        info!(items_quantity = saved.items_quantity, "item quantity updated");
        Ok(saved)
    }

    #[instrument(skip_all, fields(cart_id = ?cart.id, item_id))]
    pub async fn delete_item(&self, item_id: i64, cart: &Cart) -> Result<Cart> {
        if cart.item(item_id).is_none() {
            debug!("item not in cart");
        }
        let saved = self.persist(&cart.without_item(item_id), "Failed to delete item from cart").await?;
        info!(items_count = saved.items_count, "item removed from cart");
        Ok(saved)
    }

    /// Applies a coupon, replacing whatever discount the cart carried.
    #[instrument(skip_all, fields(cart_id = ?cart.id))]
    pub async fn apply_coupon(&self, cart: &Cart, coupon_code: &str) -> Result<Cart> {
        let Some(percentage) = coupon_discount(coupon_code) else {
            warn!(coupon_code, "unknown coupon");
            return Err(StorefrontError::InvalidCoupon(coupon_code.to_string()));
        };
        let saved = self.persist(&cart.with_discount(percentage), "Failed to apply coupon discount").await?;
        info!(%percentage, grand_total = %saved.cart_summary.grand_total, "coupon applied");
        Ok(saved)
    }

    /// Empties the cart after checkout. Safe to repeat.
    #[instrument(skip(self))]
    pub async fn reset_cart(&self, cart_id: &str) -> Result<Cart> {
        let patch = json!({
            "items": [],
            "cartSummary": reset_summary(),
            "itemsCount": 0,
            "itemsQuantity": 0,
        });
        let rows = self
            .gateway
            .update(Table::Carts, patch, &Filter::eq("id", cart_id))
            .await
            .map_err(StorefrontError::persistence("Failed to reset cart"))?;
        let saved = decode_first(rows)
            .map_err(StorefrontError::persistence("Failed to reset cart"))?
            .ok_or_else(|| StorefrontError::NotFound(format!("Cart {cart_id}")))?;
        info!("cart reset");
        Ok(saved)
    }

    async fn persist(&self, cart: &Cart, context: &str) -> Result<Cart> {
        let cart_id = cart.id.as_deref().ok_or(StorefrontError::MissingCartReference)?;
        let row = encode(cart).map_err(StorefrontError::persistence(context))?;
        let rows = self
            .gateway
            .update(Table::Carts, row, &Filter::eq("id", cart_id))
            .await
            .map_err(StorefrontError::persistence(context))?;
        decode_first(rows)
            .map_err(StorefrontError::persistence(context))?
            .ok_or_else(|| StorefrontError::NotFound(format!("Cart {cart_id}")))
    }
}
