//! Cart Aggregate
//!
//! A cart is handled as a whole snapshot: every change produces a new `Cart`
//! with its summary and counters re-derived, leaving the input untouched.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::MenuItem;
use crate::domain::pricing::{compute_summary, reset_summary};
use crate::StorefrontError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "customer_id")]
    pub customer_id: String,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub cart_summary: CartSummary,
    #[serde(default)]
    pub items_count: usize,
    #[serde(default)]
    pub items_quantity: u32,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(rename = "item_id")]
    pub item_id: i64,
    pub name: String,
    pub image_url: String,
    pub description: String,
    pub price: Decimal,
    pub quantity: u32,
    pub row_total: Decimal,
    pub max_order_quantity: u32,
    pub currency: String,
}

/// Derived pricing of a cart. Never edited directly.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub subtotal: Decimal,
    pub delivery_cost: Decimal,
    pub vat: Decimal,
    pub vat_rate_percentage: Decimal,
    pub discount_amount: Decimal,
    pub discount_percentage: Decimal,
    pub grand_total: Decimal,
}

impl CartItem {
    /// A fresh line for a menu item, quantity one.
    pub fn from_menu_item(item: &MenuItem) -> Self {
        Self {
            item_id: item.id,
            name: item.name.clone(),
            image_url: item.image_url.clone(),
            description: item.description.clone(),
            price: item.price,
            quantity: 1,
            row_total: item.price,
            max_order_quantity: item.max_order_quantity,
            currency: item.currency.clone(),
        }
    }

    /// The same line at another quantity, with its row total updated.
    pub fn with_quantity(&self, quantity: u32) -> Self {
        Self { quantity, row_total: self.price * Decimal::from(quantity), ..self.clone() }
    }

    pub fn is_at_limit(&self) -> bool { self.quantity >= self.max_order_quantity }
}

impl Cart {
    /// An empty, active cart as created at signup. Its summary is all zeros.
    pub fn for_customer(customer_id: impl Into<String>) -> Self {
        Self {
            id: None,
            customer_id: customer_id.into(),
            items: vec![],
            cart_summary: CartSummary::default(),
            items_count: 0,
            items_quantity: 0,
            is_active: true,
            currency: None,
        }
    }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn item(&self, item_id: i64) -> Option<&CartItem> {
        self.items.iter().find(|i| i.item_id == item_id)
    }

    /// Adds one unit of `menu_item`, appending a new line if the cart does not hold it yet.
    pub fn with_item_added(&self, menu_item: &MenuItem) -> Result<Cart, StorefrontError> {
        let mut cart = self.clone();
        match cart.items.iter_mut().find(|i| i.item_id == menu_item.id) {
            None => cart.items.push(CartItem::from_menu_item(menu_item)),
            Some(existing) if existing.is_at_limit() => {
                return Err(StorefrontError::QuantityLimitExceeded {
                    item_id: existing.item_id,
                    max: existing.max_order_quantity,
                });
            }
            Some(existing) => *existing = existing.with_quantity(existing.quantity + 1),
        }
        Ok(cart.recalculated())
    }

    /// Replaces the line with the same `item_id` wholesale. The caller owns
    /// the new quantity and row total; an unknown item leaves the lines as they are.
    pub fn with_item_replaced(&self, replacement: &CartItem) -> Cart {
        let mut cart = self.clone();
        for item in cart.items.iter_mut().filter(|i| i.item_id == replacement.item_id) {
            *item = replacement.clone();
        }
        cart.recalculated()
    }

    /// Drops the line with `item_id`. Emptying the cart resets its summary.
    pub fn without_item(&self, item_id: i64) -> Cart {
        let mut cart = self.clone();
        cart.items.retain(|i| i.item_id != item_id);
        let mut cart = cart.recalculated();
        if cart.items.is_empty() {
            cart.cart_summary = reset_summary();
        }
        cart
    }

    /// Sets the discount percentage, overwriting any earlier one.
    pub fn with_discount(&self, discount_percentage: Decimal) -> Cart {
        let mut cart = self.clone();
        cart.cart_summary.discount_percentage = discount_percentage;
        cart.recalculated()
    }

    /// Re-derives the summary and both counters from the item list.
    pub fn recalculated(mut self) -> Cart {
        self.cart_summary = compute_summary(&self.items, self.cart_summary.discount_percentage);
        self.items_quantity = self.items.iter().map(|i| i.quantity).sum();
        self.items_count = self.items.len();
        self
    }
}
