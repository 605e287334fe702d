//! Order Aggregate
//!
//! An order embeds full copies of the cart, customer and delivery address as
//! they were at checkout, so later edits never reach historical orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::{Address, Cart, Customer};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus { #[default] Created, Pending, Processing, Complete }

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod { Paypal, CreditDebitVisa, Cash }

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus { #[default] Pending, Processing, Paid, Failed }

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus { #[default] Processing, Shipped, Delivered }

/// What the checkout flow hands over; becomes an `Order` once persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    #[serde(rename = "customer_id")]
    pub customer_id: String,
    pub order_status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub delivery_status: DeliveryStatus,
    pub cart: Cart,
    pub customer: Customer,
    pub delivery_address: Address,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(rename = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "customer_id")]
    pub customer_id: String,
    pub order_status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub delivery_status: DeliveryStatus,
    pub cart: Cart,
    pub customer: Customer,
    pub delivery_address: Address,
}

impl OrderDraft {
    /// A paid, completed order as the payment page submits it.
    pub fn paid(cart: Cart, customer: Customer, delivery_address: Address, payment_method: PaymentMethod) -> Self {
        Self {
            customer_id: customer.id.clone().unwrap_or_default(),
            order_status: OrderStatus::Complete,
            payment_method,
            payment_status: PaymentStatus::Paid,
            delivery_status: DeliveryStatus::Processing,
            cart,
            customer,
            delivery_address,
        }
    }
}
