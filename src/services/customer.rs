//! Customer directory: signup and lookup of a customer together with their cart

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::domain::aggregates::{Cart, Customer, NewCustomer};
use crate::gateway::{decode_first, encode, Filter, PersistenceGateway, Table};
use crate::services::CartEngine;
use crate::{Result, StorefrontError};

/// A signed-in customer and the cart they shop with.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CustomerSession {
    pub customer: Customer,
    pub cart: Cart,
}

#[derive(Clone)]
pub struct CustomerDirectory {
    gateway: Arc<dyn PersistenceGateway>,
    carts: CartEngine,
}

impl CustomerDirectory {
    pub fn new(gateway: Arc<dyn PersistenceGateway>, carts: CartEngine) -> Self {
        Self { gateway, carts }
    }

    /// Creates the customer row, an empty cart for it, and links the two.
    #[instrument(skip_all, fields(email = %details.email_address))]
    pub async fn signup(&self, details: NewCustomer) -> Result<CustomerSession> {
        let customer = Customer::from(details);
        let row = encode(&customer).map_err(StorefrontError::persistence("Failed to create customer"))?;
        let rows = self
            .gateway
            .insert(Table::Customers, row)
            .await
            .map_err(StorefrontError::persistence("Failed to create customer"))?;
        let customer: Customer = decode_first(rows)
            .map_err(StorefrontError::persistence("Failed to create customer"))?
            .ok_or_else(|| StorefrontError::NotFound("Customer".into()))?;
        let customer_id = customer.id.clone().ok_or_else(|| StorefrontError::NotFound("Customer".into()))?;

        let row = encode(&Cart::for_customer(customer_id.as_str()))
            .map_err(StorefrontError::persistence("Failed to create cart"))?;
        let rows = self
            .gateway
            .insert(Table::Carts, row)
            .await
            .map_err(StorefrontError::persistence("Failed to create cart"))?;
        let cart: Cart = decode_first(rows)
            .map_err(StorefrontError::persistence("Failed to create cart"))?
            .ok_or_else(|| StorefrontError::NotFound("Cart".into()))?;

        let rows = self
            .gateway
            .update(Table::Customers, json!({ "cart_id": cart.id }), &Filter::eq("id", customer_id.as_str()))
            .await
            .map_err(StorefrontError::persistence("Failed to link cart to customer"))?;
        let customer = decode_first(rows)
            .map_err(StorefrontError::persistence("Failed to link cart to customer"))?
            .ok_or_else(|| StorefrontError::NotFound(format!("Customer {customer_id}")))?;

        info!(customer_id = %customer_id, cart_id = ?cart.id, "customer signed up");
        Ok(CustomerSession { customer, cart })
    }

    /// The customer registered under `email`, with their cart. `None` when nobody matches.
    pub async fn fetch_by_email(&self, email: &str) -> Result<Option<CustomerSession>> {
        let rows = self
            .gateway
            .select(Table::Customers, &Filter::eq("emailAddress", email))
            .await
            .map_err(StorefrontError::persistence("Failed fetching customer"))?;
        let Some(customer) = decode_first::<Customer>(rows)
            .map_err(StorefrontError::persistence("Failed fetching customer"))?
        else {
            return Ok(None);
        };
        let cart_id = customer.cart_id.as_deref().ok_or(StorefrontError::MissingCartReference)?;
        let cart = self.carts.fetch(cart_id).await?;
        Ok(Some(CustomerSession { customer, cart }))
    }

    pub async fn fetch(&self, customer_id: &str) -> Result<Customer> {
        let rows = self
            .gateway
            .select(Table::Customers, &Filter::eq("id", customer_id))
            .await
            .map_err(StorefrontError::persistence("Failed fetching customer"))?;
        decode_first(rows)
            .map_err(StorefrontError::persistence("Failed fetching customer"))?
            .ok_or_else(|| StorefrontError::NotFound(format!("Customer {customer_id}")))
    }

    pub async fn fetch_cart(&self, cart_id: &str) -> Result<Cart> { self.carts.fetch(cart_id).await }
}
