//! Pizzeria Storefront
//!
//! Customer-facing pizza ordering: menu, cart, address book and checkout over
//! a generic row store.
//!
//! ## Features
//! - Cart pricing (subtotal, delivery, VAT, coupon discount, grand total)
//! - Cart mutations with per-item order limits
//! - Address book with a single default delivery address
//! - Checkout producing immutable order snapshots
//! - Pluggable persistence (in-memory or PostgreSQL)

pub mod config;
pub mod domain;
pub mod gateway;
pub mod http;
pub mod services;
pub mod state;

#[cfg(test)]
mod fixtures;

use thiserror::Error;

pub use domain::aggregates::{
    Address, Cart, CartItem, CartSummary, Customer, MenuItem, NewAddress, Order, OrderDraft,
};
pub use gateway::{Filter, GatewayError, MemoryGateway, PersistenceGateway, PgGateway, Table};
pub use services::{AddressBook, CartEngine, Catalog, CustomerDirectory, OrderAssembler, PlacedOrder};
pub use state::StoreState;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("You can only order {max} of this item")]
    QuantityLimitExceeded { item_id: i64, max: u32 },

    #[error("Invalid coupon code: {0}")]
    InvalidCoupon(String),

    #[error("Cart ID is undefined")]
    MissingCartReference,

    #[error("{context}: {message}")]
    Persistence { context: String, message: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl StorefrontError {
    /// Wraps a gateway failure with the domain message of the operation that hit it.
    pub fn persistence(context: impl Into<String>) -> impl FnOnce(GatewayError) -> Self {
        let context = context.into();
        move |e| Self::Persistence { context, message: e.to_string() }
    }
}

impl From<validator::ValidationErrors> for StorefrontError {
    fn from(e: validator::ValidationErrors) -> Self {
        StorefrontError::Validation(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
