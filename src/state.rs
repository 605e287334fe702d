//! Client-side storefront state
//!
//! An explicit value owned by the caller instead of a process-wide store.
//! Every reducer replaces a slice wholesale with the snapshot the server
//! confirmed, so the newest response always wins.

use serde::{Deserialize, Serialize};

use crate::domain::aggregates::address::default_address;
use crate::domain::aggregates::{Address, Cart, Customer, Order};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    pub customer: Option<Customer>,
    pub cart: Option<Cart>,
    pub addresses: Vec<Address>,
    pub delivery_address: Option<Address>,
    pub selected_order: Option<Order>,
}

impl StoreState {
    pub fn set_customer_cart(&mut self, cart: Cart) { self.cart = Some(cart); }

    /// Replaces the address list and re-derives the delivery address from it.
    pub fn set_customer_addresses(&mut self, addresses: Vec<Address>) {
        self.delivery_address = default_address(&addresses).cloned();
        self.addresses = addresses;
    }

    pub fn set_selected_order(&mut self, order: Order) { self.selected_order = Some(order); }

    pub fn set_customer(&mut self, customer: Customer) { self.customer = Some(customer); }

    /// Checkout may leave address selection only with a delivery address picked
    /// and something in the cart.
    pub fn can_proceed_to_payment(&self) -> bool {
        self.delivery_address.is_some() && self.cart.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Sign-out.
    pub fn reset(&mut self) { *self = Self::default(); }
}
