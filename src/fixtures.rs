//! Shared test data

use rust_decimal::Decimal;

use crate::domain::aggregates::{Address, Cart, MenuItem};

pub fn pizza(id: i64, price: i64, max_order_quantity: u32) -> MenuItem {
    MenuItem {
        id,
        name: format!("Pizza {id}"),
        image_url: format!("https://img.example/{id}.jpg"),
        description: "Tomato, mozzarella".into(),
        sold_out: false,
        price: Decimal::from(price),
        max_order_quantity,
        currency: "CZK".into(),
    }
}

pub fn address(id: &str, delivery_address: bool) -> Address {
    Address {
        id: id.into(),
        customer_id: "cust-1".into(),
        first_name: "Jana".into(),
        last_name: "Novak".into(),
        phone_number: "+420777000111".into(),
        email_address: "jana@example.com".into(),
        house_address: "Vinohradska 12".into(),
        city: "Praha".into(),
        pin_code: "12000".into(),
        landmark: String::new(),
        use_for_billing: false,
        delivery_address,
    }
}

/// An empty persisted cart.
pub fn cart(id: &str) -> Cart {
    Cart { id: Some(id.into()), ..Cart::for_customer("cust-1") }
}
