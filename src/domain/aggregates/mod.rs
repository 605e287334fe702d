//! Aggregates module
pub mod address;
pub mod cart;
pub mod customer;
pub mod menu;
pub mod order;

pub use address::{Address, NewAddress};
pub use cart::{Cart, CartItem, CartSummary};
pub use customer::{Customer, CustomerMetadata, NewCustomer};
pub use menu::{MenuItem, MenuQuery, MenuSort};
pub use order::{DeliveryStatus, Order, OrderDraft, OrderStatus, PaymentMethod, PaymentStatus};
