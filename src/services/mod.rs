//! Async engines that run each storefront operation against the persistence gateway

pub mod address;
pub mod cart;
pub mod catalog;
pub mod customer;
pub mod order;

pub use address::AddressBook;
pub use cart::CartEngine;
pub use catalog::Catalog;
pub use customer::{CustomerDirectory, CustomerSession};
pub use order::{OrderAssembler, PlacedOrder};
