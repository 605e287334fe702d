//! Address book entries
//!
//! At most one address per customer carries `delivery_address = true`.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: String,
    #[serde(rename = "customer_id")]
    pub customer_id: String,
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(length(min = 1))]
    pub phone_number: String,
    #[validate(email)]
    pub email_address: String,
    #[validate(length(min = 1))]
    pub house_address: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub pin_code: String,
    #[serde(default)]
    pub landmark: String,
    #[serde(default)]
    pub use_for_billing: bool,
    #[serde(default)]
    pub delivery_address: bool,
}

/// Address form contents before the row exists.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(length(min = 1))]
    pub phone_number: String,
    #[validate(email)]
    pub email_address: String,
    #[validate(length(min = 1))]
    pub house_address: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub pin_code: String,
    #[serde(default)]
    pub landmark: String,
    #[serde(default)]
    pub use_for_billing: bool,
}

impl Address {
    pub fn full_name(&self) -> String { format!("{} {}", self.first_name, self.last_name) }
}

/// The customer's current delivery address, if one is flagged.
pub fn default_address(addresses: &[Address]) -> Option<&Address> {
    addresses.iter().find(|a| a.delivery_address)
}

/// Checkout may move past address selection only when this holds.
pub fn has_delivery_address(addresses: &[Address]) -> bool {
    default_address(addresses).is_some()
}

/// The flag every address should carry once `target_id` becomes the default.
/// A target outside the set leaves the customer with no default.
pub fn default_flags<'a>(addresses: &'a [Address], target_id: &'a str) -> impl Iterator<Item = (&'a Address, bool)> + 'a {
    addresses.iter().map(move |a| (a, a.id == target_id))
}
