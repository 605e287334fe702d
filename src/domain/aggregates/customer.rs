//! Customer Aggregate

use serde::{Deserialize, Serialize};

use crate::domain::aggregates::Address;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerMetadata {
    pub email: String,
    pub email_address: String,
    #[serde(rename = "email_verified")]
    pub email_verified: bool,
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "phone_verified")]
    pub phone_verified: bool,
    pub role: String,
    pub sub: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub uuid: String,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub role: String,
    #[serde(default)]
    pub meta_data: Option<CustomerMetadata>,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(rename = "cart_id", default)]
    pub cart_id: Option<String>,
    #[serde(default)]
    pub default_billing: String,
    #[serde(default)]
    pub default_shipping: String,
    #[serde(default)]
    pub avatar: String,
}

/// Identity details known after the auth provider accepted a signup.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub uuid: String,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
}

impl Customer {
    pub fn new(uuid: impl Into<String>, first_name: impl Into<String>, last_name: impl Into<String>, email_address: impl Into<String>) -> Self {
        Self {
            id: None,
            uuid: uuid.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email_address: email_address.into(),
            role: "customer".into(),
            meta_data: None,
            addresses: vec![],
            cart_id: None,
            default_billing: String::new(),
            default_shipping: String::new(),
            avatar: String::new(),
        }
    }

    pub fn full_name(&self) -> String { format!("{} {}", self.first_name, self.last_name) }
}

impl From<NewCustomer> for Customer {
    fn from(c: NewCustomer) -> Self {
        let mut customer = Customer::new(c.uuid, c.first_name, c.last_name, c.email_address);
        customer.meta_data = Some(CustomerMetadata {
            email: customer.email_address.clone(),
            email_address: customer.email_address.clone(),
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            role: customer.role.clone(),
            sub: customer.uuid.clone(),
            ..CustomerMetadata::default()
        });
        customer
    }
}
