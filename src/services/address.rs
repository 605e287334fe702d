//! Address book
//!
//! Keeps at most one delivery address per customer. The flag is only ever
//! moved by `set_default`, which rewrites every row of the set one at a time.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::domain::aggregates::address::default_flags;
use crate::domain::aggregates::{Address, Customer, NewAddress};
use crate::gateway::{decode, decode_first, encode, Filter, PersistenceGateway, Table};
use crate::{Result, StorefrontError};

#[derive(Clone)]
pub struct AddressBook {
    gateway: Arc<dyn PersistenceGateway>,
}

impl AddressBook {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self { Self { gateway } }

    pub async fn load_for_customer(&self, customer_id: &str) -> Result<Vec<Address>> {
        let rows = self
            .gateway
            .select(Table::Addresses, &Filter::eq("customer_id", customer_id))
            .await
            .map_err(StorefrontError::persistence("Failed to load addresses"))?;
        decode(rows).map_err(StorefrontError::persistence("Failed to load addresses"))
    }

    pub async fn fetch(&self, address_id: &str) -> Result<Address> {
        let rows = self
            .gateway
            .select(Table::Addresses, &Filter::eq("id", address_id))
            .await
            .map_err(StorefrontError::persistence("Failed to load address"))?;
        decode_first(rows)
            .map_err(StorefrontError::persistence("Failed to load address"))?
            .ok_or_else(|| StorefrontError::NotFound(format!("Address {address_id}")))
    }

    /// Stores a new address for `customer`. New entries never start out as the default.
    #[instrument(skip_all, fields(customer_id = ?customer.id))]
    pub async fn add(&self, address: NewAddress, customer: &Customer) -> Result<Address> {
        address.validate()?;
        let customer_id = customer.id.as_deref().ok_or_else(|| StorefrontError::NotFound("Customer".into()))?;

        let mut row = encode(&address).map_err(StorefrontError::persistence("Failed to add address"))?;
        if let Value::Object(fields) = &mut row {
            fields.insert("customer_id".into(), json!(customer_id));
            fields.insert("deliveryAddress".into(), json!(false));
        }
        let rows = self
            .gateway
            .insert(Table::Addresses, row)
            .await
            .map_err(StorefrontError::persistence("Failed to add address"))?;
        let saved: Address = decode_first(rows)
            .map_err(StorefrontError::persistence("Failed to add address"))?
            .ok_or_else(|| StorefrontError::NotFound("Address".into()))?;
        info!(address_id = %saved.id, "address added");
        Ok(saved)
    }

    /// Writes the edited fields of `address`. The default flag is left as stored.
    #[instrument(skip_all, fields(address_id = %address.id))]
    pub async fn edit(&self, address: &Address) -> Result<Address> {
        address.validate()?;
        let mut patch = encode(address).map_err(StorefrontError::persistence("Failed to update address"))?;
        if let Value::Object(fields) = &mut patch {
            fields.remove("deliveryAddress");
            fields.remove("customer_id");
        }
        let rows = self
            .gateway
            .update(Table::Addresses, patch, &Filter::eq("id", address.id.as_str()))
            .await
            .map_err(StorefrontError::persistence("Failed to update address"))?;
        decode_first(rows)
            .map_err(StorefrontError::persistence("Failed to update address"))?
            .ok_or_else(|| StorefrontError::NotFound(format!("Address {}", address.id)))
    }

    /// Makes `target` the only delivery address in `addresses`.
    ///
    /// Rows are written one by one with no transaction. A failed row is
    /// logged and skipped, so a failure can leave zero or two defaults
    /// behind; the caller learns about it through the returned error.
    #[instrument(skip_all, fields(target = %target.id))]
    pub async fn set_default(&self, addresses: &[Address], target: &Address) -> Result<Vec<Address>> {
        let mut updated = Vec::with_capacity(addresses.len());
        let mut failed = false;

        for (address, flag) in default_flags(addresses, &target.id) {
            let result = self
                .gateway
                .update(Table::Addresses, json!({ "deliveryAddress": flag }), &Filter::eq("id", address.id.as_str()))
                .await
                .and_then(decode_first::<Address>);
            match result {
                Ok(Some(row)) => updated.push(row),
                Ok(None) => updated.push(Address { delivery_address: flag, ..address.clone() }),
                Err(e) => {
                    warn!(address_id = %address.id, error = %e, "could not update default flag");
                    failed = true;
                }
            }
        }

        if failed {
            return Err(StorefrontError::Persistence {
                context: "Failed to set default address".into(),
                message: format!("Address with id {} could not be updated", target.id),
            });
        }
        info!("default address changed");
        Ok(updated)
    }

    /// Removes the address. Deleting the default leaves the customer without one.
    #[instrument(skip_all, fields(address_id = %address.id))]
    pub async fn delete(&self, address: &Address) -> Result<()> {
        self.gateway
            .delete(Table::Addresses, &Filter::eq("id", address.id.as_str()))
            .await
            .map_err(StorefrontError::persistence("Failed to delete address"))?;
        if address.delivery_address {
            info!("default address deleted");
        }
        Ok(())
    }
}
