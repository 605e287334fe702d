//! Domain events
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    CartUpdated { cart_id: String, items_quantity: u32, grand_total: Decimal },
    OrderPlaced { order_id: String, customer_id: String, grand_total: Decimal },
    DeliveryAddressChanged { customer_id: String, address_id: String },
}

impl DomainEvent {
    /// Messaging subject the event is published on.
    pub fn subject(&self) -> &'static str {
        match self {
            Self::CartUpdated { .. } => "storefront.cart_updated",
            Self::OrderPlaced { .. } => "storefront.order_placed",
            Self::DeliveryAddressChanged { .. } => "storefront.delivery_address_changed",
        }
    }

    pub fn payload(&self) -> Result<Vec<u8>, serde_json::Error> { serde_json::to_vec(self) }
}

/// Publishes `event` when a client is configured. Failures are logged only.
pub async fn publish(nats: Option<&async_nats::Client>, event: DomainEvent) {
    let Some(client) = nats else { return };
    let payload = match event.payload() {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "could not encode {}", event.subject());
            return;
        }
    };
    if let Err(e) = client.publish(event.subject().to_string(), payload.into()).await {
        tracing::warn!(error = %e, "could not publish {}", event.subject());
    }
}
