//! JSON API over the storefront operations
//!
//! Cart handlers read the stored snapshot first and hand it to the engine, so
//! the read-modify-write cycle and its lost-update window stay visible here.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::domain::aggregates::{Address, Cart, MenuItem, MenuQuery, NewAddress, NewCustomer, Order, OrderDraft};
use crate::domain::events::{publish, DomainEvent};
use crate::gateway::PersistenceGateway;
use crate::services::{AddressBook, CartEngine, Catalog, CustomerDirectory, CustomerSession, OrderAssembler, PlacedOrder};
use crate::StorefrontError;

#[derive(Clone)]
pub struct AppState {
    pub carts: CartEngine,
    pub addresses: AddressBook,
    pub orders: OrderAssembler,
    pub customers: CustomerDirectory,
    pub catalog: Catalog,
    pub nats: Option<async_nats::Client>,
}

impl AppState {
    pub fn new(gateway: Arc<dyn PersistenceGateway>, nats: Option<async_nats::Client>) -> Self {
        let carts = CartEngine::new(gateway.clone());
        Self {
            addresses: AddressBook::new(gateway.clone()),
            orders: OrderAssembler::new(gateway.clone(), carts.clone()),
            customers: CustomerDirectory::new(gateway.clone(), carts.clone()),
            catalog: Catalog::new(gateway),
            carts,
            nats,
        }
    }

    async fn cart_updated(&self, cart: &Cart) {
        let event = DomainEvent::CartUpdated {
            cart_id: cart.id.clone().unwrap_or_default(),
            items_quantity: cart.items_quantity,
            grand_total: cart.cart_summary.grand_total,
        };
        publish(self.nats.as_ref(), event).await;
    }
}

type ApiError = (StatusCode, String);
type ApiResult<T> = Result<T, ApiError>;

impl From<StorefrontError> for ApiError {
    fn from(e: StorefrontError) -> Self {
        let status = match e {
            StorefrontError::QuantityLimitExceeded { .. }
            | StorefrontError::InvalidCoupon(_)
            | StorefrontError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            StorefrontError::MissingCartReference => StatusCode::BAD_REQUEST,
            StorefrontError::NotFound(_) => StatusCode::NOT_FOUND,
            StorefrontError::Persistence { .. } => StatusCode::BAD_GATEWAY,
        };
        (status, e.to_string())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(json!({"status": "healthy", "service": "pizzeria-storefront"})) }))
        .route("/api/v1/menu", get(list_menu))
        .route("/api/v1/customers", post(signup))
        .route("/api/v1/customers/by-email/:email", get(customer_by_email))
        .route("/api/v1/customers/:id/addresses", get(list_addresses).post(add_address))
        .route("/api/v1/customers/:id/default-address", post(set_default_address))
        .route("/api/v1/customers/:id/orders", get(list_orders))
        .route("/api/v1/carts/:id", get(get_cart))
        .route("/api/v1/carts/:id/items", post(add_item))
        .route("/api/v1/carts/:id/items/:item_id", put(update_item).delete(delete_item))
        .route("/api/v1/carts/:id/coupon", post(apply_coupon))
        .route("/api/v1/carts/:id/reset", post(reset_cart))
        .route("/api/v1/addresses/:id", put(edit_address).delete(delete_address))
        .route("/api/v1/orders", post(create_order))
        .with_state(state)
}

async fn list_menu(State(s): State<AppState>, Query(q): Query<MenuQuery>) -> ApiResult<Json<Vec<MenuItem>>> {
    Ok(Json(s.catalog.fetch_menu(&q).await?))
}

async fn signup(State(s): State<AppState>, Json(r): Json<NewCustomer>) -> ApiResult<(StatusCode, Json<CustomerSession>)> {
    Ok((StatusCode::CREATED, Json(s.customers.signup(r).await?)))
}

async fn customer_by_email(State(s): State<AppState>, Path(email): Path<String>) -> ApiResult<Json<CustomerSession>> {
    s.customers
        .fetch_by_email(&email)
        .await?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, format!("Customer {email} not found")))
}

async fn get_cart(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Cart>> {
    Ok(Json(s.carts.fetch(&id).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    #[serde(rename = "item_id")]
    pub item_id: i64,
}

async fn add_item(State(s): State<AppState>, Path(id): Path<String>, Json(r): Json<AddItemRequest>) -> ApiResult<Json<Cart>> {
    let menu_item = s.catalog.menu_item(r.item_id).await?;
    let cart = s.carts.fetch(&id).await?;
    let cart = s.carts.add_or_update_item(&menu_item, &cart).await?;
    s.cart_updated(&cart).await;
    Ok(Json(cart))
}

#[derive(Debug, Deserialize)]
pub struct QuantityRequest {
    pub quantity: u32,
}

/// Sets a line to `quantity`, clamped to `1..=maxOrderQuantity` before it reaches the engine.
async fn update_item(
    State(s): State<AppState>,
    Path((id, item_id)): Path<(String, i64)>,
    Json(r): Json<QuantityRequest>,
) -> ApiResult<Json<Cart>> {
    let cart = s.carts.fetch(&id).await?;
    let item = cart.item(item_id).ok_or_else(|| StorefrontError::NotFound(format!("Cart item {item_id}")))?;
    let item = item.with_quantity(r.quantity.clamp(1, item.max_order_quantity.max(1)));
    let cart = s.carts.update_item_quantity(&item, &cart).await?;
    s.cart_updated(&cart).await;
    Ok(Json(cart))
}

async fn delete_item(State(s): State<AppState>, Path((id, item_id)): Path<(String, i64)>) -> ApiResult<Json<Cart>> {
    let cart = s.carts.fetch(&id).await?;
    let cart = s.carts.delete_item(item_id, &cart).await?;
    s.cart_updated(&cart).await;
    Ok(Json(cart))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponRequest {
    pub coupon_code: String,
}

async fn apply_coupon(State(s): State<AppState>, Path(id): Path<String>, Json(r): Json<CouponRequest>) -> ApiResult<Json<Cart>> {
    let cart = s.carts.fetch(&id).await?;
    let cart = s.carts.apply_coupon(&cart, &r.coupon_code).await?;
    s.cart_updated(&cart).await;
    Ok(Json(cart))
}

async fn reset_cart(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Cart>> {
    let cart = s.carts.reset_cart(&id).await?;
    s.cart_updated(&cart).await;
    Ok(Json(cart))
}

async fn list_addresses(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Vec<Address>>> {
    Ok(Json(s.addresses.load_for_customer(&id).await?))
}

async fn add_address(
    State(s): State<AppState>,
    Path(id): Path<String>,
    Json(r): Json<NewAddress>,
) -> ApiResult<(StatusCode, Json<Address>)> {
    let customer = s.customers.fetch(&id).await?;
    Ok((StatusCode::CREATED, Json(s.addresses.add(r, &customer).await?)))
}

async fn edit_address(State(s): State<AppState>, Path(id): Path<String>, Json(mut r): Json<Address>) -> ApiResult<Json<Address>> {
    r.id = id;
    Ok(Json(s.addresses.edit(&r).await?))
}

async fn delete_address(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let address = s.addresses.fetch(&id).await?;
    s.addresses.delete(&address).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultAddressRequest {
    pub address_id: String,
}

async fn set_default_address(
    State(s): State<AppState>,
    Path(id): Path<String>,
    Json(r): Json<DefaultAddressRequest>,
) -> ApiResult<Json<Vec<Address>>> {
    let addresses = s.addresses.load_for_customer(&id).await?;
    let target = addresses
        .iter()
        .find(|a| a.id == r.address_id)
        .ok_or_else(|| StorefrontError::NotFound(format!("Address {}", r.address_id)))?;
    let updated = s.addresses.set_default(&addresses, target).await?;
    let event = DomainEvent::DeliveryAddressChanged { customer_id: id, address_id: r.address_id };
    publish(s.nats.as_ref(), event).await;
    Ok(Json(updated))
}

async fn list_orders(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Vec<Order>>> {
    Ok(Json(s.orders.fetch_orders(&id).await?))
}

async fn create_order(State(s): State<AppState>, Json(r): Json<OrderDraft>) -> ApiResult<(StatusCode, Json<PlacedOrder>)> {
    let placed = s.orders.create_order(r).await?;
    let event = DomainEvent::OrderPlaced {
        order_id: placed.order.id.clone(),
        customer_id: placed.order.customer_id.clone(),
        grand_total: placed.order.cart.cart_summary.grand_total,
    };
    publish(s.nats.as_ref(), event).await;
    s.cart_updated(&placed.reset_cart).await;
    Ok((StatusCode::CREATED, Json(placed)))
}
