//! Order and order-item rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lynora_core::{OrderId, OrderNumber, OrderStatus, PaymentStatus, Price, ProductId};

/// Default country for shipping addresses.
pub const DEFAULT_COUNTRY: &str = "United States";

/// Structured shipping address, stored as a JSON object on the order row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(rename = "zipCode")]
    pub zip_code: String,
    pub country: String,
}

/// Insert payload for the `orders` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrder {
    pub order_number: OrderNumber,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: ShippingAddress,
    pub subtotal: Price,
    pub tax: Price,
    pub shipping_cost: Price,
    pub total: Price,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
}

/// An order row as returned by the data service after insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: OrderNumber,
    pub total: Price,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for the `order_items` collection.
///
/// Name and unit price are copied from the product at submission time so later
/// catalog edits never change historical orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub size: String,
    pub color: String,
    pub price: Price,
    pub subtotal: Price,
}
