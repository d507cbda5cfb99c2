//! Cart rows and in-memory cart items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lynora_core::{CartItemId, Price, ProductId, SessionId};

use super::catalog::Product;

/// A row of the `cart_items` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartRow {
    pub id: CartItemId,
    pub session_id: SessionId,
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for a new `cart_items` row. The id is assigned remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCartRow {
    pub session_id: SessionId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub size: String,
    pub color: String,
}

/// A cart line joined with its full product record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub id: CartItemId,
    pub product: Product,
    pub quantity: u32,
    pub size: String,
    pub color: String,
}

impl CartItem {
    /// Join a stored row with its product.
    #[must_use]
    pub fn from_row(row: CartRow, product: Product) -> Self {
        Self {
            id: row.id,
            product,
            quantity: row.quantity,
            size: row.size,
            color: row.color,
        }
    }

    /// Unit price × quantity at the product's current price.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}
