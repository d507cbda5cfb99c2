//! Remote data access for the storefront.
//!
//! # Architecture
//!
//! - [`DataStore`] is the seam between business logic and the hosted data
//!   service. Cart, catalog, checkout and customization flows are generic over
//!   it.
//! - [`SupabaseClient`](crate::supabase::SupabaseClient) is the production
//!   implementation (`PostgREST` over HTTPS).
//! - [`MemoryStore`] keeps everything in process, for tests and offline demos.
//!
//! Every operation is one round trip. The only query shapes used are exact
//! match and set membership on a single field.

mod memory;

use std::future::Future;

use thiserror::Error;

use lynora_core::{CartItemId, OrderId, ProductId, SessionId};

use crate::models::{
    CartRow, Category, Customization, NewCartRow, NewCustomization, NewOrder, NewOrderItem, Order,
    Product,
};

pub use memory::{MemoryStore, StoreOperation, StoredOrder};

/// Errors that can occur when talking to the data service.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message or truncated body.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A write returned no row, or a lookup found nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violated (e.g. duplicate order number).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Rate limited by the service.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The store could not serve the request at all.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Row-level access to the storefront's remote collections.
///
/// Implementations must be cheap to clone (share state behind an `Arc`), so a
/// cart, a catalog and a checkout can each hold their own handle.
pub trait DataStore: Clone + Send + Sync {
    /// All products with their images and category.
    fn list_products(&self) -> impl Future<Output = Result<Vec<Product>, StoreError>> + Send;

    /// All categories.
    fn list_categories(&self) -> impl Future<Output = Result<Vec<Category>, StoreError>> + Send;

    /// One product (with images and category) by slug.
    fn product_by_slug(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Option<Product>, StoreError>> + Send;

    /// Products (with images) whose id is in `ids`. Unknown ids are skipped.
    fn products_by_ids(
        &self,
        ids: &[ProductId],
    ) -> impl Future<Output = Result<Vec<Product>, StoreError>> + Send;

    /// Every cart row belonging to `session`.
    fn cart_rows(
        &self,
        session: &SessionId,
    ) -> impl Future<Output = Result<Vec<CartRow>, StoreError>> + Send;

    /// Insert one cart row and return it with its assigned id.
    fn insert_cart_row(
        &self,
        row: &NewCartRow,
    ) -> impl Future<Output = Result<CartRow, StoreError>> + Send;

    /// Set the quantity of one cart row. Unknown ids are a no-op.
    fn update_cart_quantity(
        &self,
        id: CartItemId,
        quantity: u32,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Delete one cart row. Unknown ids are a no-op.
    fn delete_cart_row(&self, id: CartItemId)
    -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Delete every cart row belonging to `session`.
    fn delete_session_cart(
        &self,
        session: &SessionId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Insert an order. Fails with [`StoreError::Conflict`] if the order
    /// number is already taken.
    fn insert_order(
        &self,
        order: &NewOrder,
    ) -> impl Future<Output = Result<Order, StoreError>> + Send;

    /// Delete an order (used to compensate a failed item write).
    fn delete_order(&self, id: OrderId) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Insert a batch of order items in one request.
    fn insert_order_items(
        &self,
        items: &[NewOrderItem],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Insert a customization request.
    fn insert_customization(
        &self,
        customization: &NewCustomization,
    ) -> impl Future<Output = Result<Customization, StoreError>> + Send;
}
