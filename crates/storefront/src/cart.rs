//! Session-scoped shopping cart.
//!
//! [`CartStore`] keeps an in-memory copy of the shopper's cart and mirrors every
//! mutation to the `cart_items` collection. The remote store is the system of
//! record; the local copy is refreshed only by [`CartStore::load`].
//!
//! Semantics worth knowing:
//! - "Add to cart" always inserts a new row. Adding the same product, size and
//!   color twice yields two lines, never one line with a summed quantity.
//! - A failed add or quantity update leaves the local cart untouched.
//! - Remove and clear drop local lines even when the remote delete fails; the
//!   error is still returned to the caller.
//! - Mutations take `&mut self`, so one cart cannot have overlapping
//!   mutations in flight.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::{debug, instrument, warn};

use lynora_core::{CartItemId, Price, ProductId, SessionId};

use crate::error::add_breadcrumb;
use crate::models::{CartItem, NewCartRow, Product};
use crate::store::{DataStore, StoreError};

/// A cart precondition that the caller violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartValidationError {
    /// Quantity must be at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The product has no stock.
    #[error("{product} is out of stock")]
    OutOfStock {
        /// Product name.
        product: String,
    },

    /// More units requested than are in stock.
    #[error("only {available} of {product} in stock (requested {requested})")]
    ExceedsStock {
        /// Product name.
        product: String,
        /// Units requested.
        requested: u64,
        /// Units available.
        available: u32,
    },

    /// The product offers sizes but none was chosen.
    #[error("please select a size")]
    MissingSize,

    /// The chosen size is not offered.
    #[error("size {0} is not available for this product")]
    UnknownSize(String),

    /// The product offers colors but none was chosen.
    #[error("please select a color")]
    MissingColor,

    /// The chosen color is not offered.
    #[error("color {0} is not available for this product")]
    UnknownColor(String),
}

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The request broke a cart invariant; nothing was written.
    #[error(transparent)]
    Validation(#[from] CartValidationError),

    /// The line is not in the cart; nothing was written.
    #[error("cart item {0} is not in the cart")]
    NotInCart(CartItemId),

    /// The data service call failed.
    #[error("cart sync failed: {0}")]
    Store(#[from] StoreError),
}

/// Check a product/variant/quantity combination before it is written.
///
/// # Errors
///
/// Returns the first violated [`CartValidationError`].
pub fn validate_line(
    product: &Product,
    quantity: u64,
    size: &str,
    color: &str,
) -> Result<(), CartValidationError> {
    if quantity == 0 {
        return Err(CartValidationError::InvalidQuantity);
    }
    if !product.in_stock() {
        return Err(CartValidationError::OutOfStock {
            product: product.name.clone(),
        });
    }
    if quantity > u64::from(product.stock) {
        return Err(CartValidationError::ExceedsStock {
            product: product.name.clone(),
            requested: quantity,
            available: product.stock,
        });
    }
    if !product.sizes.is_empty() {
        if size.is_empty() {
            return Err(CartValidationError::MissingSize);
        }
        if !product.offers_size(size) {
            return Err(CartValidationError::UnknownSize(size.to_owned()));
        }
    }
    if !product.colors.is_empty() {
        if color.is_empty() {
            return Err(CartValidationError::MissingColor);
        }
        if !product.offers_color(color) {
            return Err(CartValidationError::UnknownColor(color.to_owned()));
        }
    }
    Ok(())
}

/// In-memory cart for one session, synchronized with the data service.
pub struct CartStore<S> {
    store: S,
    session: SessionId,
    items: Vec<CartItem>,
}

impl<S: DataStore> CartStore<S> {
    /// Create an empty cart for `session`. Call [`CartStore::load`] to hydrate.
    #[must_use]
    pub const fn new(store: S, session: SessionId) -> Self {
        Self {
            store,
            session,
            items: Vec::new(),
        }
    }

    /// The session this cart belongs to.
    #[must_use]
    pub const fn session(&self) -> &SessionId {
        &self.session
    }

    /// Current cart lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up one line.
    #[must_use]
    pub fn get(&self, id: CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Returns `true` if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Σ unit price × quantity, at current product prices.
    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Replace the local cart with the session's remote rows.
    ///
    /// Rows whose product no longer exists are dropped locally (the remote row
    /// is left in place). On failure the local cart is left empty.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if either fetch fails.
    #[instrument(skip(self), fields(session_id = %self.session))]
    pub async fn load(&mut self) -> Result<(), CartError> {
        self.items.clear();

        let rows = self.store.cart_rows(&self.session).await?;
        if rows.is_empty() {
            debug!("No cart rows for session");
            return Ok(());
        }

        let mut seen = HashSet::new();
        let product_ids: Vec<ProductId> = rows
            .iter()
            .map(|row| row.product_id)
            .filter(|id| seen.insert(*id))
            .collect();

        let products: HashMap<ProductId, Product> = self
            .store
            .products_by_ids(&product_ids)
            .await?
            .into_iter()
            .map(|product| (product.id, product))
            .collect();

        self.items = rows
            .into_iter()
            .filter_map(|row| match products.get(&row.product_id) {
                Some(product) => Some(CartItem::from_row(row, product.clone())),
                None => {
                    warn!(
                        cart_item_id = %row.id,
                        product_id = %row.product_id,
                        "Dropping cart row for missing product"
                    );
                    None
                }
            })
            .collect();

        debug!(lines = self.items.len(), "Cart loaded");
        Ok(())
    }

    /// Insert a new line for `product`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Validation` if the line breaks a cart invariant and
    /// `CartError::Store` if the insert fails. The local cart is unchanged in
    /// both cases.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_to_cart(
        &mut self,
        product: &Product,
        quantity: u32,
        size: &str,
        color: &str,
    ) -> Result<CartItemId, CartError> {
        validate_line(product, u64::from(quantity), size, color)?;

        let row = NewCartRow {
            session_id: self.session.clone(),
            product_id: product.id,
            quantity,
            size: size.to_owned(),
            color: color.to_owned(),
        };

        let stored = self.store.insert_cart_row(&row).await.inspect_err(|e| {
            tracing::error!(error = %e, "Failed to add item to cart");
        })?;

        let id = stored.id;
        self.items.push(CartItem::from_row(stored, product.clone()));

        add_breadcrumb(
            "cart",
            "Added item to cart",
            Some(&[("product", product.slug.as_str()), ("size", size), ("color", color)]),
        );
        Ok(id)
    }

    /// Add one unit with the product's first size and first color.
    ///
    /// # Errors
    ///
    /// See [`CartStore::add_to_cart`].
    pub async fn quick_add(&mut self, product: &Product) -> Result<CartItemId, CartError> {
        let size = product.default_size().unwrap_or_default();
        let color = product.default_color().unwrap_or_default();
        self.add_to_cart(product, 1, size, color).await
    }

    /// Delete a line remotely, then drop it locally.
    ///
    /// Removing an id that is not in the cart is a no-op on both sides. The
    /// local line is dropped even if the remote delete fails.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if the remote delete fails.
    #[instrument(skip(self))]
    pub async fn remove_from_cart(&mut self, id: CartItemId) -> Result<(), CartError> {
        let result = self.store.delete_cart_row(id).await;
        self.items.retain(|item| item.id != id);

        if let Err(e) = result {
            warn!(error = %e, "Remote delete failed, removed locally anyway");
            return Err(e.into());
        }
        add_breadcrumb("cart", "Removed item from cart", None);
        Ok(())
    }

    /// Set a line's quantity. Zero or negative removes the line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotInCart` for unknown lines,
    /// `CartError::Validation` if the quantity exceeds stock, and
    /// `CartError::Store` if the remote update fails (local quantity is then
    /// unchanged).
    #[instrument(skip(self))]
    pub async fn update_quantity(&mut self, id: CartItemId, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            return self.remove_from_cart(id).await;
        }

        let item = self.get(id).ok_or(CartError::NotInCart(id))?;
        let requested = u64::try_from(quantity).unwrap_or(u64::MAX);
        validate_line(&item.product, requested, &item.size, &item.color)?;
        // Bounded by stock (a u32), so this cannot truncate
        let quantity = u32::try_from(requested).unwrap_or(item.product.stock);

        self.store.update_cart_quantity(id, quantity).await?;

        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.quantity = quantity;
        }
        Ok(())
    }

    /// Delete every row of the session, then empty the local cart.
    ///
    /// The local cart is emptied even if the remote delete fails.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if the remote delete fails.
    #[instrument(skip(self), fields(session_id = %self.session))]
    pub async fn clear_cart(&mut self) -> Result<(), CartError> {
        let result = self.store.delete_session_cart(&self.session).await;
        self.items.clear();

        if let Err(e) = result {
            warn!(error = %e, "Remote cart clear failed, cleared locally anyway");
            return Err(e.into());
        }
        Ok(())
    }
}
