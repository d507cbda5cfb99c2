//! In-process [`DataStore`] implementation.
//!
//! Used by tests and by offline demos. Behaves like the hosted service for the
//! query shapes the storefront relies on: ids are assigned on insert, order
//! numbers are unique, deletes of unknown ids succeed. Individual operations
//! can be made to fail to exercise transport-error paths.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use lynora_core::{CartItemId, CustomizationId, OrderId, ProductId, SessionId};

use super::{DataStore, StoreError};
use crate::models::{
    CartRow, Category, Customization, NewCartRow, NewCustomization, NewOrder, NewOrderItem, Order,
    Product,
};

/// A store operation, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    ListProducts,
    ListCategories,
    ProductBySlug,
    ProductsByIds,
    CartRows,
    InsertCartRow,
    UpdateCartQuantity,
    DeleteCartRow,
    DeleteSessionCart,
    InsertOrder,
    DeleteOrder,
    InsertOrderItems,
    InsertCustomization,
}

/// An order as held by the memory store, with its full insert payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredOrder {
    pub id: OrderId,
    pub order: NewOrder,
}

#[derive(Default)]
struct MemoryState {
    products: Vec<Product>,
    categories: Vec<Category>,
    cart_rows: Vec<CartRow>,
    orders: Vec<StoredOrder>,
    order_items: Vec<NewOrderItem>,
    customizations: Vec<NewCustomization>,
    failing: HashSet<StoreOperation>,
    writes: usize,
}

/// Thread-safe in-memory store. Clones share the same state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with a catalog.
    #[must_use]
    pub fn with_catalog(products: Vec<Product>, categories: Vec<Category>) -> Self {
        let store = Self::new();
        {
            let mut state = store.state();
            state.products = products;
            state.categories = categories;
        }
        store
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every subsequent call of `operation` fail.
    pub fn fail(&self, operation: StoreOperation) {
        self.state().failing.insert(operation);
    }

    /// Undo [`MemoryStore::fail`].
    pub fn recover(&self, operation: StoreOperation) {
        self.state().failing.remove(&operation);
    }

    /// Add or replace a product in the catalog.
    pub fn upsert_product(&self, product: Product) {
        let mut state = self.state();
        state.products.retain(|p| p.id != product.id);
        state.products.push(product);
    }

    /// Remove a product from the catalog, leaving any cart rows that
    /// reference it in place.
    pub fn remove_product(&self, id: ProductId) {
        self.state().products.retain(|p| p.id != id);
    }

    /// Snapshot of all cart rows, across sessions.
    #[must_use]
    pub fn cart_rows_snapshot(&self) -> Vec<CartRow> {
        self.state().cart_rows.clone()
    }

    /// Snapshot of stored orders.
    #[must_use]
    pub fn orders(&self) -> Vec<StoredOrder> {
        self.state().orders.clone()
    }

    /// Snapshot of stored order items.
    #[must_use]
    pub fn order_items(&self) -> Vec<NewOrderItem> {
        self.state().order_items.clone()
    }

    /// Snapshot of stored customization requests.
    #[must_use]
    pub fn customizations(&self) -> Vec<NewCustomization> {
        self.state().customizations.clone()
    }

    /// Number of successful write operations served so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state().writes
    }

    fn check(state: &MemoryState, operation: StoreOperation) -> Result<(), StoreError> {
        if state.failing.contains(&operation) {
            return Err(StoreError::Unavailable(format!("{operation:?} failed")));
        }
        Ok(())
    }
}

impl DataStore for MemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let state = self.state();
        Self::check(&state, StoreOperation::ListProducts)?;
        Ok(state.products.clone())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let state = self.state();
        Self::check(&state, StoreOperation::ListCategories)?;
        Ok(state.categories.clone())
    }

    async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, StoreError> {
        let state = self.state();
        Self::check(&state, StoreOperation::ProductBySlug)?;
        Ok(state.products.iter().find(|p| p.slug == slug).cloned())
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError> {
        let state = self.state();
        Self::check(&state, StoreOperation::ProductsByIds)?;
        Ok(state
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn cart_rows(&self, session: &SessionId) -> Result<Vec<CartRow>, StoreError> {
        let state = self.state();
        Self::check(&state, StoreOperation::CartRows)?;
        Ok(state
            .cart_rows
            .iter()
            .filter(|row| &row.session_id == session)
            .cloned()
            .collect())
    }

    async fn insert_cart_row(&self, row: &NewCartRow) -> Result<CartRow, StoreError> {
        let mut state = self.state();
        Self::check(&state, StoreOperation::InsertCartRow)?;
        let stored = CartRow {
            id: CartItemId::generate(),
            session_id: row.session_id.clone(),
            product_id: row.product_id,
            quantity: row.quantity,
            size: row.size.clone(),
            color: row.color.clone(),
            created_at: Some(Utc::now()),
        };
        state.cart_rows.push(stored.clone());
        state.writes += 1;
        Ok(stored)
    }

    async fn update_cart_quantity(&self, id: CartItemId, quantity: u32) -> Result<(), StoreError> {
        let mut state = self.state();
        Self::check(&state, StoreOperation::UpdateCartQuantity)?;
        if let Some(row) = state.cart_rows.iter_mut().find(|row| row.id == id) {
            row.quantity = quantity;
        }
        state.writes += 1;
        Ok(())
    }

    async fn delete_cart_row(&self, id: CartItemId) -> Result<(), StoreError> {
        let mut state = self.state();
        Self::check(&state, StoreOperation::DeleteCartRow)?;
        state.cart_rows.retain(|row| row.id != id);
        state.writes += 1;
        Ok(())
    }

    async fn delete_session_cart(&self, session: &SessionId) -> Result<(), StoreError> {
        let mut state = self.state();
        Self::check(&state, StoreOperation::DeleteSessionCart)?;
        state.cart_rows.retain(|row| &row.session_id != session);
        state.writes += 1;
        Ok(())
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<Order, StoreError> {
        let mut state = self.state();
        Self::check(&state, StoreOperation::InsertOrder)?;
        if state
            .orders
            .iter()
            .any(|stored| stored.order.order_number == order.order_number)
        {
            return Err(StoreError::Conflict(format!(
                "duplicate order_number {}",
                order.order_number
            )));
        }
        let id = OrderId::generate();
        state.orders.push(StoredOrder {
            id,
            order: order.clone(),
        });
        state.writes += 1;
        Ok(Order {
            id,
            order_number: order.order_number.clone(),
            total: order.total,
            status: order.status,
            payment_status: order.payment_status,
            created_at: Some(Utc::now()),
        })
    }

    async fn delete_order(&self, id: OrderId) -> Result<(), StoreError> {
        let mut state = self.state();
        Self::check(&state, StoreOperation::DeleteOrder)?;
        state.orders.retain(|stored| stored.id != id);
        state.writes += 1;
        Ok(())
    }

    async fn insert_order_items(&self, items: &[NewOrderItem]) -> Result<(), StoreError> {
        let mut state = self.state();
        Self::check(&state, StoreOperation::InsertOrderItems)?;
        state.order_items.extend_from_slice(items);
        state.writes += 1;
        Ok(())
    }

    async fn insert_customization(
        &self,
        customization: &NewCustomization,
    ) -> Result<Customization, StoreError> {
        let mut state = self.state();
        Self::check(&state, StoreOperation::InsertCustomization)?;
        state.customizations.push(customization.clone());
        state.writes += 1;
        Ok(Customization {
            id: CustomizationId::generate(),
            session_id: customization.session_id.clone(),
            status: customization.status,
            created_at: Some(Utc::now()),
        })
    }
}
