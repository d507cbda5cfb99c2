//! Catalog browsing: listings, product lookup, and shop filters.

pub mod filters;

pub use filters::{
    COLOR_OPTIONS, FilterConfig, PriceRange, SIZE_OPTIONS, SortMode, apply_filters,
};

use tracing::instrument;

use crate::models::{Category, Product};
use crate::store::{DataStore, StoreError};

/// Number of related products shown on a product page.
pub const RELATED_PRODUCTS_LIMIT: usize = 4;

/// Number of featured products shown on the home page.
pub const FEATURED_PRODUCTS_LIMIT: usize = 8;

/// Number of new arrivals shown on the home page.
pub const NEW_ARRIVALS_LIMIT: usize = 8;

/// Read-only catalog access over a [`DataStore`].
#[derive(Clone)]
pub struct CatalogService<S> {
    store: S,
}

impl<S: DataStore> CatalogService<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// All products, with images and category.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data service call fails.
    pub async fn products(&self) -> Result<Vec<Product>, StoreError> {
        self.store.list_products().await
    }

    /// All categories, by name.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data service call fails.
    pub async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut categories = self.store.list_categories().await?;
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    /// Load the catalog and apply the shop filters.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data service call fails.
    #[instrument(skip(self, config), fields(sort = %config.sort))]
    pub async fn browse(&self, config: &FilterConfig) -> Result<Vec<Product>, StoreError> {
        let products = self.store.list_products().await?;
        let visible = apply_filters(&products, config);
        tracing::debug!(total = products.len(), visible = visible.len(), "Applied shop filters");
        Ok(visible)
    }

    /// Look up one product by slug.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no product has this slug, or any
    /// transport error.
    pub async fn product(&self, slug: &str) -> Result<Product, StoreError> {
        self.store
            .product_by_slug(slug)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("product {slug}")))
    }

    /// A product and its related products.
    ///
    /// # Errors
    ///
    /// See [`CatalogService::product`].
    pub async fn product_page(&self, slug: &str) -> Result<(Product, Vec<Product>), StoreError> {
        let product = self.product(slug).await?;
        let all = self.store.list_products().await?;
        let related = related_products(&product, &all, RELATED_PRODUCTS_LIMIT);
        Ok((product, related))
    }

    /// Featured products for the home page.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data service call fails.
    pub async fn featured(&self) -> Result<Vec<Product>, StoreError> {
        let all = self.store.list_products().await?;
        Ok(featured_products(&all, FEATURED_PRODUCTS_LIMIT))
    }

    /// New arrivals for the home page.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data service call fails.
    pub async fn new_arrivals(&self) -> Result<Vec<Product>, StoreError> {
        let all = self.store.list_products().await?;
        Ok(new_arrival_products(&all, NEW_ARRIVALS_LIMIT))
    }
}

/// Up to `limit` other products from the same category, in catalog order.
/// Uncategorized products pair with other uncategorized products.
#[must_use]
pub fn related_products(product: &Product, all: &[Product], limit: usize) -> Vec<Product> {
    all.iter()
        .filter(|p| p.id != product.id && p.category_id == product.category_id)
        .take(limit)
        .cloned()
        .collect()
}

/// Up to `limit` featured products, in catalog order.
#[must_use]
pub fn featured_products(all: &[Product], limit: usize) -> Vec<Product> {
    all.iter()
        .filter(|p| p.featured)
        .take(limit)
        .cloned()
        .collect()
}

/// Up to `limit` products flagged as new arrivals, in catalog order.
#[must_use]
pub fn new_arrival_products(all: &[Product], limit: usize) -> Vec<Product> {
    all.iter()
        .filter(|p| p.new_arrival)
        .take(limit)
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_support::product;
    use lynora_core::CategoryId;

    #[test]
    fn test_related_products_same_category_excluding_self() {
        let evening = CategoryId::generate();
        let mut products: Vec<Product> = (0..7)
            .map(|i| {
                let mut p = product(&format!("gown-{i}"), 10_000, 1);
                p.category_id = Some(evening);
                p
            })
            .collect();
        products[3].category_id = Some(CategoryId::generate());

        let related = related_products(&products[0], &products, RELATED_PRODUCTS_LIMIT);
        let slugs: Vec<&str> = related.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["gown-1", "gown-2", "gown-4", "gown-5"]);
    }

    #[test]
    fn test_uncategorized_pairs_with_uncategorized() {
        let mut lone = product("lone", 10_000, 1);
        lone.category_id = None;
        let mut stray = product("stray", 5_000, 1);
        stray.category_id = None;
        let mut filed = product("filed", 5_000, 1);
        filed.category_id = Some(CategoryId::generate());

        let related = related_products(&lone, &[lone.clone(), filed, stray], 4);
        let slugs: Vec<&str> = related.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["stray"]);
    }

    #[test]
    fn test_new_arrival_products_in_catalog_order() {
        let mut products: Vec<Product> = (0..12)
            .map(|i| product(&format!("dress-{i}"), 6_000, 1))
            .collect();
        products[2].new_arrival = true;
        products[7].new_arrival = true;

        let fresh = new_arrival_products(&products, NEW_ARRIVALS_LIMIT);
        let slugs: Vec<&str> = fresh.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["dress-2", "dress-7"]);

        for p in &mut products {
            p.new_arrival = true;
        }
        assert_eq!(new_arrival_products(&products, NEW_ARRIVALS_LIMIT).len(), 8);
    }

    #[tokio::test]
    async fn test_product_lookup() {
        let store = MemoryStore::with_catalog(vec![product("midi-wrap", 8_999, 2)], Vec::new());
        let catalog = CatalogService::new(store);

        assert_eq!(catalog.product("midi-wrap").await.unwrap().slug, "midi-wrap");
        assert!(matches!(
            catalog.product("missing").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_browse_applies_filters() {
        let mut featured = product("featured", 8_000, 2);
        featured.featured = true;
        let store = MemoryStore::with_catalog(
            vec![product("plain", 5_000, 2), featured, product("gown", 40_000, 1)],
            Vec::new(),
        );
        let catalog = CatalogService::new(store);

        let visible = catalog.browse(&FilterConfig::default()).await.unwrap();
        let slugs: Vec<&str> = visible.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["featured", "plain"]);

        let home = catalog.featured().await.unwrap();
        assert_eq!(home.len(), 1);
        assert!(catalog.new_arrivals().await.unwrap().is_empty());
    }
}
