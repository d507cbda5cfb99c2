//! Hosted data service client.
//!
//! # Architecture
//!
//! - Talks to the project's `PostgREST` endpoint (`/rest/v1/<table>`) with
//!   `reqwest`
//! - The data service is the source of truth - NO local sync, direct calls
//! - Product and category reads are cached in memory via `moka`; cart, order
//!   and customization rows are never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use lynora_storefront::store::DataStore;
//! use lynora_storefront::supabase::SupabaseClient;
//!
//! let client = SupabaseClient::new(&config.supabase)?;
//! let products = client.list_products().await?;
//! ```

mod cache;
pub mod query;

use std::sync::Arc;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use lynora_core::{CartItemId, OrderId, ProductId, SessionId};

use crate::config::SupabaseConfig;
use crate::models::{
    CartRow, Category, Customization, NewCartRow, NewCustomization, NewOrder, NewOrderItem, Order,
    Product,
};
use crate::store::{DataStore, StoreError};

use cache::{CacheKey, CacheValue};
use query::{
    CART_ROW_COLUMNS, PRODUCT_WITH_IMAGES, PRODUCT_WITH_RELATIONS, Param, tables,
};

const MAX_ERROR_BODY_CHARS: usize = 200;

// =============================================================================
// SupabaseClient
// =============================================================================

/// Client for the hosted data service's REST interface.
///
/// Cheap to clone; clones share the HTTP connection pool and the catalog cache.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    client: reqwest::Client,
    rest_url: Url,
    api_key: SecretString,
    cache: Cache<CacheKey, CacheValue>,
}

impl SupabaseClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the HTTP client cannot be built or the project
    /// URL cannot be extended with the REST path.
    pub fn new(config: &SupabaseConfig) -> Result<Self, StoreError> {
        let cache = Cache::builder()
            .max_capacity(256)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        let rest_url = config
            .url
            .join("rest/v1/")
            .map_err(|e| StoreError::Unavailable(format!("invalid project URL: {e}")))?;

        Ok(Self {
            inner: Arc::new(SupabaseClientInner {
                client,
                rest_url,
                api_key: config.anon_key.clone(),
                cache,
            }),
        })
    }

    /// Build the URL for `table` with query parameters.
    fn endpoint(&self, table: &str, params: &[Param]) -> Result<Url, StoreError> {
        let mut url = self
            .inner
            .rest_url
            .join(table)
            .map_err(|e| StoreError::Unavailable(format!("invalid table '{table}': {e}")))?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for param in params {
                pairs.append_pair(&param.key, &param.value);
            }
        }
        Ok(url)
    }

    /// Start a request with authentication headers applied.
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let key = self.inner.api_key.expose_secret();
        self.inner
            .client
            .request(method, url)
            .header("apikey", key)
            .header("Authorization", format!("Bearer {key}"))
            .header("Accept", "application/json")
    }

    /// Send a request and return the response body, mapping failures.
    async fn send(&self, request: RequestBuilder) -> Result<String, StoreError> {
        let response = request.send().await?;
        let status = response.status();
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = response.text().await?;

        if let Some(err) = error_for_status(status, retry_after.as_deref(), &body) {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Data service returned non-success status"
            );
            return Err(err);
        }

        Ok(body)
    }

    /// `GET` rows from `table`.
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        params: &[Param],
    ) -> Result<Vec<T>, StoreError> {
        let url = self.endpoint(table, params)?;
        let body = self.send(self.request(Method::GET, url)).await?;
        parse_rows(&body)
    }

    /// `POST` rows to `table` and return the stored representation.
    async fn insert<B, T>(&self, table: &str, body: &B) -> Result<Vec<T>, StoreError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(table, &[])?;
        let request = self
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(body);
        let body = self.send(request).await?;
        parse_rows(&body)
    }

    /// `POST` rows to `table` without reading them back.
    async fn insert_minimal<B>(&self, table: &str, body: &B) -> Result<(), StoreError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.endpoint(table, &[])?;
        let request = self
            .request(Method::POST, url)
            .header("Prefer", "return=minimal")
            .json(body);
        self.send(request).await.map(|_| ())
    }

    /// `PATCH` rows of `table` matching `params`.
    async fn update<B>(&self, table: &str, params: &[Param], body: &B) -> Result<(), StoreError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.endpoint(table, params)?;
        let request = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=minimal")
            .json(body);
        self.send(request).await.map(|_| ())
    }

    /// `DELETE` rows of `table` matching `params`.
    async fn delete(&self, table: &str, params: &[Param]) -> Result<(), StoreError> {
        let url = self.endpoint(table, params)?;
        self.send(self.request(Method::DELETE, url)).await.map(|_| ())
    }

    /// Insert a single row and return it.
    async fn insert_one<B, T>(&self, table: &str, body: &B) -> Result<T, StoreError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.insert::<B, T>(table, body)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("{table} insert returned no row")))
    }
}

/// Map a non-success response to a `StoreError`.
fn error_for_status(status: StatusCode, retry_after: Option<&str>, body: &str) -> Option<StoreError> {
    if status.is_success() {
        return None;
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let seconds = retry_after.and_then(|s| s.parse::<u64>().ok()).unwrap_or(1);
        return Some(StoreError::RateLimited(seconds));
    }

    // PostgREST errors are JSON objects with a `message` field
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .unwrap_or_else(|| body.chars().take(MAX_ERROR_BODY_CHARS).collect());

    if status == StatusCode::CONFLICT {
        return Some(StoreError::Conflict(message));
    }

    Some(StoreError::Api {
        status: status.as_u16(),
        message,
    })
}

fn parse_rows<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, StoreError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %body.chars().take(500).collect::<String>(),
            "Failed to parse data service response"
        );
        StoreError::Parse(e)
    })
}

// =============================================================================
// DataStore implementation
// =============================================================================

impl DataStore for SupabaseClient {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for product listing");
            return Ok(products);
        }

        let products: Vec<Product> = self
            .select(tables::PRODUCTS, &[Param::select(PRODUCT_WITH_RELATIONS)])
            .await?;

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for category listing");
            return Ok(categories);
        }

        let categories: Vec<Category> = self
            .select(tables::CATEGORIES, &[Param::select("*")])
            .await?;

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(categories.clone()),
            )
            .await;

        Ok(categories)
    }

    #[instrument(skip(self))]
    async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, StoreError> {
        let key = CacheKey::ProductSlug(slug.to_owned());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!(slug, "Cache hit for product");
            return Ok(product.map(|p| *p));
        }

        let products: Vec<Product> = self
            .select(
                tables::PRODUCTS,
                &[
                    Param::select(PRODUCT_WITH_RELATIONS),
                    Param::eq("slug", slug),
                ],
            )
            .await?;
        let product = products.into_iter().next();

        self.inner
            .cache
            .insert(key, CacheValue::Product(product.clone().map(Box::new)))
            .await;

        Ok(product)
    }

    #[instrument(skip(self), fields(count = ids.len()))]
    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.select(
            tables::PRODUCTS,
            &[Param::select(PRODUCT_WITH_IMAGES), Param::in_list("id", ids)],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn cart_rows(&self, session: &SessionId) -> Result<Vec<CartRow>, StoreError> {
        self.select(
            tables::CART_ITEMS,
            &[
                Param::select(CART_ROW_COLUMNS),
                Param::eq("session_id", session),
            ],
        )
        .await
    }

    #[instrument(skip(self, row), fields(product_id = %row.product_id))]
    async fn insert_cart_row(&self, row: &NewCartRow) -> Result<CartRow, StoreError> {
        self.insert_one(tables::CART_ITEMS, row).await
    }

    #[instrument(skip(self))]
    async fn update_cart_quantity(&self, id: CartItemId, quantity: u32) -> Result<(), StoreError> {
        self.update(
            tables::CART_ITEMS,
            &[Param::eq("id", id)],
            &serde_json::json!({ "quantity": quantity }),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete_cart_row(&self, id: CartItemId) -> Result<(), StoreError> {
        self.delete(tables::CART_ITEMS, &[Param::eq("id", id)]).await
    }

    #[instrument(skip(self))]
    async fn delete_session_cart(&self, session: &SessionId) -> Result<(), StoreError> {
        self.delete(tables::CART_ITEMS, &[Param::eq("session_id", session)])
            .await
    }

    #[instrument(skip(self, order), fields(order_number = %order.order_number))]
    async fn insert_order(&self, order: &NewOrder) -> Result<Order, StoreError> {
        self.insert_one(tables::ORDERS, order).await
    }

    #[instrument(skip(self))]
    async fn delete_order(&self, id: OrderId) -> Result<(), StoreError> {
        self.delete(tables::ORDERS, &[Param::eq("id", id)]).await
    }

    #[instrument(skip(self, items), fields(count = items.len()))]
    async fn insert_order_items(&self, items: &[NewOrderItem]) -> Result<(), StoreError> {
        if items.is_empty() {
            return Ok(());
        }
        self.insert_minimal(tables::ORDER_ITEMS, items).await
    }

    #[instrument(skip(self, customization))]
    async fn insert_customization(
        &self,
        customization: &NewCustomization,
    ) -> Result<Customization, StoreError> {
        self.insert_one(tables::CUSTOMIZATIONS, customization).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn client() -> SupabaseClient {
        let config = SupabaseConfig {
            url: Url::parse("https://lynora.supabase.co").unwrap(),
            anon_key: SecretString::from("anon-key-for-tests"),
            cache_ttl: Duration::from_secs(60),
            timeout: Duration::from_secs(5),
        };
        SupabaseClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_with_filters() {
        let session = SessionId::from_stored("session_1_abc").unwrap();
        let url = client()
            .endpoint(
                tables::CART_ITEMS,
                &[Param::select("id,quantity"), Param::eq("session_id", &session)],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://lynora.supabase.co/rest/v1/cart_items?select=id%2Cquantity&session_id=eq.session_1_abc"
        );
    }

    #[test]
    fn test_endpoint_without_params_has_no_query() {
        let url = client().endpoint(tables::ORDERS, &[]).unwrap();
        assert_eq!(url.as_str(), "https://lynora.supabase.co/rest/v1/orders");
    }

    #[test]
    fn test_success_is_not_an_error() {
        assert!(error_for_status(StatusCode::OK, None, "[]").is_none());
        assert!(error_for_status(StatusCode::CREATED, None, "").is_none());
    }

    #[test]
    fn test_rate_limit_mapping() {
        let err = error_for_status(StatusCode::TOO_MANY_REQUESTS, Some("12"), "").unwrap();
        assert!(matches!(err, StoreError::RateLimited(12)));

        let err = error_for_status(StatusCode::TOO_MANY_REQUESTS, None, "").unwrap();
        assert!(matches!(err, StoreError::RateLimited(1)));
    }

    #[test]
    fn test_conflict_mapping_uses_message() {
        let body = r#"{"code":"23505","message":"duplicate key value violates unique constraint \"orders_order_number_key\""}"#;
        let err = error_for_status(StatusCode::CONFLICT, None, body).unwrap();
        match err {
            StoreError::Conflict(message) => assert!(message.contains("orders_order_number_key")),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_api_error_truncates_plain_body() {
        let body = "x".repeat(1000);
        let err = error_for_status(StatusCode::BAD_GATEWAY, None, &body).unwrap();
        match err {
            StoreError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message.len(), MAX_ERROR_BODY_CHARS);
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rows_empty_body() {
        let rows: Vec<CartRow> = parse_rows("").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_rows_invalid_json() {
        let result: Result<Vec<CartRow>, _> = parse_rows("{not json");
        assert!(matches!(result, Err(StoreError::Parse(_))));
    }
}
