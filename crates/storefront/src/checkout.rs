//! Order submission.
//!
//! [`Checkout::submit_order`] validates the shipping form, prices the cart,
//! writes the order and its items, then clears the cart. Payment is not
//! processed; orders are recorded as paid.

use chrono::Utc;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, instrument, warn};

use lynora_core::{OrderNumber, OrderStatus, PaymentStatus, Price};

use crate::cart::CartStore;
use crate::error::add_breadcrumb;
use crate::models::{
    CartItem, DEFAULT_COUNTRY, NewOrder, NewOrderItem, Order, ShippingAddress,
};
use crate::store::{DataStore, StoreError};

/// Orders with a subtotal strictly above this ship free.
pub const FREE_SHIPPING_THRESHOLD: Price = Price::from_cents(10_000);

/// Shipping charged at or below the free-shipping threshold.
pub const FLAT_SHIPPING: Price = Price::from_cents(1_000);

/// Sales tax rate applied to the subtotal.
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Attempts at a unique order number before giving up.
pub const ORDER_NUMBER_ATTEMPTS: u32 = 5;

/// Errors from order submission.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// One or more required form fields are blank. Nothing was written.
    ///
    /// The message stays generic; the field names are kept for callers that
    /// highlight inputs.
    #[error("please fill in all required fields")]
    MissingRequiredFields(Vec<&'static str>),

    /// There is nothing to order. Nothing was written.
    #[error("your cart is empty")]
    EmptyCart,

    /// Writing the order failed. Nothing was persisted.
    #[error("failed to create order: {0}")]
    Order(StoreError),

    /// Every generated order number collided with an existing order.
    #[error("no unique order number after {0} attempts")]
    OrderNumberExhausted(u32),

    /// The order was written but its items were not; the order was rolled
    /// back where possible.
    #[error("failed to save items for order {order_number}: {source}")]
    OrderItems {
        order_number: OrderNumber,
        #[source]
        source: StoreError,
    },
}

impl CheckoutError {
    /// Returns `true` if the failure was on the data service side.
    #[must_use]
    pub const fn is_service_failure(&self) -> bool {
        matches!(
            self,
            Self::Order(_) | Self::OrderNumberExhausted(_) | Self::OrderItems { .. }
        )
    }
}

/// Shipping form as entered by the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Default for CheckoutForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl CheckoutForm {
    /// Check that every required field is filled in. Phone is optional and
    /// email format is not checked.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingRequiredFields` naming every blank field.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let required = [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("email", &self.email),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zip code", &self.zip_code),
        ];
        let missing: Vec<&'static str> = required
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CheckoutError::MissingRequiredFields(missing))
        }
    }

    fn customer_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    fn shipping_address(&self) -> ShippingAddress {
        let country = self.country.trim();
        ShippingAddress {
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            zip_code: self.zip_code.trim().to_string(),
            country: if country.is_empty() {
                DEFAULT_COUNTRY.to_string()
            } else {
                country.to_string()
            },
        }
    }
}

/// Priced summary of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
}

impl OrderTotals {
    /// Price a subtotal with the fixed shipping and tax policy.
    #[must_use]
    pub fn for_subtotal(subtotal: Price) -> Self {
        let shipping = if subtotal > FREE_SHIPPING_THRESHOLD {
            Price::ZERO
        } else {
            FLAT_SHIPPING
        };
        let tax = subtotal * TAX_RATE;
        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }
}

fn current_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Order submission over a [`DataStore`].
#[derive(Clone)]
pub struct Checkout<S> {
    store: S,
    now_millis: fn() -> i64,
}

impl<S: DataStore> Checkout<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_clock(store, current_millis)
    }

    /// Use `now_millis` instead of the system clock for order numbers.
    #[must_use]
    pub const fn with_clock(store: S, now_millis: fn() -> i64) -> Self {
        Self { store, now_millis }
    }

    /// Submit the cart as an order and clear it.
    ///
    /// Field validation happens before any write. The cart is cleared only
    /// once the order and all its items are stored; a failure to clear it
    /// afterwards is logged but does not fail the order.
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredFields` or `EmptyCart` without writing, and
    /// the remaining variants when the data service fails. The cart is left
    /// intact on every error.
    #[instrument(skip_all, fields(session_id = %cart.session()))]
    pub async fn submit_order(
        &self,
        form: &CheckoutForm,
        cart: &mut CartStore<S>,
    ) -> Result<OrderNumber, CheckoutError> {
        form.validate()?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let totals = OrderTotals::for_subtotal(cart.cart_total());
        let order = self.insert_order(form, &totals).await?;

        let items: Vec<NewOrderItem> = cart
            .items()
            .iter()
            .map(|item| order_item(&order, item))
            .collect();

        if let Err(source) = self.store.insert_order_items(&items).await {
            tracing::error!(
                order_number = %order.order_number,
                error = %source,
                "Failed to save order items, rolling back order"
            );
            if let Err(e) = self.store.delete_order(order.id).await {
                tracing::error!(
                    order_number = %order.order_number,
                    error = %e,
                    "Failed to roll back order"
                );
            }
            return Err(CheckoutError::OrderItems {
                order_number: order.order_number,
                source,
            });
        }

        if let Err(e) = cart.clear_cart().await {
            warn!(order_number = %order.order_number, error = %e, "Order placed but cart not cleared");
        }

        info!(
            order_number = %order.order_number,
            total = %totals.total.round_to_cents(),
            lines = items.len(),
            "Order placed"
        );
        add_breadcrumb(
            "checkout",
            "Order placed",
            Some(&[("order_number", order.order_number.as_str())]),
        );
        Ok(order.order_number)
    }

    /// Insert the order row, regenerating the order number on collisions.
    async fn insert_order(
        &self,
        form: &CheckoutForm,
        totals: &OrderTotals,
    ) -> Result<Order, CheckoutError> {
        let started = (self.now_millis)();
        let mut new_order = NewOrder {
            order_number: OrderNumber::from_timestamp_millis(started),
            customer_name: form.customer_name(),
            customer_email: form.email.trim().to_string(),
            customer_phone: form.phone.trim().to_string(),
            shipping_address: form.shipping_address(),
            subtotal: totals.subtotal,
            tax: totals.tax,
            shipping_cost: totals.shipping,
            total: totals.total,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Paid,
        };

        for attempt in 0..ORDER_NUMBER_ATTEMPTS {
            new_order.order_number =
                OrderNumber::from_timestamp_millis(started + i64::from(attempt));

            match self.store.insert_order(&new_order).await {
                Ok(order) => return Ok(order),
                Err(StoreError::Conflict(message)) => {
                    warn!(
                        order_number = %new_order.order_number,
                        attempt,
                        detail = %message,
                        "Order number taken, retrying"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create order");
                    return Err(CheckoutError::Order(e));
                }
            }
        }

        Err(CheckoutError::OrderNumberExhausted(ORDER_NUMBER_ATTEMPTS))
    }
}

fn order_item(order: &Order, item: &CartItem) -> NewOrderItem {
    NewOrderItem {
        order_id: order.id,
        product_id: item.product.id,
        product_name: item.product.name.clone(),
        quantity: item.quantity,
        size: item.size.clone(),
        color: item.color.clone(),
        price: item.product.price,
        subtotal: item.line_total(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreOperation};
    use crate::test_support::product;
    use lynora_core::SessionId;

    const FIXED_MILLIS: i64 = 1_718_000_123_456;

    fn fixed_clock() -> i64 {
        FIXED_MILLIS
    }

    fn form() -> CheckoutForm {
        CheckoutForm {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: String::new(),
            address: "12 Analytical Row".into(),
            city: "Portland".into(),
            state: "OR".into(),
            zip_code: "97201".into(),
            ..CheckoutForm::default()
        }
    }

    async fn filled_cart(lines: &[(i64, u32)]) -> (MemoryStore, CartStore<MemoryStore>) {
        let products: Vec<_> = lines
            .iter()
            .enumerate()
            .map(|(i, (cents, _))| product(&format!("dress-{i}"), *cents, 10))
            .collect();
        let store = MemoryStore::with_catalog(products.clone(), Vec::new());
        let session = SessionId::from_stored("session_1718000000000_checkout1").unwrap();
        let mut cart = CartStore::new(store.clone(), session);
        for (product, (_, quantity)) in products.iter().zip(lines) {
            cart.add_to_cart(product, *quantity, "M", "Red").await.unwrap();
        }
        (store, cart)
    }

    #[test]
    fn test_totals_free_shipping() {
        let totals = OrderTotals::for_subtotal(Price::from_dollars(105));
        assert_eq!(totals.shipping, Price::ZERO);
        assert_eq!(totals.tax, Price::from_cents(840));
        assert_eq!(totals.total, Price::from_cents(11_340));
    }

    #[test]
    fn test_totals_flat_shipping() {
        let totals = OrderTotals::for_subtotal(Price::from_dollars(20));
        assert_eq!(totals.shipping, Price::from_dollars(10));
        assert_eq!(totals.tax, Price::from_cents(160));
        assert_eq!(totals.total, Price::from_cents(3_160));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let totals = OrderTotals::for_subtotal(Price::from_dollars(100));
        assert_eq!(totals.shipping, FLAT_SHIPPING);
    }

    #[test]
    fn test_validate_reports_every_missing_field() {
        let form = CheckoutForm {
            email: "  ".into(),
            city: String::new(),
            ..form()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.to_string(), "please fill in all required fields");
        match err {
            CheckoutError::MissingRequiredFields(fields) => assert_eq!(fields, ["email", "city"]),
            other => panic!("expected missing fields, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submit_order_scenario() {
        let (store, mut cart) = filled_cart(&[(3_000, 2), (4_500, 1)]).await;
        let checkout = Checkout::with_clock(store.clone(), fixed_clock);

        let number = checkout.submit_order(&form(), &mut cart).await.unwrap();

        assert_eq!(number.as_str(), "LYN-00123456");
        assert!(cart.is_empty());
        assert!(store.cart_rows_snapshot().is_empty());

        let orders = store.orders();
        assert_eq!(orders.len(), 1);
        let order = &orders[0].order;
        assert_eq!(order.customer_name, "Ada Lovelace");
        assert_eq!(order.subtotal, Price::from_dollars(105));
        assert_eq!(order.shipping_cost, Price::ZERO);
        assert_eq!(order.tax, Price::from_cents(840));
        assert_eq!(order.total, Price::from_cents(11_340));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.shipping_address.country, DEFAULT_COUNTRY);

        let items = store.order_items();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|item| item.order_id == orders[0].id));
        assert_eq!(items[0].subtotal, Price::from_dollars(60));
        assert_eq!(items[0].product_name, "dress-0");
    }

    #[tokio::test]
    async fn test_missing_email_writes_nothing() {
        let (store, mut cart) = filled_cart(&[(2_000, 1)]).await;
        let writes_before = store.write_count();
        let checkout = Checkout::with_clock(store.clone(), fixed_clock);
        let form = CheckoutForm {
            email: String::new(),
            ..form()
        };

        let err = checkout.submit_order(&form, &mut cart).await.unwrap_err();

        assert!(matches!(err, CheckoutError::MissingRequiredFields(_)));
        assert_eq!(store.write_count(), writes_before);
        assert_eq!(cart.items().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let (store, mut cart) = filled_cart(&[]).await;
        let checkout = Checkout::with_clock(store.clone(), fixed_clock);

        let err = checkout.submit_order(&form(), &mut cart).await.unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_order_number_collision_retries() {
        let (store, mut cart) = filled_cart(&[(2_000, 1)]).await;
        let checkout = Checkout::with_clock(store.clone(), fixed_clock);

        let mut taken = NewOrder {
            order_number: OrderNumber::from_timestamp_millis(FIXED_MILLIS),
            customer_name: "Earlier Shopper".into(),
            customer_email: "earlier@example.com".into(),
            customer_phone: String::new(),
            shipping_address: form().shipping_address(),
            subtotal: Price::ZERO,
            tax: Price::ZERO,
            shipping_cost: Price::ZERO,
            total: Price::ZERO,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Paid,
        };
        store.insert_order(&taken).await.unwrap();
        taken.order_number = OrderNumber::from_timestamp_millis(FIXED_MILLIS + 1);
        store.insert_order(&taken).await.unwrap();

        let number = checkout.submit_order(&form(), &mut cart).await.unwrap();
        assert_eq!(number.as_str(), "LYN-00123458");
        assert_eq!(store.orders().len(), 3);
    }

    #[tokio::test]
    async fn test_order_failure_keeps_cart() {
        let (store, mut cart) = filled_cart(&[(2_000, 1)]).await;
        store.fail(StoreOperation::InsertOrder);
        let checkout = Checkout::with_clock(store.clone(), fixed_clock);

        let err = checkout.submit_order(&form(), &mut cart).await.unwrap_err();

        assert!(matches!(err, CheckoutError::Order(_)));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(store.cart_rows_snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_items_failure_rolls_back_order() {
        let (store, mut cart) = filled_cart(&[(2_000, 1)]).await;
        store.fail(StoreOperation::InsertOrderItems);
        let checkout = Checkout::with_clock(store.clone(), fixed_clock);

        let err = checkout.submit_order(&form(), &mut cart).await.unwrap_err();

        match err {
            CheckoutError::OrderItems { order_number, .. } => {
                assert_eq!(order_number.as_str(), "LYN-00123456");
            }
            other => panic!("expected order items error, got {other:?}"),
        }
        assert!(store.orders().is_empty());
        assert_eq!(cart.items().len(), 1);
    }

    #[tokio::test]
    async fn test_cart_clear_failure_still_succeeds() {
        let (store, mut cart) = filled_cart(&[(2_000, 1)]).await;
        store.fail(StoreOperation::DeleteSessionCart);
        let checkout = Checkout::with_clock(store.clone(), fixed_clock);

        let number = checkout.submit_order(&form(), &mut cart).await;

        assert!(number.is_ok());
        assert!(cart.is_empty());
        assert_eq!(store.orders().len(), 1);
    }
}
