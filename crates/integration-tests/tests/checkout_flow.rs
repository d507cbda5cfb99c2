//! Order pricing, validation and failure handling.

#![allow(clippy::unwrap_used)]

use lynora_core::{OrderStatus, PaymentStatus, Price};
use lynora_integration_tests::fixtures::{dress, session, shipping_form};
use lynora_storefront::cart::CartStore;
use lynora_storefront::checkout::{Checkout, CheckoutError, CheckoutForm};
use lynora_storefront::models::Product;
use lynora_storefront::store::{MemoryStore, StoreOperation};

const CLOCK_MILLIS: i64 = 1_718_000_987_654;

fn clock() -> i64 {
    CLOCK_MILLIS
}

async fn cart_of(lines: &[(Product, u32)]) -> (MemoryStore, CartStore<MemoryStore>) {
    let store = MemoryStore::with_catalog(
        lines.iter().map(|(p, _)| p.clone()).collect(),
        Vec::new(),
    );
    let mut cart = CartStore::new(store.clone(), session(10));
    for (product, quantity) in lines {
        cart.add_to_cart(product, *quantity, "M", "Black")
            .await
            .unwrap();
    }
    (store, cart)
}

#[tokio::test]
async fn test_free_shipping_order() {
    let (store, mut cart) = cart_of(&[
        (dress("Sheath", 3_000, 5, &["M"], &["Black"]), 2),
        (dress("Shift", 4_500, 5, &["M"], &["Black"]), 1),
    ])
    .await;

    let number = Checkout::with_clock(store.clone(), clock)
        .submit_order(&shipping_form(), &mut cart)
        .await
        .unwrap();

    assert_eq!(number.as_str(), "LYN-00987654");
    let order = &store.orders()[0].order;
    assert_eq!(order.subtotal, Price::from_dollars(105));
    assert_eq!(order.shipping_cost, Price::ZERO);
    assert_eq!(order.tax, Price::from_cents(840));
    assert_eq!(order.total, Price::from_cents(11_340));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert_eq!(order.customer_name, "Grace Hopper");
    assert_eq!(order.shipping_address.zip_code, "22201");
}

#[tokio::test]
async fn test_flat_shipping_order() {
    let (store, mut cart) = cart_of(&[(dress("Tee Dress", 2_000, 5, &["M"], &["Black"]), 1)]).await;

    Checkout::with_clock(store.clone(), clock)
        .submit_order(&shipping_form(), &mut cart)
        .await
        .unwrap();

    let order = &store.orders()[0].order;
    assert_eq!(order.shipping_cost, Price::from_dollars(10));
    assert_eq!(order.tax, Price::from_cents(160));
    assert_eq!(order.total, Price::from_cents(3_160));
}

#[tokio::test]
async fn test_order_items_denormalize_product() {
    let mut wrap = dress("Wrap", 5_500, 5, &["M"], &["Black"]);
    let (store, mut cart) = cart_of(&[(wrap.clone(), 3)]).await;

    Checkout::with_clock(store.clone(), clock)
        .submit_order(&shipping_form(), &mut cart)
        .await
        .unwrap();

    // Later catalog edits do not touch the stored order
    wrap.name = "Wrap (renamed)".to_string();
    wrap.price = Price::from_dollars(99);
    store.upsert_product(wrap);

    let items = store.order_items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product_name, "Wrap");
    assert_eq!(items[0].price, Price::from_cents(5_500));
    assert_eq!(items[0].quantity, 3);
    assert_eq!(items[0].subtotal, Price::from_cents(16_500));
    assert_eq!((items[0].size.as_str(), items[0].color.as_str()), ("M", "Black"));
}

#[tokio::test]
async fn test_blank_fields_block_submission() {
    let (store, mut cart) = cart_of(&[(dress("Tee Dress", 2_000, 5, &["M"], &["Black"]), 1)]).await;
    let writes = store.write_count();

    let form = CheckoutForm {
        email: String::new(),
        zip_code: "   ".to_string(),
        ..shipping_form()
    };
    let err = Checkout::with_clock(store.clone(), clock)
        .submit_order(&form, &mut cart)
        .await
        .unwrap_err();

    match err {
        CheckoutError::MissingRequiredFields(fields) => assert_eq!(fields, ["email", "zip code"]),
        other => panic!("expected missing fields, got {other:?}"),
    }
    assert_eq!(store.write_count(), writes);
    assert_eq!(cart.items().len(), 1);
}

#[tokio::test]
async fn test_phone_is_optional() {
    let (store, mut cart) = cart_of(&[(dress("Tee Dress", 2_000, 5, &["M"], &["Black"]), 1)]).await;
    let form = CheckoutForm {
        phone: String::new(),
        ..shipping_form()
    };

    assert!(
        Checkout::with_clock(store, clock)
            .submit_order(&form, &mut cart)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_failed_items_write_keeps_cart_and_rolls_back() {
    let (store, mut cart) = cart_of(&[(dress("Tee Dress", 2_000, 5, &["M"], &["Black"]), 1)]).await;
    store.fail(StoreOperation::InsertOrderItems);

    let err = Checkout::with_clock(store.clone(), clock)
        .submit_order(&shipping_form(), &mut cart)
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::OrderItems { .. }));
    assert!(store.orders().is_empty());
    assert_eq!(store.cart_rows_snapshot().len(), 1);

    // The shopper can retry once the service recovers
    store.recover(StoreOperation::InsertOrderItems);
    Checkout::with_clock(store.clone(), clock)
        .submit_order(&shipping_form(), &mut cart)
        .await
        .unwrap();
    assert_eq!(store.orders().len(), 1);
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_order_numbers_exhausted() {
    let (store, mut cart) = cart_of(&[(dress("Tee Dress", 2_000, 5, &["M"], &["Black"]), 1)]).await;
    let checkout = Checkout::with_clock(store.clone(), clock);

    // Five earlier orders placed within the same clock reading
    let filler = dress("Filler", 1_000, 5, &["M"], &["Black"]);
    store.upsert_product(filler.clone());
    let mut other_cart = CartStore::new(store.clone(), session(11));
    for _ in 0..5 {
        other_cart.add_to_cart(&filler, 1, "M", "Black").await.unwrap();
        checkout
            .submit_order(&shipping_form(), &mut other_cart)
            .await
            .unwrap();
    }
    assert_eq!(store.orders().len(), 5);

    let err = checkout
        .submit_order(&shipping_form(), &mut cart)
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::OrderNumberExhausted(5)));
    assert_eq!(cart.items().len(), 1);
}
