//! Row types exchanged with the hosted data service.
//!
//! The data service is the system of record for every type here; the
//! storefront only reads products/categories and writes cart, order and
//! customization rows.

pub mod cart;
pub mod catalog;
pub mod customization;
pub mod order;

pub use cart::{CartItem, CartRow, NewCartRow};
pub use catalog::{Category, Product, ProductImage};
pub use customization::{Customization, FontStyle, NewCustomization, Placement};
pub use order::{DEFAULT_COUNTRY, NewOrder, NewOrderItem, Order, ShippingAddress};
