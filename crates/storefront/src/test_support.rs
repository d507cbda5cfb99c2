//! Fixtures shared by unit tests.

use lynora_core::{Price, ProductId};

use crate::models::Product;

/// A product named after its slug, sized S/M/L in Red/Black, with no flags set.
pub fn product(slug: &str, price_cents: i64, stock: u32) -> Product {
    Product {
        id: ProductId::generate(),
        name: slug.to_string(),
        slug: slug.to_string(),
        description: None,
        price: Price::from_cents(price_cents),
        stock,
        category_id: None,
        featured: false,
        new_arrival: false,
        best_seller: false,
        sizes: vec!["S".into(), "M".into(), "L".into()],
        colors: vec!["Red".into(), "Black".into()],
        images: Vec::new(),
        category: None,
        created_at: None,
        updated_at: None,
    }
}
