//! Catalog types: products, their images, and categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lynora_core::{CategoryId, Price, ProductId, ProductImageId};

/// A product category (e.g. "Evening Dresses").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// An image attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: ProductImageId,
    pub product_id: ProductId,
    pub image_url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    /// Presentation position; lower values come first.
    #[serde(default)]
    pub display_order: i32,
}

/// A dress in the catalog, with its images and (optionally) its category.
///
/// Field names match the `products` collection, with the embedded
/// `product_images` and `categories` relations renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    pub stock: u32,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub new_arrival: bool,
    #[serde(default)]
    pub best_seller: bool,
    /// Declared size labels, in display order.
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Declared color labels, in display order.
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default, rename = "product_images")]
    pub images: Vec<ProductImage>,
    #[serde(default, rename = "categories", skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Returns `true` if at least one unit is available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Images in presentation order. Equal `display_order` values keep their
    /// stored order.
    #[must_use]
    pub fn ordered_images(&self) -> Vec<&ProductImage> {
        let mut images: Vec<&ProductImage> = self.images.iter().collect();
        images.sort_by_key(|image| image.display_order);
        images
    }

    /// The first image in presentation order, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images.iter().min_by_key(|image| image.display_order)
    }

    /// The size preselected on the product page: the first declared size.
    #[must_use]
    pub fn default_size(&self) -> Option<&str> {
        self.sizes.first().map(String::as_str)
    }

    /// The color preselected on the product page: the first declared color.
    #[must_use]
    pub fn default_color(&self) -> Option<&str> {
        self.colors.first().map(String::as_str)
    }

    /// Returns `true` if `size` is one of the declared sizes.
    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }

    /// Returns `true` if `color` is one of the declared colors.
    #[must_use]
    pub fn offers_color(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c == color)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PRODUCT_JSON: &str = r#"{
        "id": "0d7f3c1e-5a0b-4a53-8f2e-8b9f1f3a6c01",
        "name": "Crimson Evening Gown",
        "slug": "crimson-evening-gown",
        "description": "Floor-length satin gown",
        "price": 189.99,
        "stock": 4,
        "category_id": null,
        "featured": true,
        "new_arrival": false,
        "best_seller": true,
        "sizes": ["S", "M", "L"],
        "colors": ["Red", "Black"],
        "created_at": "2024-05-01T10:00:00+00:00",
        "updated_at": "2024-05-01T10:00:00+00:00",
        "product_images": [
            {
                "id": "3e0e8a45-0d8e-4f0e-9d0a-1c7c2c9b7a11",
                "product_id": "0d7f3c1e-5a0b-4a53-8f2e-8b9f1f3a6c01",
                "image_url": "/images/back.jpg",
                "alt_text": "Back",
                "display_order": 2,
                "created_at": "2024-05-01T10:00:00+00:00"
            },
            {
                "id": "9a3c51f2-8c1b-4c6f-a1f4-6d2b7e5e0f22",
                "product_id": "0d7f3c1e-5a0b-4a53-8f2e-8b9f1f3a6c01",
                "image_url": "/images/front.jpg",
                "alt_text": "Front",
                "display_order": 1,
                "created_at": "2024-05-01T10:00:00+00:00"
            }
        ],
        "categories": null
    }"#;

    #[test]
    fn test_deserialize_product_row() {
        let product: Product = serde_json::from_str(PRODUCT_JSON).unwrap();
        assert_eq!(product.slug, "crimson-evening-gown");
        assert_eq!(product.price, Price::from_cents(18_999));
        assert_eq!(product.images.len(), 2);
        assert!(product.category.is_none());
    }

    #[test]
    fn test_ordered_images() {
        let product: Product = serde_json::from_str(PRODUCT_JSON).unwrap();
        let urls: Vec<&str> = product
            .ordered_images()
            .iter()
            .map(|image| image.image_url.as_str())
            .collect();
        assert_eq!(urls, ["/images/front.jpg", "/images/back.jpg"]);
        assert_eq!(product.primary_image().unwrap().image_url, "/images/front.jpg");
    }

    #[test]
    fn test_variant_helpers() {
        let product: Product = serde_json::from_str(PRODUCT_JSON).unwrap();
        assert_eq!(product.default_size(), Some("S"));
        assert_eq!(product.default_color(), Some("Red"));
        assert!(product.offers_size("M"));
        assert!(!product.offers_size("XXL"));
        assert!(product.offers_color("Black"));
        assert!(product.in_stock());
    }
}
