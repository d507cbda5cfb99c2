//! `PostgREST` query building.
//!
//! Collections and embedded-relation selects used by the storefront, plus
//! the two filter shapes it relies on (`eq.` and `in.(...)`).

/// Remote collection names.
pub mod tables {
    pub const PRODUCTS: &str = "products";
    pub const CATEGORIES: &str = "categories";
    pub const CART_ITEMS: &str = "cart_items";
    pub const ORDERS: &str = "orders";
    pub const ORDER_ITEMS: &str = "order_items";
    pub const CUSTOMIZATIONS: &str = "customizations";
}

/// Products with their images and category embedded.
pub const PRODUCT_WITH_RELATIONS: &str = "*,product_images(*),categories(*)";

/// Products with images only, used when hydrating a cart.
pub const PRODUCT_WITH_IMAGES: &str = "*,product_images(*)";

/// Columns read back for cart rows.
pub const CART_ROW_COLUMNS: &str = "id,session_id,product_id,quantity,size,color,created_at";

/// A single `PostgREST` query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub key: String,
    pub value: String,
}

impl Param {
    /// `select=<columns>`
    #[must_use]
    pub fn select(columns: &str) -> Self {
        Self {
            key: "select".to_string(),
            value: columns.to_string(),
        }
    }

    /// `<column>=eq.<value>`
    #[must_use]
    pub fn eq(column: &str, value: impl std::fmt::Display) -> Self {
        Self {
            key: column.to_string(),
            value: format!("eq.{value}"),
        }
    }

    /// `<column>=in.(<v1>,<v2>,...)`
    ///
    /// Values are double-quoted so commas or parentheses inside them cannot
    /// break the list.
    #[must_use]
    pub fn in_list<T: std::fmt::Display>(column: &str, values: &[T]) -> Self {
        let list = values
            .iter()
            .map(|v| format!("\"{}\"", v.to_string().replace('"', "\\\"")))
            .collect::<Vec<_>>()
            .join(",");
        Self {
            key: column.to_string(),
            value: format!("in.({list})"),
        }
    }
}
