//! Shop-page filtering and sorting.
//!
//! [`apply_filters`] is a pure function of the product list and a
//! [`FilterConfig`]: it never mutates its input and is idempotent.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use lynora_core::{CategoryId, Price};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::models::Product;

/// Sizes offered as filter checkboxes.
pub const SIZE_OPTIONS: [&str; 6] = ["XS", "S", "M", "L", "XL", "XXL"];

/// Colors offered as filter checkboxes.
pub const COLOR_OPTIONS: [&str; 7] = ["Black", "White", "Red", "Blue", "Pink", "Beige", "Navy"];

/// Shop sort order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Featured products first.
    #[default]
    Featured,
    /// New arrivals first.
    New,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
    /// Alphabetical by name.
    Name,
}

impl SortMode {
    /// Every mode, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Featured,
        Self::New,
        Self::PriceLow,
        Self::PriceHigh,
        Self::Name,
    ];

    /// Parse from a URL/CLI value. Unknown values fall back to `Featured`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "new" => Self::New,
            "price-low" => Self::PriceLow,
            "price-high" => Self::PriceHigh,
            "name" => Self::Name,
            _ => Self::Featured,
        }
    }

    /// Convert to URL/CLI value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::New => "new",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Name => "name",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Price,
    pub max: Price,
}

impl PriceRange {
    /// Returns `true` if `price` lies within the bounds, inclusive.
    #[must_use]
    pub fn contains(&self, price: Price) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: Price::ZERO,
            max: Price::from_dollars(300),
        }
    }
}

/// Active shop filters. Empty sets mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    pub categories: HashSet<CategoryId>,
    pub price: PriceRange,
    pub sizes: HashSet<String>,
    pub colors: HashSet<String>,
    pub sort: SortMode,
}

impl FilterConfig {
    /// Restore every filter to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` if any filter other than sort is active.
    #[must_use]
    pub fn is_filtering(&self) -> bool {
        !self.categories.is_empty()
            || self.price != PriceRange::default()
            || !self.sizes.is_empty()
            || !self.colors.is_empty()
    }

    fn matches(&self, product: &Product) -> bool {
        if !self.categories.is_empty() {
            match product.category_id {
                Some(id) if self.categories.contains(&id) => {}
                _ => return false,
            }
        }
        if !self.price.contains(product.price) {
            return false;
        }
        if !self.sizes.is_empty() && !product.sizes.iter().any(|s| self.sizes.contains(s)) {
            return false;
        }
        if !self.colors.is_empty() && !product.colors.iter().any(|c| self.colors.contains(c)) {
            return false;
        }
        true
    }
}

/// Base letters only: decomposed, accents stripped, lowercased.
fn fold_name(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Collation-style comparison in three levels: base letters, then accents,
/// then case with lowercase first.
fn compare_names(a: &str, b: &str) -> Ordering {
    fold_name(a)
        .cmp(&fold_name(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

/// Filter and sort `products` according to `config`.
#[must_use]
pub fn apply_filters(products: &[Product], config: &FilterConfig) -> Vec<Product> {
    let mut visible: Vec<Product> = products
        .iter()
        .filter(|product| config.matches(product))
        .cloned()
        .collect();

    // sort_by is stable, so equal keys keep catalog order
    match config.sort {
        SortMode::Featured => visible.sort_by(|a, b| b.featured.cmp(&a.featured)),
        SortMode::New => visible.sort_by(|a, b| b.new_arrival.cmp(&a.new_arrival)),
        SortMode::PriceLow => visible.sort_by(|a, b| a.price.cmp(&b.price)),
        SortMode::PriceHigh => visible.sort_by(|a, b| b.price.cmp(&a.price)),
        SortMode::Name => visible.sort_by(|a, b| compare_names(&a.name, &b.name)),
    }

    visible
}
