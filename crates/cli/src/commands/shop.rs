//! Catalog browsing commands.

use std::collections::HashSet;

use rust_decimal::Decimal;

use lynora_core::Price;
use lynora_storefront::catalog::{COLOR_OPTIONS, FilterConfig, PriceRange, SIZE_OPTIONS, SortMode};
use lynora_storefront::error::{AppError, Result};
use lynora_storefront::state::AppState;

use crate::output;

/// Shop filters as given on the command line.
pub struct ShopFilter {
    /// Category slugs.
    pub categories: Vec<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
    pub sort: SortMode,
}

fn check_option(kind: &str, value: &str, known: &[&str]) -> Result<()> {
    if known.contains(&value) {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "unknown {kind} {value:?}, expected one of: {}",
            known.join(", ")
        )))
    }
}

/// List products matching the filters.
///
/// # Errors
///
/// Returns an error for unknown filter values or if the catalog cannot be
/// loaded.
pub async fn browse(state: &AppState, filter: ShopFilter) -> Result<()> {
    let catalog = state.catalog();

    for size in &filter.sizes {
        check_option("size", size, &SIZE_OPTIONS)?;
    }
    for color in &filter.colors {
        check_option("color", color, &COLOR_OPTIONS)?;
    }

    let mut categories = HashSet::new();
    if !filter.categories.is_empty() {
        let known = catalog.categories().await?;
        for slug in &filter.categories {
            let category = known
                .iter()
                .find(|c| &c.slug == slug)
                .ok_or_else(|| AppError::NotFound(format!("Category {slug}")))?;
            categories.insert(category.id);
        }
    }

    let defaults = PriceRange::default();
    let price = PriceRange {
        min: filter.min.map_or(defaults.min, Price::new),
        max: filter.max.map_or(defaults.max, Price::new),
    };
    if price.min > price.max {
        return Err(AppError::InvalidInput(
            "minimum price is above maximum price".to_string(),
        ));
    }

    let config = FilterConfig {
        categories,
        price,
        sizes: filter.sizes.into_iter().collect(),
        colors: filter.colors.into_iter().collect(),
        sort: filter.sort,
    };

    let products = catalog.browse(&config).await?;
    if products.is_empty() {
        output::line("No dresses match these filters");
        return Ok(());
    }
    for product in &products {
        output::product_row(product);
    }
    output::line(&format!("\n{} dress(es), sorted by {}", products.len(), config.sort));
    Ok(())
}

/// Show one product with related products.
///
/// # Errors
///
/// Returns `NotFound` for unknown slugs, or a data service error.
pub async fn product(state: &AppState, slug: &str) -> Result<()> {
    let (product, related) = state.catalog().product_page(slug).await?;
    output::product_detail(&product, &related);
    Ok(())
}
