//! Cart commands. Each loads the session's cart from the data service first.

use lynora_core::CartItemId;
use lynora_storefront::cart::CartStore;
use lynora_storefront::error::Result;
use lynora_storefront::state::AppState;
use lynora_storefront::store::DataStore;
use lynora_storefront::supabase::SupabaseClient;

use crate::output;

async fn loaded_cart(state: &AppState) -> Result<CartStore<SupabaseClient>> {
    let mut cart = state.cart();
    cart.load().await?;
    Ok(cart)
}

/// # Errors
///
/// Returns an error if the cart cannot be loaded.
pub async fn show(state: &AppState) -> Result<()> {
    let cart = loaded_cart(state).await?;
    output::cart(&cart);
    Ok(())
}

/// Add `quantity` of a product. Missing size/color default to the product's
/// first declared choice.
///
/// # Errors
///
/// Returns an error if the product is unknown, the line is invalid, or the
/// data service fails.
pub async fn add(
    state: &AppState,
    slug: &str,
    quantity: u32,
    size: Option<&str>,
    color: Option<&str>,
) -> Result<()> {
    let product = state.catalog().product(slug).await?;
    let mut cart = loaded_cart(state).await?;

    let size = size.or_else(|| product.default_size()).unwrap_or_default();
    let color = color.or_else(|| product.default_color()).unwrap_or_default();
    cart.add_to_cart(&product, quantity, size, color).await?;

    output::line(&format!("Added {} x{quantity} to your cart", product.name));
    output::cart(&cart);
    Ok(())
}

/// # Errors
///
/// See [`add`].
pub async fn quick_add(state: &AppState, slug: &str) -> Result<()> {
    let product = state.catalog().product(slug).await?;
    let mut cart = loaded_cart(state).await?;
    cart.quick_add(&product).await?;

    output::line(&format!("Added {} to your cart", product.name));
    output::cart(&cart);
    Ok(())
}

/// # Errors
///
/// Returns an error if the line is unknown, the quantity exceeds stock, or
/// the data service fails.
pub async fn update(state: &AppState, item: CartItemId, quantity: i64) -> Result<()> {
    let mut cart = loaded_cart(state).await?;
    cart.update_quantity(item, quantity).await?;
    output::cart(&cart);
    Ok(())
}

/// Removing a line that is already gone is a no-op.
///
/// # Errors
///
/// Returns an error if the data service fails.
pub async fn remove(state: &AppState, item: CartItemId) -> Result<()> {
    let mut cart = loaded_cart(state).await?;
    remove_line(&mut cart, item).await
}

async fn remove_line<S: DataStore>(cart: &mut CartStore<S>, item: CartItemId) -> Result<()> {
    cart.remove_from_cart(item).await?;
    output::cart(cart);
    Ok(())
}

/// # Errors
///
/// Returns an error if the data service fails.
pub async fn clear(state: &AppState) -> Result<()> {
    let mut cart = loaded_cart(state).await?;
    cart.clear_cart().await?;
    output::line("Cart cleared");
    Ok(())
}
