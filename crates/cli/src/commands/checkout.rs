//! Checkout command.

use lynora_storefront::checkout::{CheckoutForm, OrderTotals};
use lynora_storefront::error::Result;
use lynora_storefront::state::AppState;

use crate::output;

/// Submit the session's cart as an order.
///
/// # Errors
///
/// Returns an error for blank required fields, an empty cart, or a data
/// service failure. The cart is kept on error.
pub async fn submit(state: &AppState, form: &CheckoutForm) -> Result<()> {
    let mut cart = state.cart();
    cart.load().await?;
    let totals = OrderTotals::for_subtotal(cart.cart_total());

    let order_number = state.checkout().submit_order(form, &mut cart).await?;

    output::totals(&totals);
    output::line(&format!(
        "\nThank you! Your order {order_number} has been placed."
    ));
    Ok(())
}
