//! Customization request command.

use lynora_storefront::customize::CustomizationRequest;
use lynora_storefront::error::Result;
use lynora_storefront::state::AppState;

use crate::output;

/// # Errors
///
/// Returns an error for an invalid request or a data service failure.
pub async fn submit(state: &AppState, request: &CustomizationRequest) -> Result<()> {
    let id = state.customizer().submit(request).await?;
    output::line(&format!(
        "Customization submitted ({id}). We will contact you soon."
    ));
    Ok(())
}
