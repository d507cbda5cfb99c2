//! Unified error handling with Sentry integration.
//!
//! Every storefront flow has its own error enum; [`AppError`] wraps them for
//! front ends (the CLI) that need one type. [`AppError::report`] captures
//! service failures to Sentry and logs them before they are shown.

use thiserror::Error;

use lynora_core::SessionId;

use crate::cart::CartError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::customize::CustomizationError;
use crate::session::StorageError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Client-side storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The data service failed.
    #[error("Data service error: {0}")]
    Store(#[from] StoreError),

    /// A cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Order submission failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Customization request failed.
    #[error("Customization error: {0}")]
    Customization(#[from] CustomizationError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input from the shopper.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    /// Returns `true` for failures on our side (as opposed to shopper input).
    #[must_use]
    pub fn is_service_failure(&self) -> bool {
        match self {
            Self::Store(StoreError::NotFound(_)) => false,
            Self::Config(_) | Self::Storage(_) | Self::Store(_) => true,
            Self::Cart(err) => matches!(err, CartError::Store(_)),
            Self::Checkout(err) => err.is_service_failure(),
            Self::Customization(err) => matches!(err, CustomizationError::Store(_)),
            Self::NotFound(_) | Self::InvalidInput(_) => false,
        }
    }

    /// Message safe to show a shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(_) => "The storefront is not configured correctly".to_string(),
            Self::Store(StoreError::NotFound(what)) | Self::NotFound(what) => {
                format!("{what} not found")
            }
            Self::Storage(_) | Self::Store(_) => {
                "Something went wrong talking to the store, please try again".to_string()
            }
            Self::Cart(CartError::Store(_)) => "Could not update your cart, please try again".to_string(),
            Self::Cart(err) => err.to_string(),
            Self::Checkout(CheckoutError::OrderItems { order_number, .. }) => format!(
                "Your order {order_number} could not be completed, please contact support"
            ),
            Self::Checkout(err) if err.is_service_failure() => {
                "Could not place your order, please try again".to_string()
            }
            Self::Checkout(err) => err.to_string(),
            Self::Customization(CustomizationError::Store(_)) => {
                "Could not submit your design, please try again".to_string()
            }
            Self::Customization(err) => err.to_string(),
            Self::InvalidInput(msg) => msg.clone(),
        }
    }

    /// Capture service failures to Sentry and log them. Shopper errors are
    /// only logged at debug level.
    pub fn report(&self) {
        if self.is_service_failure() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::debug!(error = %self, "Rejected request");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Tag Sentry events with the shopper's anonymous session.
pub fn set_sentry_session(session: &SessionId) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(session.to_string()),
            ..Default::default()
        }));
    });
}

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item to cart", Some(&[("product", "midi-wrap")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartValidationError;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Product midi-wrap".to_string());
        assert_eq!(err.to_string(), "Not found: Product midi-wrap");
        assert_eq!(err.user_message(), "Product midi-wrap not found");

        let err = AppError::InvalidInput("quantity must be a number".to_string());
        assert_eq!(err.user_message(), "quantity must be a number");
    }

    #[test]
    fn test_service_failures_hide_details() {
        let err = AppError::from(StoreError::Api {
            status: 500,
            message: "relation \"orders\" does not exist".to_string(),
        });
        assert!(err.is_service_failure());
        assert!(!err.user_message().contains("relation"));

        let err = AppError::from(CartError::Store(StoreError::RateLimited(3)));
        assert!(err.is_service_failure());
        assert_eq!(err.user_message(), "Could not update your cart, please try again");
    }

    #[test]
    fn test_shopper_errors_are_not_service_failures() {
        let err = AppError::from(CartError::Validation(CartValidationError::MissingSize));
        assert!(!err.is_service_failure());
        assert_eq!(err.user_message(), "please select a size");

        let err = AppError::from(CheckoutError::EmptyCart);
        assert!(!err.is_service_failure());

        let err = AppError::from(StoreError::NotFound("product midi-wrap".to_string()));
        assert!(!err.is_service_failure());
        assert_eq!(err.user_message(), "product midi-wrap not found");
    }
}
