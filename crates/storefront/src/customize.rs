//! Bespoke design requests.

use thiserror::Error;
use tracing::{info, instrument};

use lynora_core::{CustomizationId, CustomizationStatus, SessionId};

use crate::error::add_breadcrumb;
use crate::models::{FontStyle, NewCustomization, Placement};
use crate::store::{DataStore, StoreError};

/// Text color preselected in the designer.
pub const DEFAULT_TEXT_COLOR: &str = "#000000";

/// Errors from submitting a customization request.
#[derive(Debug, Error)]
pub enum CustomizationError {
    /// The text color is not a `#RRGGBB` hex color.
    #[error("invalid text color {0:?}, expected #RRGGBB")]
    InvalidColor(String),

    /// Neither custom text nor notes were given.
    #[error("add some custom text or notes describing your design")]
    EmptyRequest,

    /// The data service call failed.
    #[error("failed to submit customization: {0}")]
    Store(#[from] StoreError),
}

/// A design request as entered by the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomizationRequest {
    pub custom_text: String,
    pub font_style: FontStyle,
    pub text_color: String,
    pub placement: Placement,
    pub notes: String,
}

impl Default for CustomizationRequest {
    fn default() -> Self {
        Self {
            custom_text: String::new(),
            font_style: FontStyle::default(),
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            placement: Placement::default(),
            notes: String::new(),
        }
    }
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

impl CustomizationRequest {
    /// # Errors
    ///
    /// Returns `InvalidColor` or `EmptyRequest`.
    pub fn validate(&self) -> Result<(), CustomizationError> {
        if !is_hex_color(&self.text_color) {
            return Err(CustomizationError::InvalidColor(self.text_color.clone()));
        }
        if self.custom_text.trim().is_empty() && self.notes.trim().is_empty() {
            return Err(CustomizationError::EmptyRequest);
        }
        Ok(())
    }
}

/// Submits design requests for one session.
#[derive(Clone)]
pub struct Customizer<S> {
    store: S,
    session: SessionId,
}

impl<S: DataStore> Customizer<S> {
    #[must_use]
    pub const fn new(store: S, session: SessionId) -> Self {
        Self { store, session }
    }

    /// Validate and store a request with status `submitted`.
    ///
    /// # Errors
    ///
    /// Returns a validation variant without writing, or `Store` if the insert
    /// fails.
    #[instrument(skip_all, fields(session_id = %self.session, font = %request.font_style))]
    pub async fn submit(
        &self,
        request: &CustomizationRequest,
    ) -> Result<CustomizationId, CustomizationError> {
        request.validate()?;

        let row = NewCustomization {
            session_id: self.session.clone(),
            custom_text: request.custom_text.trim().to_string(),
            font_style: request.font_style,
            text_color: request.text_color.clone(),
            placement: request.placement,
            notes: request.notes.trim().to_string(),
            status: CustomizationStatus::Submitted,
        };

        let stored = self.store.insert_customization(&row).await.inspect_err(|e| {
            tracing::error!(error = %e, "Failed to submit customization");
        })?;

        info!(customization_id = %stored.id, "Customization submitted");
        add_breadcrumb("customize", "Submitted customization", None);
        Ok(stored.id)
    }
}
