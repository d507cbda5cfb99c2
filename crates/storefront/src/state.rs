//! Application state shared by front ends.

use std::sync::Arc;

use lynora_core::SessionId;

use crate::cart::CartStore;
use crate::catalog::CatalogService;
use crate::checkout::Checkout;
use crate::config::StorefrontConfig;
use crate::customize::Customizer;
use crate::error::{Result, set_sentry_session};
use crate::session::{FileStorage, get_or_create_session_id};
use crate::supabase::SupabaseClient;

/// Application state for one shopper.
///
/// This struct is cheaply cloneable via `Arc` and hands out the storefront
/// services, all bound to the same data service client and session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    client: SupabaseClient,
    session: SessionId,
}

impl AppState {
    /// Create the state, resolving the session from the configured file.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self> {
        let storage = FileStorage::new(&config.session_file);
        let session = get_or_create_session_id(&storage);
        Self::with_session(config, session)
    }

    /// Create the state for an already-resolved session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_session(config: StorefrontConfig, session: SessionId) -> Result<Self> {
        let client = SupabaseClient::new(&config.supabase)?;
        set_sentry_session(&session);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                client,
                session,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the data service client.
    #[must_use]
    pub fn client(&self) -> &SupabaseClient {
        &self.inner.client
    }

    /// The shopper's session.
    #[must_use]
    pub fn session(&self) -> &SessionId {
        &self.inner.session
    }

    /// An empty cart for this session; call `load` before use.
    #[must_use]
    pub fn cart(&self) -> CartStore<SupabaseClient> {
        CartStore::new(self.inner.client.clone(), self.inner.session.clone())
    }

    #[must_use]
    pub fn catalog(&self) -> CatalogService<SupabaseClient> {
        CatalogService::new(self.inner.client.clone())
    }

    #[must_use]
    pub fn checkout(&self) -> Checkout<SupabaseClient> {
        Checkout::new(self.inner.client.clone())
    }

    #[must_use]
    pub fn customizer(&self) -> Customizer<SupabaseClient> {
        Customizer::new(self.inner.client.clone(), self.inner.session.clone())
    }
}
