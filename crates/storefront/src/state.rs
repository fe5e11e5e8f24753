//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::services::carts::CartStore;
use crate::services::stylist::{GeminiClient, StylingAssistant, StylistError};

/// Application state shared across all handlers.
///
/// Cloning is an `Arc` bump. Nothing in here is mutated after startup
/// except the cart store and the assistant's transcript cache, which lock
/// internally.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    carts: CartStore,
    assistant: StylingAssistant,
}

impl AppState {
    /// Create a new application state with the Rise catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the styling assistant client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StylistError> {
        Self::with_catalog(config, Catalog::rise())
    }

    /// Create a new application state with an explicit catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the styling assistant client cannot be built.
    pub fn with_catalog(config: StorefrontConfig, catalog: Catalog) -> Result<Self, StylistError> {
        if !config.gemini.is_enabled() {
            tracing::warn!("GEMINI_API_KEY not set; styling assistant disabled");
        }
        let assistant = StylingAssistant::new(GeminiClient::from_config(&config.gemini)?);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                carts: CartStore::new(),
                assistant,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product and editorial catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the visitors' carts.
    #[must_use]
    pub fn carts(&self) -> &CartStore {
        &self.inner.carts
    }

    /// Get a reference to the styling assistant.
    #[must_use]
    pub fn assistant(&self) -> &StylingAssistant {
        &self.inner.assistant
    }
}
