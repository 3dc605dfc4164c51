//! Scoped ownership of a [`CmsClient`].
//!
//! A UI tree mounts one client at its root and hands the provider down;
//! components call [`CmsProvider::client`] to reach it. Outside the
//! mount/unmount window that call fails with [`Error::UsedOutsideProvider`].

use std::sync::{Arc, PoisonError, RwLock};

use crate::source::{HttpPageSource, PageSource};
use crate::{CmsClient, CmsConfig, Error, Result};

/// Holds the mounted client, if any.
pub struct CmsProvider<S = HttpPageSource> {
    client: RwLock<Option<Arc<CmsClient<S>>>>,
}

impl CmsProvider<HttpPageSource> {
    /// Mount an HTTP client for `config` and return the provider.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] if the HTTP client cannot be built.
    pub fn mounted(config: CmsConfig) -> Result<Self> {
        let provider = Self::new();
        provider.mount(CmsClient::new(config)?);
        Ok(provider)
    }
}

impl<S: PageSource> CmsProvider<S> {
    /// Create a provider with nothing mounted.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            client: RwLock::new(None),
        }
    }

    /// Mount `client`, cleaning up whichever client was mounted before.
    pub fn mount(&self, client: CmsClient<S>) -> Arc<CmsClient<S>> {
        let client = Arc::new(client);
        let previous = self
            .client
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(Arc::clone(&client));
        if let Some(previous) = previous {
            tracing::debug!("replacing mounted cms client");
            previous.clean_up();
        }
        client
    }

    /// Tear down: abort any in-flight request, clear state, and unmount.
    pub fn unmount(&self) {
        let previous = self
            .client
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(previous) = previous {
            previous.clean_up();
        }
    }

    /// Whether a client is mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The mounted client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UsedOutsideProvider`] when nothing is mounted.
    pub fn client(&self) -> Result<Arc<CmsClient<S>>> {
        self.client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(Error::UsedOutsideProvider)
    }
}

impl<S: PageSource> Default for CmsProvider<S> {
    fn default() -> Self {
        Self::new()
    }
}
