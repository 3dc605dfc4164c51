//! Page store: the single source of truth for the current page.
//!
//! [`PageStore`] is plain state with synchronous transitions. Every
//! [`PageStore::set_loading`] hands out a [`RequestTicket`]; completions must
//! present that ticket, and anything but the most recent one is dropped. A
//! reset also invalidates outstanding tickets, so a request that raced past its
//! abort can never write into a store that was cleared in the meantime.
//!
//! [`StoreHandle`] shares one store between the loader and its readers and
//! publishes every resulting [`LoadStatus`] on a `watch` channel.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::watch;

use crate::types::{LoadStatus, PageDocument};

/// Message stored when a failure carries no description of its own.
pub const FALLBACK_ERROR_MESSAGE: &str = "Error loading page data";

/// Identifies one started request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    page_id: String,
    generation: u64,
}

impl RequestTicket {
    /// Page id the request was started for.
    #[must_use]
    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    /// Store generation the request was started in.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// Current page, its id, and loading/error status.
#[derive(Debug, Default)]
pub struct PageStore {
    document: Option<Arc<PageDocument>>,
    page_id: Option<String>,
    is_loading: bool,
    error: Option<String>,
    generation: u64,
}

impl PageStore {
    /// Create an idle store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading `page_id`.
    ///
    /// Clears the error and the current document; the previous page is not kept
    /// visible while the new one loads.
    pub fn set_loading(&mut self, page_id: impl Into<String>) -> RequestTicket {
        self.generation = self.generation.wrapping_add(1);
        let page_id = page_id.into();
        self.page_id = Some(page_id.clone());
        self.is_loading = true;
        self.error = None;
        self.document = None;

        RequestTicket {
            page_id,
            generation: self.generation,
        }
    }

    /// Whether `ticket` belongs to the request the store is waiting on.
    #[must_use]
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.is_loading
            && self.generation == ticket.generation
            && self.page_id.as_deref() == Some(ticket.page_id.as_str())
    }

    /// Store a successfully loaded page.
    ///
    /// Returns `false` and leaves the store untouched if `ticket` was superseded.
    pub fn set_loaded(&mut self, ticket: &RequestTicket, document: PageDocument) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.document = Some(Arc::new(document));
        self.is_loading = false;
        self.error = None;
        true
    }

    /// Record a failed load.
    ///
    /// Returns `false` and leaves the store untouched if `ticket` was superseded.
    pub fn set_failed(&mut self, ticket: &RequestTicket, message: impl Into<String>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        let message = message.into();
        self.error = Some(if message.is_empty() {
            FALLBACK_ERROR_MESSAGE.to_string()
        } else {
            message
        });
        self.document = None;
        self.is_loading = false;
        true
    }

    /// Stop waiting on a request that will never complete.
    ///
    /// Clears the loading flag and keeps the requested page id, with neither a
    /// document nor an error. Returns `false` and leaves the store untouched if
    /// `ticket` was superseded.
    pub fn abandon(&mut self, ticket: &RequestTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.generation = self.generation.wrapping_add(1);
        self.is_loading = false;
        true
    }

    /// Return to the initial state, invalidating any outstanding ticket.
    pub fn reset(&mut self) {
        *self = Self {
            generation: self.generation.wrapping_add(1),
            ..Self::default()
        };
    }

    /// Currently loaded page.
    #[must_use]
    pub fn document(&self) -> Option<&PageDocument> {
        self.document.as_deref()
    }

    /// Shared handle to the currently loaded page.
    #[must_use]
    pub fn shared_document(&self) -> Option<Arc<PageDocument>> {
        self.document.clone()
    }

    /// Page id most recently requested.
    #[must_use]
    pub fn page_id(&self) -> Option<&str> {
        self.page_id.as_deref()
    }

    /// Whether a request is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Message of the last failed load.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current state as a [`LoadStatus`].
    #[must_use]
    pub fn status(&self) -> LoadStatus {
        let Some(page_id) = self.page_id.clone() else {
            return LoadStatus::Idle;
        };
        if self.is_loading {
            return LoadStatus::Loading(page_id);
        }
        match (&self.document, &self.error) {
            (Some(doc), _) => LoadStatus::Loaded(page_id, Arc::clone(doc)),
            (None, Some(message)) => LoadStatus::Failed(page_id, message.clone()),
            (None, None) => LoadStatus::Idle,
        }
    }
}

struct Shared {
    state: RwLock<PageStore>,
    status: watch::Sender<LoadStatus>,
}

/// Cloneable handle to one [`PageStore`].
///
/// Mutations go through [`StoreHandle::update`], which publishes the resulting
/// status to subscribers when it changed.
#[derive(Clone)]
pub struct StoreHandle {
    inner: Arc<Shared>,
}

impl StoreHandle {
    /// Create a handle around a fresh, idle store.
    #[must_use]
    pub fn new() -> Self {
        let (status, _) = watch::channel(LoadStatus::Idle);
        Self {
            inner: Arc::new(Shared {
                state: RwLock::new(PageStore::new()),
                status,
            }),
        }
    }

    /// Read the store.
    pub fn read<R>(&self, f: impl FnOnce(&PageStore) -> R) -> R {
        let guard = self
            .inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&*guard)
    }

    /// Mutate the store and publish the new status if it changed.
    pub fn update<R>(&self, f: impl FnOnce(&mut PageStore) -> R) -> R {
        let mut guard = self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let result = f(&mut *guard);
        let next = guard.status();
        self.inner.status.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
        result
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> LoadStatus {
        self.read(PageStore::status)
    }

    /// Receive every status change from now on.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadStatus> {
        self.inner.status.subscribe()
    }
}

impl Default for StoreHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle")
            .field("status", &self.status())
            .finish()
    }
}
