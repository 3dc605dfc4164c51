//! Request lifecycle for page loads.
//!
//! A [`PageLoader`] keeps at most one request outstanding. Loading the page that
//! is already in flight is a no-op; loading any other page aborts the current
//! request first. Aborted requests end silently, and a completion whose ticket
//! the store no longer recognises is dropped without a state change.
//!
//! ```text
//! Idle --load(id)--> Loading(id)
//! Loading(id) --ok, current--> Loaded(id)
//! Loading(id) --err, current--> Failed(id)
//! Loading(id) --stale or aborted--> (unchanged)
//! Loading(id) --load future dropped--> Idle
//! Loaded | Failed --load(any)--> Loading(any)
//! any --reset()--> Idle
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{AbortHandle, AbortRegistration, Abortable, Aborted};
use tracing::{debug, warn};

use crate::source::{HttpPageSource, PageSource};
use crate::store::{PageStore, RequestTicket, StoreHandle};
use crate::{Error, PageDocument, Result};

struct InFlight {
    ticket: RequestTicket,
    abort: AbortHandle,
}

/// Fetches pages into a [`StoreHandle`], one request at a time.
pub struct PageLoader<S = HttpPageSource> {
    source: Arc<S>,
    store: StoreHandle,
    in_flight: Mutex<Option<InFlight>>,
}

impl<S: PageSource> PageLoader<S> {
    /// Create a loader that feeds `store` from `source`.
    pub fn new(source: S, store: StoreHandle) -> Self {
        Self {
            source: Arc::new(source),
            store,
            in_flight: Mutex::new(None),
        }
    }

    /// Store this loader writes into.
    #[must_use]
    pub const fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// Source pages are fetched from.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Load the page with the given id into the store.
    ///
    /// Fetch failures never come back as `Err`; they are recorded as the
    /// store's `Failed` state. The future resolves once this request has
    /// completed, been superseded, or been cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPageId`] if `page_id` is empty. The store is not
    /// touched in that case.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self, page_id: &str) -> Result<()> {
        if page_id.is_empty() {
            return Err(Error::InvalidPageId("page id must not be empty".to_string()));
        }

        let Some((ticket, registration)) = self.begin(page_id) else {
            return Ok(());
        };
        let mut slot = SlotGuard {
            in_flight: &self.in_flight,
            store: &self.store,
            ticket: ticket.clone(),
            completed: false,
        };

        let outcome = Abortable::new(self.source.fetch_page(page_id), registration).await;
        self.complete(&ticket, outcome);
        slot.completed = true;
        Ok(())
    }

    /// Abort any in-flight request and reset the store to idle.
    pub fn reset(&self) {
        if let Some(active) = lock(&self.in_flight).take() {
            debug!(page_id = active.ticket.page_id(), "aborting in-flight request");
            active.abort.abort();
        }
        self.store.update(PageStore::reset);
    }

    /// Same as [`PageLoader::reset`].
    pub fn cancel(&self) {
        self.reset();
    }

    /// Whether a request is currently registered.
    #[must_use]
    pub fn has_in_flight(&self) -> bool {
        lock(&self.in_flight).is_some()
    }

    fn begin(&self, page_id: &str) -> Option<(RequestTicket, AbortRegistration)> {
        let mut in_flight = lock(&self.in_flight);

        if let Some(active) = in_flight.as_ref() {
            if active.ticket.page_id() == page_id
                && self.store.read(|store| store.is_current(&active.ticket))
            {
                debug!(page_id, "request already in flight");
                return None;
            }
            debug!(
                superseded = active.ticket.page_id(),
                page_id, "aborting superseded request"
            );
            active.abort.abort();
        }

        let (abort, registration) = AbortHandle::new_pair();
        let ticket = self.store.update(|store| store.set_loading(page_id));
        debug!(page_id, generation = ticket.generation(), "request started");
        *in_flight = Some(InFlight {
            ticket: ticket.clone(),
            abort,
        });

        Some((ticket, registration))
    }

    fn complete(
        &self,
        ticket: &RequestTicket,
        outcome: std::result::Result<Result<PageDocument>, Aborted>,
    ) {
        let page_id = ticket.page_id();
        match outcome {
            Err(Aborted) => {
                debug!(page_id, "request cancelled");
            },
            Ok(Ok(document)) => {
                if !self.store.update(|store| store.set_loaded(ticket, document)) {
                    debug!(page_id, "discarding stale page");
                }
            },
            Ok(Err(err)) => {
                let message = err.to_string();
                if self.store.update(|store| store.set_failed(ticket, message)) {
                    warn!(page_id, category = err.category(), "failed to load page: {err}");
                } else {
                    debug!(page_id, "discarding stale failure: {err}");
                }
            },
        }
    }
}

impl<S> std::fmt::Debug for PageLoader<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageLoader")
            .field("store", &self.store)
            .field("in_flight", &lock(&self.in_flight).as_ref().map(|a| &a.ticket))
            .finish_non_exhaustive()
    }
}

/// Frees the loader's request slot when its `load` call ends.
///
/// If the caller drops the future before the request completed, the store
/// stops reporting it as loading.
struct SlotGuard<'a> {
    in_flight: &'a Mutex<Option<InFlight>>,
    store: &'a StoreHandle,
    ticket: RequestTicket,
    completed: bool,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        let mut in_flight = lock(self.in_flight);
        if !in_flight
            .as_ref()
            .is_some_and(|active| active.ticket == self.ticket)
        {
            return;
        }
        *in_flight = None;

        if !self.completed && self.store.update(|store| store.abandon(&self.ticket)) {
            debug!(page_id = self.ticket.page_id(), "load dropped before completion");
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
