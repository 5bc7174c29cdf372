//! Async cache for one remote paged list.
//!
//! The cache pairs a [`PagedCollection`] with the filters it was loaded for
//! and drives it through a [`ListSource`]. The state lock is only held while
//! issuing or applying a ticket, never across the request itself, so a
//! refresh can start while a load-more is still awaiting its page. When that
//! happens the refresh opens a new generation and the late load-more
//! response is discarded.

use std::sync::{Arc, Mutex, MutexGuard};

use pagination::{
    Completion, CompletionEffect, LoadMoreRefusal, PageRequest, PageSize, PagedCollection, Ticket,
};
use tracing::{debug, warn};

use crate::domain::ports::{ApiError, ListQuery, ListSource};
use crate::domain::session::SessionExpiry;
use crate::domain::{Error, SessionGate, SessionLease};

/// Why a call returned without issuing a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No session token is held.
    NoSession,
    /// A load-more request is already in flight.
    LoadMoreInFlight,
    /// The last page was short.
    Exhausted,
    /// The first page of the current generation has not arrived.
    RefreshPending,
    /// The list failed and must be refreshed first.
    NeedsRefresh,
    /// The requested filters are already active.
    FilterUnchanged,
}

impl From<LoadMoreRefusal> for SkipReason {
    fn from(value: LoadMoreRefusal) -> Self {
        match value {
            LoadMoreRefusal::InFlight => Self::LoadMoreInFlight,
            LoadMoreRefusal::Exhausted => Self::Exhausted,
            LoadMoreRefusal::RefreshPending => Self::RefreshPending,
            LoadMoreRefusal::NeedsRefresh => Self::NeedsRefresh,
        }
    }
}

/// Result of a refresh, load-more, or filter switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOutcome {
    /// Nothing was requested.
    Skipped(SkipReason),
    /// The page was applied.
    Applied,
    /// The response arrived after a newer generation started and was dropped.
    Stale,
    /// The request failed; the message is in the list's `error`.
    Failed,
    /// The session expired; the failure was hidden and the session flagged.
    Suppressed,
}

/// Point-in-time copy of a list for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot<T, F> {
    /// Collection state.
    pub collection: PagedCollection<T>,
    /// Filters the collection was loaded for.
    pub filters: F,
}

struct CacheState<T, F> {
    collection: PagedCollection<T>,
    filters: F,
}

/// Cache for one paged collection and its active filters.
///
/// Only one filter value is retained: switching filters discards the items
/// loaded for the previous value.
pub struct PaginatedListCache<T, F> {
    name: &'static str,
    source: Arc<dyn ListSource<T, F>>,
    gate: SessionGate,
    state: Mutex<CacheState<T, F>>,
}

impl<T, F> PaginatedListCache<T, F>
where
    T: Clone + Send + 'static,
    F: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create an idle cache.
    ///
    /// `name` labels log events, e.g. `"notifications"`.
    pub fn new(
        name: &'static str,
        source: Arc<dyn ListSource<T, F>>,
        gate: SessionGate,
        page_size: PageSize,
        filters: F,
    ) -> Self {
        Self {
            name,
            source,
            gate,
            state: Mutex::new(CacheState {
                collection: PagedCollection::new(page_size),
                filters,
            }),
        }
    }

    /// Label used in log events.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Reload page zero for the active filters, discarding loaded items.
    pub async fn refresh(&self) -> Result<ListOutcome, Error> {
        let Some(lease) = self.gate.lease() else {
            debug!(list = self.name, "refresh skipped: no session");
            return Ok(ListOutcome::Skipped(SkipReason::NoSession));
        };
        let (ticket, request, filters) = {
            let mut state = self.lock()?;
            let ticket = state.collection.begin_refresh();
            (ticket, page_request(&state.collection, ticket), state.filters.clone())
        };
        self.fetch(ticket, request, &lease, &filters).await
    }

    /// Fetch and append the next page.
    ///
    /// Skipped while another load-more is in flight, after the last page, or
    /// before the first page of the current generation has been applied.
    pub async fn load_more(&self) -> Result<ListOutcome, Error> {
        let Some(lease) = self.gate.lease() else {
            debug!(list = self.name, "load more skipped: no session");
            return Ok(ListOutcome::Skipped(SkipReason::NoSession));
        };
        let (ticket, request, filters) = {
            let mut state = self.lock()?;
            match state.collection.begin_load_more() {
                Ok(ticket) => {
                    let request = page_request(&state.collection, ticket);
                    (ticket, request, state.filters.clone())
                }
                Err(refusal) => {
                    debug!(list = self.name, %refusal, "load more skipped");
                    return Ok(ListOutcome::Skipped(refusal.into()));
                }
            }
        };
        self.fetch(ticket, request, &lease, &filters).await
    }

    /// Switch to `filters` and refresh.
    ///
    /// The previous filter's items are dropped immediately. Selecting the
    /// active filters again does nothing.
    pub async fn set_filters(&self, filters: F) -> Result<ListOutcome, Error> {
        let Some(lease) = self.gate.lease() else {
            debug!(list = self.name, "filter switch skipped: no session");
            return Ok(ListOutcome::Skipped(SkipReason::NoSession));
        };
        let (ticket, request) = {
            let mut state = self.lock()?;
            if state.filters == filters {
                return Ok(ListOutcome::Skipped(SkipReason::FilterUnchanged));
            }
            state.filters = filters.clone();
            let ticket = state.collection.begin_refresh();
            (ticket, page_request(&state.collection, ticket))
        };
        debug!(list = self.name, "filters changed; cached items discarded");
        self.fetch(ticket, request, &lease, &filters).await
    }

    /// Active filters.
    pub fn filters(&self) -> Result<F, Error> {
        Ok(self.lock()?.filters.clone())
    }

    /// Copy of the current state for rendering.
    pub fn snapshot(&self) -> Result<ListSnapshot<T, F>, Error> {
        let state = self.lock()?;
        Ok(ListSnapshot {
            collection: state.collection.clone(),
            filters: state.filters.clone(),
        })
    }

    /// Drop all items and return to idle; in-flight responses become stale.
    pub fn clear(&self) -> Result<(), Error> {
        self.lock()?.collection.clear();
        Ok(())
    }

    async fn fetch(
        &self,
        ticket: Ticket,
        page: PageRequest,
        lease: &SessionLease,
        filters: &F,
    ) -> Result<ListOutcome, Error> {
        debug!(
            list = self.name,
            generation = ticket.generation().get(),
            page = page.page,
            "requesting page"
        );
        let result = self
            .source
            .fetch_page(ListQuery {
                token: lease.token(),
                page,
                filters,
            })
            .await;
        self.apply(ticket, lease, result)
    }

    /// Settle `ticket`. Nothing outside the collection changes unless the
    /// ticket is still current, so a stale expiry never flags a newer session.
    fn apply(
        &self,
        ticket: Ticket,
        lease: &SessionLease,
        result: Result<Vec<T>, ApiError>,
    ) -> Result<ListOutcome, Error> {
        let (completion, outcome) = match result {
            Ok(items) => (Completion::Loaded(items), ListOutcome::Applied),
            Err(error) if error.is_session_expired() => {
                (Completion::Suppressed, ListOutcome::Suppressed)
            }
            Err(error) => {
                warn!(
                    list = self.name,
                    page = ticket.page(),
                    kind = error.kind(),
                    %error,
                    "page request failed"
                );
                (Completion::Failed(error.to_string()), ListOutcome::Failed)
            }
        };
        let effect = self.lock()?.collection.complete(ticket, completion);
        match effect {
            CompletionEffect::Applied => {
                if outcome == ListOutcome::Suppressed {
                    self.gate.report_expired(lease);
                }
                Ok(outcome)
            }
            CompletionEffect::Stale => {
                debug!(
                    list = self.name,
                    generation = ticket.generation().get(),
                    page = ticket.page(),
                    "discarded stale page response"
                );
                Ok(ListOutcome::Stale)
            }
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, CacheState<T, F>>, Error> {
        self.state
            .lock()
            .map_err(|_| Error::internal(format!("{} list state poisoned", self.name)))
    }
}

fn page_request<T>(collection: &PagedCollection<T>, ticket: Ticket) -> PageRequest {
    PageRequest {
        page: ticket.page(),
        page_size: collection.page_size(),
    }
}

#[cfg(test)]
#[path = "paged_list_tests.rs"]
mod tests;
