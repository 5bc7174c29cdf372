//! Paged collection state machine.
//!
//! A [`PagedCollection`] holds the items of one remote list plus the flags a
//! screen renders from. Callers drive it in two steps: `begin_*` marks a
//! request as in flight and hands out a [`Ticket`]; `complete` applies the
//! response for that ticket. Keeping the two halves separate lets the owner
//! release its lock while the request is awaited.
//!
//! ```text
//! Idle ──refresh──▶ Loading ──▶ Ready ──load more──▶ LoadingMore ──▶ Ready
//!                      │                                  │
//!                      └────────────▶ Error ◀─────────────┘
//!                                       │
//!                                       └──refresh──▶ Loading
//! ```

use thiserror::Error;

use crate::PageSize;

/// Monotonic counter distinguishing one refresh cycle from the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    /// Raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Which half of the lifecycle a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Page zero of a new generation.
    Refresh,
    /// Continuation page appended to the current generation.
    LoadMore,
}

/// Receipt for one in-flight page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: Generation,
    page: u32,
    kind: RequestKind,
}

impl Ticket {
    /// Generation the request was issued under.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Page index to request.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Whether this is a refresh or a continuation.
    #[must_use]
    pub const fn kind(&self) -> RequestKind {
        self.kind
    }
}

/// Response for a ticket, already classified by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<T> {
    /// The page was fetched.
    Loaded(Vec<T>),
    /// The request failed with a user-visible message.
    Failed(String),
    /// The request failed silently; only loading flags are reset.
    Suppressed,
}

/// Effect of [`PagedCollection::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionEffect {
    /// The response mutated the collection.
    Applied,
    /// The ticket belonged to an older generation and was dropped.
    Stale,
}

/// Reasons [`PagedCollection::begin_load_more`] declines to issue a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoadMoreRefusal {
    /// A continuation request is already in flight.
    #[error("a load-more request is already in flight")]
    InFlight,
    /// The last page was short; nothing further to fetch.
    #[error("no more pages to load")]
    Exhausted,
    /// Page zero of the current generation has not arrived yet.
    #[error("a refresh is still in flight")]
    RefreshPending,
    /// The collection is in the error state; only a refresh recovers it.
    #[error("the list needs a refresh after a failure")]
    NeedsRefresh,
}

/// Lifecycle phase derived from the collection flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    /// Nothing has been requested since creation or the last clear.
    Idle,
    /// A refresh is in flight.
    Loading,
    /// Items reflect the latest completed request.
    Ready,
    /// A continuation page is in flight.
    LoadingMore,
    /// The latest request failed.
    Error,
}

/// In-memory state of one remote paged list.
///
/// ## Invariants
/// - `items` only grows within a generation and is emptied when a new
///   generation starts.
/// - `page` only increases within a generation and resets to zero on refresh.
/// - A ticket from an older generation never mutates the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedCollection<T> {
    items: Vec<T>,
    page: u32,
    page_size: PageSize,
    has_more: bool,
    is_loading: bool,
    is_loading_more: bool,
    error: Option<String>,
    generation: Generation,
    started: bool,
}

impl<T> PagedCollection<T> {
    /// Empty collection that has not requested anything yet.
    #[must_use]
    pub const fn new(page_size: PageSize) -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            page_size,
            has_more: true,
            is_loading: false,
            is_loading_more: false,
            error: None,
            generation: Generation(0),
            started: false,
        }
    }

    /// Loaded items in server order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Index of the last applied page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Whether another page may exist.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// Whether a refresh is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Whether a continuation page is in flight.
    #[must_use]
    pub const fn is_loading_more(&self) -> bool {
        self.is_loading_more
    }

    /// Message of the latest failure, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current generation.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Lifecycle phase derived from the flags.
    #[must_use]
    pub const fn phase(&self) -> ListPhase {
        if self.is_loading {
            ListPhase::Loading
        } else if self.is_loading_more {
            ListPhase::LoadingMore
        } else if self.error.is_some() {
            ListPhase::Error
        } else if self.started {
            ListPhase::Ready
        } else {
            ListPhase::Idle
        }
    }

    /// Start a new generation and return the ticket for its first page.
    ///
    /// Any ticket issued before this call becomes stale.
    pub fn begin_refresh(&mut self) -> Ticket {
        self.generation = self.generation.next();
        self.items.clear();
        self.page = 0;
        self.has_more = true;
        self.is_loading = true;
        self.is_loading_more = false;
        self.error = None;
        self.started = true;
        Ticket {
            generation: self.generation,
            page: 0,
            kind: RequestKind::Refresh,
        }
    }

    /// Reserve the next page of the current generation.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadMoreRefusal`] when a continuation is already in
    /// flight, the list is exhausted, page zero is still pending, or the
    /// list is in the error state.
    pub fn begin_load_more(&mut self) -> Result<Ticket, LoadMoreRefusal> {
        if self.is_loading_more {
            return Err(LoadMoreRefusal::InFlight);
        }
        if !self.has_more {
            return Err(LoadMoreRefusal::Exhausted);
        }
        if self.is_loading || !self.started {
            return Err(LoadMoreRefusal::RefreshPending);
        }
        if self.error.is_some() {
            return Err(LoadMoreRefusal::NeedsRefresh);
        }
        self.is_loading_more = true;
        Ok(Ticket {
            generation: self.generation,
            page: self.page.saturating_add(1),
            kind: RequestKind::LoadMore,
        })
    }

    /// Apply the response for `ticket`.
    ///
    /// Responses for tickets of an older generation are dropped untouched.
    pub fn complete(&mut self, ticket: Ticket, completion: Completion<T>) -> CompletionEffect {
        if ticket.generation != self.generation {
            return CompletionEffect::Stale;
        }
        match ticket.kind {
            RequestKind::Refresh => self.complete_refresh(completion),
            RequestKind::LoadMore => self.complete_load_more(ticket.page, completion),
        }
        CompletionEffect::Applied
    }

    /// Drop every item and return to the idle state.
    ///
    /// Starts a fresh generation so in-flight responses are discarded.
    pub fn clear(&mut self) {
        let generation = self.generation.next();
        *self = Self::new(self.page_size);
        self.generation = generation;
    }

    fn complete_refresh(&mut self, completion: Completion<T>) {
        self.is_loading = false;
        match completion {
            Completion::Loaded(items) => {
                self.has_more = self.page_size.is_full_page(items.len());
                self.items = items;
            }
            Completion::Failed(message) => self.error = Some(message),
            Completion::Suppressed => {}
        }
    }

    fn complete_load_more(&mut self, page: u32, completion: Completion<T>) {
        self.is_loading_more = false;
        match completion {
            Completion::Loaded(items) if items.is_empty() => self.has_more = false,
            Completion::Loaded(items) => {
                self.has_more = self.page_size.is_full_page(items.len());
                self.items.extend(items);
                self.page = page;
            }
            Completion::Failed(message) => self.error = Some(message),
            Completion::Suppressed => {}
        }
    }
}

impl<T> Default for PagedCollection<T> {
    fn default() -> Self {
        Self::new(PageSize::DEFAULT)
    }
}
