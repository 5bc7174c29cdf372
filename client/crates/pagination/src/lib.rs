//! Paging primitives shared by the wallet client stores.
//!
//! The crate is transport agnostic. It owns the page request shape sent to
//! list endpoints, the `{ success, data }` response envelope, and the
//! [`PagedCollection`] state machine that tracks one remote paged list across
//! refresh and load-more cycles.
//!
//! Responses are matched to the collection state through a [`Ticket`]: each
//! refresh starts a new [`Generation`], and a ticket issued for an older
//! generation is discarded on arrival instead of being applied.
//!
//! # Examples
//! ```
//! use pagination::{Completion, PageSize, PagedCollection};
//!
//! let mut list = PagedCollection::new(PageSize::new(2).expect("non-zero page size"));
//! let ticket = list.begin_refresh();
//! list.complete(ticket, Completion::Loaded(vec!["a", "b"]));
//! assert!(list.has_more());
//!
//! let ticket = list.begin_load_more().expect("more pages are expected");
//! list.complete(ticket, Completion::Loaded(vec!["c"]));
//! assert_eq!(list.items(), ["a", "b", "c"]);
//! assert!(!list.has_more());
//! ```

mod collection;
mod envelope;
mod request;

pub use collection::{
    Completion, CompletionEffect, Generation, ListPhase, LoadMoreRefusal, PagedCollection,
    RequestKind, Ticket,
};
pub use envelope::{Envelope, EnvelopeError};
pub use request::{PageRequest, PageSize, PageSizeError};
