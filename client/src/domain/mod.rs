//! Domain primitives, ports, and stores.
//!
//! Purpose: hold the client state that survives between screens. Stores read
//! the session through [`SessionGate`], fetch through the driven ports in
//! [`ports`], and never touch HTTP directly.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — user-facing failure with a stable code.
//! - SessionStore / SessionGate — token ownership and gated execution.
//! - PaginatedListCache — paged list with staleness protection.
//! - AppStores (alias to `stores::AppStores`) — every store bound to one session.

pub mod auth;
pub mod error;
pub mod paged_list;
pub mod ports;
pub mod rate;
pub mod session;
pub mod stores;

pub use self::auth::{AccountKind, LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError, Presentation};
pub use self::paged_list::{ListOutcome, ListSnapshot, PaginatedListCache, SkipReason};
pub use self::rate::{Bonuses, RateQuote};
pub use self::session::{
    EmptyTokenError, Gated, SessionGate, SessionHandle, SessionLease, SessionStatus, SessionStore,
    SessionToken,
};
pub use self::stores::{AppPorts, AppStores, RefreshReport};

/// Convenient store result alias.
///
/// # Examples
/// ```
/// use client::domain::{DomainResult, Error};
///
/// fn pick_card(selected: Option<&str>) -> DomainResult<&str> {
///     selected.ok_or_else(|| Error::invalid_request("select a card first"))
/// }
///
/// assert!(pick_card(None).is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
