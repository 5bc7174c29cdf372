//! Session ownership and the gate every authenticated action passes through.
//!
//! [`SessionStore`] is the only writer of the session token. Domain stores get
//! a [`SessionGate`], which reads the token through a [`SessionHandle`] and
//! can flag the session as expired, but never replaces or clears it.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use tokio::sync::watch;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::AuthGateway;
use crate::domain::{Error, LoginCredentials};

/// Raised when the API hands out an empty token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("session token must not be empty")]
pub struct EmptyTokenError;

/// Opaque bearer token issued at sign-in.
///
/// The value is zeroed on drop and redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(Zeroizing<String>);

impl SessionToken {
    /// Wrap a raw token, rejecting blank values.
    pub fn new(raw: impl Into<String>) -> Result<Self, EmptyTokenError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(EmptyTokenError);
        }
        Ok(Self(Zeroizing::new(raw)))
    }

    /// Raw token for request bodies.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Session lifecycle observed by the navigation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No token is held.
    SignedOut,
    /// A token is held and has not been rejected.
    Active,
    /// The API rejected the token; the user must sign in again.
    Expired,
}

/// Classifies failures that mean the session is no longer valid.
pub trait SessionExpiry {
    /// Whether this failure is the structured "session expired" kind.
    fn is_session_expired(&self) -> bool;
}

impl SessionExpiry for Error {
    fn is_session_expired(&self) -> bool {
        Error::is_session_expired(self)
    }
}

/// Token held for one sign-in.
///
/// `epoch` increases on every sign-in and sign-out, so a lease taken before a
/// logout never matches the session that follows it, even when the server
/// reissues the same token value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLease {
    token: SessionToken,
    epoch: u64,
}

impl SessionLease {
    /// Token to send with the request.
    pub fn token(&self) -> &SessionToken {
        &self.token
    }
}

#[derive(Debug, Default)]
struct SessionSlot {
    token: Option<SessionToken>,
    epoch: u64,
}

#[derive(Debug)]
struct SessionShared {
    slot: RwLock<SessionSlot>,
    status: watch::Sender<SessionStatus>,
}

/// Read-only view of the session shared with domain stores.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    shared: Arc<SessionShared>,
}

impl SessionHandle {
    /// Token currently held, if any.
    pub fn current(&self) -> Option<SessionToken> {
        self.read_slot().token.clone()
    }

    /// Current token together with the sign-in it belongs to.
    pub fn lease(&self) -> Option<SessionLease> {
        let slot = self.read_slot();
        slot.token.clone().map(|token| SessionLease {
            token,
            epoch: slot.epoch,
        })
    }

    /// Whether `lease` still belongs to the current sign-in.
    pub fn is_current(&self, lease: &SessionLease) -> bool {
        let slot = self.read_slot();
        slot.epoch == lease.epoch && slot.token.is_some()
    }

    /// Current session status.
    pub fn status(&self) -> SessionStatus {
        *self.shared.status.borrow()
    }

    /// Flag the session `lease` was taken from as expired so the sign-in flow
    /// can take over.
    ///
    /// Leases from an earlier sign-in are ignored. The token itself is left
    /// for the session store to clear.
    pub fn report_expired(&self, lease: &SessionLease) {
        // The slot lock is held across the send so a concurrent sign-in
        // cannot land between the epoch check and the status flip.
        let slot = self.read_slot();
        if slot.epoch != lease.epoch {
            debug!("expiry from an earlier sign-in ignored");
            return;
        }
        let flipped = self.shared.status.send_if_modified(|status| {
            if *status == SessionStatus::Active {
                *status = SessionStatus::Expired;
                true
            } else {
                false
            }
        });
        drop(slot);
        if flipped {
            warn!("session rejected by the API; sign-in required");
        }
    }

    fn read_slot(&self) -> RwLockReadGuard<'_, SessionSlot> {
        self.shared
            .slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Outcome of a gated action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gated<T> {
    /// The action ran and succeeded.
    Completed(T),
    /// No token was held; the action was not invoked.
    NoSession,
    /// The action failed because the session expired; the failure was
    /// swallowed and the session flagged.
    Expired,
}

impl<T> Gated<T> {
    /// Completed value, if the action ran to success.
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::NoSession | Self::Expired => None,
        }
    }
}

/// Guard for authenticated actions.
///
/// # Examples
/// ```rust,ignore
/// let outcome = gate
///     .guard(|token| async move { source.fetch_profile(&token).await })
///     .await?;
/// if let Gated::Completed(profile) = outcome {
///     assert!(profile.level < 10);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SessionGate {
    handle: SessionHandle,
}

impl SessionGate {
    /// Build a gate reading from `handle`.
    pub fn new(handle: SessionHandle) -> Self {
        Self { handle }
    }

    /// Lease to use for a request, or `None` when signed out.
    ///
    /// Callers that must update their own state between the token check and
    /// the request use this together with [`SessionGate::report_expired`].
    pub fn lease(&self) -> Option<SessionLease> {
        self.handle.lease()
    }

    /// Whether `lease` still belongs to the current sign-in.
    pub fn is_current(&self, lease: &SessionLease) -> bool {
        self.handle.is_current(lease)
    }

    /// Flag the session `lease` was taken from as expired.
    pub fn report_expired(&self, lease: &SessionLease) {
        self.handle.report_expired(lease);
    }

    /// Run `action` with the current token.
    ///
    /// Without a token the action is not invoked. A session-expired failure
    /// is swallowed and flags the session only if no sign-in or sign-out
    /// happened meanwhile; every other failure is returned unchanged.
    pub async fn guard<T, E, A, Fut>(&self, action: A) -> Result<Gated<T>, E>
    where
        A: FnOnce(SessionToken) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: SessionExpiry,
    {
        let Some(lease) = self.lease() else {
            debug!("gated action skipped: no session");
            return Ok(Gated::NoSession);
        };
        match action(lease.token().clone()).await {
            Ok(value) => Ok(Gated::Completed(value)),
            Err(error) if error.is_session_expired() => {
                self.report_expired(&lease);
                Ok(Gated::Expired)
            }
            Err(error) => Err(error),
        }
    }
}

/// Authentication store; sole owner of the session token.
pub struct SessionStore {
    gateway: Arc<dyn AuthGateway>,
    shared: Arc<SessionShared>,
}

impl SessionStore {
    /// Create a signed-out store.
    pub fn new(gateway: Arc<dyn AuthGateway>) -> Self {
        let (status, _) = watch::channel(SessionStatus::SignedOut);
        Self {
            gateway,
            shared: Arc::new(SessionShared {
                slot: RwLock::new(SessionSlot::default()),
                status,
            }),
        }
    }

    /// Read-only handle for domain stores.
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Gate bound to this store's session.
    pub fn gate(&self) -> SessionGate {
        SessionGate::new(self.handle())
    }

    /// Subscribe to status changes, e.g. to redirect to sign-in on expiry.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.shared.status.subscribe()
    }

    /// Current session status.
    pub fn status(&self) -> SessionStatus {
        *self.shared.status.borrow()
    }

    /// Sign in and keep the issued token.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<(), Error> {
        let token = self.gateway.login(credentials).await.map_err(|error| {
            warn!(kind = error.kind(), %error, "sign-in failed");
            Error::from(error)
        })?;
        self.replace_token(Some(token), SessionStatus::Active);
        info!(account = credentials.account(), "signed in");
        Ok(())
    }

    /// Drop the token and return to the signed-out state.
    pub fn logout(&self) {
        self.replace_token(None, SessionStatus::SignedOut);
        info!("signed out");
    }

    fn replace_token(&self, token: Option<SessionToken>, status: SessionStatus) {
        let mut slot = self
            .shared
            .slot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        slot.token = token;
        slot.epoch = slot.epoch.wrapping_add(1);
        self.shared.status.send_replace(status);
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for the session store and gate.

    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{ApiError, MockAuthGateway};
    use rstest::{fixture, rstest};

    fn credentials() -> LoginCredentials {
        LoginCredentials::try_from_parts("ada@example.com", "hunter2").expect("valid credentials")
    }

    fn token(raw: &str) -> SessionToken {
        SessionToken::new(raw).expect("non-empty token")
    }

    fn store_with_login(result: Result<SessionToken, ApiError>) -> SessionStore {
        let mut gateway = MockAuthGateway::new();
        gateway.expect_login().times(1).return_once(move |_| result);
        SessionStore::new(Arc::new(gateway))
    }

    #[fixture]
    fn signed_in() -> SessionStore {
        let store = SessionStore::new(Arc::new(MockAuthGateway::new()));
        store.replace_token(Some(token("tok-1")), SessionStatus::Active);
        store
    }

    #[test]
    fn blank_tokens_are_rejected() {
        assert_eq!(SessionToken::new("  "), Err(EmptyTokenError));
    }

    #[test]
    fn token_debug_is_redacted() {
        assert_eq!(format!("{:?}", token("abc")), "SessionToken(<redacted>)");
    }

    #[tokio::test]
    async fn login_stores_token_and_activates_session() {
        let store = store_with_login(Ok(token("tok-1")));
        let mut status = store.subscribe();

        store.login(&credentials()).await.expect("login succeeds");

        assert_eq!(store.handle().current(), Some(token("tok-1")));
        assert!(status.has_changed().expect("sender alive"));
        assert_eq!(*status.borrow_and_update(), SessionStatus::Active);
    }

    #[tokio::test]
    async fn failed_login_keeps_session_signed_out() {
        let store = store_with_login(Err(ApiError::rejected("wrong password")));

        let error = store.login(&credentials()).await.expect_err("login fails");

        assert_eq!(error.code(), ErrorCode::Rejected);
        assert!(store.handle().current().is_none());
        assert_eq!(store.status(), SessionStatus::SignedOut);
    }

    #[rstest]
    fn logout_clears_token(signed_in: SessionStore) {
        let handle = signed_in.handle();
        signed_in.logout();
        assert!(handle.current().is_none());
        assert_eq!(signed_in.status(), SessionStatus::SignedOut);
    }

    #[tokio::test]
    async fn guard_without_token_never_invokes_action() {
        let store = SessionStore::new(Arc::new(MockAuthGateway::new()));
        let calls = AtomicUsize::new(0);

        let outcome = store
            .gate()
            .guard(|_token| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ApiError>(())
            })
            .await
            .expect("no-op is not an error");

        assert_eq!(outcome, Gated::NoSession);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.status(), SessionStatus::SignedOut);
    }

    #[rstest]
    #[tokio::test]
    async fn guard_passes_token_to_action(signed_in: SessionStore) {
        let outcome = signed_in
            .gate()
            .guard(|token| async move { Ok::<_, ApiError>(token.expose().to_owned()) })
            .await
            .expect("action succeeds");
        assert_eq!(outcome, Gated::Completed("tok-1".to_owned()));
    }

    #[rstest]
    #[tokio::test]
    async fn guard_swallows_session_expiry_and_flags_session(signed_in: SessionStore) {
        let outcome = signed_in
            .gate()
            .guard(|_token| async { Err::<(), _>(ApiError::session_expired("token_invalid")) })
            .await
            .expect("expiry is swallowed");

        assert_eq!(outcome, Gated::Expired);
        assert_eq!(signed_in.status(), SessionStatus::Expired);
        assert!(
            signed_in.handle().current().is_some(),
            "only the session store clears the token"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn guard_propagates_other_failures(signed_in: SessionStore) {
        let error = signed_in
            .gate()
            .guard(|_token| async { Err::<(), _>(ApiError::timeout("30s")) })
            .await
            .expect_err("timeouts propagate");
        assert_eq!(error, ApiError::timeout("30s"));
        assert_eq!(signed_in.status(), SessionStatus::Active);
    }

    #[rstest]
    fn expiry_is_not_reported_after_sign_out(signed_in: SessionStore) {
        let lease = signed_in.handle().lease().expect("lease");
        signed_in.logout();

        signed_in.handle().report_expired(&lease);

        assert_eq!(signed_in.status(), SessionStatus::SignedOut);
    }

    #[rstest]
    fn expiry_from_earlier_sign_in_leaves_new_session_active(signed_in: SessionStore) {
        let lease = signed_in.handle().lease().expect("lease");
        signed_in.logout();
        signed_in.replace_token(Some(token("tok-1")), SessionStatus::Active);

        assert!(!signed_in.handle().is_current(&lease));
        signed_in.handle().report_expired(&lease);

        assert_eq!(signed_in.status(), SessionStatus::Active);
    }

    #[rstest]
    #[tokio::test]
    async fn guard_ignores_expiry_that_outlives_its_session(signed_in: SessionStore) {
        let gate = signed_in.gate();
        let outcome = gate
            .guard(|_token| {
                signed_in.logout();
                signed_in.replace_token(Some(token("tok-2")), SessionStatus::Active);
                async { Err::<(), _>(ApiError::session_expired("token_invalid")) }
            })
            .await
            .expect("expiry is swallowed");

        assert_eq!(outcome, Gated::Expired);
        assert_eq!(signed_in.status(), SessionStatus::Active);
    }
}
