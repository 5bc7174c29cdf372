//! Behaviour coverage for the paged notification inbox.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use client::domain::ports::{ApiError, AuthGateway, ListQuery, ListSource};
use client::domain::stores::{Notification, NotificationFilter, NotificationKind, NotificationStore};
use client::domain::{
    ListOutcome, LoginCredentials, PaginatedListCache, SessionStatus, SessionStore, SessionToken,
    SkipReason,
};
use pagination::PageSize;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// Sign-in double that always issues the same token.
struct StaticAuth;

#[async_trait]
impl AuthGateway for StaticAuth {
    async fn login(&self, _credentials: &LoginCredentials) -> Result<SessionToken, ApiError> {
        Ok(SessionToken::new("bdd-token").expect("token"))
    }
}

/// In-memory notification endpoint serving slices of `rows`.
#[derive(Default)]
struct InboxServer {
    rows: Mutex<Vec<Notification>>,
    expired: AtomicBool,
    requests: Mutex<Vec<u32>>,
}

#[async_trait]
impl ListSource<Notification, NotificationFilter> for InboxServer {
    async fn fetch_page(
        &self,
        query: ListQuery<'_, NotificationFilter>,
    ) -> Result<Vec<Notification>, ApiError> {
        self.requests.lock().expect("requests").push(query.page.page);
        if self.expired.load(Ordering::SeqCst) {
            return Err(ApiError::session_expired("token_invalid"));
        }
        let wanted = match query.filters {
            NotificationFilter::All => None,
            NotificationFilter::Notice => Some(NotificationKind::Notice),
            NotificationFilter::System => Some(NotificationKind::System),
        };
        let size = query.page.page_size.get() as usize;
        let start = query.page.page as usize * size;
        Ok(self
            .rows
            .lock()
            .expect("rows")
            .iter()
            .filter(|row| wanted.is_none_or(|kind| row.kind == kind))
            .skip(start)
            .take(size)
            .cloned()
            .collect())
    }
}

struct World {
    server: Arc<InboxServer>,
    session: SessionStore,
    inbox: NotificationStore,
    outcomes: Vec<ListOutcome>,
}

fn run_async<T>(future: impl Future<Output = T>) -> T {
    tokio::runtime::Runtime::new()
        .expect("runtime")
        .block_on(future)
}

fn notification(id: u64, kind: NotificationKind) -> Notification {
    Notification {
        id,
        kind,
        title: format!("Notification {id}"),
        content: String::new(),
        is_read: false,
        created_at: Utc.with_ymd_and_hms(2026, 5, 4, 12, 0, 0).unwrap(),
    }
}

fn seed(world: &World, rows: impl IntoIterator<Item = Notification>) {
    world.server.rows.lock().expect("rows").extend(rows);
}

#[fixture]
fn world() -> World {
    let server = Arc::new(InboxServer::default());
    let session = SessionStore::new(Arc::new(StaticAuth));
    let inbox: NotificationStore = PaginatedListCache::new(
        "notifications",
        server.clone(),
        session.gate(),
        PageSize::DEFAULT,
        NotificationFilter::All,
    );
    World {
        server,
        session,
        inbox,
        outcomes: Vec::new(),
    }
}

#[given("a signed-in user")]
fn a_signed_in_user(world: &mut World) {
    let credentials =
        LoginCredentials::try_from_parts("ada@example.com", "hunter2").expect("credentials");
    run_async(world.session.login(&credentials)).expect("login succeeds");
}

#[given("a signed-out user")]
fn a_signed_out_user(world: &mut World) {
    assert_eq!(world.session.status(), SessionStatus::SignedOut);
}

#[given("an inbox of 14 notice notifications")]
fn an_inbox_of_14_notice_notifications(world: &mut World) {
    seed(world, (1..=14).map(|id| notification(id, NotificationKind::Notice)));
}

#[given("an inbox of 3 notice and 2 system notifications")]
fn an_inbox_of_3_notice_and_2_system_notifications(world: &mut World) {
    seed(
        world,
        [
            notification(1, NotificationKind::Notice),
            notification(2, NotificationKind::System),
            notification(3, NotificationKind::Notice),
            notification(4, NotificationKind::System),
            notification(5, NotificationKind::Notice),
        ],
    );
}

#[given("the server reports an expired session")]
fn the_server_reports_an_expired_session(world: &mut World) {
    world.server.expired.store(true, Ordering::SeqCst);
}

#[when("the inbox is refreshed")]
fn the_inbox_is_refreshed(world: &mut World) {
    let outcome = run_async(world.inbox.refresh()).expect("refresh");
    world.outcomes.push(outcome);
}

#[when("the next page is requested")]
fn the_next_page_is_requested(world: &mut World) {
    let outcome = run_async(world.inbox.load_more()).expect("load more");
    world.outcomes.push(outcome);
}

#[when("the system tab is selected")]
fn the_system_tab_is_selected(world: &mut World) {
    let outcome = run_async(world.inbox.set_filters(NotificationFilter::System)).expect("filter");
    world.outcomes.push(outcome);
}

#[then("the inbox holds 14 notifications and no more pages")]
fn the_inbox_holds_14_notifications_and_no_more_pages(world: &mut World) {
    assert_eq!(world.outcomes, [ListOutcome::Applied, ListOutcome::Applied]);
    let snapshot = world.inbox.snapshot().expect("snapshot");
    assert_eq!(snapshot.collection.items().len(), 14);
    assert_eq!(snapshot.collection.page(), 1);
    assert!(!snapshot.collection.has_more());
    assert_eq!(world.inbox.unread_count().expect("unread"), 14);
}

#[then("the refresh is skipped for lack of a session")]
fn the_refresh_is_skipped_for_lack_of_a_session(world: &mut World) {
    assert_eq!(
        world.outcomes,
        [ListOutcome::Skipped(SkipReason::NoSession)]
    );
}

#[then("no page was requested")]
fn no_page_was_requested(world: &mut World) {
    assert!(world.server.requests.lock().expect("requests").is_empty());
}

#[then("the failure is hidden and the session is marked expired")]
fn the_failure_is_hidden_and_the_session_is_marked_expired(world: &mut World) {
    assert_eq!(world.outcomes, [ListOutcome::Suppressed]);
    assert_eq!(world.session.status(), SessionStatus::Expired);
    let snapshot = world.inbox.snapshot().expect("snapshot");
    assert_eq!(snapshot.collection.error(), None);
    assert!(!snapshot.collection.is_loading());
}

#[then("the inbox holds only the 2 system notifications")]
fn the_inbox_holds_only_the_2_system_notifications(world: &mut World) {
    let snapshot = world.inbox.snapshot().expect("snapshot");
    assert_eq!(snapshot.filters, NotificationFilter::System);
    let ids: Vec<u64> = snapshot.collection.items().iter().map(|row| row.id).collect();
    assert_eq!(ids, [2, 4]);
    assert_eq!(world.server.requests.lock().expect("requests").as_slice(), [0, 0]);
}

#[scenario(
    path = "tests/features/notification_inbox.feature",
    name = "Loading more appends the next page"
)]
fn loading_more_appends_the_next_page(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/notification_inbox.feature",
    name = "A signed-out user requests nothing"
)]
fn a_signed_out_user_requests_nothing(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/notification_inbox.feature",
    name = "Session expiry is hidden from the inbox"
)]
fn session_expiry_is_hidden_from_the_inbox(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/notification_inbox.feature",
    name = "Switching tabs discards the previous tab"
)]
fn switching_tabs_discards_the_previous_tab(world: World) {
    drop(world);
}
