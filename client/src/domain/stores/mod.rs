//! Application stores and their wiring.
//!
//! [`AppStores`] owns one instance of every store, all sharing the session
//! owned by [`SessionStore`]. Signing out clears every cached list and the
//! calculator so nothing from the previous account leaks into the next one.

pub mod calculator;
pub mod notifications;
pub mod rebates;
pub mod recharge_logs;
pub mod wallet;

use std::sync::Arc;

use pagination::PageSize;
use tracing::{info, warn};

pub use calculator::{CalculatorStore, CardRate};
pub use notifications::{
    Notification, NotificationFilter, NotificationKind, NotificationStore,
};
pub use rebates::{RebateEntry, RebateFilter, RebateStatus, RebateStore};
pub use recharge_logs::{
    RechargeLog, RechargeLogFilter, RechargeLogStore, RechargeStatus, UtilityType,
};
pub use wallet::{
    TransactionFilter, TransactionKind, TransactionStatus, WalletStore, WalletTransaction,
};

use crate::domain::ports::{AuthGateway, ListSource, VipProfileSource};
use crate::domain::{Error, ListOutcome, LoginCredentials, PaginatedListCache, SessionStore};

/// Driven adapters required to build [`AppStores`].
#[derive(Clone)]
pub struct AppPorts {
    /// Sign-in endpoint.
    pub auth: Arc<dyn AuthGateway>,
    /// VIP profile endpoint.
    pub vip: Arc<dyn VipProfileSource>,
    /// Wallet transaction pages.
    pub wallet: Arc<dyn ListSource<WalletTransaction, TransactionFilter>>,
    /// Notification pages.
    pub notifications: Arc<dyn ListSource<Notification, NotificationFilter>>,
    /// Rebate pages.
    pub rebates: Arc<dyn ListSource<RebateEntry, RebateFilter>>,
    /// Recharge log pages.
    pub recharge_logs: Arc<dyn ListSource<RechargeLog, RechargeLogFilter>>,
}

/// Outcome of refreshing every list after sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    /// One entry per list, in declaration order.
    pub lists: Vec<(&'static str, ListOutcome)>,
}

/// Every store of the app, bound to one session.
pub struct AppStores {
    session: SessionStore,
    wallet: WalletStore,
    notifications: NotificationStore,
    rebates: RebateStore,
    recharge_logs: RechargeLogStore,
    calculator: CalculatorStore,
}

impl AppStores {
    /// Wire the stores to `ports`, loading `page_size` rows per request.
    pub fn new(ports: AppPorts, page_size: PageSize) -> Self {
        let session = SessionStore::new(ports.auth);
        let gate = session.gate();
        Self {
            wallet: PaginatedListCache::new(
                "wallet",
                ports.wallet,
                gate.clone(),
                page_size,
                TransactionFilter::default(),
            ),
            notifications: PaginatedListCache::new(
                "notifications",
                ports.notifications,
                gate.clone(),
                page_size,
                NotificationFilter::default(),
            ),
            rebates: PaginatedListCache::new(
                "rebates",
                ports.rebates,
                gate.clone(),
                page_size,
                RebateFilter::default(),
            ),
            recharge_logs: PaginatedListCache::new(
                "recharge_logs",
                ports.recharge_logs,
                gate.clone(),
                page_size,
                RechargeLogFilter::default(),
            ),
            calculator: CalculatorStore::new(gate, ports.vip),
            session,
        }
    }

    /// Session owner.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Wallet history.
    pub fn wallet(&self) -> &WalletStore {
        &self.wallet
    }

    /// Notification inbox.
    pub fn notifications(&self) -> &NotificationStore {
        &self.notifications
    }

    /// Rebate ledger.
    pub fn rebates(&self) -> &RebateStore {
        &self.rebates
    }

    /// Recharge history.
    pub fn recharge_logs(&self) -> &RechargeLogStore {
        &self.recharge_logs
    }

    /// Trade calculator.
    pub fn calculator(&self) -> &CalculatorStore {
        &self.calculator
    }

    /// Sign in, discarding anything cached for a previous account.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<(), Error> {
        self.clear_all()?;
        self.session.login(credentials).await
    }

    /// Refresh every list concurrently.
    ///
    /// A failing list records its error in its own state; the report only
    /// fails when a store lock is poisoned.
    pub async fn refresh_all(&self) -> Result<RefreshReport, Error> {
        let (wallet, notifications, rebates, recharge_logs) = tokio::join!(
            self.wallet.refresh(),
            self.notifications.refresh(),
            self.rebates.refresh(),
            self.recharge_logs.refresh(),
        );
        let lists = vec![
            (self.wallet.name(), wallet?),
            (self.notifications.name(), notifications?),
            (self.rebates.name(), rebates?),
            (self.recharge_logs.name(), recharge_logs?),
        ];
        for (name, outcome) in &lists {
            if *outcome == ListOutcome::Failed {
                warn!(list = name, "refresh failed");
            }
        }
        Ok(RefreshReport { lists })
    }

    /// Sign out and clear every store.
    pub fn logout(&self) -> Result<(), Error> {
        self.session.logout();
        self.clear_all()?;
        info!("stores cleared after sign-out");
        Ok(())
    }

    fn clear_all(&self) -> Result<(), Error> {
        self.wallet.clear()?;
        self.notifications.clear()?;
        self.rebates.clear()?;
        self.recharge_logs.clear()?;
        self.calculator.clear()
    }
}
