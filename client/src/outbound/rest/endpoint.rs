//! API routes, relative to the configured base URL.

/// Wallet API endpoint. Every endpoint accepts a JSON `POST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Exchange credentials for a token.
    Login,
    /// VIP tier of the token owner.
    VipProfile,
    /// Wallet transaction pages.
    WalletTransactions,
    /// Notification pages.
    Notifications,
    /// Rebate pages.
    Rebates,
    /// Utility payment pages.
    RechargeLogs,
}

impl Endpoint {
    /// Path joined onto the base URL; never starts with `/`.
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "auth/login",
            Self::VipProfile => "vip/profile",
            Self::WalletTransactions => "wallet/transactions",
            Self::Notifications => "notifications/list",
            Self::Rebates => "rebates/list",
            Self::RechargeLogs => "recharge/logs",
        }
    }
}
