//! Wallet API outbound adapters.
//!
//! One reqwest client implements every driven port. Each list endpoint gets
//! its own [`RestListSource`] sharing that client.

mod dto;
mod endpoint;
mod http_client;
mod list_source;

use std::sync::Arc;

pub use endpoint::Endpoint;
pub use http_client::RestApiClient;
pub use list_source::RestListSource;

use crate::domain::AppPorts;

/// Wire every port of [`AppPorts`] to `client`.
pub fn app_ports(client: Arc<RestApiClient>) -> AppPorts {
    AppPorts {
        auth: client.clone(),
        vip: client.clone(),
        wallet: Arc::new(RestListSource::new(client.clone(), Endpoint::WalletTransactions)),
        notifications: Arc::new(RestListSource::new(client.clone(), Endpoint::Notifications)),
        rebates: Arc::new(RestListSource::new(client.clone(), Endpoint::Rebates)),
        recharge_logs: Arc::new(RestListSource::new(client, Endpoint::RechargeLogs)),
    }
}
