//! Driven port for reading the signed-in user's VIP tier.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::domain::SessionToken;

/// VIP tier and the payout bonus it grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VipProfile {
    /// Tier number, starting at zero for non-VIP users.
    pub level: u32,
    /// Bonus applied on top of the card rate, in percent.
    pub bonus_percent: Decimal,
}

/// Port for fetching the VIP profile of the session owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VipProfileSource: Send + Sync {
    /// Fetch the VIP profile tied to `token`.
    async fn fetch_profile(&self, token: &SessionToken) -> Result<VipProfile, ApiError>;
}
