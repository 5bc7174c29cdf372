//! VIP rebate ledger.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::PaginatedListCache;

/// Payout state of a rebate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebateStatus {
    /// Accrued but not yet credited.
    Pending,
    /// Credited to the wallet.
    Settled,
}

/// One rebate earned on a trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebateEntry {
    /// Server identifier.
    pub id: String,
    /// Trade the rebate was earned on.
    pub order_id: String,
    /// Rebate amount.
    pub amount: Decimal,
    /// VIP tier at the time of the trade.
    #[serde(default)]
    pub vip_level: u32,
    /// Payout state.
    pub status: RebateStatus,
    /// Accrual time.
    pub created_at: DateTime<Utc>,
}

/// Rebate filter; `None` lists every status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RebateFilter {
    /// Restrict to one payout state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RebateStatus>,
}

/// Paged rebate ledger.
pub type RebateStore = PaginatedListCache<RebateEntry, RebateFilter>;

#[cfg(test)]
mod tests {
    //! Wire-shape coverage for rebate types.

    use super::*;
    use serde_json::json;

    #[test]
    fn status_filter_serialises_when_set() {
        let filter = RebateFilter {
            status: Some(RebateStatus::Settled),
        };
        let value = serde_json::to_value(filter).expect("serialise filter");
        assert_eq!(value, json!({ "status": "settled" }));
    }

    #[test]
    fn decodes_numeric_amounts() {
        let entry: RebateEntry = serde_json::from_value(json!({
            "id": "rb-1",
            "order_id": "ord-77",
            "amount": 12.5,
            "vip_level": 3,
            "status": "pending",
            "created_at": "2026-02-14T12:00:00Z"
        }))
        .expect("rebate decodes");
        assert_eq!(entry.amount, Decimal::new(125, 1));
    }
}
