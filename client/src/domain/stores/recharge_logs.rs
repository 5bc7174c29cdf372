//! Utility payment (recharge) history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::PaginatedListCache;

/// Utility category a payment was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilityType {
    /// Mobile airtime top-up.
    Airtime,
    /// Mobile data bundle.
    Data,
    /// Prepaid or postpaid electricity.
    Electricity,
    /// Cable TV subscription.
    CableTv,
    /// Betting wallet funding.
    Betting,
}

/// Processing state of a recharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RechargeStatus {
    /// Submitted to the biller.
    Processing,
    /// Delivered.
    Success,
    /// Failed and refunded.
    Failed,
}

/// One utility payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RechargeLog {
    /// Server identifier.
    pub id: String,
    /// Utility category.
    pub utility_type: UtilityType,
    /// Biller name, e.g. the network operator.
    pub provider: String,
    /// Phone number, meter number, or smart-card number.
    pub account_number: String,
    /// Amount paid.
    pub amount: Decimal,
    /// Processing state.
    pub status: RechargeStatus,
    /// Token or PIN issued by the biller, when any.
    #[serde(default)]
    pub token: Option<String>,
    /// Submission time.
    pub created_at: DateTime<Utc>,
}

/// Recharge log filter; `None` lists every utility type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RechargeLogFilter {
    /// Restrict to one utility type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utility_type: Option<UtilityType>,
}

impl RechargeLogFilter {
    /// Only payments for `utility_type`.
    pub fn only(utility_type: UtilityType) -> Self {
        Self {
            utility_type: Some(utility_type),
        }
    }
}

/// Paged recharge history.
pub type RechargeLogStore = PaginatedListCache<RechargeLog, RechargeLogFilter>;
