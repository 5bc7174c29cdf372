//! Wallet transaction history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::PaginatedListCache;

/// Movement type of a wallet transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Funds credited to the wallet.
    Deposit,
    /// Funds paid out to a bank account.
    Withdrawal,
    /// Proceeds of a gift-card trade.
    Trade,
    /// VIP rebate credited to the wallet.
    Rebate,
    /// Utility payment made from the wallet.
    Payment,
}

/// Settlement state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Awaiting settlement.
    Pending,
    /// Settled.
    Completed,
    /// Rejected or reversed.
    Failed,
}

/// One wallet ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletTransaction {
    /// Server identifier.
    pub id: String,
    /// Movement type.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Signed amount in `currency`.
    pub amount: Decimal,
    /// ISO currency code.
    pub currency: String,
    /// Settlement state.
    pub status: TransactionStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Filter for the transaction history; `None` lists every kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TransactionFilter {
    /// Restrict to one movement type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
}

impl TransactionFilter {
    /// Every transaction.
    pub const ALL: Self = Self { kind: None };

    /// Only transactions of `kind`.
    pub fn only(kind: TransactionKind) -> Self {
        Self { kind: Some(kind) }
    }
}

/// Paged wallet history.
pub type WalletStore = PaginatedListCache<WalletTransaction, TransactionFilter>;

#[cfg(test)]
mod tests {
    //! Wire-shape coverage for wallet types.

    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_transaction_payload() {
        let transaction: WalletTransaction = serde_json::from_value(json!({
            "id": "tx-9",
            "type": "withdrawal",
            "amount": "-2500.00",
            "currency": "NGN",
            "status": "pending",
            "created_at": "2026-03-01T10:15:00Z"
        }))
        .expect("transaction decodes");
        assert_eq!(transaction.kind, TransactionKind::Withdrawal);
        assert_eq!(transaction.amount, Decimal::new(-250_000, 2));
    }

    #[test]
    fn all_filter_adds_no_fields() {
        let value = serde_json::to_value(TransactionFilter::ALL).expect("serialise filter");
        assert_eq!(value, json!({}));
    }

    #[test]
    fn kind_filter_serialises_as_type() {
        let value = serde_json::to_value(TransactionFilter::only(TransactionKind::Trade))
            .expect("serialise filter");
        assert_eq!(value, json!({ "type": "trade" }));
    }
}
