//! Payout calculation for gift-card trades.
//!
//! The server supplies the card rate and the user's bonuses; the client only
//! composes them whenever the amount, card, or bonus inputs change. Inputs are
//! clamped so a bonus can never lower the payout.

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::Error;

/// Fractional digits accepted in a typed amount and shown on a payout.
const MONEY_SCALE: u32 = 2;

/// Bonus components applied on top of the base payout.
///
/// Negative components are treated as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bonuses {
    /// VIP tier bonus in percent of the base payout.
    pub vip_percent: Decimal,
    /// Flat coupon bonus.
    pub coupon: Decimal,
    /// Flat promotional activity bonus.
    pub activity: Decimal,
    /// Flat bonus for a user's first order.
    pub first_order: Decimal,
}

impl Bonuses {
    fn clamped(&self) -> Self {
        Self {
            vip_percent: non_negative(self.vip_percent),
            coupon: non_negative(self.coupon),
            activity: non_negative(self.activity),
            first_order: non_negative(self.first_order),
        }
    }

    fn flat_total(&self) -> Decimal {
        self.coupon
            .saturating_add(self.activity)
            .saturating_add(self.first_order)
    }
}

fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Compose the final payout.
///
/// `base * rate * (1 + vip_percent / 100) + coupon + activity + first_order`,
/// with every input clamped at zero and arithmetic saturating instead of
/// overflowing.
///
/// # Examples
/// ```
/// use std::str::FromStr;
///
/// use client::domain::rate::{Bonuses, compose};
/// use rust_decimal::Decimal;
///
/// let bonuses = Bonuses {
///     vip_percent: Decimal::from(5),
///     coupon: Decimal::from(2),
///     ..Bonuses::default()
/// };
/// let payout = compose(Decimal::from(100), Decimal::ONE, &bonuses);
/// assert_eq!(payout, Decimal::from_str("107.00").unwrap());
/// ```
pub fn compose(base: Decimal, rate: Decimal, bonuses: &Bonuses) -> Decimal {
    let bonuses = bonuses.clamped();
    let gross = non_negative(base).saturating_mul(non_negative(rate));
    let vip_multiplier = Decimal::ONE.saturating_add(bonuses.vip_percent / Decimal::ONE_HUNDRED);
    gross
        .saturating_mul(vip_multiplier)
        .saturating_add(bonuses.flat_total())
}

/// Read a server-supplied numeric string, treating anything unparsable as zero.
///
/// Thousands separators are ignored; `NaN`, blanks, and garbage become zero.
pub fn coerce_decimal(raw: &str) -> Decimal {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .unwrap_or(Decimal::ZERO)
}

/// Convert a float from a loosely typed payload.
///
/// Non-finite values become zero; finite values outside the decimal range
/// saturate at [`Decimal::MAX`] or [`Decimal::MIN`].
pub fn coerce_f64(raw: f64) -> Decimal {
    if !raw.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_f64(raw).unwrap_or(if raw.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

/// Validate an amount typed by the user.
///
/// The amount must be a plain non-negative decimal with at most two
/// fractional digits. Failures are field-level validation errors and never
/// reach the network.
pub fn parse_amount(raw: &str) -> Result<Decimal, Error> {
    let field = || json!({ "field": "amount" });
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_request("amount is required").with_details(field()));
    }
    let amount = Decimal::from_str(trimmed)
        .map_err(|_| Error::invalid_request("amount must be a number").with_details(field()))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::invalid_request("amount must not be negative").with_details(field()));
    }
    if amount.normalize().scale() > MONEY_SCALE {
        return Err(
            Error::invalid_request("amount supports at most two decimal places")
                .with_details(field()),
        );
    }
    Ok(amount)
}

/// Inputs and derived payout for one trade.
///
/// Quotes are recomputed from store data on every input change and never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateQuote {
    /// Face value entered by the user.
    pub base_amount: Decimal,
    /// Server-supplied unit price of the card.
    pub base_rate: Decimal,
    /// Bonuses in effect for this user.
    pub bonuses: Bonuses,
}

impl RateQuote {
    /// Payout before any bonus.
    pub fn base_payout(&self) -> Decimal {
        compose(self.base_amount, self.base_rate, &Bonuses::default())
    }

    /// Payout including every bonus, unrounded.
    pub fn final_amount(&self) -> Decimal {
        compose(self.base_amount, self.base_rate, &self.bonuses)
    }

    /// Amount the bonuses add on top of the base payout.
    pub fn bonus_amount(&self) -> Decimal {
        self.final_amount().saturating_sub(self.base_payout())
    }

    /// Final payout rounded to cents for display.
    pub fn display_amount(&self) -> Decimal {
        self.final_amount()
            .round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
    }
}
