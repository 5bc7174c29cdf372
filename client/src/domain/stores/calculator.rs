//! Trade calculator state.
//!
//! Holds the selected card and the user's bonuses and recomposes a
//! [`RateQuote`] whenever the typed amount changes. The VIP bonus comes from
//! the server; coupon, activity, and first-order bonuses are set by the flows
//! that discover them.

use std::sync::{Arc, Mutex, MutexGuard};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ports::{VipProfile, VipProfileSource};
use crate::domain::rate::{Bonuses, RateQuote, parse_amount};
use crate::domain::{Error, Gated, SessionGate};

/// Server-supplied price of one gift-card denomination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRate {
    /// Card identifier.
    pub card_id: String,
    /// Card currency, e.g. `USD`.
    pub currency: String,
    /// Payout per unit of face value.
    pub rate: Decimal,
}

#[derive(Debug, Default)]
struct CalculatorState {
    card: Option<CardRate>,
    bonuses: Bonuses,
    vip_level: Option<u32>,
    /// Bumped by every `clear`; a VIP sync started before it is discarded.
    epoch: u64,
}

/// Calculator inputs shared by the trade screens.
pub struct CalculatorStore {
    gate: SessionGate,
    vip_source: Arc<dyn VipProfileSource>,
    state: Mutex<CalculatorState>,
}

impl CalculatorStore {
    /// Create an empty calculator.
    pub fn new(gate: SessionGate, vip_source: Arc<dyn VipProfileSource>) -> Self {
        Self {
            gate,
            vip_source,
            state: Mutex::new(CalculatorState::default()),
        }
    }

    /// Select the card being traded.
    pub fn select_card(&self, card: CardRate) -> Result<(), Error> {
        self.lock()?.card = Some(card);
        Ok(())
    }

    /// Currently selected card.
    pub fn card(&self) -> Result<Option<CardRate>, Error> {
        Ok(self.lock()?.card.clone())
    }

    /// Set the flat coupon bonus.
    pub fn set_coupon(&self, amount: Decimal) -> Result<(), Error> {
        self.lock()?.bonuses.coupon = amount;
        Ok(())
    }

    /// Set the flat promotional activity bonus.
    pub fn set_activity_bonus(&self, amount: Decimal) -> Result<(), Error> {
        self.lock()?.bonuses.activity = amount;
        Ok(())
    }

    /// Set the flat first-order bonus.
    pub fn set_first_order_bonus(&self, amount: Decimal) -> Result<(), Error> {
        self.lock()?.bonuses.first_order = amount;
        Ok(())
    }

    /// Bonuses currently in effect.
    pub fn bonuses(&self) -> Result<Bonuses, Error> {
        Ok(self.lock()?.bonuses)
    }

    /// VIP tier from the last successful sync.
    pub fn vip_level(&self) -> Result<Option<u32>, Error> {
        Ok(self.lock()?.vip_level)
    }

    /// Quote a trade of `amount_text` units of the selected card.
    ///
    /// # Errors
    /// Returns [`crate::domain::ErrorCode::InvalidRequest`] when no card is
    /// selected or the amount fails validation.
    pub fn quote(&self, amount_text: &str) -> Result<RateQuote, Error> {
        let base_amount = parse_amount(amount_text)?;
        let state = self.lock()?;
        let card = state
            .card
            .as_ref()
            .ok_or_else(|| Error::invalid_request("select a card first"))?;
        Ok(RateQuote {
            base_amount,
            base_rate: card.rate,
            bonuses: state.bonuses,
        })
    }

    /// Pull the VIP tier and apply its bonus.
    ///
    /// Signed out or expired sessions leave the bonuses untouched, and so
    /// does a profile that arrives after [`CalculatorStore::clear`]; it is
    /// still returned to the caller.
    pub async fn sync_vip(&self) -> Result<Gated<VipProfile>, Error> {
        let epoch = self.lock()?.epoch;
        let source = Arc::clone(&self.vip_source);
        let outcome = self
            .gate
            .guard(|token| async move { source.fetch_profile(&token).await })
            .await
            .map_err(Error::from)?;
        if let Gated::Completed(profile) = &outcome {
            let mut state = self.lock()?;
            if state.epoch == epoch {
                state.bonuses.vip_percent = profile.bonus_percent;
                state.vip_level = Some(profile.level);
                debug!(level = profile.level, "vip bonus applied");
            } else {
                debug!(level = profile.level, "discarded vip profile from before clear");
            }
        }
        Ok(outcome)
    }

    /// Forget the card and every bonus.
    pub fn clear(&self) -> Result<(), Error> {
        let mut state = self.lock()?;
        *state = CalculatorState {
            epoch: state.epoch.wrapping_add(1),
            ..CalculatorState::default()
        };
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, CalculatorState>, Error> {
        self.state
            .lock()
            .map_err(|_| Error::internal("calculator state lock poisoned"))
    }
}
