//! Wallet client library modules.
//!
//! - `domain`: session, paged list stores, and the payout calculator.
//! - `outbound`: reqwest adapters implementing the domain ports.
//! - `config`: OrthoConfig-backed client settings.

pub mod config;
pub mod domain;
pub mod outbound;
