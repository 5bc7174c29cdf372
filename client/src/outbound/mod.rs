//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern:
//!
//! - **rest**: reqwest-backed wallet API client and list sources
//!
//! Adapters are thin translators that convert between domain types and
//! wire representations. They contain no business logic.

pub mod rest;
