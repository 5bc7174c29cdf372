//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod api_error;
mod auth_gateway;
mod list_source;
mod vip_profile_source;

pub use api_error::ApiError;
#[cfg(test)]
pub use auth_gateway::MockAuthGateway;
pub use auth_gateway::AuthGateway;
pub use list_source::{ListQuery, ListSource};
#[cfg(test)]
pub use vip_profile_source::MockVipProfileSource;
pub use vip_profile_source::{VipProfile, VipProfileSource};
