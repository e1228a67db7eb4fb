//! Data models for the console backend
//!
//! Every value here is rebuilt from the cluster on each request; nothing is stored.

mod gateway;
mod status;

pub use gateway::{Gateway, Route};
pub use status::{ActionResponse, GatewayInstallationStatus};

#[cfg(test)]
pub use gateway::GatewayState;
#[cfg(test)]
pub use status::HealthState;
