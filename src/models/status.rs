//! Envoy Gateway installation status

use serde::Serialize;
use std::fmt;

/// Health of the gateway controller deployment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum HealthState {
    NotInstalled,
    Running,
    Error,
}

impl HealthState {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthState::NotInstalled => "NotInstalled",
            HealthState::Running => "Running",
            HealthState::Error => "Error",
        }
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Installation status of Envoy Gateway.
///
/// `health != NotInstalled` implies `installed`; the constructors are the only
/// way to build one so the invariant holds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GatewayInstallationStatus {
    installed: bool,
    #[serde(rename = "status")]
    health: HealthState,
    /// `None` means the version could not be determined
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

impl GatewayInstallationStatus {
    /// The controller deployment does not exist
    pub fn not_installed() -> Self {
        Self {
            installed: false,
            health: HealthState::NotInstalled,
            version: None,
        }
    }

    /// The controller deployment exists
    pub fn installed(available: bool, version: Option<String>) -> Self {
        Self {
            installed: true,
            health: if available {
                HealthState::Running
            } else {
                HealthState::Error
            },
            version,
        }
    }

    #[cfg(test)]
    pub fn is_installed(&self) -> bool {
        self.installed
    }

    pub fn health(&self) -> HealthState {
        self.health
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

/// Body returned by the mutating operations
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActionResponse {
    pub message: String,
}

impl ActionResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
