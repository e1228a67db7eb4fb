//! Envoy Gateway status pipeline
//!
//! Status is resolved by a fixed sequence of steps:
//!
//! 1. reachability, terminal on failure
//! 2. controller deployment presence, where empty output means absent
//! 3. availability condition, degraded to `Error` on any failure
//! 4. image version, left unknown on any failure
//!
//! Steps 3 and 4 only run when the deployment exists and never fail the call.

use tracing::{info, warn};

use super::{Result, ResolverError, StateResolver};
use crate::k8s::{ClusterProbe, ClusterQuery, ProbeResult};
use crate::models::GatewayInstallationStatus;

const AVAILABLE_CONDITION: &str = r#"{.status.conditions[?(@.type=="Available")].status}"#;
const CONTAINER_IMAGE: &str = "{.spec.template.spec.containers[0].image}";

/// Outcome of the reachability step
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reachability {
    Reachable,
    Unreachable(String),
}

impl Reachability {
    pub fn from_probe(result: &ProbeResult) -> Self {
        if result.success {
            Reachability::Reachable
        } else {
            Reachability::Unreachable(result.diagnostic())
        }
    }
}

/// Outcome of a `--ignore-not-found` lookup
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    Present,
    Absent,
}

impl Presence {
    /// Empty output from a successful lookup means the object does not exist.
    /// `None` when the lookup itself failed.
    pub fn from_probe(result: &ProbeResult) -> Option<Self> {
        if !result.success {
            None
        } else if result.is_empty() {
            Some(Presence::Absent)
        } else {
            Some(Presence::Present)
        }
    }
}

/// Available only when the condition reads exactly `True`
fn is_available(result: &ProbeResult) -> bool {
    result.success && result.trimmed() == "True"
}

/// Extract the version from an image reference.
///
/// The version is the text after the first `:`. Without a `:`, or with nothing
/// after it, the version is unknown.
pub fn parse_image_version(image: &str) -> Option<String> {
    image
        .trim()
        .split(':')
        .nth(1)
        .filter(|version| !version.is_empty())
        .map(String::from)
}

impl<P: ClusterProbe> StateResolver<P> {
    /// Resolve the installation status of Envoy Gateway
    pub async fn status(&self) -> Result<GatewayInstallationStatus> {
        if let Reachability::Unreachable(diagnostic) = self.reachability().await {
            warn!("Kubernetes cluster is unreachable: {}", diagnostic);
            return Err(ResolverError::unreachable(format!(
                "Kubernetes cluster is unreachable: {diagnostic}"
            )));
        }

        if self.controller_presence().await? == Presence::Absent {
            info!("Envoy Gateway is not installed");
            return Ok(GatewayInstallationStatus::not_installed());
        }

        let available = self.controller_available().await;
        let version = self.controller_version().await;

        let status = GatewayInstallationStatus::installed(available, version);
        info!(
            "Envoy Gateway status: {} (version {})",
            status.health(),
            status.version().unwrap_or("unknown")
        );

        Ok(status)
    }

    pub(super) async fn reachability(&self) -> Reachability {
        let result = self.probe.query(&ClusterQuery::Version).await;
        Reachability::from_probe(&result)
    }

    /// Fail with `message` unless the cluster answers
    pub(super) async fn require_reachable(&self, message: &str) -> Result<()> {
        match self.reachability().await {
            Reachability::Reachable => Ok(()),
            Reachability::Unreachable(diagnostic) => {
                warn!("Kubernetes cluster is unreachable: {}", diagnostic);
                Err(ResolverError::unreachable(message))
            }
        }
    }

    pub(super) async fn controller_presence(&self) -> Result<Presence> {
        let query = ClusterQuery::deployment(
            &self.envoy_gateway.namespace,
            &self.envoy_gateway.deployment,
        );
        let result = self.probe.query(&query).await;

        Presence::from_probe(&result).ok_or_else(|| {
            warn!("Failed to check Envoy Gateway status: {}", result.diagnostic());
            ResolverError::command_failed("Failed to check Envoy Gateway status", result.diagnostic())
        })
    }

    async fn controller_available(&self) -> bool {
        let result = self.deployment_field(AVAILABLE_CONDITION).await;
        if !result.success {
            warn!("Failed to get Envoy Gateway status: {}", result.diagnostic());
        }

        is_available(&result)
    }

    async fn controller_version(&self) -> Option<String> {
        let result = self.deployment_field(CONTAINER_IMAGE).await;
        if !result.success {
            warn!("Failed to get Envoy Gateway version: {}", result.diagnostic());
            return None;
        }

        info!("Envoy Gateway image: {}", result.trimmed());
        parse_image_version(result.trimmed())
    }

    async fn deployment_field(&self, jsonpath: &str) -> ProbeResult {
        let query = ClusterQuery::deployment_field(
            &self.envoy_gateway.namespace,
            &self.envoy_gateway.deployment,
            jsonpath,
        );
        self.probe.query(&query).await
    }
}
