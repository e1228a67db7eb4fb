//! Cluster state resolution
//!
//! Turns kubectl outcomes into domain results. All interpretation policy lives
//! here: which output means "absent", which failures are tolerated, and which
//! are surfaced to the caller.

mod error;
mod status;

pub use error::ResolverError;
use status::Presence;

use tracing::{error, info};

use crate::config::{EnvoyGatewayConfig, GatewayApiConfig};
use crate::k8s::{parse_gateways, parse_routes, ClusterProbe, ClusterQuery};
use crate::models::{ActionResponse, Gateway, Route};

/// Result type for resolver operations
pub type Result<T> = std::result::Result<T, ResolverError>;

/// Shown when a mutation is attempted against a cluster that does not answer
pub const CLUSTER_NOT_RUNNING: &str =
    "Kubernetes is not running. Please enable Kubernetes in Docker Desktop.";

/// Shown when the sample is deployed before the controller
pub const CONTROLLER_NOT_INSTALLED: &str =
    "Envoy Gateway is not installed. Please install it first.";

/// Resolves cluster state through a [`ClusterProbe`].
///
/// Holds no mutable state, so one instance can serve concurrent requests.
pub struct StateResolver<P> {
    probe: P,
    envoy_gateway: EnvoyGatewayConfig,
    gateway_api: GatewayApiConfig,
}

impl<P: ClusterProbe> StateResolver<P> {
    pub fn new(probe: P, envoy_gateway: EnvoyGatewayConfig, gateway_api: GatewayApiConfig) -> Self {
        Self {
            probe,
            envoy_gateway,
            gateway_api,
        }
    }

    /// Resolver with the default Envoy Gateway and Gateway API settings
    #[cfg(test)]
    pub fn with_defaults(probe: P) -> Self {
        Self::new(probe, EnvoyGatewayConfig::default(), GatewayApiConfig::default())
    }

    #[cfg(test)]
    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Install Envoy Gateway by applying its release manifest.
    ///
    /// Succeeds once kubectl accepts the manifest; the deployment is not awaited.
    pub async fn install_envoy_gateway(&self) -> Result<ActionResponse> {
        self.require_reachable(CLUSTER_NOT_RUNNING).await?;

        let manifest = &self.envoy_gateway.install_manifest;
        info!("Installing Envoy Gateway from {}", manifest);

        self.apply(manifest, "Failed to install Envoy Gateway").await?;

        Ok(ActionResponse::new("Envoy Gateway installed successfully"))
    }

    /// Deploy the quickstart sample. Requires the controller deployment.
    pub async fn deploy_sample(&self) -> Result<ActionResponse> {
        self.require_reachable(CLUSTER_NOT_RUNNING).await?;

        if self.controller_presence().await? == Presence::Absent {
            error!("Envoy Gateway is not installed");
            return Err(ResolverError::Precondition(
                CONTROLLER_NOT_INSTALLED.to_string(),
            ));
        }

        let manifest = &self.envoy_gateway.sample_manifest;
        info!("Deploying sample application from {}", manifest);

        self.apply(manifest, "Failed to deploy sample application")
            .await?;

        Ok(ActionResponse::new("Sample application deployed successfully"))
    }

    /// Every Gateway in the cluster, empty when the Gateway API is not installed
    pub async fn gateways(&self) -> Result<Vec<Gateway>> {
        let Some(document) = self
            .list_custom_resources(
                &self.gateway_api.gateway_crd,
                &self.gateway_api.gateway_resource,
                "Gateway",
            )
            .await?
        else {
            return Ok(Vec::new());
        };

        parse_gateways(&document).map_err(|source| {
            error!("Failed to parse Gateway response: {}", source);
            ResolverError::Parse {
                what: "Gateway",
                source,
            }
        })
    }

    /// Every HTTPRoute in the cluster, empty when the Gateway API is not installed
    pub async fn routes(&self) -> Result<Vec<Route>> {
        let Some(document) = self
            .list_custom_resources(
                &self.gateway_api.route_crd,
                &self.gateway_api.route_resource,
                "HTTPRoute",
            )
            .await?
        else {
            return Ok(Vec::new());
        };

        parse_routes(&document).map_err(|source| {
            error!("Failed to parse HTTPRoute response: {}", source);
            ResolverError::Parse {
                what: "HTTPRoute",
                source,
            }
        })
    }

    /// List a custom resource kind across namespaces.
    ///
    /// `None` when the kind's CRD is not registered.
    async fn list_custom_resources(
        &self,
        crd: &str,
        resource: &str,
        kind: &str,
    ) -> Result<Option<String>> {
        let registered = self.probe.query(&ClusterQuery::crd(crd)).await;
        if !registered.success {
            error!("Failed to check {} API: {}", kind, registered.diagnostic());
            return Err(ResolverError::command_failed(
                format!("Failed to check {kind} API"),
                registered.diagnostic(),
            ));
        }

        if registered.is_empty() {
            info!("{} API not installed", kind);
            return Ok(None);
        }

        let listing = self.probe.query(&ClusterQuery::list_all(resource)).await;
        if !listing.success {
            error!("Failed to get {}s: {}", kind, listing.diagnostic());
            return Err(ResolverError::command_failed(
                format!("Failed to get {kind}s"),
                listing.diagnostic(),
            ));
        }

        Ok(Some(listing.output))
    }

    async fn apply(&self, manifest: &str, context: &str) -> Result<()> {
        let result = self.probe.query(&ClusterQuery::apply(manifest)).await;
        if !result.success {
            error!("{}: {}", context, result.diagnostic());
            return Err(ResolverError::command_failed(context, result.diagnostic()));
        }

        info!("Applied {}: {}", manifest, result.trimmed());
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted probe for resolver and server tests

    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::k8s::{ClusterProbe, ProbeResult};

    /// Answers queries from a table keyed by argv and records every call.
    /// Unscripted queries fail like an unknown kubectl command.
    #[derive(Default)]
    pub struct FakeProbe {
        responses: HashMap<Vec<String>, ProbeResult>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl FakeProbe {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(mut self, query: &crate::k8s::ClusterQuery, result: ProbeResult) -> Self {
            self.responses.insert(query.args(), result);
            self
        }

        pub fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }

        /// Whether any `kubectl apply` was issued
        pub fn applied(&self) -> bool {
            self.calls()
                .iter()
                .any(|args| args.first().map(String::as_str) == Some("apply"))
        }
    }

    #[async_trait]
    impl ClusterProbe for FakeProbe {
        async fn run(&self, args: &[String]) -> ProbeResult {
            self.calls.lock().unwrap().push(args.to_vec());
            self.responses
                .get(args)
                .cloned()
                .unwrap_or_else(|| ProbeResult::failed("error: unscripted query", "exit status: 1"))
        }
    }
}
