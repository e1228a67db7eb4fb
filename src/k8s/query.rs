//! kubectl invocations
//!
//! Every command the backend sends to the cluster, rendered to argv.

use std::fmt;

/// A single kubectl invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClusterQuery {
    /// Client and server version; fails when the API server does not answer
    Version,

    /// A named deployment, empty output when it does not exist
    Deployment { namespace: String, name: String },

    /// One field of a named deployment, selected by a JSONPath template
    DeploymentField {
        namespace: String,
        name: String,
        jsonpath: String,
    },

    /// A CustomResourceDefinition by name, empty output when not registered
    Crd { name: String },

    /// Every instance of a resource kind across all namespaces as one JSON list
    ListAll { resource: String },

    /// Apply a manifest from a path or URL
    Apply { manifest: String },
}

impl ClusterQuery {
    pub fn deployment(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        ClusterQuery::Deployment {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn deployment_field(
        namespace: impl Into<String>,
        name: impl Into<String>,
        jsonpath: impl Into<String>,
    ) -> Self {
        ClusterQuery::DeploymentField {
            namespace: namespace.into(),
            name: name.into(),
            jsonpath: jsonpath.into(),
        }
    }

    pub fn crd(name: impl Into<String>) -> Self {
        ClusterQuery::Crd { name: name.into() }
    }

    pub fn list_all(resource: impl Into<String>) -> Self {
        ClusterQuery::ListAll {
            resource: resource.into(),
        }
    }

    pub fn apply(manifest: impl Into<String>) -> Self {
        ClusterQuery::Apply {
            manifest: manifest.into(),
        }
    }

    /// Whether the query changes cluster state
    pub fn is_mutation(&self) -> bool {
        matches!(self, ClusterQuery::Apply { .. })
    }

    /// Arguments passed to kubectl, without the binary itself
    pub fn args(&self) -> Vec<String> {
        let args: Vec<&str> = match self {
            ClusterQuery::Version => vec!["version", "-o", "json"],
            ClusterQuery::Deployment { namespace, name } => vec![
                "get",
                "deployment",
                "-n",
                namespace.as_str(),
                name.as_str(),
                "--ignore-not-found",
            ],
            ClusterQuery::DeploymentField {
                namespace,
                name,
                jsonpath,
            } => {
                return vec![
                    "get".to_string(),
                    "deployment".to_string(),
                    "-n".to_string(),
                    namespace.clone(),
                    name.clone(),
                    "-o".to_string(),
                    format!("jsonpath={jsonpath}"),
                ]
            }
            ClusterQuery::Crd { name } => vec!["get", "crd", name.as_str(), "--ignore-not-found"],
            ClusterQuery::ListAll { resource } => {
                vec!["get", resource.as_str(), "--all-namespaces", "-o", "json"]
            }
            ClusterQuery::Apply { manifest } => vec!["apply", "-f", manifest.as_str()],
        };

        args.into_iter().map(String::from).collect()
    }
}

impl fmt::Display for ClusterQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "kubectl {}", self.args().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployment_args() {
        let query = ClusterQuery::deployment("envoy-gateway-system", "envoy-gateway");
        assert_eq!(
            query.args(),
            vec![
                "get",
                "deployment",
                "-n",
                "envoy-gateway-system",
                "envoy-gateway",
                "--ignore-not-found"
            ]
        );
    }

    #[test]
    fn test_deployment_field_args() {
        let query = ClusterQuery::deployment_field(
            "envoy-gateway-system",
            "envoy-gateway",
            "{.spec.template.spec.containers[0].image}",
        );
        let args = query.args();
        assert_eq!(args[5], "-o");
        assert_eq!(args[6], "jsonpath={.spec.template.spec.containers[0].image}");
    }

    #[test]
    fn test_list_and_apply_args() {
        assert_eq!(
            ClusterQuery::list_all("gateways").args(),
            vec!["get", "gateways", "--all-namespaces", "-o", "json"]
        );
        assert_eq!(
            ClusterQuery::apply("https://example.com/install.yaml").args(),
            vec!["apply", "-f", "https://example.com/install.yaml"]
        );
        assert!(ClusterQuery::apply("x.yaml").is_mutation());
        assert!(!ClusterQuery::Version.is_mutation());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ClusterQuery::crd("gateways.gateway.networking.k8s.io").to_string(),
            "kubectl get crd gateways.gateway.networking.k8s.io --ignore-not-found"
        );
    }
}
