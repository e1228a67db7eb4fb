//! Configuration module
//!
//! Settings are layered: built-in defaults, then a config file, then
//! `EG_BACKEND_*` environment variables, then command-line flags.

mod env;
mod file;

pub use env::EnvConfig;
pub use file::{expand_path, find_config_file};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Socket the console connects to
pub const DEFAULT_SOCKET_PATH: &str = "/run/guest-services/extension-envoygateway-extension.sock";

/// Application configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Unix socket the API server binds
    pub socket_path: String,

    /// kubectl binary, resolved through PATH when not absolute
    pub kubectl: String,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Envoy Gateway installation
    pub envoy_gateway: EnvoyGatewayConfig,

    /// Gateway API resource names
    pub gateway_api: GatewayApiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            socket_path: DEFAULT_SOCKET_PATH.to_string(),
            kubectl: "kubectl".to_string(),
            log_level: "info".to_string(),
            envoy_gateway: EnvoyGatewayConfig::default(),
            gateway_api: GatewayApiConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Load from the first standard location that exists, or defaults
    pub fn load_default() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Overlay values taken from the environment
    pub fn merge_env(&mut self, env: &EnvConfig) {
        if let Some(socket) = &env.socket_path {
            self.socket_path = socket.clone();
        }
        if let Some(kubectl) = &env.kubectl {
            self.kubectl = kubectl.clone();
        }
        if let Some(level) = &env.log_level {
            self.log_level = level.clone();
        }
        if let Some(namespace) = &env.namespace {
            self.envoy_gateway.namespace = namespace.clone();
        }
        if let Some(manifest) = &env.install_manifest {
            self.envoy_gateway.install_manifest = manifest.clone();
        }
        if let Some(manifest) = &env.sample_manifest {
            self.envoy_gateway.sample_manifest = manifest.clone();
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("socket_path", &self.socket_path),
            ("kubectl", &self.kubectl),
            ("envoy_gateway.namespace", &self.envoy_gateway.namespace),
            ("envoy_gateway.deployment", &self.envoy_gateway.deployment),
            ("envoy_gateway.install_manifest", &self.envoy_gateway.install_manifest),
            ("envoy_gateway.sample_manifest", &self.envoy_gateway.sample_manifest),
            ("gateway_api.gateway_crd", &self.gateway_api.gateway_crd),
            ("gateway_api.route_crd", &self.gateway_api.route_crd),
            ("gateway_api.gateway_resource", &self.gateway_api.gateway_resource),
            ("gateway_api.route_resource", &self.gateway_api.route_resource),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                anyhow::bail!("Config value '{name}' must not be empty");
            }
        }

        if let Err(e) = self.log_level.parse::<crate::utils::LogLevel>() {
            anyhow::bail!(e);
        }

        Ok(())
    }
}

/// Envoy Gateway controller settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvoyGatewayConfig {
    /// Namespace of the controller deployment
    pub namespace: String,

    /// Name of the controller deployment
    pub deployment: String,

    /// Manifest applied by the install action
    pub install_manifest: String,

    /// Manifest applied by the deploy-sample action
    pub sample_manifest: String,
}

impl Default for EnvoyGatewayConfig {
    fn default() -> Self {
        Self {
            namespace: "envoy-gateway-system".to_string(),
            deployment: "envoy-gateway".to_string(),
            install_manifest:
                "https://github.com/envoyproxy/gateway/releases/download/latest/install.yaml"
                    .to_string(),
            sample_manifest:
                "https://github.com/envoyproxy/gateway/releases/download/latest/quickstart.yaml"
                    .to_string(),
        }
    }
}

/// Gateway API CRD and resource names
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayApiConfig {
    pub gateway_crd: String,
    pub route_crd: String,
    pub gateway_resource: String,
    pub route_resource: String,
}

impl Default for GatewayApiConfig {
    fn default() -> Self {
        Self {
            gateway_crd: "gateways.gateway.networking.k8s.io".to_string(),
            route_crd: "httproutes.gateway.networking.k8s.io".to_string(),
            gateway_resource: "gateways".to_string(),
            route_resource: "httproutes".to_string(),
        }
    }
}

fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.socket_path, DEFAULT_SOCKET_PATH);
        assert_eq!(config.kubectl, "kubectl");
        assert_eq!(config.envoy_gateway.namespace, "envoy-gateway-system");
        assert_eq!(config.envoy_gateway.deployment, "envoy-gateway");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("eg-backend.yaml");
        std::fs::write(
            &path,
            "kubectl: /usr/local/bin/kubectl\nenvoy_gateway:\n  namespace: eg\n",
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.kubectl, "/usr/local/bin/kubectl");
        assert_eq!(config.envoy_gateway.namespace, "eg");
        assert_eq!(config.envoy_gateway.deployment, "envoy-gateway");
        assert_eq!(config.gateway_api, GatewayApiConfig::default());
    }

    #[test]
    fn test_load_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"socket_path": "/tmp/eg.sock", "log_level": "debug"}"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.socket_path, "/tmp/eg.sock");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.envoy_gateway, EnvoyGatewayConfig::default());
    }

    #[test]
    fn test_validate_rejects_empty_values() {
        let mut config = AppConfig::default();
        config.envoy_gateway.install_manifest = " ".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_env() {
        let env = EnvConfig {
            socket_path: Some("/tmp/eg.sock".to_string()),
            namespace: Some("eg".to_string()),
            ..Default::default()
        };

        let mut config = AppConfig::default();
        config.merge_env(&env);

        assert_eq!(config.socket_path, "/tmp/eg.sock");
        assert_eq!(config.envoy_gateway.namespace, "eg");
        assert_eq!(config.kubectl, "kubectl");
    }
}
