//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "EG_BACKEND";

/// Configuration read from environment variables
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// Socket path from EG_BACKEND_SOCKET
    pub socket_path: Option<String>,
    /// kubectl binary from EG_BACKEND_KUBECTL
    pub kubectl: Option<String>,
    /// Log level from EG_BACKEND_LOG_LEVEL
    pub log_level: Option<String>,
    /// Config file from EG_BACKEND_CONFIG
    pub config_file: Option<String>,
    /// Controller namespace from EG_BACKEND_NAMESPACE
    pub namespace: Option<String>,
    /// Install manifest from EG_BACKEND_INSTALL_MANIFEST
    pub install_manifest: Option<String>,
    /// Sample manifest from EG_BACKEND_SAMPLE_MANIFEST
    pub sample_manifest: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            socket_path: get_env("SOCKET"),
            kubectl: get_env("KUBECTL"),
            log_level: get_env("LOG_LEVEL"),
            config_file: get_env("CONFIG"),
            namespace: get_env("NAMESPACE"),
            install_manifest: get_env("INSTALL_MANIFEST"),
            sample_manifest: get_env("SAMPLE_MANIFEST"),
        }
    }
}

/// Get a non-empty environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}"))
        .ok()
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Restores the previous value of a variable on drop
    struct EnvGuard {
        key: String,
        previous: Option<String>,
    }

    impl EnvGuard {
        fn set(name: &str, value: &str) -> Self {
            let key = format!("{ENV_PREFIX}_{name}");
            let previous = env::var(&key).ok();
            env::set_var(&key, value);
            Self { key, previous }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.previous {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    #[test]
    fn test_env_config_default() {
        let config = EnvConfig::default();
        assert!(config.socket_path.is_none());
        assert!(config.namespace.is_none());
    }

    #[test]
    fn test_env_config_load() {
        let _socket = EnvGuard::set("SOCKET", "/tmp/eg-env.sock");
        let _blank = EnvGuard::set("SAMPLE_MANIFEST", "  ");

        let config = EnvConfig::load();
        assert_eq!(config.socket_path.as_deref(), Some("/tmp/eg-env.sock"));
        assert!(config.sample_manifest.is_none());
        assert_ne!(config, EnvConfig::default());
    }
}
