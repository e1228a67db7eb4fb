//! Envoy Gateway console backend
//!
//! A local control-plane shim for an operator console. It reports whether the
//! Kubernetes cluster is reachable, whether Envoy Gateway is installed and
//! healthy, which Gateway and HTTPRoute resources exist, and it can install
//! Envoy Gateway or deploy the quickstart sample. Everything goes through
//! `kubectl` with the ambient kubeconfig.
//!
//! ## Usage
//!
//! ```bash
//! # Listen on the default extension socket
//! eg-backend
//!
//! # Listen on a custom socket
//! eg-backend /tmp/eg.sock
//!
//! # Query it
//! curl --unix-socket /tmp/eg.sock http://localhost/api/status
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

mod cli;
mod config;
mod k8s;
mod models;
mod resolver;
mod server;
mod utils;

use cli::Args;
use config::{expand_path, AppConfig, EnvConfig};
use k8s::KubectlProbe;
use resolver::StateResolver;
use utils::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    let level = config.log_level.parse().unwrap_or(LogLevel::Info);
    init_logger(level);

    let probe = KubectlProbe::new(&config.kubectl);
    info!("Using {} with the ambient kubeconfig", probe.binary());

    let resolver = Arc::new(StateResolver::new(
        probe,
        config.envoy_gateway.clone(),
        config.gateway_api.clone(),
    ));

    let socket_path = expand_path(&config.socket_path);
    info!("Starting server with socket path: {}", socket_path.display());

    server::serve(&socket_path, resolver).await
}

/// Defaults, then config file, then environment, then flags
fn load_config(args: &Args) -> Result<AppConfig> {
    let env = EnvConfig::load();

    let config_path = args
        .config
        .as_ref()
        .or(env.config_file.as_ref())
        .map(|path| expand_path(path));

    let mut config = match config_path {
        Some(path) => load_explicit(path)?,
        None => AppConfig::load_default()?,
    };

    config.merge_env(&env);
    args.apply_to(&mut config);
    config.validate().context("Invalid configuration")?;

    Ok(config)
}

fn load_explicit(path: PathBuf) -> Result<AppConfig> {
    AppConfig::load(&path).with_context(|| format!("Failed to load config: {}", path.display()))
}
