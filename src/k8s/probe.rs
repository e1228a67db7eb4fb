//! Cluster probe
//!
//! Runs kubectl and normalizes the outcome into a [`ProbeResult`]. The probe
//! never fails on its own: a non-zero exit, or a binary that cannot be started,
//! is reported through `success = false`.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::ClusterQuery;

/// Outcome of one kubectl invocation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProbeResult {
    /// Exit status was zero
    pub success: bool,

    /// Standard output followed by standard error
    pub output: String,

    /// Why the invocation failed, when it did
    pub error: Option<String>,
}

impl ProbeResult {
    /// Successful invocation with the given output
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
        }
    }

    /// Failed invocation with the tool's own output and a short error
    pub fn failed(output: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
            error: Some(error.into()),
        }
    }

    /// Output with surrounding whitespace removed
    pub fn trimmed(&self) -> &str {
        self.output.trim()
    }

    /// True when the invocation succeeded but printed nothing
    pub fn is_empty(&self) -> bool {
        self.trimmed().is_empty()
    }

    /// The most useful description of a failure: the tool's text if it printed any
    pub fn diagnostic(&self) -> String {
        let output = self.trimmed();
        match (&self.error, output.is_empty()) {
            (Some(error), true) => error.clone(),
            (Some(error), false) => format!("{error}: {output}"),
            (None, _) => output.to_string(),
        }
    }
}

/// Narrow capability to run kubectl queries.
///
/// Implementations must not retry, time out or interpret output; that policy
/// belongs to the resolver.
#[async_trait]
pub trait ClusterProbe: Send + Sync {
    /// Run kubectl with raw arguments
    async fn run(&self, args: &[String]) -> ProbeResult;

    /// Run a named query
    async fn query(&self, query: &ClusterQuery) -> ProbeResult {
        if query.is_mutation() {
            info!("{}", query);
        }
        self.run(&query.args()).await
    }
}

/// Probe backed by a local kubectl binary and the ambient kubeconfig
#[derive(Clone, Debug)]
pub struct KubectlProbe {
    binary: String,
}

impl KubectlProbe {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }
}

impl Default for KubectlProbe {
    fn default() -> Self {
        Self::new("kubectl")
    }
}

#[async_trait]
impl ClusterProbe for KubectlProbe {
    async fn run(&self, args: &[String]) -> ProbeResult {
        debug!("Running {} {}", self.binary, args.join(" "));

        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await;

        let output = match output {
            Ok(o) => o,
            Err(e) => {
                warn!("Failed to execute {}: {}", self.binary, e);
                return ProbeResult::failed("", format!("failed to execute {}: {e}", self.binary));
            }
        };

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            ProbeResult::ok(combined)
        } else {
            debug!("{} exited with {}: {}", self.binary, output.status, combined.trim());
            ProbeResult::failed(combined, output.status.to_string())
        }
    }
}
