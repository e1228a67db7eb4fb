//! Kubernetes access through kubectl
//!
//! The backend talks to the cluster only by running kubectl with the ambient
//! kubeconfig, and reads Gateway API listings through a permissive decoder.

mod probe;
mod query;
mod resources;

pub use probe::{ClusterProbe, KubectlProbe, ProbeResult};
pub use query::ClusterQuery;
pub use resources::{parse_gateways, parse_routes};
