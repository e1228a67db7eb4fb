//! Gateway API resource models
//!
//! Strict views of the Gateway and HTTPRoute custom resources as shown by the console.

use serde::{Serialize, Serializer};
use std::fmt;

/// Gateway readiness as far as the listing can tell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum GatewayState {
    Ready,
    /// Covers both "still provisioning" and "misconfigured"
    Unknown,
}

impl GatewayState {
    /// Derive the state from the number of listeners the controller reported
    pub fn from_listener_count(count: usize) -> Self {
        if count > 0 {
            GatewayState::Ready
        } else {
            GatewayState::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayState::Ready => "Ready",
            GatewayState::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for GatewayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A Gateway resource, unique by namespace and name
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Gateway {
    pub name: String,
    pub namespace: String,
    /// `spec.gatewayClassName`
    pub class: String,
    pub status: GatewayState,
    /// Length of `status.listeners`
    pub listeners: usize,
}

impl Gateway {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        class: impl Into<String>,
        listeners: usize,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            class: class.into(),
            status: GatewayState::from_listener_count(listeners),
            listeners,
        }
    }
}

/// Route state.
///
/// Only `Active` exists until HTTPRoute parent conditions are read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum RouteState {
    #[default]
    Active,
}

/// An HTTPRoute resource, unique by namespace and name
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Route {
    pub name: String,
    pub namespace: String,
    #[serde(serialize_with = "join_hostnames")]
    pub hostnames: Vec<String>,
    pub status: RouteState,
}

impl Route {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, hostnames: Vec<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            hostnames,
            status: RouteState::default(),
        }
    }
}

fn join_hostnames<S: Serializer>(hostnames: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hostnames.join(", "))
}
