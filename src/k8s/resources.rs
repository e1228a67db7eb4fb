//! Gateway API listings
//!
//! `kubectl get <kind> -o json` is decoded in two steps: a permissive layer that
//! accepts any shape, then a projection into the strict models that skips items
//! missing `metadata` or `spec` instead of failing the whole listing.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::models::{Gateway, Route};

/// A `List` document as printed by kubectl
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawResourceList {
    #[serde(default)]
    pub items: Option<Value>,
}

impl RawResourceList {
    pub fn parse(document: &str) -> serde_json::Result<Self> {
        serde_json::from_str(document)
    }

    /// Items that have an object shape; anything else is dropped
    pub fn resources(&self) -> Vec<RawResource> {
        let Some(items) = self.items.as_ref().and_then(Value::as_array) else {
            return Vec::new();
        };

        items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| match RawResource::deserialize(item) {
                Ok(resource) => Some(resource),
                Err(e) => {
                    debug!("Skipping list item {}: {}", index, e);
                    None
                }
            })
            .collect()
    }
}

/// One list item with every section optional and untyped
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawResource {
    pub metadata: Option<Value>,
    pub spec: Option<Value>,
    pub status: Option<Value>,
}

impl RawResource {
    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.metadata.as_ref().and_then(Value::as_object)
    }

    pub fn spec(&self) -> Option<&Map<String, Value>> {
        self.spec.as_ref().and_then(Value::as_object)
    }

    pub fn status(&self) -> Option<&Map<String, Value>> {
        self.status.as_ref().and_then(Value::as_object)
    }

    fn identity(&self) -> Option<(String, String)> {
        let metadata = self.metadata()?;
        Some((string_field(metadata, "name"), string_field(metadata, "namespace")))
    }

    /// Project a Gateway item. `None` when `metadata` or `spec` is missing.
    pub fn to_gateway(&self) -> Option<Gateway> {
        let (name, namespace) = self.identity()?;
        let spec = self.spec()?;

        let listeners = self
            .status()
            .and_then(|status| status.get("listeners"))
            .and_then(Value::as_array)
            .map_or(0, Vec::len);

        Some(Gateway::new(
            name,
            namespace,
            string_field(spec, "gatewayClassName"),
            listeners,
        ))
    }

    /// Project an HTTPRoute item. `None` when `metadata` or `spec` is missing.
    pub fn to_route(&self) -> Option<Route> {
        let (name, namespace) = self.identity()?;
        let spec = self.spec()?;

        let hostnames = spec
            .get("hostnames")
            .and_then(Value::as_array)
            .map(|hosts| {
                hosts
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Some(Route::new(name, namespace, hostnames))
    }
}

/// Missing or non-string fields read as empty
fn string_field(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Parse a Gateway listing. Fails only when the document cannot be decoded at all.
pub fn parse_gateways(document: &str) -> serde_json::Result<Vec<Gateway>> {
    let list = RawResourceList::parse(document)?;
    Ok(list
        .resources()
        .iter()
        .filter_map(RawResource::to_gateway)
        .collect())
}

/// Parse an HTTPRoute listing. Fails only when the document cannot be decoded at all.
pub fn parse_routes(document: &str) -> serde_json::Result<Vec<Route>> {
    let list = RawResourceList::parse(document)?;
    Ok(list
        .resources()
        .iter()
        .filter_map(RawResource::to_route)
        .collect())
}
