//! Resource state and the Terraform state file.
//!
//! [`ResourceState`] is the flat attribute map a mapper reads from and writes
//! to. [`StateFile`] understands enough of `terraform.tfstate` (format
//! version 4) to list the managed resources of the root module, which is what
//! the Exists and CheckDestroy helpers walk.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{DatadogError, Result};

const SUPPORTED_STATE_VERSION: u64 = 4;

/// Last known representation of one remote object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    pub id: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl ResourceState {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: Map::new(),
        }
    }

    /// Accepts either a bare attribute object or `{"id": ..., "attributes": {...}}`.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(mut map) => {
                let id = map.remove("id").map(id_to_string).unwrap_or_default();
                let attributes = match map.remove("attributes") {
                    Some(Value::Object(attrs)) if map.is_empty() => attrs,
                    Some(other) => {
                        map.insert("attributes".to_string(), other);
                        map
                    }
                    None => map,
                };
                Ok(Self { id, attributes })
            }
            other => Err(DatadogError::InvalidInput(format!(
                "resource attributes must be a JSON object, got {}",
                other
            ))),
        }
    }

    pub fn with_attribute(mut self, key: &str, value: Value) -> Self {
        self.attributes.insert(key.to_string(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// Attributes as a JSON object, with `id` folded in as Terraform stores it.
    pub fn to_flat_value(&self) -> Value {
        let mut map = self.attributes.clone();
        map.insert("id".to_string(), Value::String(self.id.clone()));
        Value::Object(map)
    }
}

fn id_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateFile {
    pub version: u64,
    #[serde(default)]
    pub terraform_version: Option<String>,
    #[serde(default)]
    pub resources: Vec<StateResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateResource {
    #[serde(default)]
    pub module: Option<String>,
    pub mode: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[serde(default)]
    pub instances: Vec<StateInstance>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateInstance {
    #[serde(default)]
    pub index_key: Option<Value>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

/// A managed root-module instance, as seen by the checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedResource {
    pub address: String,
    pub resource_type: String,
    pub id: String,
}

impl TrackedResource {
    pub fn new(resource_type: &str, name: &str, id: impl Into<String>) -> Self {
        Self {
            address: format!("{}.{}", resource_type, name),
            resource_type: resource_type.to_string(),
            id: id.into(),
        }
    }
}

impl StateFile {
    pub fn parse(content: &str) -> Result<Self> {
        let state: StateFile = serde_json::from_str(content)
            .map_err(|e| DatadogError::StateError(format!("failed to parse state: {}", e)))?;

        if state.version != SUPPORTED_STATE_VERSION {
            return Err(DatadogError::StateError(format!(
                "unsupported state format version {} (expected {})",
                state.version, SUPPORTED_STATE_VERSION
            )));
        }

        Ok(state)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        log::debug!("Loaded state file {}", path.display());
        Self::parse(&content)
    }

    /// Managed resources of the root module, one entry per instance.
    pub fn root_module_resources(&self) -> Vec<TrackedResource> {
        self.resources
            .iter()
            .filter(|r| r.module.is_none() && r.mode == "managed")
            .flat_map(|r| {
                r.instances.iter().map(move |instance| {
                    let address = match &instance.index_key {
                        None => format!("{}.{}", r.resource_type, r.name),
                        Some(Value::String(key)) => {
                            format!("{}.{}[\"{}\"]", r.resource_type, r.name, key)
                        }
                        Some(key) => format!("{}.{}[{}]", r.resource_type, r.name, key),
                    };
                    let id = instance
                        .attributes
                        .get("id")
                        .cloned()
                        .map(id_to_string)
                        .unwrap_or_default();

                    TrackedResource {
                        address,
                        resource_type: r.resource_type.clone(),
                        id,
                    }
                })
            })
            .collect()
    }

    pub fn resources_of_type(&self, resource_type: &str) -> Vec<TrackedResource> {
        self.root_module_resources()
            .into_iter()
            .filter(|r| r.resource_type == resource_type)
            .collect()
    }
}
