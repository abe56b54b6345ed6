//! State-to-API mappers, one per Terraform resource type.
//!
//! A mapper is declarative: it knows the REST paths of its resource, how to
//! turn flat resource attributes into a request body, and how to turn a
//! response back into attributes. The [`crate::provider::Provider`] drives the
//! HTTP side.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{DatadogError, Result};
use crate::state::ResourceState;

pub mod dashboard_json;
pub mod dashboard_list;
pub mod deployment_gate;
pub mod downtime;
pub mod logs_archive;
pub mod monitor;

pub use dashboard_json::DashboardJsonMapper;
pub use dashboard_list::DashboardListMapper;
pub use deployment_gate::DeploymentGateMapper;
pub use downtime::DowntimeMapper;
pub use logs_archive::LogsArchiveMapper;
pub use monitor::MonitorMapper;

/// Provider-wide settings a mapper may need while building a request.
#[derive(Debug, Clone, Default)]
pub struct MapperContext {
    pub default_tags: BTreeMap<String, String>,
}

pub trait ResourceMapper: Send + Sync {
    /// Terraform type name, e.g. `datadog_monitor`.
    fn type_name(&self) -> &'static str;

    /// Path used to create the resource.
    fn collection_path(&self) -> &'static str;

    fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.collection_path(), id)
    }

    fn update_method(&self) -> Method {
        Method::PUT
    }

    fn build_create(&self, state: &ResourceState, ctx: &MapperContext) -> Result<Value>;

    fn build_update(&self, state: &ResourceState, ctx: &MapperContext) -> Result<Value> {
        self.build_create(state, ctx)
    }

    fn read_response(&self, body: Value) -> Result<ResourceState>;

    /// A successful read that still means the object is gone.
    fn is_gone(&self, _body: &Value) -> bool {
        false
    }

    /// A successful read that a destroy check accepts as destroyed.
    /// Looser than [`ResourceMapper::is_gone`] for types whose DELETE only
    /// deactivates the object.
    fn is_destroyed(&self, body: &Value) -> bool {
        self.is_gone(body)
    }
}

static MAPPERS: &[&dyn ResourceMapper] = &[
    &MonitorMapper,
    &DowntimeMapper,
    &DashboardListMapper,
    &DashboardJsonMapper,
    &LogsArchiveMapper,
    &DeploymentGateMapper,
];

pub fn lookup(type_name: &str) -> Option<&'static dyn ResourceMapper> {
    MAPPERS.iter().copied().find(|m| m.type_name() == type_name)
}

pub fn supported_types() -> Vec<&'static str> {
    MAPPERS.iter().map(|m| m.type_name()).collect()
}

/// Deserialize a resource's attributes into a typed model.
pub(crate) fn attributes_as<T: DeserializeOwned>(
    type_name: &str,
    state: &ResourceState,
) -> Result<T> {
    serde_json::from_value(Value::Object(state.attributes.clone())).map_err(|e| {
        DatadogError::InvalidInput(format!("invalid {} attributes: {}", type_name, e))
    })
}

/// Serialize a typed model back into flat attributes.
pub(crate) fn to_attributes<T: Serialize>(model: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(model)? {
        Value::Object(map) => Ok(map),
        other => Err(DatadogError::InvalidInput(format!(
            "expected an object, got {}",
            other
        ))),
    }
}

/// Pull a string or numeric id out of a response.
pub(crate) fn response_id(type_name: &str, id: Option<&Value>) -> Result<String> {
    match id {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(DatadogError::InvalidInput(format!(
            "{} response is missing an id",
            type_name
        ))),
    }
}
