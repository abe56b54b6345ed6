use serde_json::Value;

use super::{MapperContext, ResourceMapper, attributes_as, response_id, to_attributes};
use crate::datadog::models::{DeploymentGateAttributes, JsonApiEnvelope};
use crate::error::{DatadogError, Result};
use crate::state::ResourceState;

pub const TYPE_NAME: &str = "datadog_deployment_gate";
const DATA_TYPE: &str = "deployment_gate";

pub struct DeploymentGateMapper;

impl ResourceMapper for DeploymentGateMapper {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn collection_path(&self) -> &'static str {
        "/api/v2/deployment_gates"
    }

    fn build_create(&self, state: &ResourceState, _ctx: &MapperContext) -> Result<Value> {
        let attrs: DeploymentGateAttributes = attributes_as(TYPE_NAME, state)?;

        for (field, value) in [("env", &attrs.env), ("service", &attrs.service)] {
            if value.as_deref().is_none_or(str::is_empty) {
                return Err(DatadogError::InvalidInput(format!(
                    "datadog_deployment_gate requires '{}'",
                    field
                )));
            }
        }

        Ok(serde_json::to_value(JsonApiEnvelope::new(DATA_TYPE, attrs))?)
    }

    /// env, service and identifier force a new gate; only dry_run is updatable.
    fn build_update(&self, state: &ResourceState, _ctx: &MapperContext) -> Result<Value> {
        let attrs: DeploymentGateAttributes = attributes_as(TYPE_NAME, state)?;

        let update = DeploymentGateAttributes {
            dry_run: attrs.dry_run,
            ..DeploymentGateAttributes::default()
        };

        Ok(serde_json::to_value(JsonApiEnvelope::new(DATA_TYPE, update))?)
    }

    fn read_response(&self, body: Value) -> Result<ResourceState> {
        let id = response_id(TYPE_NAME, body.pointer("/data/id"))?;
        let envelope: JsonApiEnvelope<DeploymentGateAttributes> = serde_json::from_value(body)?;

        Ok(ResourceState {
            id,
            attributes: to_attributes(&envelope.data.attributes)?,
        })
    }
}
