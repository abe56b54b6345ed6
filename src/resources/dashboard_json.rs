use serde_json::{Map, Value, json};

use super::{MapperContext, ResourceMapper, response_id};
use crate::error::{DatadogError, Result};
use crate::state::ResourceState;

pub const TYPE_NAME: &str = "datadog_dashboard_json";

/// Server-managed fields that would otherwise show up as a diff.
const COMPUTED_FIELDS: &[&str] = &[
    "id",
    "author_handle",
    "author_name",
    "created_at",
    "modified_at",
    "url",
];

/// Dashboard managed as a raw JSON document in the `dashboard` attribute.
pub struct DashboardJsonMapper;

fn strip_widget_ids(widgets: &mut [Value]) {
    for widget in widgets {
        let Some(widget) = widget.as_object_mut() else {
            continue;
        };
        widget.remove("id");

        // group widgets nest their children under definition.widgets
        if let Some(Value::Array(children)) = widget
            .get_mut("definition")
            .and_then(|d| d.get_mut("widgets"))
        {
            strip_widget_ids(children);
        }
    }
}

/// Normalize a dashboard document for storage and comparison.
pub fn prepare_dashboard(mut dashboard: Map<String, Value>) -> Map<String, Value> {
    for field in COMPUTED_FIELDS {
        dashboard.remove(*field);
    }

    if let Some(Value::Array(widgets)) = dashboard.get_mut("widgets") {
        strip_widget_ids(widgets);
    }

    // restricted_roles supersedes is_read_only
    if dashboard.get("restricted_roles").is_some_and(Value::is_array) {
        dashboard.remove("is_read_only");
    }

    if let Some(Value::Array(notify_list)) = dashboard.get_mut("notify_list") {
        notify_list.sort_by(|a, b| a.as_str().cmp(&b.as_str()));
    }

    dashboard
}

impl ResourceMapper for DashboardJsonMapper {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn collection_path(&self) -> &'static str {
        "/api/v1/dashboard"
    }

    fn build_create(&self, state: &ResourceState, _ctx: &MapperContext) -> Result<Value> {
        let raw = state.get_str("dashboard").ok_or_else(|| {
            DatadogError::InvalidInput(
                "datadog_dashboard_json requires a 'dashboard' JSON string".to_string(),
            )
        })?;

        match serde_json::from_str::<Value>(raw)? {
            Value::Object(map) => Ok(Value::Object(prepare_dashboard(map))),
            _ => Err(DatadogError::InvalidInput(
                "dashboard must be a JSON object".to_string(),
            )),
        }
    }

    fn read_response(&self, body: Value) -> Result<ResourceState> {
        let id = response_id(TYPE_NAME, body.get("id"))?;
        let url = body.get("url").cloned().unwrap_or(Value::Null);

        let Value::Object(map) = body else {
            return Err(DatadogError::InvalidInput(
                "dashboard response is not an object".to_string(),
            ));
        };

        let dashboard = serde_json::to_string(&prepare_dashboard(map))?;

        Ok(ResourceState::new(id)
            .with_attribute("dashboard", json!(dashboard))
            .with_attribute("url", url))
    }
}
