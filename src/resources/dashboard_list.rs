use serde_json::{Value, json};

use super::{MapperContext, ResourceMapper, response_id};
use crate::datadog::models::DashboardList;
use crate::error::{DatadogError, Result};
use crate::state::ResourceState;

pub const TYPE_NAME: &str = "datadog_dashboard_list";

pub struct DashboardListMapper;

impl ResourceMapper for DashboardListMapper {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn collection_path(&self) -> &'static str {
        "/api/v1/dashboard/lists/manual"
    }

    fn build_create(&self, state: &ResourceState, _ctx: &MapperContext) -> Result<Value> {
        let name = state
            .get_str("name")
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                DatadogError::InvalidInput("datadog_dashboard_list requires a name".to_string())
            })?;

        Ok(json!({ "name": name }))
    }

    fn read_response(&self, body: Value) -> Result<ResourceState> {
        let id = response_id(TYPE_NAME, body.get("id"))?;
        let list: DashboardList = serde_json::from_value(body)?;

        let mut state = ResourceState::new(id).with_attribute("name", json!(list.name));
        if let Some(count) = list.dashboard_count {
            state = state.with_attribute("dashboard_count", json!(count));
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_shape() {
        let state = ResourceState::new("").with_attribute("name", json!("tf-list"));
        let body = DashboardListMapper
            .build_create(&state, &MapperContext::default())
            .unwrap();
        assert_eq!(body, json!({"name": "tf-list"}));

        let read = DashboardListMapper
            .read_response(json!({"id": 4741, "name": "tf-list", "dashboard_count": 0, "type": "manual_dashboard_list"}))
            .unwrap();
        assert_eq!(read.id, "4741");
        assert_eq!(read.get_str("name"), Some("tf-list"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let state = ResourceState::new("").with_attribute("name", json!(""));
        assert!(DashboardListMapper
            .build_create(&state, &MapperContext::default())
            .is_err());
    }
}
