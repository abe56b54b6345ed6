use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{MapperContext, ResourceMapper, attributes_as, response_id, to_attributes};
use crate::datadog::models::{Monitor, MonitorOptions, MonitorThresholds};
use crate::error::Result;
use crate::state::ResourceState;
use crate::tags::apply_default_tags;

pub const TYPE_NAME: &str = "datadog_monitor";

/// `datadog_monitor` attributes; thresholds are nested, the other options are flat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorAttributes {
    pub name: String,
    #[serde(rename = "type")]
    pub monitor_type: String,
    pub query: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_no_data: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_audit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_h: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renotify_interval: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_tags: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_group_delay: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_delay: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_thresholds: Option<MonitorThresholds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricted_roles: Option<Vec<String>>,
}

pub struct MonitorMapper;

impl ResourceMapper for MonitorMapper {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn collection_path(&self) -> &'static str {
        "/api/v1/monitor"
    }

    fn build_create(&self, state: &ResourceState, ctx: &MapperContext) -> Result<Value> {
        let attrs: MonitorAttributes = attributes_as(TYPE_NAME, state)?;

        let monitor = Monitor {
            id: None,
            name: attrs.name,
            monitor_type: attrs.monitor_type,
            query: attrs.query,
            message: Some(attrs.message),
            tags: apply_default_tags(&attrs.tags, &ctx.default_tags),
            priority: attrs.priority,
            options: MonitorOptions {
                thresholds: attrs.monitor_thresholds,
                notify_no_data: attrs.notify_no_data,
                notify_audit: attrs.notify_audit,
                timeout_h: attrs.timeout_h,
                renotify_interval: attrs.renotify_interval,
                include_tags: attrs.include_tags,
                new_group_delay: attrs.new_group_delay,
                evaluation_delay: attrs.evaluation_delay,
                ..MonitorOptions::default()
            },
            restricted_roles: attrs.restricted_roles,
            overall_state: None,
            created: None,
            modified: None,
            deleted: None,
        };

        Ok(serde_json::to_value(monitor)?)
    }

    fn read_response(&self, body: Value) -> Result<ResourceState> {
        let id = response_id(TYPE_NAME, body.get("id"))?;
        let monitor: Monitor = serde_json::from_value(body)?;

        let attrs = MonitorAttributes {
            name: monitor.name,
            monitor_type: monitor.monitor_type,
            query: monitor.query,
            message: monitor.message.unwrap_or_default(),
            tags: monitor.tags,
            priority: monitor.priority,
            notify_no_data: monitor.options.notify_no_data,
            notify_audit: monitor.options.notify_audit,
            timeout_h: monitor.options.timeout_h,
            renotify_interval: monitor.options.renotify_interval,
            include_tags: monitor.options.include_tags,
            new_group_delay: monitor.options.new_group_delay,
            evaluation_delay: monitor.options.evaluation_delay,
            monitor_thresholds: monitor.options.thresholds,
            restricted_roles: monitor.restricted_roles,
        };

        Ok(ResourceState {
            id,
            attributes: to_attributes(&attrs)?,
        })
    }

    /// Soft-deleted monitors still answer GET with a `deleted` timestamp.
    fn is_gone(&self, body: &Value) -> bool {
        body.get("deleted").is_some_and(|d| !d.is_null())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn state() -> ResourceState {
        ResourceState::from_value(json!({
            "name": "tf-monitor",
            "type": "metric alert",
            "query": "avg(last_5m):avg:system.cpu.user{*} > 90",
            "message": "CPU high @ops",
            "tags": ["foo:bar", "baz"],
            "notify_no_data": false,
            "monitor_thresholds": {"critical": 90.0, "warning": 80.0}
        }))
        .unwrap()
    }

    #[test]
    fn test_build_create_nests_options() {
        let body = MonitorMapper
            .build_create(&state(), &MapperContext::default())
            .unwrap();

        assert_eq!(body["type"], "metric alert");
        assert_eq!(body["options"]["thresholds"]["critical"], 90.0);
        assert_eq!(body["options"]["notify_no_data"], false);
        assert!(body.get("id").is_none());
        assert!(body.get("monitor_thresholds").is_none());
    }

    #[test]
    fn test_build_create_applies_default_tags() {
        let ctx = MapperContext {
            default_tags: BTreeMap::from([
                ("foo".to_string(), "other".to_string()),
                ("team".to_string(), "core".to_string()),
            ]),
        };
        let body = MonitorMapper.build_create(&state(), &ctx).unwrap();

        assert_eq!(body["tags"], json!(["foo:bar", "baz", "team:core"]));
    }

    #[test]
    fn test_read_response_flattens_options() {
        let state = MonitorMapper
            .read_response(json!({
                "id": 2081,
                "name": "tf-monitor",
                "type": "metric alert",
                "query": "q",
                "message": "m",
                "tags": ["a:b"],
                "overall_state": "No Data",
                "options": {"thresholds": {"critical": 2.0}, "notify_audit": true, "silenced": {}}
            }))
            .unwrap();

        assert_eq!(state.id, "2081");
        assert_eq!(state.get("notify_audit"), Some(&json!(true)));
        assert_eq!(state.get("monitor_thresholds"), Some(&json!({"critical": 2.0})));
        assert!(state.get("overall_state").is_none());
    }

    #[test]
    fn test_missing_required_attribute() {
        let state = ResourceState::from_value(json!({"name": "x"})).unwrap();
        assert!(MonitorMapper.build_create(&state, &MapperContext::default()).is_err());
    }

    #[test]
    fn test_soft_deleted_monitor_is_gone() {
        assert!(MonitorMapper.is_gone(&json!({"id": 1, "deleted": "2024-01-01T00:00:00Z"})));
        assert!(!MonitorMapper.is_gone(&json!({"id": 1, "deleted": null})));
        assert!(!MonitorMapper.is_gone(&json!({"id": 1})));
    }
}
