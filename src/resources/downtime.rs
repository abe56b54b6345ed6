use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{MapperContext, ResourceMapper, attributes_as, response_id, to_attributes};
use crate::datadog::models::Downtime;
use crate::error::{DatadogError, Result};
use crate::state::ResourceState;

pub const TYPE_NAME: &str = "datadog_downtime";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DowntimeAttributes {
    pub scope: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_id: Option<i64>,
    #[serde(default)]
    pub monitor_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

pub struct DowntimeMapper;

fn to_datetime(field: &str, ts: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0).ok_or_else(|| {
        DatadogError::InvalidInput(format!("{} is not a valid unix timestamp: {}", field, ts))
    })
}

impl ResourceMapper for DowntimeMapper {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn collection_path(&self) -> &'static str {
        "/api/v1/downtime"
    }

    fn build_create(&self, state: &ResourceState, _ctx: &MapperContext) -> Result<Value> {
        let attrs: DowntimeAttributes = attributes_as(TYPE_NAME, state)?;

        if attrs.scope.is_empty() {
            return Err(DatadogError::InvalidInput(
                "datadog_downtime requires at least one scope".to_string(),
            ));
        }

        if let (Some(start), Some(end)) = (attrs.start, attrs.end) {
            let (start_at, end_at) = (to_datetime("start", start)?, to_datetime("end", end)?);
            if end_at <= start_at {
                return Err(DatadogError::InvalidInput(format!(
                    "downtime end ({}) must be after start ({})",
                    end_at.to_rfc3339(),
                    start_at.to_rfc3339()
                )));
            }
        }

        let downtime = Downtime {
            scope: attrs.scope,
            start: attrs.start,
            end: attrs.end,
            message: attrs.message,
            monitor_id: attrs.monitor_id,
            monitor_tags: attrs.monitor_tags,
            timezone: attrs.timezone,
            ..Downtime::default()
        };

        Ok(serde_json::to_value(downtime)?)
    }

    fn read_response(&self, body: Value) -> Result<ResourceState> {
        let id = response_id(TYPE_NAME, body.get("id"))?;
        let downtime: Downtime = serde_json::from_value(body)?;

        let attrs = DowntimeAttributes {
            scope: downtime.scope,
            start: downtime.start,
            end: downtime.end,
            message: downtime.message,
            monitor_id: downtime.monitor_id,
            monitor_tags: downtime.monitor_tags,
            timezone: downtime.timezone,
            active: downtime.active,
            disabled: downtime.disabled,
        };

        Ok(ResourceState {
            id,
            attributes: to_attributes(&attrs)?,
        })
    }

    /// Canceled downtimes are still served by GET but can't be used again.
    fn is_gone(&self, body: &Value) -> bool {
        body.get("canceled").is_some_and(|c| !c.is_null())
    }

    /// After DELETE a downtime is either canceled or no longer active.
    fn is_destroyed(&self, body: &Value) -> bool {
        self.is_gone(body) || !body.get("active").and_then(Value::as_bool).unwrap_or(false)
    }
}
