use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============= Authentication Models =============

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: Option<bool>,
}

// ============= JSON:API envelope (v2) =============

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonApiEnvelope<A> {
    pub data: JsonApiData<A>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonApiData<A> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub data_type: String,
    pub attributes: A,
}

impl<A> JsonApiEnvelope<A> {
    pub fn new(data_type: impl Into<String>, attributes: A) -> Self {
        Self {
            data: JsonApiData {
                id: None,
                data_type: data_type.into(),
                attributes,
            },
        }
    }
}

// ============= Monitors Models =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monitor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(rename = "type")]
    pub monitor_type: String,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default)]
    pub options: MonitorOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricted_roles: Option<Vec<String>>,
    #[serde(default, skip_serializing)]
    pub overall_state: Option<String>,
    #[serde(default, skip_serializing)]
    pub created: Option<String>,
    #[serde(default, skip_serializing)]
    pub modified: Option<String>,
    #[serde(default, skip_serializing)]
    pub deleted: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<MonitorThresholds>,
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
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorThresholds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_recovery: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_recovery: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok: Option<f64>,
}

// ============= Downtime Models =============

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Downtime {
    #[serde(default, skip_serializing)]
    pub id: Option<i64>,
    #[serde(default)]
    pub scope: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub monitor_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing)]
    pub active: Option<bool>,
    #[serde(default, skip_serializing)]
    pub disabled: Option<bool>,
    /// Unix time the downtime was canceled; deleting only cancels it.
    #[serde(default, skip_serializing)]
    pub canceled: Option<i64>,
}

// ============= Dashboard List Models =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardList {
    #[serde(default, skip_serializing)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, skip_serializing)]
    pub dashboard_count: Option<i64>,
}

// ============= Logs Archive Models =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogsArchiveAttributes {
    pub name: String,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<LogsArchiveDestination>,
    #[serde(default)]
    pub include_tags: bool,
    #[serde(default)]
    pub rehydration_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rehydration_max_scan_size_in_gb: Option<i64>,
    #[serde(default, skip_serializing)]
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LogsArchiveDestination {
    S3 {
        bucket: String,
        #[serde(default)]
        path: Option<String>,
        integration: S3Integration,
    },
    Gcs {
        bucket: String,
        #[serde(default)]
        path: Option<String>,
        integration: GcsIntegration,
    },
    Azure {
        container: String,
        storage_account: String,
        #[serde(default)]
        path: Option<String>,
        #[serde(default)]
        region: Option<String>,
        integration: AzureIntegration,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct S3Integration {
    pub account_id: String,
    pub role_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GcsIntegration {
    pub client_email: String,
    pub project_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AzureIntegration {
    pub client_id: String,
    pub tenant_id: String,
}

// ============= Deployment Gate Models =============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentGateAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_monitor_response_ignores_unknown_fields() {
        let monitor: Monitor = serde_json::from_value(json!({
            "id": 12345,
            "name": "CPU high",
            "type": "metric alert",
            "query": "avg(last_5m):avg:system.cpu.user{*} > 90",
            "tags": ["team:core"],
            "overall_state": "OK",
            "org_id": 2,
            "options": {"thresholds": {"critical": 90.0}, "silenced": {}}
        }))
        .unwrap();

        assert_eq!(monitor.id, Some(12345));
        assert_eq!(monitor.options.thresholds.unwrap().critical, Some(90.0));
        assert!(monitor.options.extra.contains_key("silenced"));
    }

    #[test]
    fn test_monitor_request_omits_read_only_fields() {
        let monitor: Monitor = serde_json::from_value(json!({
            "id": 1,
            "name": "n",
            "type": "query alert",
            "query": "q",
            "overall_state": "Alert"
        }))
        .unwrap();

        let body = serde_json::to_value(&monitor).unwrap();
        assert!(body.get("overall_state").is_none());
        assert_eq!(body["options"], json!({}));
    }

    #[test]
    fn test_archive_destination_tagging() {
        let destination: LogsArchiveDestination = serde_json::from_value(json!({
            "type": "gcs",
            "bucket": "archives",
            "integration": {"client_email": "a@b.iam", "project_id": "p"}
        }))
        .unwrap();

        assert!(matches!(destination, LogsArchiveDestination::Gcs { ref bucket, .. } if bucket == "archives"));
        assert_eq!(serde_json::to_value(&destination).unwrap()["type"], "gcs");
    }
}
