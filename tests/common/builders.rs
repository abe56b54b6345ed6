// Test data builders for API bodies and Terraform state files
// These builders provide a fluent API for creating test fixtures

use serde_json::{Value, json};

/// Builder for `/api/v1/monitor` response bodies
pub struct MonitorBuilder {
    id: i64,
    name: String,
    query: String,
    tags: Vec<String>,
    deleted: Option<String>,
}

impl MonitorBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            name: "tf-monitor".to_string(),
            query: "avg(last_5m):avg:system.cpu.user{*} > 90".to_string(),
            tags: Vec::new(),
            deleted: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Mark the monitor soft-deleted, as the API reports it right after a DELETE.
    pub fn deleted(mut self) -> Self {
        self.deleted = Some("2025-01-01T00:00:00.000000+00:00".to_string());
        self
    }

    pub fn build(self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "type": "metric alert",
            "query": self.query,
            "message": "CPU high @ops",
            "tags": self.tags,
            "options": {
                "notify_no_data": false,
                "thresholds": {"critical": 90.0, "warning": 80.0}
            },
            "overall_state": "OK",
            "created": "2025-01-01T00:00:00.000000+00:00",
            "modified": "2025-01-01T00:00:00.000000+00:00",
            "deleted": self.deleted,
        })
    }
}

/// Builder for version 4 `terraform.tfstate` documents
pub struct StateFileBuilder {
    resources: Vec<Value>,
}

impl StateFileBuilder {
    pub fn new() -> Self {
        Self {
            resources: Vec::new(),
        }
    }

    /// Add a managed root-module resource with a single instance.
    pub fn with_resource(mut self, resource_type: &str, name: &str, id: &str) -> Self {
        self.resources.push(json!({
            "mode": "managed",
            "type": resource_type,
            "name": name,
            "provider": "provider[\"registry.terraform.io/datadog/datadog\"]",
            "instances": [{"schema_version": 0, "attributes": {"id": id}}]
        }));
        self
    }

    /// Add a data source, which the checks must ignore.
    pub fn with_data_source(mut self, resource_type: &str, name: &str, id: &str) -> Self {
        self.resources.push(json!({
            "mode": "data",
            "type": resource_type,
            "name": name,
            "instances": [{"attributes": {"id": id}}]
        }));
        self
    }

    pub fn build(self) -> String {
        json!({
            "version": 4,
            "terraform_version": "1.9.5",
            "serial": 3,
            "lineage": "8a0e7b4c-54f4-4b53-9d8f-1f4c2b1d2c3e",
            "resources": self.resources,
        })
        .to_string()
    }
}

impl Default for StateFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_builder() {
        let body = MonitorBuilder::new(42).with_tags(&["env:ci"]).deleted().build();
        assert_eq!(body["id"], 42);
        assert_eq!(body["tags"], json!(["env:ci"]));
        assert!(body["deleted"].is_string());
    }

    #[test]
    fn test_state_file_builder() {
        let state: Value = serde_json::from_str(
            &StateFileBuilder::new()
                .with_resource("datadog_monitor", "foo", "1")
                .build(),
        )
        .unwrap();
        assert_eq!(state["version"], 4);
        assert_eq!(state["resources"][0]["instances"][0]["attributes"]["id"], "1");
    }
}
