// Common test utilities and helpers for the Datadog provider tests
// Builds providers pointed at a wiremock server and shared assertions

#![allow(dead_code)]

pub mod builders;
pub mod fixtures;
pub mod mocks;

use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use datadog_provider::config::HttpRetryConfig;
use datadog_provider::resources::MapperContext;
use datadog_provider::{DatadogClient, Provider, ProviderConfig};
use serde_json::Value;
use wiremock::MockServer;

/// Provider config aimed at the mock server, no startup validation.
pub fn mock_config(server: &MockServer) -> ProviderConfig {
    ProviderConfig {
        api_url: Some(server.uri()),
        validate: false,
        http_retry: fast_retry(),
        ..ProviderConfig::new("test_api_key", "test_app_key")
    }
}

/// HTTP retries with millisecond backoff so 5xx paths stay quick.
pub fn fast_retry() -> HttpRetryConfig {
    HttpRetryConfig {
        backoff_base: Duration::from_millis(1),
        timeout: Duration::from_secs(5),
        ..HttpRetryConfig::default()
    }
}

pub fn mock_provider(server: &MockServer) -> Provider {
    mock_provider_with_tags(server, BTreeMap::new())
}

pub fn mock_provider_with_tags(server: &MockServer, default_tags: BTreeMap<String, String>) -> Provider {
    let config = mock_config(server);
    let client = DatadogClient::from_config(&config).expect("client from mock config");
    Provider::with_client(Arc::new(client), MapperContext { default_tags })
}

/// Assertion helper utilities for common test scenarios
pub struct AssertionHelper;

impl AssertionHelper {
    /// Assert that a result is an error whose message contains `expected_msg`
    pub fn assert_error_contains<T: std::fmt::Debug>(result: Result<T, impl Display>, expected_msg: &str) {
        match result {
            Ok(value) => panic!("Expected error containing '{}', but got {:?}", expected_msg, value),
            Err(e) => {
                let error_str = e.to_string();
                assert!(
                    error_str.contains(expected_msg),
                    "Error message '{}' does not contain expected string '{}'",
                    error_str,
                    expected_msg
                );
            }
        }
    }

    pub fn assert_json_has_field(json: &Value, field: &str) {
        assert!(
            json.get(field).is_some(),
            "JSON does not contain required field '{}'",
            field
        );
    }

    pub fn assert_json_lacks_field(json: &Value, field: &str) {
        assert!(
            json.get(field).is_none(),
            "JSON unexpectedly contains field '{}'",
            field
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assertion_helper_json_field() {
        let json = json!({"id": 1, "name": "tf-monitor"});
        AssertionHelper::assert_json_has_field(&json, "id");
        AssertionHelper::assert_json_lacks_field(&json, "deleted");
    }

    #[test]
    #[should_panic(expected = "JSON does not contain required field")]
    fn test_assertion_helper_missing_field() {
        let json = json!({"other": "value"});
        AssertionHelper::assert_json_has_field(&json, "id");
    }
}
