use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tokio::time::Instant;

use super::models::ValidateResponse;
use super::retry;
use crate::config::{HttpRetryConfig, ProviderConfig};
use crate::error::{DatadogError, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct DatadogClient {
    client: Client,
    api_key: Option<String>,
    app_key: Option<String>,
    base_url: String,
    retry: HttpRetryConfig,
}

impl DatadogClient {
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let base_url = config.base_url()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(concat!("datadog-provider/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(DatadogError::NetworkError)?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            app_key: config.app_key.clone(),
            base_url,
            retry: config.http_retry.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<impl Serialize>,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        let started = Instant::now();

        let mut retries = 0;
        loop {
            let mut request = self
                .client
                .request(method.clone(), &url)
                .header("Content-Type", "application/json");

            if let Some(ref key) = self.api_key {
                request = request.header("DD-API-KEY", key);
            }
            if let Some(ref key) = self.app_key {
                request = request.header("DD-APPLICATION-KEY", key);
            }

            if let Some(ref data) = body {
                request = request.json(data);
            }

            log::debug!("{} {}", method, endpoint);
            let response = request.send().await?;
            let status = response.status();

            if retry::is_retryable_status(status) && retry::should_retry(&self.retry, retries) {
                let backoff = retry::calculate_backoff(&self.retry, retries + 1);
                let wait = if status == StatusCode::TOO_MANY_REQUESTS {
                    retry::rate_limit_reset(response.headers()).unwrap_or(backoff)
                } else {
                    backoff
                };

                if retry::within_budget(&self.retry, started.elapsed(), wait) {
                    retries += 1;
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        log::warn!("Rate limited on {} {}, retrying in {:?}", method, endpoint, wait);
                    } else {
                        log::debug!(
                            "HTTP {} on {} {}, retry {}/{} in {:?}",
                            status,
                            method,
                            endpoint,
                            retries,
                            self.retry.max_retries,
                            wait
                        );
                    }
                    tokio::time::sleep(wait).await;
                    continue;
                }
            }

            return self.handle_response(endpoint, response).await;
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        response: Response,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let text = response.text().await.map_err(DatadogError::NetworkError)?;
            if text.trim().is_empty() {
                return Ok(serde_json::from_value(Value::Null)?);
            }
            Ok(serde_json::from_str(&text)?)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    Err(DatadogError::AuthError(error_text))
                }
                StatusCode::NOT_FOUND => Err(DatadogError::NotFound(endpoint.to_string())),
                StatusCode::TOO_MANY_REQUESTS => Err(DatadogError::RateLimitError),
                StatusCode::REQUEST_TIMEOUT => Err(DatadogError::TimeoutError),
                _ => Err(DatadogError::ApiError {
                    status: status.as_u16(),
                    message: error_text,
                }),
            }
        }
    }

    // ============= Authentication API =============

    /// Check the configured API key against `/api/v1/validate`.
    pub async fn validate(&self) -> Result<bool> {
        let response: ValidateResponse = self
            .request(Method::GET, "/api/v1/validate", None::<()>)
            .await?;
        Ok(response.valid.unwrap_or(false))
    }

    // ============= Generic JSON API =============

    pub async fn get(&self, endpoint: &str) -> Result<Value> {
        self.request(Method::GET, endpoint, None::<()>).await
    }

    /// Send `body` with `method`; used for POST, PUT and PATCH.
    pub async fn send(&self, method: Method, endpoint: &str, body: &Value) -> Result<Value> {
        self.request(method, endpoint, Some(body)).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<()> {
        let _: Value = self
            .request(Method::DELETE, endpoint, None::<()>)
            .await?;
        Ok(())
    }
}
