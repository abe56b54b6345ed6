// Mock responders for wiremock
// Lets a single endpoint answer differently on successive calls

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Replies with each template in turn, then repeats the last one.
pub struct ResponseSequence {
    responses: Mutex<Vec<ResponseTemplate>>,
    calls: AtomicUsize,
}

impl ResponseSequence {
    pub fn new(responses: Vec<ResponseTemplate>) -> Self {
        assert!(!responses.is_empty(), "ResponseSequence needs at least one response");
        Self {
            responses: Mutex::new(responses),
            calls: AtomicUsize::new(0),
        }
    }
}

impl Respond for ResponseSequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let responses = self.responses.lock().unwrap();
        responses[n.min(responses.len() - 1)].clone()
    }
}

pub fn json_response(status: u16, body: Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(body)
}

pub fn not_found() -> ResponseTemplate {
    json_response(404, serde_json::json!({"errors": ["Not Found"]}))
}

/// Mount a GET on `endpoint` that walks through `responses`.
pub async fn mount_get_sequence(
    server: &MockServer,
    endpoint: &str,
    responses: Vec<ResponseTemplate>,
) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseSequence::new(responses))
        .mount(server)
        .await;
}

/// Requests the server has seen for `endpoint`.
pub async fn request_count(server: &MockServer, endpoint: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == endpoint)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_response_sequence_repeats_last() {
        let server = MockServer::start().await;
        mount_get_sequence(&server, "/seq", vec![not_found(), ResponseTemplate::new(204)]).await;

        let client = reqwest::Client::new();
        let url = format!("{}/seq", server.uri());
        let statuses = [
            client.get(&url).send().await.unwrap().status().as_u16(),
            client.get(&url).send().await.unwrap().status().as_u16(),
            client.get(&url).send().await.unwrap().status().as_u16(),
        ];

        assert_eq!(statuses, [404, 204, 204]);
        assert_eq!(request_count(&server, "/seq").await, 3);
    }
}
