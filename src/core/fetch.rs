use std::fmt;

use reqwest::Client;
use serde_json::Value;

/// Why a fetch produced no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailureKind {
    /// The request never completed (DNS, connect, timeout).
    Transport,
    /// The server answered with a non-success status.
    Status,
    /// The body was not valid JSON.
    Decode,
}

impl fmt::Display for FetchFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailureKind::Transport => f.write_str("transport"),
            FetchFailureKind::Status => f.write_str("status"),
            FetchFailureKind::Decode => f.write_str("decode"),
        }
    }
}

/// Outcome of a single fetch attempt. Callers must handle both branches; a
/// failure is "no data", not a crash.
#[derive(Debug)]
pub enum FetchOutcome {
    Success(Value),
    Failure {
        kind: FetchFailureKind,
        message: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// One GET, no retries, transport-default timeout.
    pub async fn fetch_json(&self, url: &str) -> FetchOutcome {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                return FetchOutcome::Failure {
                    kind: FetchFailureKind::Transport,
                    message: e.to_string(),
                }
            }
        };

        tracing::debug!("API response status: {}", response.status());

        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(e) => {
                return FetchOutcome::Failure {
                    kind: FetchFailureKind::Status,
                    message: e.to_string(),
                }
            }
        };

        match response.json().await {
            Ok(value) => FetchOutcome::Success(value),
            Err(e) => FetchOutcome::Failure {
                kind: FetchFailureKind::Decode,
                message: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_success_returns_payload() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/countries");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([{"name": "Brazil"}]));
        });

        let outcome = Fetcher::new().fetch_json(&server.url("/countries")).await;

        api_mock.assert();
        match outcome {
            FetchOutcome::Success(value) => assert_eq!(value[0]["name"], "Brazil"),
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_a_status_failure() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/countries");
            then.status(500);
        });

        let outcome = Fetcher::new().fetch_json(&server.url("/countries")).await;

        api_mock.assert();
        match outcome {
            FetchOutcome::Failure { kind, .. } => assert_eq!(kind, FetchFailureKind::Status),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_a_decode_failure() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/countries");
            then.status(200)
                .header("Content-Type", "application/json")
                .body("not json at all");
        });

        let outcome = Fetcher::new().fetch_json(&server.url("/countries")).await;

        api_mock.assert();
        match outcome {
            FetchOutcome::Failure { kind, .. } => assert_eq!(kind, FetchFailureKind::Decode),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_a_transport_failure() {
        let outcome = Fetcher::new().fetch_json("http://127.0.0.1:1/countries").await;

        match outcome {
            FetchOutcome::Failure { kind, message } => {
                assert_eq!(kind, FetchFailureKind::Transport);
                assert!(!message.is_empty());
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }
}
