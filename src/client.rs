//! Client for the remote Condenses compression service.
//!
//! One outbound `POST /api/organic` per call, authenticated with the caller's
//! API key. The service tier, target model, miner override, and incentive
//! threshold are opaque service-side parameters passed through verbatim.
//! Every failure mode collapses into [`CompressError`]; callers record the
//! sample as failed rather than propagating.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::types::COMPRESS_TIMEOUT_SECS;

/// Header carrying the caller's API key, per the Condenses API contract.
const API_KEY_HEADER: &str = "user-api-key";

#[derive(Debug, Error)]
pub enum CompressError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Seam between the benchmark runner and the remote service, so tests can
/// substitute deterministic stubs.
#[async_trait]
pub trait Compressor: Send + Sync {
    async fn compress(&self, context: &str) -> Result<String, CompressError>;
}

#[derive(Serialize)]
struct CompressRequest<'a> {
    context: &'a str,
    tier: &'a str,
    target_model: &'a str,
    miner_uid: i64,
    top_incentive: f64,
}

#[derive(Deserialize)]
struct CompressResponse {
    compressed_context: Option<String>,
}

/// HTTP client for the Condenses compression API.
pub struct CondensesClient {
    http: reqwest::Client,
    base_url: String,
}

impl CondensesClient {
    pub fn new(base_url: impl Into<String>, api_key: &str) -> Result<Self, CompressError> {
        Self::with_timeout(base_url, api_key, Duration::from_secs(COMPRESS_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, CompressError> {
        let mut headers = HeaderMap::new();
        // An unparsable key (control chars etc.) degrades to an unauthenticated
        // client; the service rejects those calls and each sample records the
        // failure sentinel, same as the missing-key case.
        if let Ok(value) = HeaderValue::from_str(api_key) {
            headers.insert(API_KEY_HEADER, value);
        }
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }
}

#[async_trait]
impl Compressor for CondensesClient {
    async fn compress(&self, context: &str) -> Result<String, CompressError> {
        let payload = CompressRequest {
            context,
            tier: "universal",
            target_model: "llama",
            miner_uid: -1,
            top_incentive: 0.1,
        };

        let response = self
            .http
            .post(format!("{}/api/organic", self.base_url))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompressError::Status(status));
        }

        // A 200 without the field counts as an empty compressed context, i.e.
        // a successful measurement of zero tokens.
        let body: CompressResponse = response.json().await?;
        let compressed = body.compressed_context.unwrap_or_default();
        debug!(
            context_bytes = context.len(),
            compressed_bytes = compressed.len(),
            "Compression call succeeded"
        );
        Ok(compressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn sends_api_contract_and_parses_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/organic"))
            .and(header(API_KEY_HEADER, "test-key"))
            .and(body_partial_json(json!({
                "context": "some long context",
                "tier": "universal",
                "target_model": "llama",
                "miner_uid": -1,
                "top_incentive": 0.1
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "compressed_context": "short"
            })))
            .mount(&server)
            .await;

        let client = CondensesClient::new(server.uri(), "test-key").unwrap();
        let out = client.compress("some long context").await.unwrap();
        assert_eq!(out, "short");
    }

    #[tokio::test]
    async fn non_success_status_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/organic"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = CondensesClient::new(server.uri(), "k").unwrap();
        let err = client.compress("ctx").await.unwrap_err();
        assert!(matches!(err, CompressError::Status(s) if s.as_u16() == 503));
    }

    #[tokio::test]
    async fn missing_field_is_empty_compressed_context() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/organic"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unrelated": 1})))
            .mount(&server)
            .await;

        let client = CondensesClient::new(server.uri(), "k").unwrap();
        // A 200 without the field is still a success, with nothing compressed
        let out = client.compress("ctx").await.unwrap();
        assert_eq!(out, "");
    }

    #[tokio::test]
    async fn malformed_body_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/organic"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = CondensesClient::new(server.uri(), "k").unwrap();
        let err = client.compress("ctx").await.unwrap_err();
        assert!(matches!(err, CompressError::Transport(_)));
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/organic"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"compressed_context": "late"}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client =
            CondensesClient::with_timeout(server.uri(), "k", Duration::from_millis(50)).unwrap();
        let err = client.compress("ctx").await.unwrap_err();
        match err {
            CompressError::Transport(e) => assert!(e.is_timeout()),
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
