//! # Contact Relay Client
//!
//! File: cli/src/contact/relay.rs
//! Author: Christi Mahu
//!
//! The form side of `POST /api/contact`.

use super::submission::ContactSubmission;
use crate::core::error::FolioError;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[async_trait]
pub trait ContactRelay: Send + Sync {
    /// Hands a validated submission to the email relay.
    async fn relay(&self, submission: &ContactSubmission) -> Result<(), FolioError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Posts submissions to a running relay endpoint.
pub struct HttpContactRelay {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpContactRelay {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FolioError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ContactRelay for HttpContactRelay {
    async fn relay(&self, submission: &ContactSubmission) -> Result<(), FolioError> {
        debug!("Posting contact submission to {}", self.endpoint);
        let response = self.client.post(&self.endpoint).json(submission).send().await?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status().as_u16();
        let detail = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| "no error detail".to_string());
        Err(FolioError::Relay(format!("HTTP {}: {}", status, detail)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::submission::ContactRequest;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn submission() -> ContactSubmission {
        ContactSubmission::validate(&ContactRequest::new("Ada", "ada@example.com", Some("Hi"), "Hello"))
            .unwrap()
    }

    #[tokio::test]
    async fn test_relay_posts_submission_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/contact"))
            .and(body_json(serde_json::json!({
                "name": "Ada",
                "email": "ada@example.com",
                "subject": "Hi",
                "message": "Hello"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let relay = HttpContactRelay::new(format!("{}/api/contact", server.uri()), Duration::from_secs(5)).unwrap();
        relay.relay(&submission()).await.unwrap();
    }

    #[tokio::test]
    async fn test_relay_surfaces_server_error_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({ "error": "Failed to send email." })),
            )
            .mount(&server)
            .await;

        let relay = HttpContactRelay::new(server.uri(), Duration::from_secs(5)).unwrap();
        let err = relay.relay(&submission()).await.unwrap_err();
        assert_eq!(err.to_string(), "Contact relay failed: HTTP 500: Failed to send email.");
    }
}
