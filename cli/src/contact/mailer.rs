//! # Email Delivery
//!
//! File: cli/src/contact/mailer.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Composes the email the relay endpoint sends for a contact submission and
//! delivers it through a [`Mailer`]. The production mailer posts JSON to an
//! HTTP email API with a bearer key; delivery internals stay on the
//! provider's side.
//!
//! ## Examples
//!
//! ```rust
//! let route = MailRoute::from_config(&config.contact).context("no sender configured")?;
//! let email = route.compose(&submission);
//! mailer.send(&email).await?;
//! ```
//!
use super::submission::ContactSubmission;
use crate::core::config::ContactConfig;
use crate::core::error::FolioError;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Display name on relayed mail.
const SENDER_NAME: &str = "Portfolio Contact";

/// A fully composed outgoing email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub text: String,
}

/// Sender and recipient of relayed mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailRoute {
    pub from_email: String,
    pub to_email: String,
}

impl MailRoute {
    /// Each address falls back to the other; `None` when neither is set.
    pub fn from_config(config: &ContactConfig) -> Option<Self> {
        let from = config.from_email.clone().or_else(|| config.to_email.clone())?;
        let to = config.to_email.clone().unwrap_or_else(|| from.clone());
        Some(Self {
            from_email: from,
            to_email: to,
        })
    }

    /// # Compose Email (`compose`)
    ///
    /// Replies go to the visitor; the subject falls back to the default
    /// contact-form subject.
    pub fn compose(&self, submission: &ContactSubmission) -> OutgoingEmail {
        OutgoingEmail {
            from: format!("\"{}\" <{}>", SENDER_NAME, self.from_email),
            to: self.to_email.clone(),
            reply_to: submission.email.clone(),
            subject: submission.subject_line().to_string(),
            text: submission.email_body(),
        }
    }
}

/// Anything that can deliver an [`OutgoingEmail`].
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), FolioError>;
}

/// Delivers mail by POSTing JSON to an HTTP email API.
pub struct HttpMailer {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpMailer {
    pub fn new(url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self, FolioError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            api_key,
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), FolioError> {
        debug!("Posting email for {} to {}", email.reply_to, self.url);
        let mut request = self.client.post(&self.url).json(email);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FolioError::Mail(format!(
                "Email API returned HTTP {}: {}",
                status, body
            )));
        }

        info!("Relayed contact message from {}", email.reply_to);
        Ok(())
    }
}

/// Stand-in used when no email API is configured. Every send fails.
pub struct UnconfiguredMailer;

#[async_trait]
impl Mailer for UnconfiguredMailer {
    async fn send(&self, _email: &OutgoingEmail) -> Result<(), FolioError> {
        Err(FolioError::Mail(
            "No email API configured (set contact.mail_api_url or MAIL_API_URL)".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::submission::ContactRequest;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn submission() -> ContactSubmission {
        ContactSubmission::validate(&ContactRequest::new(
            "Ada",
            "ada@example.com",
            Some("Hiring"),
            "Hello there",
        ))
        .unwrap()
    }

    fn route() -> MailRoute {
        MailRoute {
            from_email: "site@example.com".into(),
            to_email: "me@example.com".into(),
        }
    }

    #[test]
    fn test_route_falls_back_between_addresses() {
        let only_to = ContactConfig {
            to_email: Some("me@example.com".into()),
            ..ContactConfig::default()
        };
        let route = MailRoute::from_config(&only_to).unwrap();
        assert_eq!(route.from_email, "me@example.com");
        assert_eq!(route.to_email, "me@example.com");

        assert_eq!(MailRoute::from_config(&ContactConfig::default()), None);
    }

    #[test]
    fn test_compose_email() {
        let email = route().compose(&submission());
        assert_eq!(email.from, "\"Portfolio Contact\" <site@example.com>");
        assert_eq!(email.to, "me@example.com");
        assert_eq!(email.reply_to, "ada@example.com");
        assert_eq!(email.subject, "Hiring");
        assert!(email.text.contains("Subject: Hiring"));
    }

    #[tokio::test]
    async fn test_http_mailer_posts_json_with_bearer_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send"))
            .and(header("authorization", "Bearer key-123"))
            .and(body_partial_json(serde_json::json!({
                "to": "me@example.com",
                "reply_to": "ada@example.com"
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let mailer = HttpMailer::new(
            format!("{}/send", server.uri()),
            Some("key-123".into()),
            Duration::from_secs(5),
        )
        .unwrap();
        mailer.send(&route().compose(&submission())).await.unwrap();
    }

    #[tokio::test]
    async fn test_http_mailer_reports_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let mailer = HttpMailer::new(server.uri(), None, Duration::from_secs(5)).unwrap();
        let err = mailer.send(&route().compose(&submission())).await.unwrap_err();
        assert!(matches!(err, FolioError::Mail(ref msg) if msg.contains("503") && msg.contains("down")));
    }

    #[tokio::test]
    async fn test_unconfigured_mailer_always_fails() {
        let result = UnconfiguredMailer.send(&route().compose(&submission())).await;
        assert!(matches!(result, Err(FolioError::Mail(_))));
    }
}
