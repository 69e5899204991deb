//! # Folio JSON Endpoints
//!
//! File: cli/src/commands/srv/api.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The two JSON endpoints served next to the static site:
//! - `POST /api/contact`: validates a contact submission and relays it by email
//! - `POST /api/chat`: classifies one message and returns a canned reply
//!
//! Both answer any other method with `405 {"error": "Method not allowed"}`.
//!
//! ## Examples
//!
//! ```bash
//! curl -X POST localhost:8000/api/contact \
//!      -H 'content-type: application/json' \
//!      -d '{"name":"Ada","email":"ada@example.com","message":"Hello"}'
//! # {"ok":true}
//!
//! curl -X POST localhost:8000/api/chat -d '{"message":"what skills do you have?"}'
//! # {"category":"skills","reply":"..."}
//! ```
//!
use crate::chat::category::Category;
use crate::chat::responses::ResponseSelector;
use crate::chat::ChatEngine;
use crate::contact::mailer::{HttpMailer, MailRoute, Mailer, UnconfiguredMailer};
use crate::contact::submission::{ContactRequest, ContactSubmission};
use crate::core::config::{AuthConfig, Config};
use crate::core::error::{FolioError, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Shared state handed to every handler and to the login gate.
pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub engine: ChatEngine,
    /// Reply selection for `/api/chat`. Never held across an await.
    pub selector: Mutex<ResponseSelector>,
    pub mailer: Arc<dyn Mailer>,
    /// `None` when neither a sender nor a recipient address is configured.
    pub route: Option<MailRoute>,
    pub auth: AuthConfig,
}

impl AppState {
    /// # Build State from Config (`from_config`)
    ///
    /// Missing email settings are not fatal: the site still serves, and
    /// `/api/contact` answers 500 until they are provided.
    ///
    /// ## Errors
    ///
    /// Returns an error if the chat tables are invalid or the HTTP client
    /// for the email API cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let engine = ChatEngine::from_config(&config.chat)?;
        let selector = engine.selector(config.chat.seed);

        let mailer: Arc<dyn Mailer> = match &config.contact.mail_api_url {
            Some(url) => Arc::new(HttpMailer::new(
                url.clone(),
                config.contact.mail_api_key.clone(),
                Duration::from_millis(config.contact.request_timeout_ms),
            )?),
            None => {
                warn!("No email API configured; /api/contact will fail until MAIL_API_URL is set");
                Arc::new(UnconfiguredMailer)
            }
        };

        let route = MailRoute::from_config(&config.contact);
        if route.is_none() {
            warn!("No sender or recipient address configured for contact mail");
        }

        Ok(Self::new(engine, selector, mailer, route, config.auth.clone()))
    }

    pub fn new(
        engine: ChatEngine,
        selector: ResponseSelector,
        mailer: Arc<dyn Mailer>,
        route: Option<MailRoute>,
        auth: AuthConfig,
    ) -> Self {
        Self {
            engine,
            selector: Mutex::new(selector),
            mailer,
            route,
            auth,
        }
    }
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Fallback for unsupported methods on the API routes.
pub async fn method_not_allowed() -> Response {
    json_error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// # Contact Relay Handler (`contact`)
///
/// A body that is not a JSON object is treated as empty and rejected by
/// validation.
pub async fn contact(State(state): State<SharedState>, body: Bytes) -> Response {
    let request: ContactRequest = serde_json::from_slice(&body).unwrap_or_else(|e| {
        debug!("Unreadable contact body ({}), treating as empty", e);
        ContactRequest::default()
    });

    let submission = match ContactSubmission::validate(&request) {
        Ok(submission) => submission,
        Err(FolioError::Validation(message)) => return json_error(StatusCode::BAD_REQUEST, &message),
        Err(e) => return json_error(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    let Some(route) = &state.route else {
        error!("Contact email error: no sender or recipient address configured");
        return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send email.");
    };

    let email = route.compose(&submission);
    match state.mailer.send(&email).await {
        Ok(()) => {
            info!("Contact message from {} relayed to {}", submission.email, email.to);
            (StatusCode::OK, Json(json!({ "ok": true }))).into_response()
        }
        Err(e) => {
            error!("Contact email error: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send email.")
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub category: Category,
    pub reply: String,
}

/// # Chat Handler (`chat`)
///
/// Stateless: each call classifies one message and picks one reply.
pub async fn chat(State(state): State<SharedState>, body: Bytes) -> Response {
    let request: ChatRequest = serde_json::from_slice(&body).unwrap_or_default();
    let text = request.message.trim();
    if text.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "Message is required.");
    }

    let (category, reply) = {
        let mut selector = state.selector.lock().unwrap_or_else(PoisonError::into_inner);
        state.engine.reply(text, &mut *selector)
    };
    debug!("Chat message classified as {}", category);
    (StatusCode::OK, Json(ChatResponse { category, reply })).into_response()
}
