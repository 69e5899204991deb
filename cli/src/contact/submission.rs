//! # Contact Submissions
//!
//! File: cli/src/contact/submission.rs
//! Author: Christi Mahu
//!
//! The payload of the contact form, before and after validation.

use crate::core::error::FolioError;
use serde::{Deserialize, Serialize};

/// Message returned whenever a required field is missing.
pub const REQUIRED_FIELDS_MESSAGE: &str = "Name, email and message are required.";

/// Subject used when the visitor leaves it blank.
pub const DEFAULT_SUBJECT: &str = "New message from portfolio contact form";

/// Raw form / request body. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ContactRequest {
    pub fn new(name: &str, email: &str, subject: Option<&str>, message: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            subject: subject.map(str::to_string),
            message: Some(message.to_string()),
        }
    }
}

/// A validated submission: every field trimmed, required fields non-empty,
/// blank subject normalised to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
}

fn trimmed(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl ContactSubmission {
    /// # Validate (`validate`)
    ///
    /// ## Errors
    ///
    /// `FolioError::Validation` with [`REQUIRED_FIELDS_MESSAGE`] when name,
    /// email or message is missing or blank.
    pub fn validate(request: &ContactRequest) -> Result<Self, FolioError> {
        match (
            trimmed(&request.name),
            trimmed(&request.email),
            trimmed(&request.message),
        ) {
            (Some(name), Some(email), Some(message)) => Ok(Self {
                name,
                email,
                subject: trimmed(&request.subject),
                message,
            }),
            _ => Err(FolioError::Validation(REQUIRED_FIELDS_MESSAGE.to_string())),
        }
    }

    /// Subject line of the relayed email.
    pub fn subject_line(&self) -> &str {
        self.subject.as_deref().unwrap_or(DEFAULT_SUBJECT)
    }

    /// Plain-text body of the relayed email.
    pub fn email_body(&self) -> String {
        format!(
            "New message from your portfolio:\n\n\
             Name: {}\n\
             Email: {}\n\
             Subject: {}\n\n\
             Message:\n\
             {}\n",
            self.name,
            self.email,
            self.subject.as_deref().unwrap_or("(no subject)"),
            self.message
        )
    }
}
