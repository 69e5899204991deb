//! # Contact Document Store
//!
//! File: cli/src/contact/store.rs
//! Author: Christi Mahu
//!
//! Add-only persistence of contact submissions into a named collection.
//! The store stamps each document with `created_at` at write time. Writes
//! are best-effort from the form's point of view: a failed write never
//! blocks the email relay.

use super::submission::ContactSubmission;
use crate::core::error::FolioError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// A submission as written to the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredDocument {
    #[serde(flatten)]
    pub submission: ContactSubmission,
    pub created_at: DateTime<Utc>,
}

impl StoredDocument {
    pub fn now(submission: &ContactSubmission) -> Self {
        Self {
            submission: submission.clone(),
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Appends one document to `collection`.
    async fn add(&self, collection: &str, submission: &ContactSubmission) -> Result<(), FolioError>;
}

/// Writes documents through a REST API: `POST {base_url}/{collection}`.
pub struct RestDocumentStore {
    client: reqwest::Client,
    base_url: String,
}

impl RestDocumentStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FolioError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl DocumentStore for RestDocumentStore {
    async fn add(&self, collection: &str, submission: &ContactSubmission) -> Result<(), FolioError> {
        let url = format!("{}/{}", self.base_url, collection);
        let document = StoredDocument::now(submission);
        debug!("Writing contact document to {}", url);

        let response = self.client.post(&url).json(&document).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FolioError::Store(format!(
                "Store returned HTTP {} for '{}': {}",
                status, collection, body
            )));
        }
        Ok(())
    }
}

/// In-process store; keeps documents until dropped.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: std::sync::Mutex<Vec<(String, StoredDocument)>>,
}

#[cfg(test)]
impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents written so far, with their collection names.
    pub fn documents(&self) -> Vec<(String, StoredDocument)> {
        self.documents
            .lock()
            .map(|docs| docs.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn add(&self, collection: &str, submission: &ContactSubmission) -> Result<(), FolioError> {
        let mut docs = self
            .documents
            .lock()
            .map_err(|_| FolioError::Store("memory store lock poisoned".to_string()))?;
        docs.push((collection.to_string(), StoredDocument::now(submission)));
        Ok(())
    }
}
