//! # Contact Form Flow
//!
//! File: cli/src/contact/form.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Client-side submission of the contact form. One submission has two
//! independent side effects:
//! - persist the submission into the document collection
//! - relay it to `POST /api/contact` for email delivery
//!
//! ## Architecture
//!
//! 1. Fields are trimmed and validated. A missing name, email or message
//!    stops here: nothing is written and nothing is posted.
//! 2. Status moves to `Sending` and both effects run concurrently, each
//!    under its own timeout.
//! 3. The submission counts as sent when at least one effect succeeded.
//!    Neither effect is rolled back when the other fails.
//! 4. The sent/failed notice is reset to `Idle` after a fixed duration.
//!
use super::relay::ContactRelay;
use super::store::DocumentStore;
use super::submission::{ContactRequest, ContactSubmission};
use crate::core::error::FolioError;
use serde::Serialize;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Visible state of the submit button / notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    Idle,
    Sending,
    Sent,
    Failed,
}

impl FormStatus {
    /// Text shown on the submit button.
    pub fn label(&self) -> &'static str {
        match self {
            FormStatus::Idle => "Send Message",
            FormStatus::Sending => "Sending...",
            FormStatus::Sent => "Message Sent! ✓",
            FormStatus::Failed => "Error, try again",
        }
    }
}

/// Result of one side effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "detail", rename_all = "snake_case")]
pub enum EffectOutcome {
    Succeeded,
    Failed(String),
    /// No store configured; the effect was not attempted.
    Skipped,
}

impl EffectOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, EffectOutcome::Succeeded)
    }
}

/// Aggregate result of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitOutcome {
    pub status: FormStatus,
    pub stored: EffectOutcome,
    pub relayed: EffectOutcome,
}

/// Timing knobs of the form.
#[derive(Debug, Clone, Copy)]
pub struct FormTimings {
    /// Applied to each effect independently.
    pub effect_timeout: Duration,
    /// How long `Sent` / `Failed` is shown before reverting to `Idle`.
    pub reset_after: Duration,
}

impl Default for FormTimings {
    fn default() -> Self {
        Self {
            effect_timeout: Duration::from_secs(10),
            reset_after: Duration::from_millis(3500),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct ContactForm {
    relay: Arc<dyn ContactRelay>,
    store: Option<Arc<dyn DocumentStore>>,
    collection: String,
    timings: FormTimings,
    status: Arc<Mutex<FormStatus>>,
    reset_task: Mutex<Option<JoinHandle<()>>>,
}

impl ContactForm {
    pub fn new(
        relay: Arc<dyn ContactRelay>,
        store: Option<Arc<dyn DocumentStore>>,
        collection: impl Into<String>,
        timings: FormTimings,
    ) -> Self {
        Self {
            relay,
            store,
            collection: collection.into(),
            timings,
            status: Arc::new(Mutex::new(FormStatus::Idle)),
            reset_task: Mutex::new(None),
        }
    }

    #[cfg(test)]
    pub fn status(&self) -> FormStatus {
        *lock(&self.status)
    }

    /// # Submit (`submit`)
    ///
    /// ## Errors
    ///
    /// `FolioError::Validation` when a required field is blank or another
    /// submission is still sending. Delivery failures are not errors; they
    /// are reported in the returned [`SubmitOutcome`].
    pub async fn submit(&self, request: &ContactRequest) -> Result<SubmitOutcome, FolioError> {
        let submission = ContactSubmission::validate(request)?;

        {
            let mut status = lock(&self.status);
            if *status == FormStatus::Sending {
                return Err(FolioError::Validation(
                    "A message is already being sent.".to_string(),
                ));
            }
            *status = FormStatus::Sending;
        }
        if let Some(previous) = lock(&self.reset_task).take() {
            previous.abort();
        }

        let timeout = self.timings.effect_timeout;
        let persist = async {
            match &self.store {
                Some(store) => {
                    bounded("document store write", timeout, store.add(&self.collection, &submission)).await
                }
                None => EffectOutcome::Skipped,
            }
        };
        let relay = bounded("email relay", timeout, self.relay.relay(&submission));

        let (stored, relayed) = tokio::join!(persist, relay);

        let status = if stored.succeeded() || relayed.succeeded() {
            FormStatus::Sent
        } else {
            FormStatus::Failed
        };
        info!(
            "Contact submission from {} finished: {:?} (stored: {:?}, relayed: {:?})",
            submission.email, status, stored, relayed
        );

        *lock(&self.status) = status;
        self.schedule_reset(status);

        Ok(SubmitOutcome {
            status,
            stored,
            relayed,
        })
    }

    /// Reverts `status` to `Idle` after the display duration unless a new
    /// submission has changed it in the meantime.
    fn schedule_reset(&self, shown: FormStatus) {
        let status = Arc::clone(&self.status);
        let delay = self.timings.reset_after;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut current = lock(&status);
            if *current == shown {
                *current = FormStatus::Idle;
            }
        });
        *lock(&self.reset_task) = Some(handle);
    }
}

/// Runs one effect under `timeout`, folding every failure into an outcome.
async fn bounded<F>(operation: &str, timeout: Duration, effect: F) -> EffectOutcome
where
    F: Future<Output = Result<(), FolioError>>,
{
    match tokio::time::timeout(timeout, effect).await {
        Ok(Ok(())) => EffectOutcome::Succeeded,
        Ok(Err(e)) => {
            warn!("{} failed: {}", operation, e);
            EffectOutcome::Failed(e.to_string())
        }
        Err(_) => {
            let e = FolioError::Timeout {
                operation: operation.to_string(),
                millis: timeout.as_millis() as u64,
            };
            warn!("{}", e);
            EffectOutcome::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::store::MemoryDocumentStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Relay double that counts calls and answers with a fixed result.
    struct CountingRelay {
        calls: AtomicUsize,
        fail: bool,
        hang: bool,
    }

    impl CountingRelay {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
                hang: false,
            })
        }

        fn hanging() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail: false,
                hang: true,
            })
        }
    }

    #[async_trait]
    impl ContactRelay for CountingRelay {
        async fn relay(&self, _submission: &ContactSubmission) -> Result<(), FolioError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.hang {
                std::future::pending::<()>().await;
            }
            if self.fail {
                Err(FolioError::Relay("HTTP 500: Failed to send email.".into()))
            } else {
                Ok(())
            }
        }
    }

    struct FailingStore;

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn add(&self, _c: &str, _s: &ContactSubmission) -> Result<(), FolioError> {
            Err(FolioError::Store("permission denied".into()))
        }
    }

    fn request() -> ContactRequest {
        ContactRequest::new("Ada", "ada@example.com", None, "Hello")
    }

    #[tokio::test]
    async fn test_missing_email_never_reaches_relay_or_store() {
        let relay = CountingRelay::new(false);
        let store = Arc::new(MemoryDocumentStore::new());
        let form = ContactForm::new(
            relay.clone(),
            Some(store.clone()),
            "contactMessages",
            FormTimings::default(),
        );

        let err = form
            .submit(&ContactRequest::new("Ada", "  ", None, "Hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, FolioError::Validation(_)));
        assert_eq!(relay.calls.load(Ordering::SeqCst), 0);
        assert!(store.documents().is_empty());
        assert_eq!(form.status(), FormStatus::Idle);
    }

    #[tokio::test]
    async fn test_both_effects_succeed() {
        let relay = CountingRelay::new(false);
        let store = Arc::new(MemoryDocumentStore::new());
        let form = ContactForm::new(relay.clone(), Some(store.clone()), "inbox", FormTimings::default());

        let outcome = form.submit(&request()).await.unwrap();

        assert_eq!(outcome.status, FormStatus::Sent);
        assert_eq!(outcome.stored, EffectOutcome::Succeeded);
        assert_eq!(outcome.relayed, EffectOutcome::Succeeded);
        assert_eq!(relay.calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.documents()[0].0, "inbox");
        assert_eq!(form.status(), FormStatus::Sent);
    }

    #[tokio::test]
    async fn test_store_failure_is_tolerated_when_relay_succeeds() {
        let form = ContactForm::new(
            CountingRelay::new(false),
            Some(Arc::new(FailingStore)),
            "contactMessages",
            FormTimings::default(),
        );
        let outcome = form.submit(&request()).await.unwrap();
        assert_eq!(outcome.status, FormStatus::Sent);
        assert!(matches!(outcome.stored, EffectOutcome::Failed(ref m) if m.contains("permission denied")));
    }

    #[tokio::test]
    async fn test_relay_failure_is_tolerated_when_store_succeeds() {
        let store = Arc::new(MemoryDocumentStore::new());
        let form = ContactForm::new(
            CountingRelay::new(true),
            Some(store.clone()),
            "contactMessages",
            FormTimings::default(),
        );
        let outcome = form.submit(&request()).await.unwrap();
        assert_eq!(outcome.status, FormStatus::Sent);
        assert!(!outcome.relayed.succeeded());
        assert_eq!(store.documents().len(), 1);
    }

    #[tokio::test]
    async fn test_both_failures_report_failed() {
        let form = ContactForm::new(
            CountingRelay::new(true),
            Some(Arc::new(FailingStore)),
            "contactMessages",
            FormTimings::default(),
        );
        let outcome = form.submit(&request()).await.unwrap();
        assert_eq!(outcome.status, FormStatus::Failed);
        assert_eq!(form.status().label(), "Error, try again");
    }

    #[tokio::test]
    async fn test_without_store_outcome_follows_relay() {
        let form = ContactForm::new(CountingRelay::new(true), None, "contactMessages", FormTimings::default());
        let outcome = form.submit(&request()).await.unwrap();
        assert_eq!(outcome.stored, EffectOutcome::Skipped);
        assert_eq!(outcome.status, FormStatus::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_relay_times_out_independently() {
        let store = Arc::new(MemoryDocumentStore::new());
        let form = ContactForm::new(
            CountingRelay::hanging(),
            Some(store.clone()),
            "contactMessages",
            FormTimings {
                effect_timeout: Duration::from_secs(2),
                reset_after: Duration::from_secs(3),
            },
        );
        let outcome = form.submit(&request()).await.unwrap();
        assert_eq!(outcome.stored, EffectOutcome::Succeeded);
        assert!(matches!(outcome.relayed, EffectOutcome::Failed(ref m) if m.contains("timed out after 2000 ms")));
        assert_eq!(outcome.status, FormStatus::Sent);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_resets_after_display_duration() {
        let form = ContactForm::new(
            CountingRelay::new(false),
            None,
            "contactMessages",
            FormTimings {
                effect_timeout: Duration::from_secs(10),
                reset_after: Duration::from_millis(3500),
            },
        );
        form.submit(&request()).await.unwrap();
        assert_eq!(form.status(), FormStatus::Sent);

        tokio::time::sleep(Duration::from_millis(3400)).await;
        assert_eq!(form.status(), FormStatus::Sent);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(form.status(), FormStatus::Idle);
    }
}
