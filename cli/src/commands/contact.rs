//! # Contact Command
//!
//! File: cli/src/commands/contact.rs
//! Author: Christi Mahu
//!
//! Submits the contact form from the terminal, the same way the page does:
//! the submission is written to the document store (when one is configured)
//! and posted to the relay endpoint at the same time.
//!
//! ```bash
//! folio contact --name Ada --email ada@example.com --message "Loved the site"
//! folio contact --endpoint https://portfolio.example.com/api/contact ...
//! ```
//!
use crate::contact::form::{ContactForm, EffectOutcome, FormStatus, FormTimings};
use crate::contact::relay::HttpContactRelay;
use crate::contact::store::{DocumentStore, RestDocumentStore};
use crate::contact::submission::ContactRequest;
use crate::core::config::load_config;
use crate::core::error::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
pub struct ContactArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub subject: Option<String>,

    #[arg(long)]
    pub message: String,

    /// Relay endpoint; overrides `contact.relay_endpoint`.
    #[arg(long, env = "FOLIO_CONTACT_ENDPOINT")]
    pub endpoint: Option<String>,
}

/// # Handle Contact Command (`handle_contact`)
///
/// ## Errors
///
/// Returns an error when a required field is blank or when neither the
/// store write nor the relay succeeded.
pub async fn handle_contact(args: ContactArgs) -> Result<()> {
    let config = load_config()?;
    let contact = &config.contact;
    let timeout = Duration::from_millis(contact.request_timeout_ms);

    let endpoint = args
        .endpoint
        .clone()
        .unwrap_or_else(|| contact.relay_endpoint.clone());
    let relay = Arc::new(HttpContactRelay::new(endpoint.clone(), timeout)?);
    let store: Option<Arc<dyn DocumentStore>> = match &contact.store_url {
        Some(url) => {
            let store: Arc<dyn DocumentStore> = Arc::new(RestDocumentStore::new(url.clone(), timeout)?);
            Some(store)
        }
        None => {
            info!("No document store configured; the submission will only be relayed");
            None
        }
    };

    let form = ContactForm::new(
        relay,
        store,
        contact.collection.clone(),
        FormTimings {
            effect_timeout: timeout,
            reset_after: Duration::from_millis(contact.status_reset_ms),
        },
    );

    let request = ContactRequest::new(&args.name, &args.email, args.subject.as_deref(), &args.message);
    let outcome = form.submit(&request).await?;

    println!("Relay ({}): {}", endpoint, describe(&outcome.relayed));
    println!("Store ({}): {}", contact.collection, describe(&outcome.stored));
    println!("{}", outcome.status.label());

    if outcome.status == FormStatus::Failed {
        anyhow::bail!("Message could not be delivered. Please try again or email directly.");
    }
    Ok(())
}

fn describe(outcome: &EffectOutcome) -> String {
    match outcome {
        EffectOutcome::Succeeded => "ok".to_string(),
        EffectOutcome::Failed(reason) => format!("failed ({})", reason),
        EffectOutcome::Skipped => "skipped".to_string(),
    }
}
