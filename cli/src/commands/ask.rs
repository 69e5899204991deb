//! # Ask Command
//!
//! File: cli/src/commands/ask.rs
//! Author: Christi Mahu
//!
//! One-shot question to the assistant: classify the text, print one reply.
//! No typing delay and no transcript.
//!
//! ```bash
//! folio ask "what skills do you have?"
//! folio ask --json --seed 3 where did you study
//! # {"category":"education","reply":"..."}
//! ```
//!
use crate::chat::ChatEngine;
use crate::core::config::load_config;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use serde_json::json;
use tracing::debug;

#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The question. Multiple words are joined with spaces.
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,

    /// Seed for reply selection; overrides `chat.seed`.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print `{"category", "reply"}` as JSON instead of the reply text.
    #[arg(long)]
    pub json: bool,
}

/// # Handle Ask Command (`handle_ask`)
///
/// ## Errors
///
/// Returns an error if the configuration cannot be loaded or is invalid.
pub async fn handle_ask(args: AskArgs) -> Result<()> {
    let config = load_config()?;
    let engine = ChatEngine::from_config(&config.chat)?;
    let mut selector = engine.selector(args.seed.or(config.chat.seed));

    let text = args.text.join(" ");
    let (category, reply) = engine.reply(&text, &mut selector);
    debug!("'{}' classified as {}", text, category);

    if args.json {
        let output = serde_json::to_string(&json!({ "category": category, "reply": reply }))
            .context("Failed to encode reply as JSON")?;
        println!("{}", output);
    } else {
        println!("{}", reply);
    }
    Ok(())
}
