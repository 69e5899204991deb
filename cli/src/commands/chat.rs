//! # Chat Command
//!
//! File: cli/src/commands/chat.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Runs the "Shy" widget in the terminal. The widget opens on start (which
//! posts the greeting), then every line read from stdin is submitted as a
//! user message. Replies arrive after the configured typing delay.
//!
//! Lines starting with `/` drive the widget instead of being sent:
//!
//! | Input        | Effect                                  |
//! |--------------|-----------------------------------------|
//! | `/toggle`    | Close or reopen the widget              |
//! | `/quick`     | List the quick replies                  |
//! | `/1` .. `/N` | Send quick reply N                      |
//! | `/html`      | Print the transcript as widget HTML     |
//! | `/quit`      | Leave (also on end of input)            |
//!
use crate::chat::conversation::{TranscriptEntry, Visibility};
use crate::chat::render::entry_to_line;
use crate::chat::widget::{ChatWidget, PendingReply, TypingDelay};
use crate::chat::ChatEngine;
use crate::core::config::load_config;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Seed for replies and typing delays; overrides `chat.seed`.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Answer immediately instead of simulating typing.
    #[arg(long)]
    pub no_delay: bool,
}

/// A parsed line of input.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Toggle,
    ListQuickReplies,
    QuickReply(usize),
    Html,
    Quit,
    Unknown(&'a str),
    Message(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return Input::Message(trimmed);
    };
    match command {
        "toggle" | "open" | "close" => Input::Toggle,
        "quick" => Input::ListQuickReplies,
        "html" => Input::Html,
        "quit" | "exit" => Input::Quit,
        other => match other.parse::<usize>() {
            Ok(n) if n > 0 => Input::QuickReply(n - 1),
            _ => Input::Unknown(other),
        },
    }
}

/// # Handle Chat Command (`handle_chat`)
///
/// ## Errors
///
/// Returns an error if the configuration is invalid or stdin cannot be read.
pub async fn handle_chat(args: ChatArgs) -> Result<()> {
    let config = load_config()?;
    let engine = ChatEngine::from_config(&config.chat)?;
    let selector = engine.selector(args.seed.or(config.chat.seed));
    let delay = if args.no_delay {
        TypingDelay::new(0, 0)
    } else {
        TypingDelay::new(config.chat.typing_delay_min_ms, config.chat.typing_delay_max_ms)
    };

    let widget = ChatWidget::new(engine, selector, delay).with_quick_replies(config.chat.quick_replies.clone());
    let bot_name = widget.bot_name().to_lowercase();
    let mut printed = 0;

    widget.toggle();
    print_quick_replies(&widget);
    printed = print_new_messages(&widget, &bot_name, printed);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read chat input")? {
        let pending = match parse_input(&line) {
            Input::Quit => break,
            Input::Toggle => {
                match widget.toggle() {
                    Visibility::Open => println!("(chat opened)"),
                    Visibility::Closed => println!("(chat closed, /toggle to reopen)"),
                }
                None
            }
            Input::ListQuickReplies => {
                print_quick_replies(&widget);
                None
            }
            Input::Html => {
                println!("{}", widget.render_html());
                None
            }
            Input::Unknown(command) => {
                println!("Unknown command '/{}'", command);
                None
            }
            _ if widget.visibility() == Visibility::Closed => {
                println!("(chat is closed, /toggle to open it)");
                None
            }
            Input::QuickReply(index) => match widget.quick_replies().get(index).cloned() {
                Some(label) => widget.quick_reply(&label),
                None => {
                    println!("No quick reply #{}", index + 1);
                    None
                }
            },
            Input::Message(text) => widget.submit_user_message(text),
        };

        if let Some(pending) = pending {
            printed = print_new_messages(&widget, &bot_name, printed);
            if let Some(entry @ TranscriptEntry::Typing { .. }) = widget.transcript().last() {
                println!("{}", entry_to_line(entry, &bot_name));
            }
            await_reply(pending).await;
            printed = print_new_messages(&widget, &bot_name, printed);
        }
    }

    debug!("Chat input finished, shutting the widget down");
    widget.shutdown();
    Ok(())
}

async fn await_reply(pending: PendingReply) {
    debug!("Waiting {} ms for a {} reply", pending.delay.as_millis(), pending.category);
    if let Err(e) = pending.handle.await {
        warn!("Chat reply task failed: {}", e);
    }
}

fn print_quick_replies(widget: &ChatWidget) {
    let labels: Vec<String> = widget
        .quick_replies()
        .iter()
        .enumerate()
        .map(|(i, label)| format!("/{} {}", i + 1, label))
        .collect();
    println!("Quick replies: {}", labels.join("  "));
}

/// Prints messages appended since `already_printed` and returns the new count.
fn print_new_messages(widget: &ChatWidget, bot_name: &str, already_printed: usize) -> usize {
    let messages = widget.messages();
    for message in messages.iter().skip(already_printed) {
        println!("{}", entry_to_line(&TranscriptEntry::Message(message.clone()), bot_name));
    }
    messages.len()
}
