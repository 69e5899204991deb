//! # Transcript Rendering
//!
//! File: cli/src/chat/render.rs
//! Author: Christi Mahu
//!
//! Turns a transcript into something visible: the HTML fragment the site's
//! chat window uses, or plain lines for the terminal chat.

use super::conversation::{Message, Sender, TranscriptEntry};

/// Escapes `&`, `<` and `>` so user text cannot inject markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}

/// Renders one entry as a chat bubble.
pub fn entry_to_html(entry: &TranscriptEntry) -> String {
    match entry {
        TranscriptEntry::Message(Message {
            sender: Sender::User,
            text,
        }) => format!(
            r#"<div class="msg user"><div class="msg-bubble">{}</div></div>"#,
            escape_html(text)
        ),
        // Canned replies are trusted markup.
        TranscriptEntry::Message(Message {
            sender: Sender::Bot,
            text,
        }) => format!(
            r#"<div class="msg bot"><div class="msg-bubble">{}</div></div>"#,
            text
        ),
        TranscriptEntry::Typing { .. } => concat!(
            r#"<div class="msg bot"><div class="msg-bubble">"#,
            r#"<div class="typing-dots"><span></span><span></span><span></span></div>"#,
            r#"</div></div>"#
        )
        .to_string(),
    }
}

/// Renders the whole transcript, in order.
pub fn transcript_to_html(entries: &[TranscriptEntry]) -> String {
    entries.iter().map(entry_to_html).collect::<Vec<_>>().join("\n")
}

/// One terminal line for an entry.
pub fn entry_to_line(entry: &TranscriptEntry, bot_name: &str) -> String {
    match entry {
        TranscriptEntry::Message(Message {
            sender: Sender::User,
            text,
        }) => format!("you> {}", text),
        TranscriptEntry::Message(Message {
            sender: Sender::Bot,
            text,
        }) => format!("{}> {}", bot_name.to_lowercase(), text),
        TranscriptEntry::Typing { .. } => format!("{}> ...", bot_name.to_lowercase()),
    }
}
