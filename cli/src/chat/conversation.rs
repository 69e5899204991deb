//! # Conversation State
//!
//! File: cli/src/chat/conversation.rs
//! Author: Christi Mahu
//!
//! The in-memory transcript of one chat widget plus its open/closed flag.
//! Entries are append-only, except for typing placeholders, which are
//! removed in the same step that appends the bot reply they stand in for.
//! Nothing here is persisted; dropping the state ends the conversation.

use serde::Serialize;

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

/// One exchanged message. Order in the transcript is its timestamp.
///
/// User text is stored as typed; it is escaped by the HTML renderer.
/// Bot text is a canned reply and is rendered verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

/// Handle for a "typing" placeholder awaiting its bot reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PlaceholderId(u64);

/// A visible transcript row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TranscriptEntry {
    Message(Message),
    Typing { id: PlaceholderId },
}

/// Widget visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Visibility {
    #[default]
    Closed,
    Open,
}

/// State owned by exactly one widget instance.
#[derive(Debug, Default)]
pub struct ConversationState {
    visibility: Visibility,
    transcript: Vec<TranscriptEntry>,
    next_placeholder: u64,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Flips Closed <-> Open and returns the new visibility.
    pub fn toggle(&mut self) -> Visibility {
        self.visibility = match self.visibility {
            Visibility::Closed => Visibility::Open,
            Visibility::Open => Visibility::Closed,
        };
        self.visibility
    }

    /// True when nothing, not even a placeholder, has been shown yet.
    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.transcript.push(TranscriptEntry::Message(Message {
            sender: Sender::User,
            text: text.into(),
        }));
    }

    pub fn push_bot(&mut self, text: impl Into<String>) {
        self.transcript.push(TranscriptEntry::Message(Message {
            sender: Sender::Bot,
            text: text.into(),
        }));
    }

    /// Appends a typing placeholder and returns its handle.
    pub fn show_typing(&mut self) -> PlaceholderId {
        let id = PlaceholderId(self.next_placeholder);
        self.next_placeholder += 1;
        self.transcript.push(TranscriptEntry::Typing { id });
        id
    }

    /// # Resolve Placeholder (`resolve_typing`)
    ///
    /// Removes placeholder `id` and, when `reply` is `Some`, appends it as a
    /// bot message. Both happen under the same borrow, so no reader ever sees
    /// the reply and its placeholder together. Returns `false` if `id` was
    /// already resolved.
    pub fn resolve_typing(&mut self, id: PlaceholderId, reply: Option<String>) -> bool {
        let before = self.transcript.len();
        self.transcript
            .retain(|entry| !matches!(entry, TranscriptEntry::Typing { id: other } if *other == id));
        if self.transcript.len() == before {
            return false;
        }
        if let Some(text) = reply {
            self.push_bot(text);
        }
        true
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    /// Messages only, placeholders skipped.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.transcript.iter().filter_map(|entry| match entry {
            TranscriptEntry::Message(m) => Some(m),
            TranscriptEntry::Typing { .. } => None,
        })
    }

    /// Number of placeholders still waiting for a reply.
    #[cfg(test)]
    pub fn pending_replies(&self) -> usize {
        self.transcript
            .iter()
            .filter(|e| matches!(e, TranscriptEntry::Typing { .. }))
            .count()
    }
}
