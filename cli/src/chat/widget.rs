//! # Chat Widget
//!
//! File: cli/src/chat/widget.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The stateful "Shy" widget: an open/closed flag, a transcript, and the
//! pipeline that turns a user message into a delayed bot reply.
//!
//! ## Architecture
//!
//! - `toggle` flips visibility. The first open of an empty transcript
//!   appends one greeting.
//! - `submit_user_message` appends the user message and a typing
//!   placeholder right away, then spawns a task that sleeps for a random
//!   typing delay and swaps the placeholder for the reply.
//! - Every reply is its own task. A later send never cancels an earlier
//!   pending reply, so replies can land out of submission order.
//! - The widget owns a `CancellationToken`; `shutdown` drops all pending
//!   replies and clears their placeholders.
//!
//! The category and the reply text are drawn at submit time, so a seeded
//! random source yields the same replies regardless of timer ordering.
//!
use super::category::Category;
use super::conversation::{ConversationState, Message, TranscriptEntry, Visibility};
use super::render;
use super::responses::ResponseSelector;
use super::ChatEngine;
use rand::Rng;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Default quick-reply labels shown under the input box.
pub const QUICK_REPLIES: [&str; 5] = ["Skills", "Projects", "Experience", "Contact", "Certifications"];

/// Inclusive range for the simulated typing latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingDelay {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl TypingDelay {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// Uniform draw in `[min_ms, max_ms]`; a degenerate range yields `min_ms`.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> Duration {
        if self.max_ms <= self.min_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rng.gen_range(self.min_ms..=self.max_ms))
    }
}

impl Default for TypingDelay {
    fn default() -> Self {
        Self::new(700, 1300)
    }
}

/// A reply that has been scheduled but may not have landed yet.
#[derive(Debug)]
pub struct PendingReply {
    pub category: Category,
    pub delay: Duration,
    pub handle: JoinHandle<()>,
}

/// One chat widget instance.
pub struct ChatWidget {
    engine: ChatEngine,
    state: Arc<Mutex<ConversationState>>,
    selector: Mutex<ResponseSelector>,
    delay: TypingDelay,
    quick_replies: Vec<String>,
    cancel: CancellationToken,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ChatWidget {
    /// # Create Widget (`new`)
    ///
    /// The selector's random source drives both reply selection and typing
    /// delays; a seeded selector gives deterministic behaviour.
    pub fn new(engine: ChatEngine, selector: ResponseSelector, delay: TypingDelay) -> Self {
        Self {
            engine,
            state: Arc::new(Mutex::new(ConversationState::new())),
            selector: Mutex::new(selector),
            delay,
            quick_replies: QUICK_REPLIES.iter().map(|s| s.to_string()).collect(),
            cancel: CancellationToken::new(),
        }
    }

    /// Replaces the quick-reply labels.
    pub fn with_quick_replies(mut self, labels: Vec<String>) -> Self {
        self.quick_replies = labels;
        self
    }

    pub fn bot_name(&self) -> &str {
        self.engine.bot_name()
    }

    pub fn quick_replies(&self) -> &[String] {
        &self.quick_replies
    }

    pub fn visibility(&self) -> Visibility {
        lock(&self.state).visibility()
    }

    /// # Toggle Visibility (`toggle`)
    ///
    /// Closed -> Open appends a greeting when the transcript is empty.
    /// Open -> Closed changes nothing else.
    pub fn toggle(&self) -> Visibility {
        let mut state = lock(&self.state);
        let now = state.toggle();
        if now == Visibility::Open && state.is_empty() {
            let greeting = lock(&self.selector).select(Category::Greeting);
            state.push_bot(greeting);
            debug!("Chat opened for the first time, greeting sent");
        }
        info!("Chat widget is now {:?}", now);
        now
    }

    /// # Submit User Message (`submit_user_message`)
    ///
    /// Blank input is ignored and returns `None`. Otherwise the trimmed text
    /// and a typing placeholder are appended immediately and the reply is
    /// scheduled on the Tokio runtime.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit_user_message(&self, text: &str) -> Option<PendingReply> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            debug!("Ignoring blank chat input");
            return None;
        }

        let category = self.engine.classify(trimmed);
        let (reply, delay) = {
            let mut selector = lock(&self.selector);
            let reply = selector.select(category);
            (reply, self.delay.draw(selector.rng_mut()))
        };

        let placeholder = {
            let mut state = lock(&self.state);
            state.push_user(trimmed);
            state.show_typing()
        };
        debug!(
            "Classified chat input as '{}', replying in {} ms",
            category,
            delay.as_millis()
        );

        let state = Arc::clone(&self.state);
        let cancel = self.cancel.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    lock(&state).resolve_typing(placeholder, None);
                    debug!("Pending chat reply cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    lock(&state).resolve_typing(placeholder, Some(reply));
                }
            }
        });

        Some(PendingReply {
            category,
            delay,
            handle,
        })
    }

    /// # Quick Reply (`quick_reply`)
    ///
    /// Submits a shortcut label through the normal pipeline, lowercased. The
    /// label is classified like typed text.
    pub fn quick_reply(&self, label: &str) -> Option<PendingReply> {
        self.submit_user_message(&label.to_lowercase())
    }

    /// Snapshot of the transcript, placeholders included.
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        lock(&self.state).transcript().to_vec()
    }

    /// Snapshot of the exchanged messages.
    pub fn messages(&self) -> Vec<Message> {
        lock(&self.state).messages().cloned().collect()
    }

    #[cfg(test)]
    pub fn pending_replies(&self) -> usize {
        lock(&self.state).pending_replies()
    }

    pub fn render_html(&self) -> String {
        render::transcript_to_html(lock(&self.state).transcript())
    }

    /// Cancels every pending reply.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for ChatWidget {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::conversation::Sender;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn widget(seed: u64) -> ChatWidget {
        let engine = ChatEngine::default();
        let selector = engine.selector(Some(seed));
        ChatWidget::new(engine, selector, TypingDelay::default())
    }

    #[test]
    fn test_typing_delay_stays_in_range() {
        let delay = TypingDelay::default();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let d = delay.draw(&mut rng).as_millis();
            assert!((700..=1300).contains(&d));
        }
        assert_eq!(
            TypingDelay::new(50, 10).draw(&mut rng),
            Duration::from_millis(50)
        );
    }

    #[test]
    fn test_first_open_greets_exactly_once() {
        let w = widget(1);
        assert_eq!(w.toggle(), Visibility::Open);
        let messages = w.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, Sender::Bot);
        assert!(ChatEngine::default()
            .pool()
            .replies(Category::Greeting)
            .contains(&messages[0].text));

        assert_eq!(w.toggle(), Visibility::Closed);
        assert_eq!(w.toggle(), Visibility::Open);
        assert_eq!(w.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_submission_is_noop() {
        let w = widget(1);
        assert!(w.submit_user_message("").is_none());
        assert!(w.submit_user_message("   \t").is_none());
        assert!(w.transcript().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_replaces_typing_placeholder() {
        let w = widget(2);
        let pending = w.submit_user_message("  what skills do you know?  ").unwrap();
        assert_eq!(pending.category, Category::Skills);

        // User message and placeholder are visible before the delay elapses.
        let transcript = w.transcript();
        assert_eq!(transcript.len(), 2);
        assert!(matches!(transcript[1], TranscriptEntry::Typing { .. }));
        assert_eq!(w.messages()[0].text, "what skills do you know?");

        pending.handle.await.unwrap();

        assert_eq!(w.pending_replies(), 0);
        let messages = w.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].sender, Sender::Bot);
        assert!(ChatEngine::default()
            .pool()
            .replies(Category::Skills)
            .contains(&messages[1].text));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_waits_for_typing_delay() {
        let w = widget(5);
        let pending = w.submit_user_message("projects").unwrap();
        let delay = pending.delay;

        tokio::time::sleep(delay - Duration::from_millis(1)).await;
        assert_eq!(w.pending_replies(), 1);

        pending.handle.await.unwrap();
        assert_eq!(w.pending_replies(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_reply_can_land_first() {
        // Find a seed whose second typing delay is strictly shorter than the first.
        let (w, first, second) = (0..)
            .find_map(|seed| {
                let w = widget(seed);
                let first = w.submit_user_message("contact").unwrap();
                let second = w.submit_user_message("education").unwrap();
                if first.delay > second.delay {
                    Some((w, first, second))
                } else {
                    w.shutdown();
                    None
                }
            })
            .unwrap();
        assert_eq!(w.pending_replies(), 2);

        second.handle.await.unwrap();
        // The earlier submission is still typing after the later one replied.
        assert_eq!(w.pending_replies(), 1);
        first.handle.await.unwrap();
        assert_eq!(w.pending_replies(), 0);

        let engine = ChatEngine::default();
        let messages = w.messages();
        let user: Vec<&str> = messages
            .iter()
            .filter(|m| m.sender == Sender::User)
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(user, vec!["contact", "education"]);

        let bot: Vec<&String> = messages
            .iter()
            .filter(|m| m.sender == Sender::Bot)
            .map(|m| &m.text)
            .collect();
        assert_eq!(bot.len(), 2);
        assert!(engine.pool().replies(Category::Education).contains(bot[0]));
        assert!(engine.pool().replies(Category::Contact).contains(bot[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_replies() {
        let w = widget(4);
        let pending = w.submit_user_message("hello").unwrap();
        w.shutdown();
        pending.handle.await.unwrap();

        assert_eq!(w.pending_replies(), 0);
        assert_eq!(w.messages().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quick_reply_goes_through_pipeline() {
        let w = widget(6);
        for (label, expected) in [
            ("Skills", Category::Skills),
            ("Projects", Category::Projects),
            ("Experience", Category::Experience),
            ("Contact", Category::Contact),
            ("Certifications", Category::Certifications),
        ] {
            let pending = w.quick_reply(label).unwrap();
            assert_eq!(pending.category, expected, "label: {label}");
            pending.handle.await.unwrap();
        }
        assert_eq!(w.messages()[0].text, "skills");
        assert_eq!(w.quick_replies().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_html_escapes_user_input() {
        let w = widget(8);
        let pending = w.submit_user_message("<img src=x>").unwrap();
        pending.handle.await.unwrap();
        assert!(w.render_html().contains("&lt;img src=x&gt;"));
    }
}
