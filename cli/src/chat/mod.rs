//! # Folio Chat Assistant ("Shy")
//!
//! File: cli/src/chat/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The canned-response chat assistant shown on the portfolio page. User input
//! flows through the same short pipeline everywhere it is used:
//!
//! ```text
//! input -> trimmed -> classified -> canned reply drawn -> appended -> rendered
//! ```
//!
//! ## Architecture
//!
//! - `category`: the closed set of topics
//! - `classifier`: ordered keyword rules, first match wins
//! - `responses`: validated reply pools and the seeded selector
//! - `conversation`: transcript and open/closed state
//! - `widget`: the stateful widget with typing delays and quick replies
//! - `render`: HTML and terminal output
//!
//! `ChatEngine` bundles the immutable parts (classifier + pool) so the
//! terminal widget and the stateless `/api/chat` endpoint share one
//! validated configuration.
//!
pub mod category;
pub mod classifier;
pub mod conversation;
pub mod render;
pub mod responses;
pub mod widget;

use crate::core::config::ChatConfig;
use crate::core::error::Result;
use category::Category;
use classifier::{default_rules, IntentClassifier};
use rand::Rng;
use responses::{ResponsePool, ResponseSelector};
use std::sync::Arc;
use tracing::info;

/// Immutable, shareable classifier + response pool.
#[derive(Debug, Clone)]
pub struct ChatEngine {
    classifier: Arc<IntentClassifier>,
    pool: Arc<ResponsePool>,
    bot_name: String,
}

impl ChatEngine {
    pub fn new(classifier: IntentClassifier, pool: ResponsePool, bot_name: impl Into<String>) -> Self {
        Self {
            classifier: Arc::new(classifier),
            pool: Arc::new(pool),
            bot_name: bot_name.into(),
        }
    }

    /// # Build From Configuration (`from_config`)
    ///
    /// Compiles the configured keyword rules (or the built-in table) and
    /// merges response overrides into the built-in pools.
    ///
    /// ## Errors
    ///
    /// Fails on any configuration defect: empty rule, rule targeting
    /// `default`, or an empty response pool.
    pub fn from_config(config: &ChatConfig) -> Result<Self> {
        let rules = config.rules.clone().unwrap_or_else(default_rules);
        let classifier = IntentClassifier::new(&rules)?;
        let pool = ResponsePool::with_overrides(&config.responses)?;
        info!(
            "Chat engine ready: {} keyword rules, bot name '{}'",
            rules.len(),
            config.bot_name
        );
        Ok(Self::new(classifier, pool, config.bot_name.clone()))
    }

    pub fn classify(&self, text: &str) -> Category {
        self.classifier.classify(text)
    }

    #[cfg(test)]
    pub fn pool(&self) -> &ResponsePool {
        &self.pool
    }

    /// Reply selector over this engine's pool. A seed makes every draw
    /// reproducible; `None` seeds from OS entropy.
    pub fn selector(&self, seed: Option<u64>) -> ResponseSelector {
        let pool = Arc::clone(&self.pool);
        match seed {
            Some(seed) => ResponseSelector::seeded(pool, seed),
            None => ResponseSelector::from_entropy(pool),
        }
    }

    pub fn bot_name(&self) -> &str {
        &self.bot_name
    }

    /// Classifies `text` and draws one reply for its category.
    pub fn reply<R: Rng>(&self, text: &str, selector: &mut ResponseSelector<R>) -> (Category, String) {
        let category = self.classify(text);
        (category, selector.select(category))
    }
}

impl Default for ChatEngine {
    fn default() -> Self {
        Self::new(IntentClassifier::default(), ResponsePool::default(), "Shy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::classifier::KeywordRule;
    use std::collections::HashMap;

    #[test]
    fn test_reply_draws_from_classified_pool() {
        let engine = ChatEngine::default();
        let mut selector = engine.selector(Some(11));
        let (category, reply) = engine.reply("tell me about your certificates", &mut selector);
        assert_eq!(category, Category::Certifications);
        assert!(engine.pool().replies(category).contains(&reply));
    }

    #[test]
    fn test_from_config_uses_custom_rules_and_responses() {
        let mut responses = HashMap::new();
        responses.insert(Category::Skills, vec!["Mostly Rust.".to_string()]);
        let config = ChatConfig {
            rules: Some(vec![KeywordRule::new(Category::Skills, &["rust"])]),
            responses,
            ..ChatConfig::default()
        };
        let engine = ChatEngine::from_config(&config).unwrap();
        let mut selector = engine.selector(None);
        assert_eq!(
            engine.reply("Do you use Rust?", &mut selector),
            (Category::Skills, "Mostly Rust.".to_string())
        );
        // The built-in greeting rule is gone with a custom table.
        assert_eq!(engine.classify("hello"), Category::Default);
    }

    #[test]
    fn test_seeded_selectors_agree() {
        let engine = ChatEngine::default();
        let mut a = engine.selector(Some(5));
        let mut b = engine.selector(Some(5));
        for text in ["hi", "projects", "what's the weather", "contact"] {
            assert_eq!(engine.reply(text, &mut a), engine.reply(text, &mut b));
        }
    }

    #[test]
    fn test_from_config_rejects_empty_pool() {
        let mut responses = HashMap::new();
        responses.insert(Category::Default, Vec::new());
        let config = ChatConfig {
            responses,
            ..ChatConfig::default()
        };
        assert!(ChatEngine::from_config(&config).is_err());
    }
}
