//! # Intent Classifier
//!
//! File: cli/src/chat/classifier.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Maps free-text chat input to a [`Category`] with an ordered list of
//! keyword rules. Each rule compiles to one case-insensitive regex that is an
//! alternation of its keywords taken as literals. Matching is a plain
//! substring test: there are no word boundaries, so `hi` also matches inside
//! `this`.
//!
//! The first rule that matches wins. Keywords shared between rules (`work`
//! is both a project and an experience keyword) resolve by rule order alone.
//! Input that matches no rule falls back to [`Category::Default`].
//!
//! ## Examples
//!
//! ```rust
//! let classifier = IntentClassifier::default();
//! assert_eq!(classifier.classify("what skills do you know?"), Category::Skills);
//! assert_eq!(classifier.classify("asdkjasd"), Category::Default);
//! ```
//!
use super::category::Category;
use crate::core::error::{FolioError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// One configured rule: a category and the keywords that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeywordRule {
    pub category: Category,
    pub keywords: Vec<String>,
}

impl KeywordRule {
    pub fn new(category: Category, keywords: &[&str]) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// # Default Keyword Rules (`default_rules`)
///
/// The built-in rule table, in priority order.
pub fn default_rules() -> Vec<KeywordRule> {
    vec![
        KeywordRule::new(
            Category::Greeting,
            &["hi", "hello", "hey", "greet", "who are you"],
        ),
        KeywordRule::new(
            Category::Skills,
            &["skill", "python", "language", "tech", "stack", "know", "code"],
        ),
        KeywordRule::new(
            Category::Projects,
            &["project", "built", "made", "work", "app", "system"],
        ),
        KeywordRule::new(
            Category::Experience,
            &["experience", "intern", "job", "work", "company", "codealpha"],
        ),
        KeywordRule::new(
            Category::Contact,
            &["contact", "email", "phone", "reach", "linkedin", "github"],
        ),
        KeywordRule::new(
            Category::Education,
            &["education", "university", "college", "study", "gla", "bca"],
        ),
        KeywordRule::new(
            Category::Certifications,
            &["cert", "certificate", "award", "badge", "bootcamp"],
        ),
    ]
}

/// A compiled rule.
#[derive(Debug)]
struct CompiledRule {
    category: Category,
    pattern: Regex,
}

/// Ordered, first-match-wins keyword classifier.
#[derive(Debug)]
pub struct IntentClassifier {
    rules: Vec<CompiledRule>,
}

impl IntentClassifier {
    /// # Build Classifier (`new`)
    ///
    /// Validates and compiles the rule list.
    ///
    /// ## Errors
    ///
    /// Returns `FolioError::Config` if a rule has no usable keyword or targets
    /// `default` (which is reserved for "no rule matched").
    pub fn new(rules: &[KeywordRule]) -> Result<Self> {
        let mut compiled = Vec::with_capacity(rules.len());

        for rule in rules {
            if rule.category == Category::Default {
                return Err(FolioError::Config(
                    "Keyword rules cannot target the 'default' category".to_string(),
                )
                .into());
            }

            let keywords: Vec<String> = rule
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .map(|k| regex::escape(&k))
                .collect();

            if keywords.is_empty() {
                return Err(FolioError::Config(format!(
                    "Keyword rule for '{}' has no keywords",
                    rule.category
                ))
                .into());
            }

            let source = format!("(?i){}", keywords.join("|"));
            let pattern = Regex::new(&source).map_err(|e| {
                FolioError::Config(format!(
                    "Invalid keyword pattern for '{}': {}",
                    rule.category, e
                ))
            })?;
            trace!("Compiled rule {} => {}", rule.category, source);

            compiled.push(CompiledRule {
                category: rule.category,
                pattern,
            });
        }

        debug!("Intent classifier ready with {} rules", compiled.len());
        Ok(Self { rules: compiled })
    }

    /// # Classify Text (`classify`)
    ///
    /// Returns the category of the first rule whose pattern occurs anywhere
    /// in the trimmed, lowercased input, or `Category::Default`. Never fails.
    pub fn classify(&self, text: &str) -> Category {
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            return Category::Default;
        }

        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(&normalized))
            .map(|rule| rule.category)
            .unwrap_or(Category::Default)
    }

    /// Categories in rule order.
    #[cfg(test)]
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.rules.iter().map(|r| r.category)
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        // The built-in table is static and always compiles.
        Self::new(&default_rules()).expect("built-in keyword rules are valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> IntentClassifier {
        IntentClassifier::default()
    }

    #[test]
    fn test_documented_examples() {
        let c = classifier();
        assert_eq!(c.classify("what skills do you know?"), Category::Skills);
        assert_eq!(c.classify("how can I reach you?"), Category::Contact);
        assert_eq!(
            c.classify("tell me about your certificates"),
            Category::Certifications
        );
        assert_eq!(c.classify("asdkjasd"), Category::Default);
    }

    #[test]
    fn test_blank_input_is_default() {
        let c = classifier();
        assert_eq!(c.classify(""), Category::Default);
        assert_eq!(c.classify("   "), Category::Default);
        assert_eq!(c.classify("\t\n"), Category::Default);
    }

    #[test]
    fn test_greeting_keywords() {
        let c = classifier();
        for input in ["Hello", "hey!", "HI", "who are you", "greetings"] {
            assert_eq!(c.classify(input), Category::Greeting, "input: {input}");
        }
    }

    #[test]
    fn test_greeting_beats_later_rules() {
        // "hello" and "python" both match; greeting is declared first.
        assert_eq!(classifier().classify("hello, python?"), Category::Greeting);
    }

    #[test]
    fn test_substring_matching_has_no_word_boundaries() {
        // "this" contains "hi", so the greeting rule fires before contact.
        assert_eq!(
            classifier().classify("is this your email"),
            Category::Greeting
        );
    }

    #[test]
    fn test_shared_keyword_resolves_by_rule_order() {
        // "work" is in both projects and experience; projects comes first.
        assert_eq!(classifier().classify("work"), Category::Projects);
        // Shadowed by the skills keyword "code".
        assert_eq!(classifier().classify("codealpha"), Category::Skills);
        assert_eq!(classifier().classify("intern role"), Category::Experience);
    }

    #[test]
    fn test_quick_reply_labels_match_their_category() {
        let c = classifier();
        assert_eq!(c.classify("skills"), Category::Skills);
        assert_eq!(c.classify("projects"), Category::Projects);
        assert_eq!(c.classify("experience"), Category::Experience);
        assert_eq!(c.classify("contact"), Category::Contact);
        assert_eq!(c.classify("certifications"), Category::Certifications);
    }

    #[test]
    fn test_education_and_certifications() {
        let c = classifier();
        assert_eq!(c.classify("Which university?"), Category::Greeting); // "which" contains "hi"
        assert_eq!(c.classify("what did you study?"), Category::Education);
        assert_eq!(c.classify("any bootcamp?"), Category::Certifications);
    }

    #[test]
    fn test_keywords_are_literals() {
        let rules = vec![KeywordRule::new(Category::Skills, &["c++", "f#"])];
        let c = IntentClassifier::new(&rules).unwrap();
        assert_eq!(c.classify("do you write C++"), Category::Skills);
        assert_eq!(c.classify("c"), Category::Default);
    }

    #[test]
    fn test_rejects_empty_rule() {
        let rules = vec![KeywordRule::new(Category::Skills, &["  "])];
        let err = IntentClassifier::new(&rules).unwrap_err();
        assert!(err.to_string().contains("has no keywords"));
    }

    #[test]
    fn test_rejects_default_target() {
        let rules = vec![KeywordRule::new(Category::Default, &["anything"])];
        assert!(IntentClassifier::new(&rules).is_err());
    }

    #[test]
    fn test_categories_follow_rule_order() {
        let order: Vec<Category> = classifier().categories().collect();
        assert_eq!(order.first(), Some(&Category::Greeting));
        assert_eq!(order.last(), Some(&Category::Certifications));
        assert_eq!(order.len(), 7);
    }
}
