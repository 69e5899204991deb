//! # Canned Responses
//!
//! File: cli/src/chat/responses.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Holds the response pool (one ordered list of canned replies per
//! [`Category`]) and the selector that draws from it.
//!
//! The pool is validated once at construction: every category must have at
//! least one non-blank reply. That is what lets [`ResponseSelector::select`]
//! be infallible.
//!
//! The selector owns an injected random source. Production code seeds it
//! from entropy; tests pass `StdRng::seed_from_u64` for reproducible draws.
//!
use super::category::Category;
use crate::core::error::{FolioError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Built-in replies for each category.
fn default_pool_entries() -> Vec<(Category, Vec<&'static str>)> {
    vec![
        (
            Category::Greeting,
            vec![
                "Hi there! I'm Shy, Suryansh's assistant. How can I help you today?",
                "Hello! I'm Shy. Feel free to ask me anything about Suryansh's work.",
            ],
        ),
        (
            Category::Skills,
            vec![
                "Suryansh is primarily a Python programmer, skilled in libraries like Pandas, Matplotlib, Streamlit, Pygame, and pyttsx3. On the web side, he works with HTML, CSS, JavaScript, MySQL, and Java.",
                "His core skills include Python (with Pandas, Matplotlib, Streamlit), JavaScript, HTML/CSS, MySQL, and Java. He's also experienced with version control using Git.",
            ],
        ),
        (
            Category::Projects,
            vec![
                "Suryansh has built some impressive projects: a Food Delivery System (Python + MySQL + ML), a Lyrics Animation System (Pygame), an Expense Manager (Streamlit), and an Interactive Tourism Website (Three.js + Firebase).",
                "Key projects include a smart Food Delivery System with data analytics, a Pygame Lyrics Animation tool, an Expense Manager web app, and an Interactive 3D Tourism Website.",
            ],
        ),
        (
            Category::Experience,
            vec![
                "Suryansh worked as a Front End Developer at CodeAlpha from January to February 2026, where he built responsive web pages with HTML, CSS, and JavaScript, and collaborated closely with UX/UI designers.",
                "He completed a Front End Developer internship at CodeAlpha (Jan to Feb 2026), focusing on responsive design, cross-platform development, and version control with Git.",
            ],
        ),
        (
            Category::Contact,
            vec![
                "You can reach Suryansh through the contact form on this page. Find his work on GitHub, or connect on LinkedIn!",
                "Best way to reach him is the contact form for professional inquiries. He's also active on LinkedIn and GitHub.",
            ],
        ),
        (
            Category::Education,
            vec![
                "Suryansh is pursuing a Bachelor of Computer Applications (BCA) from GLA University, Mathura, India. He's passionate about expanding his knowledge in Python, Kotlin, Go, and modern web tech.",
                "He's a BCA student at GLA University, Mathura, UP, combining academic learning with hands-on project development.",
            ],
        ),
        (
            Category::Certifications,
            vec![
                "Suryansh holds certifications in CodePunk v1.0 (GLA University), GeekVerse V.1 (GLA University), Introduction to Azure Static Web Apps (M.S.L.A.), and SQL Bootcamp (Lets Upgrade).",
                "His certifications include CodePunk v1.0, GeekVerse V.1, Azure Static Web Apps, and SQL Bootcamp, covering cloud, databases, and development best practices.",
            ],
        ),
        (
            Category::Default,
            vec![
                "That's a great question! For detailed info, I'd suggest reaching out to Suryansh directly through the contact form.",
                "I'm not sure about that specific topic, but feel free to ask about Suryansh's skills, projects, experience, or how to contact him!",
                "Hmm, I don't have that detail right now. Try asking about skills, projects, certifications, experience, or contact info!",
            ],
        ),
    ]
}

/// Immutable mapping from category to its non-empty list of canned replies.
#[derive(Debug, Clone)]
pub struct ResponsePool {
    entries: BTreeMap<Category, Vec<String>>,
}

impl ResponsePool {
    /// # Build Pool (`new`)
    ///
    /// ## Errors
    ///
    /// Returns `FolioError::Config` when any category is missing or has no
    /// non-blank reply.
    pub fn new(entries: BTreeMap<Category, Vec<String>>) -> Result<Self> {
        let mut cleaned = BTreeMap::new();
        for category in Category::ALL {
            let replies: Vec<String> = entries
                .get(&category)
                .map(|list| {
                    list.iter()
                        .filter(|r| !r.trim().is_empty())
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();

            if replies.is_empty() {
                return Err(FolioError::Config(format!(
                    "Response pool for '{}' is empty",
                    category
                ))
                .into());
            }
            cleaned.insert(category, replies);
        }
        Ok(Self { entries: cleaned })
    }

    /// # Built-in Pool With Overrides (`with_overrides`)
    ///
    /// Starts from the built-in replies and replaces the pool of every
    /// category present in `overrides`. An override with no usable reply is
    /// rejected rather than silently falling back.
    pub fn with_overrides(overrides: &HashMap<Category, Vec<String>>) -> Result<Self> {
        let mut entries: BTreeMap<Category, Vec<String>> = default_pool_entries()
            .into_iter()
            .map(|(c, list)| (c, list.into_iter().map(String::from).collect()))
            .collect();

        for (category, replies) in overrides {
            debug!(
                "Overriding response pool for '{}' ({} replies)",
                category,
                replies.len()
            );
            entries.insert(*category, replies.clone());
        }

        Self::new(entries)
    }

    /// All replies for `category`. Never empty.
    pub fn replies(&self, category: Category) -> &[String] {
        // `new` guarantees every category has an entry.
        self.entries
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Uniform index draw over the pool of `category`.
    pub fn pick<R: Rng>(&self, category: Category, rng: &mut R) -> &str {
        let replies = self.replies(category);
        let index = rng.gen_range(0..replies.len());
        &replies[index]
    }
}

impl Default for ResponsePool {
    fn default() -> Self {
        // The built-in table covers every category.
        Self::with_overrides(&HashMap::new()).expect("built-in response pool is complete")
    }
}

/// Draws canned replies with an injected random source.
#[derive(Debug)]
pub struct ResponseSelector<R: Rng = StdRng> {
    pool: Arc<ResponsePool>,
    rng: R,
}

impl ResponseSelector<StdRng> {
    /// Selector seeded from OS entropy.
    pub fn from_entropy(pool: Arc<ResponsePool>) -> Self {
        Self::new(pool, StdRng::from_entropy())
    }

    /// Selector with a fixed seed, for reproducible draws.
    pub fn seeded(pool: Arc<ResponsePool>, seed: u64) -> Self {
        Self::new(pool, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ResponseSelector<R> {
    pub fn new(pool: Arc<ResponsePool>, rng: R) -> Self {
        Self { pool, rng }
    }

    /// # Select Response (`select`)
    ///
    /// Independent uniform draw from the pool of `category`. Repeated calls
    /// for the same category may return different replies.
    pub fn select(&mut self, category: Category) -> String {
        self.pool.pick(category, &mut self.rng).to_string()
    }

    /// Shared access to the random source (typing delays draw from it too).
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}
