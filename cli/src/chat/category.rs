//! # Chat Topic Categories
//!
//! File: cli/src/chat/category.rs
//! Author: Christi Mahu
//!
//! The closed set of topics Shy can answer about. Every bot reply is drawn
//! from the response pool of exactly one `Category`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fixed topic label used to select a canned response pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Greeting,
    Skills,
    Projects,
    Experience,
    Contact,
    Education,
    Certifications,
    /// Fallback when no keyword rule matches.
    Default,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 8] = [
        Category::Greeting,
        Category::Skills,
        Category::Projects,
        Category::Experience,
        Category::Contact,
        Category::Education,
        Category::Certifications,
        Category::Default,
    ];

    /// Lowercase name used in config files and API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Greeting => "greeting",
            Category::Skills => "skills",
            Category::Projects => "projects",
            Category::Experience => "experience",
            Category::Contact => "contact",
            Category::Education => "education",
            Category::Certifications => "certifications",
            Category::Default => "default",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| format!("Unknown chat category: '{}'", s))
    }
}
