//! Keyword rules
//!
//! A rule pairs a keyword with the importance weight it contributes when a
//! log line contains it. Rules are kept as an ordered list: evaluation order
//! is load order, and the scorer short-circuits once the weight cap is hit.

pub mod loader;

pub use loader::{load_keyword_file, parse_keywords, push_rule, rules_from_keywords};

/// Weight assigned to keywords that do not specify one
pub const DEFAULT_WEIGHT: u32 = 1;

/// A single keyword and its importance weight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub keyword: String,
    pub weight: u32,
}

impl Rule {
    pub fn new(keyword: impl Into<String>, weight: u32) -> Self {
        Self {
            keyword: keyword.into(),
            weight,
        }
    }

    /// Rule with the default weight
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self::new(keyword, DEFAULT_WEIGHT)
    }
}
