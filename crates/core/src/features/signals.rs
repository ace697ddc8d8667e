//! Keyword signal matching over free-text content descriptions.
//!
//! Text and phrases are reduced to lowercase alphanumeric tokens, so
//! "High-Quality" matches the phrase "high quality". A phrase directly
//! preceded by a negation word does not count.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Tokenizer pattern. Applied to lowercased text.
const TOKEN_PATTERN: &str = r"[a-z0-9]+";

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TOKEN_PATTERN).expect("valid regex"));

/// Tokens that cancel the phrase immediately following them.
const NEGATION_WORDS: &[&str] = &["no", "not", "without", "non"];

/// Normalized token form of a phrase. Two phrases with the same key match
/// exactly the same text.
pub fn phrase_key(phrase: &str) -> Vec<String> {
    tokenize(phrase)
}

fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// A description broken into tokens, ready for phrase lookups.
#[derive(Debug, Clone, Default)]
pub struct TokenizedText {
    tokens: Vec<String>,
}

impl TokenizedText {
    pub fn new(text: &str) -> Self {
        Self {
            tokens: tokenize(text),
        }
    }

    /// Whether `phrase` occurs at least once without a preceding negation.
    pub fn contains_phrase(&self, phrase: &str) -> bool {
        let needle = tokenize(phrase);
        if needle.is_empty() || needle.len() > self.tokens.len() {
            return false;
        }

        self.tokens
            .windows(needle.len())
            .enumerate()
            .any(|(start, window)| {
                window == needle.as_slice()
                    && (start == 0 || !NEGATION_WORDS.contains(&self.tokens[start - 1].as_str()))
            })
    }

    /// Phrases from `phrases` present in the text, in table order.
    ///
    /// Each phrase is reported once even if it appears several times or is
    /// listed twice with different casing.
    pub fn matches(&self, phrases: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        phrases
            .iter()
            .filter(|p| seen.insert(phrase_key(p)))
            .filter(|p| self.contains_phrase(p))
            .cloned()
            .collect()
    }
}
