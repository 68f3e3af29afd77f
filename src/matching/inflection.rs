use regex::Regex;
use tracing::warn;

/// Endings tried after a lexicon key. An approximation, not a stemmer.
pub const INFLECTION_SUFFIXES: [&str; 7] = ["s", "es", "ed", "ing", "ly", "er", "est"];

/// Decides whether a lexicon key occurs in a piece of text.
pub trait InflectionMatcher {
    fn matches(&self, key: &str, text: &str) -> bool;
}

/// Whole-word, case-insensitive match of the key or the key plus one of
/// [`INFLECTION_SUFFIXES`]. The regex is rebuilt on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuffixInflections;

impl SuffixInflections {
    pub fn pattern(key: &str) -> String {
        let base = regex::escape(key);
        let mut variants = Vec::with_capacity(INFLECTION_SUFFIXES.len() + 1);
        variants.push(base.clone());
        variants.extend(INFLECTION_SUFFIXES.iter().map(|suffix| format!("{}{}", base, suffix)));
        format!(r"(?i)\b(?:{})\b", variants.join("|"))
    }
}

impl InflectionMatcher for SuffixInflections {
    fn matches(&self, key: &str, text: &str) -> bool {
        if key.trim().is_empty() {
            return false;
        }
        match Regex::new(&Self::pattern(key)) {
            Ok(re) => re.is_match(text),
            Err(e) => {
                warn!("Failed to compile inflection pattern for '{}': {}", key, e);
                false
            }
        }
    }
}
