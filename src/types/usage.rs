use super::lexicon::{LexiconEntry, PhraseCategory, VocabCategory, WordCategory};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A lexicon entry copied into a run's results, tagged with where it came from.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct VocabDetail {
    #[serde(flatten)]
    pub entry: LexiconEntry,
    #[serde(rename = "type")]
    pub category: VocabCategory,
}

/// Vocabulary seen during one generation run.
///
/// Keys are stored once per category. `details` carries every matched key twice,
/// as written in the lexicon and lower-cased, so consumers can look words up
/// without caring about case.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct VocabularyUsage {
    pub nouns: BTreeSet<String>,
    pub verbs: BTreeSet<String>,
    pub adjectives: BTreeSet<String>,
    pub adverbs: BTreeSet<String>,
    pub idioms: BTreeSet<String>,
    pub collocations: BTreeSet<String>,
    pub details: BTreeMap<String, VocabDetail>,
}

impl VocabularyUsage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self, category: VocabCategory) -> &BTreeSet<String> {
        match category {
            VocabCategory::Word(WordCategory::Noun) => &self.nouns,
            VocabCategory::Word(WordCategory::Verb) => &self.verbs,
            VocabCategory::Word(WordCategory::Adjective) => &self.adjectives,
            VocabCategory::Word(WordCategory::Adverb) => &self.adverbs,
            VocabCategory::Phrase(PhraseCategory::Idiom) => &self.idioms,
            VocabCategory::Phrase(PhraseCategory::Collocation) => &self.collocations,
        }
    }

    fn keys_mut(&mut self, category: VocabCategory) -> &mut BTreeSet<String> {
        match category {
            VocabCategory::Word(WordCategory::Noun) => &mut self.nouns,
            VocabCategory::Word(WordCategory::Verb) => &mut self.verbs,
            VocabCategory::Word(WordCategory::Adjective) => &mut self.adjectives,
            VocabCategory::Word(WordCategory::Adverb) => &mut self.adverbs,
            VocabCategory::Phrase(PhraseCategory::Idiom) => &mut self.idioms,
            VocabCategory::Phrase(PhraseCategory::Collocation) => &mut self.collocations,
        }
    }

    /// Records `key` under `category`. Recording the same key again is a no-op
    /// apart from refreshing its details.
    pub fn record(&mut self, category: impl Into<VocabCategory>, key: &str, entry: &LexiconEntry) {
        let category = category.into();
        self.keys_mut(category).insert(key.to_string());
        let detail = VocabDetail {
            entry: entry.clone(),
            category,
        };
        let lowered = key.to_lowercase();
        if lowered != key {
            self.details.insert(lowered, detail.clone());
        }
        self.details.insert(key.to_string(), detail);
    }

    pub fn contains(&self, category: impl Into<VocabCategory>, key: &str) -> bool {
        self.keys(category.into()).contains(key)
    }

    /// Case-insensitive detail lookup.
    pub fn detail(&self, key: &str) -> Option<&VocabDetail> {
        self.details
            .get(key)
            .or_else(|| self.details.get(&key.to_lowercase()))
    }

    /// Number of distinct keys across every category.
    pub fn total(&self) -> usize {
        VocabCategory::ALL.iter().map(|c| self.keys(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Set union with `other`.
    pub fn merge(&mut self, other: VocabularyUsage) {
        for category in VocabCategory::ALL {
            self.keys_mut(category).extend(other.keys(category).iter().cloned());
        }
        self.details.extend(other.details);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(definition: &str) -> LexiconEntry {
        LexiconEntry {
            definition: definition.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn recording_twice_counts_once() {
        let mut usage = VocabularyUsage::new();
        usage.record(WordCategory::Noun, "desk", &entry("A table"));
        usage.record(WordCategory::Noun, "desk", &entry("A table"));
        assert_eq!(usage.total(), 1);
        assert!(usage.contains(WordCategory::Noun, "desk"));
        assert!(!usage.contains(WordCategory::Verb, "desk"));
    }

    #[test]
    fn details_are_reachable_by_lowercase_key() {
        let mut usage = VocabularyUsage::new();
        usage.record(WordCategory::Noun, "PC", &entry("A computer"));
        assert_eq!(usage.details.len(), 2);
        assert_eq!(usage.detail("pc").unwrap().entry.definition, "A computer");
        assert_eq!(usage.detail("Pc").unwrap().category, VocabCategory::Word(WordCategory::Noun));
    }

    #[test]
    fn merge_is_a_union() {
        let mut left = VocabularyUsage::new();
        left.record(WordCategory::Verb, "send", &entry("To deliver"));
        let mut right = VocabularyUsage::new();
        right.record(WordCategory::Verb, "send", &entry("To deliver"));
        right.record(PhraseCategory::Idiom, "deep dive", &entry("A thorough look"));

        left.merge(right);
        assert_eq!(left.total(), 2);
        assert!(left.contains(PhraseCategory::Idiom, "deep dive"));
    }

    #[test]
    fn details_serialize_with_type_tag() {
        let mut usage = VocabularyUsage::new();
        usage.record(PhraseCategory::Collocation, "take a break", &entry("To pause"));
        let json = serde_json::to_value(&usage).unwrap();
        assert_eq!(json["details"]["take a break"]["type"], "collocation");
        assert_eq!(json["details"]["take a break"]["definition"], "To pause");
        assert_eq!(json["collocations"][0], "take a break");
    }
}
