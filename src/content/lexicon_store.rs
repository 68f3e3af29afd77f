use crate::types::lexicon::{Difficulty, LexiconBundle};
use std::collections::BTreeMap;

pub const DEFAULT_TOPIC: &str = "office";

/// topic -> difficulty -> bundle, as stored in `lexicon.json`.
pub type LexiconTable = BTreeMap<String, BTreeMap<String, LexiconBundle>>;

/// Read-only vocabulary tables plus topic display names.
#[derive(Debug, Clone, Default)]
pub struct LexiconStore {
    topics: LexiconTable,
    display_names: BTreeMap<String, String>,
    default_topic: String,
    empty: LexiconBundle,
}

impl LexiconStore {
    pub fn new(topics: LexiconTable, display_names: BTreeMap<String, String>) -> Self {
        Self {
            topics,
            display_names,
            default_topic: DEFAULT_TOPIC.to_string(),
            empty: LexiconBundle::default(),
        }
    }

    pub fn with_default_topic(mut self, topic: impl Into<String>) -> Self {
        self.default_topic = topic.into();
        self
    }

    pub fn default_topic(&self) -> &str {
        &self.default_topic
    }

    /// Resolves a bundle for any topic/difficulty pair.
    ///
    /// Unknown topics use the default topic; a difficulty the topic lacks is
    /// replaced by the easiest one it has. Never fails: with no default topic
    /// either, an empty bundle comes back.
    pub fn lookup(&self, topic: &str, difficulty: Difficulty) -> &LexiconBundle {
        let levels = match self
            .topics
            .get(topic)
            .or_else(|| self.topics.get(&self.default_topic))
        {
            Some(levels) => levels,
            None => return &self.empty,
        };

        if let Some(bundle) = levels.get(difficulty.as_str()) {
            return bundle;
        }
        Difficulty::ALL
            .iter()
            .find_map(|d| levels.get(d.as_str()))
            .or_else(|| levels.values().next())
            .unwrap_or(&self.empty)
    }

    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.contains_key(topic)
    }

    /// Topic keys with vocabulary, sorted.
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topics.keys().map(String::as_str)
    }

    /// Difficulties a topic carries vocabulary for, easiest first.
    pub fn difficulties(&self, topic: &str) -> Vec<Difficulty> {
        match self.topics.get(topic) {
            Some(levels) => Difficulty::ALL
                .into_iter()
                .filter(|d| levels.contains_key(d.as_str()))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn display_name<'a>(&'a self, topic: &'a str) -> &'a str {
        self.display_names
            .get(topic)
            .map(String::as_str)
            .unwrap_or(topic)
    }

    pub fn display_names(&self) -> &BTreeMap<String, String> {
        &self.display_names
    }
}
