use super::inflection::{InflectionMatcher, SuffixInflections};
use crate::content::lexicon_store::LexiconStore;
use crate::types::conversation::Conversation;
use crate::types::lexicon::{Difficulty, LexiconBundle, PhraseCategory, WordCategory};
use crate::types::usage::VocabularyUsage;
use tracing::debug;

/// Finds which lexicon items a conversation actually uses.
///
/// Words go through the inflection matcher; idioms and collocations are
/// plain case-insensitive substring checks.
#[derive(Debug, Clone, Default)]
pub struct VocabularyMatcher<M: InflectionMatcher = SuffixInflections> {
    inflections: M,
}

impl VocabularyMatcher<SuffixInflections> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: InflectionMatcher> VocabularyMatcher<M> {
    pub fn with_inflections(inflections: M) -> Self {
        Self { inflections }
    }

    pub fn extract(
        &self,
        conversation: &Conversation,
        lexicon: &LexiconStore,
        topic: &str,
        difficulty: Difficulty,
    ) -> VocabularyUsage {
        let mut usage = VocabularyUsage::new();
        self.extract_into(&mut usage, conversation, lexicon, topic, difficulty);
        usage
    }

    /// Adds matches to `usage` without removing anything already recorded.
    pub fn extract_into(
        &self,
        usage: &mut VocabularyUsage,
        conversation: &Conversation,
        lexicon: &LexiconStore,
        topic: &str,
        difficulty: Difficulty,
    ) {
        let bundle = lexicon.lookup(topic, difficulty);
        self.extract_from_bundle(usage, conversation, bundle);
    }

    pub fn extract_from_bundle(
        &self,
        usage: &mut VocabularyUsage,
        conversation: &Conversation,
        bundle: &LexiconBundle,
    ) {
        let text = conversation.lowercase_text();
        if text.is_empty() {
            return;
        }
        let before = usage.total();

        for category in WordCategory::ALL {
            for (key, entry) in bundle.words(category) {
                if self.inflections.matches(key, &text) {
                    usage.record(category, key, entry);
                }
            }
        }

        for category in PhraseCategory::ALL {
            for (key, entry) in bundle.phrases(category) {
                if text.contains(&key.to_lowercase()) {
                    usage.record(category, key, entry);
                }
            }
        }

        debug!("Matcher added {} vocabulary item(s)", usage.total() - before);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::conversation::Speaker;
    use crate::types::lexicon::{LexiconEntry, VocabCategory};
    use proptest::prelude::*;

    fn entry(definition: &str) -> LexiconEntry {
        LexiconEntry {
            definition: definition.to_string(),
            ..Default::default()
        }
    }

    fn bundle() -> LexiconBundle {
        let mut bundle = LexiconBundle::default();
        bundle.nouns.insert("email".into(), entry("An electronic message"));
        bundle.nouns.insert("meeting".into(), entry("A gathering"));
        bundle.nouns.insert("desk".into(), entry("A table"));
        bundle.verbs.insert("work".into(), entry("To do a job"));
        bundle.adverbs.insert("quick".into(), entry("Fast"));
        bundle.idioms.insert("on the same page".into(), entry("In agreement"));
        bundle.collocations.insert("Make a Decision".into(), entry("To decide"));
        bundle
    }

    fn conversation(lines: &[&str]) -> Conversation {
        let mut conversation = Conversation::new();
        let mut speaker = Speaker::A;
        for line in lines {
            conversation.push(speaker, *line);
            speaker = speaker.other();
        }
        conversation
    }

    #[test]
    fn finds_words_and_inflections() {
        let matcher = VocabularyMatcher::new();
        let mut usage = VocabularyUsage::new();
        let convo = conversation(&["Did you see the email about the meeting?", "I was working quickly."]);
        matcher.extract_from_bundle(&mut usage, &convo, &bundle());

        assert!(usage.contains(WordCategory::Noun, "email"));
        assert!(usage.contains(WordCategory::Noun, "meeting"));
        assert!(!usage.contains(WordCategory::Noun, "desk"));
        assert!(usage.contains(WordCategory::Verb, "work"));
        assert!(usage.contains(WordCategory::Adverb, "quick"));
        assert_eq!(usage.detail("email").unwrap().category, VocabCategory::Word(WordCategory::Noun));
    }

    #[test]
    fn phrases_match_by_substring_ignoring_case() {
        let matcher = VocabularyMatcher::new();
        let mut usage = VocabularyUsage::new();
        let convo = conversation(&["Are we On The Same Page?", "We must make a decision today."]);
        matcher.extract_from_bundle(&mut usage, &convo, &bundle());

        assert!(usage.contains(PhraseCategory::Idiom, "on the same page"));
        assert!(usage.contains(PhraseCategory::Collocation, "Make a Decision"));
        assert!(usage.detail("make a decision").is_some());
    }

    #[test]
    fn keeps_previously_recorded_items() {
        let matcher = VocabularyMatcher::new();
        let mut usage = VocabularyUsage::new();
        usage.record(WordCategory::Noun, "desk", &entry("A table"));
        matcher.extract_from_bundle(&mut usage, &conversation(&["Check your email."]), &bundle());
        assert!(usage.contains(WordCategory::Noun, "desk"));
        assert!(usage.contains(WordCategory::Noun, "email"));
    }

    #[test]
    fn empty_conversation_matches_nothing() {
        let matcher = VocabularyMatcher::new();
        let mut usage = VocabularyUsage::new();
        matcher.extract_from_bundle(&mut usage, &Conversation::new(), &bundle());
        assert!(usage.is_empty());
    }

    struct ExactOnly;

    impl InflectionMatcher for ExactOnly {
        fn matches(&self, key: &str, text: &str) -> bool {
            text.split(|c: char| !c.is_alphanumeric()).any(|w| w == key)
        }
    }

    #[test]
    fn inflection_strategy_is_swappable() {
        let matcher = VocabularyMatcher::with_inflections(ExactOnly);
        let mut usage = VocabularyUsage::new();
        matcher.extract_from_bundle(&mut usage, &conversation(&["Emails keep working."]), &bundle());
        assert!(!usage.contains(WordCategory::Noun, "email"));
        assert!(!usage.contains(WordCategory::Verb, "work"));
    }

    proptest! {
        #[test]
        fn extraction_is_idempotent(lines in proptest::collection::vec("[a-z ]{0,40}", 0..6)) {
            let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
            let convo = conversation(&refs);
            let matcher = VocabularyMatcher::new();
            let bundle = bundle();

            let mut first = VocabularyUsage::new();
            matcher.extract_from_bundle(&mut first, &convo, &bundle);
            let mut second = VocabularyUsage::new();
            matcher.extract_from_bundle(&mut second, &convo, &bundle);
            prop_assert_eq!(&first, &second);

            let mut again = first.clone();
            matcher.extract_from_bundle(&mut again, &convo, &bundle);
            prop_assert_eq!(first, again);
        }
    }
}
