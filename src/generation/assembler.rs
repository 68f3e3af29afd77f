use crate::content::phrase_bank::PhraseBank;
use crate::types::conversation::{Conversation, DialogueFragment, FragmentRole, GenerationRequest, Speaker};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::collections::HashSet;
use tracing::debug;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AssemblySettings {
    /// Discussion fragments stop being added once this share of the budget is used.
    pub discussion_fill_ratio: f64,
    /// Discussion attempts are capped at `retry_factor * fragment count`.
    pub retry_factor: usize,
}

impl Default for AssemblySettings {
    fn default() -> Self {
        Self {
            discussion_fill_ratio: 0.75,
            retry_factor: 2,
        }
    }
}

/// Second tier: stitches pre-written fragments together under a word budget.
#[derive(Debug, Clone, Default)]
pub struct BudgetedAssembler {
    settings: AssemblySettings,
}

impl BudgetedAssembler {
    pub fn new(settings: AssemblySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AssemblySettings {
        &self.settings
    }

    /// Opening, then discussions up to the fill ratio, then a closing if it fits.
    /// Never exceeds `request.length_budget` words. Empty when the topic and
    /// difficulty have no fragments at all.
    pub fn assemble<R: Rng + ?Sized>(
        &self,
        phrases: &PhraseBank,
        request: &GenerationRequest,
        rng: &mut R,
    ) -> Conversation {
        let budget = request.length_budget;
        let mut conversation = Conversation::new();
        let mut words = 0usize;

        let openings = phrases.fragments(&request.topic, request.difficulty, FragmentRole::Opening);
        if let Some(opening) = openings.choose(rng) {
            for line in &opening.lines {
                let line_words = line.word_count();
                if words + line_words > budget {
                    break;
                }
                conversation.lines.push(line.clone());
                words += line_words;
            }
        }

        let discussions = phrases.fragments(&request.topic, request.difficulty, FragmentRole::Discussion);
        if !discussions.is_empty() {
            words = self.add_discussions(&mut conversation, words, discussions, budget, rng);
        }

        let closings = phrases.fragments(&request.topic, request.difficulty, FragmentRole::Closing);
        if let Some(closing) = closings.choose(rng) {
            let closing_words = closing.word_count();
            if words + closing_words <= budget {
                append_alternating(&mut conversation, closing);
                words += closing_words;
            } else {
                debug!("Closing of {} word(s) does not fit, {} of {} used", closing_words, words, budget);
            }
        }

        debug!(
            "Assembled {} line(s), {} of {} word(s)",
            conversation.len(),
            words,
            budget
        );
        conversation
    }

    fn add_discussions<R: Rng + ?Sized>(
        &self,
        conversation: &mut Conversation,
        mut words: usize,
        discussions: &[DialogueFragment],
        budget: usize,
        rng: &mut R,
    ) -> usize {
        let fill_target = budget as f64 * self.settings.discussion_fill_ratio;
        let max_attempts = discussions.len() * self.settings.retry_factor;
        let mut used: HashSet<usize> = HashSet::new();
        let mut attempts = 0;

        while (words as f64) < fill_target && attempts < max_attempts {
            attempts += 1;
            if used.len() >= discussions.len() {
                used.clear();
            }
            let fresh: Vec<usize> = (0..discussions.len()).filter(|i| !used.contains(i)).collect();
            let Some(&index) = fresh.choose(rng) else { break };

            let fragment = &discussions[index];
            let fragment_words = fragment.word_count();
            if fragment.lines.is_empty() || words + fragment_words > budget {
                continue;
            }
            used.insert(index);
            append_alternating(conversation, fragment);
            words += fragment_words;
        }
        words
    }
}

/// Appends `fragment`, swapping its speakers when it would open on the voice
/// that spoke last. An empty conversation counts as B having spoken last.
fn append_alternating(conversation: &mut Conversation, fragment: &DialogueFragment) {
    let last = conversation.last_speaker().unwrap_or(Speaker::B);
    if fragment.first_speaker() == Some(last) {
        conversation.lines.extend(fragment.swapped().lines);
    } else {
        conversation.lines.extend(fragment.lines.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::phrase_bank::{ConversationFlow, DialogueTable};
    use crate::types::lexicon::{Difficulty, Tone};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bank(json: &str) -> PhraseBank {
        let dialogues: DialogueTable = serde_json::from_str(json).unwrap();
        PhraseBank::new(dialogues, ConversationFlow::default())
    }

    const OFFICE: &str = r#"{"office": {"easy": {
        "openings": [[
            {"speaker": "A", "text": "Good morning!"},
            {"speaker": "B", "text": "Morning! How are you today?"}
        ]],
        "discussions": [
            [{"speaker": "A", "text": "Did you see the email about the meeting?"},
             {"speaker": "B", "text": "Yes, it starts at ten."}],
            [{"speaker": "B", "text": "The printer is broken again."},
             {"speaker": "A", "text": "I will call support."}],
            [{"speaker": "A", "text": "Can you send me the report?"},
             {"speaker": "B", "text": "Sure, right after lunch."}]
        ],
        "closings": [[
            {"speaker": "A", "text": "See you later."},
            {"speaker": "B", "text": "Bye!"}
        ]]
    }}}"#;

    fn request(budget: usize) -> GenerationRequest {
        GenerationRequest::new("office", Difficulty::Easy, budget, Tone::Neutral)
    }

    #[test]
    fn stays_within_budget_and_alternates() {
        let bank = bank(OFFICE);
        let assembler = BudgetedAssembler::default();
        let mut rng = StdRng::seed_from_u64(7);
        let conversation = assembler.assemble(&bank, &request(50), &mut rng);

        assert!(!conversation.is_empty());
        assert!(conversation.word_count() <= 50);
        assert_eq!(conversation.lines[0].text, "Good morning!");
        for pair in conversation.lines.windows(2) {
            assert_ne!(pair[0].speaker, pair[1].speaker, "{conversation}");
        }
    }

    #[test]
    fn opening_may_be_cut_short() {
        let bank = bank(OFFICE);
        let mut rng = StdRng::seed_from_u64(1);
        let conversation = BudgetedAssembler::default().assemble(&bank, &request(3), &mut rng);
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.lines[0].text, "Good morning!");
    }

    #[test]
    fn closing_is_all_or_nothing() {
        let json = r#"{"office": {"easy": {
            "closings": [[
                {"speaker": "A", "text": "Thanks for your help today."},
                {"speaker": "B", "text": "Any time."}
            ]]
        }}}"#;
        let bank = bank(json);
        let mut rng = StdRng::seed_from_u64(3);
        assert!(BudgetedAssembler::default().assemble(&bank, &request(6), &mut rng).is_empty());

        let conversation = BudgetedAssembler::default().assemble(&bank, &request(7), &mut rng);
        assert_eq!(conversation.len(), 2);
    }

    #[test]
    fn first_fragment_on_empty_conversation_starts_with_a() {
        let json = r#"{"office": {"easy": {
            "discussions": [[
                {"speaker": "B", "text": "Where is the stapler?"},
                {"speaker": "A", "text": "On my desk."}
            ]]
        }}}"#;
        let bank = bank(json);
        let mut rng = StdRng::seed_from_u64(5);
        let conversation = BudgetedAssembler::default().assemble(&bank, &request(8), &mut rng);
        assert_eq!(conversation.lines[0].speaker, Speaker::A);
        assert_eq!(conversation.lines[0].text, "Where is the stapler?");
        assert_eq!(conversation.lines[1].speaker, Speaker::B);
    }

    #[test]
    fn used_discussions_repeat_only_after_all_are_taken() {
        let bank = bank(OFFICE);
        let mut rng = StdRng::seed_from_u64(11);
        let conversation = BudgetedAssembler::default().assemble(&bank, &request(200), &mut rng);
        let firsts = [
            "Did you see the email about the meeting?",
            "The printer is broken again.",
            "Can you send me the report?",
        ];
        let placed: Vec<&str> = conversation
            .lines
            .iter()
            .map(|line| line.text.as_str())
            .filter(|text| firsts.contains(text))
            .collect();

        // Six attempts, all of which fit: two full passes over the three fragments.
        assert_eq!(placed.len(), 6);
        for pass in placed.chunks(3) {
            let distinct: HashSet<&str> = pass.iter().copied().collect();
            assert_eq!(distinct.len(), 3);
        }
    }

    #[test]
    fn missing_difficulty_gives_empty_output() {
        let bank = bank(OFFICE);
        let mut rng = StdRng::seed_from_u64(2);
        let req = GenerationRequest::new("office", Difficulty::Hard, 100, Tone::Neutral);
        assert!(BudgetedAssembler::default().assemble(&bank, &req, &mut rng).is_empty());
    }

    proptest! {
        #[test]
        fn never_exceeds_budget(budget in 0usize..300, seed in any::<u64>()) {
            let bank = bank(OFFICE);
            let mut rng = StdRng::seed_from_u64(seed);
            let conversation = BudgetedAssembler::default().assemble(&bank, &request(budget), &mut rng);
            prop_assert!(conversation.word_count() <= budget);
        }

        #[test]
        fn fragments_never_repeat_the_last_speaker(budget in 10usize..300, seed in any::<u64>()) {
            let bank = bank(OFFICE);
            let mut rng = StdRng::seed_from_u64(seed);
            let conversation = BudgetedAssembler::default().assemble(&bank, &request(budget), &mut rng);
            for pair in conversation.lines.windows(2) {
                prop_assert_ne!(pair[0].speaker, pair[1].speaker);
            }
        }
    }
}
