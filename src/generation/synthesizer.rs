use crate::content::phrase_bank::{PhraseBank, TemplateCategory};
use crate::types::conversation::{word_count, Conversation, GenerationRequest, Speaker};
use crate::types::lexicon::{LexiconBundle, Tone, WordCategory};
use crate::types::usage::VocabularyUsage;
use once_cell::sync::Lazy;
use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::debug;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(noun|verb|adjective|adverb)\}").expect("Valid placeholder regex"));

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SynthesisSettings {
    pub max_turns: usize,
    /// The budget check may only end the conversation after this many turns.
    pub min_turns_before_closing: usize,
    pub tone_prefix_probability: f64,
    pub max_rerolls: usize,
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        Self {
            max_turns: 50,
            min_turns_before_closing: 4,
            tone_prefix_probability: 0.3,
            max_rerolls: 3,
        }
    }
}

/// Conversational function of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Greeting,
    Response,
    Topic,
    Discuss,
    Elaborate,
    Question,
    Answer,
    Agree,
    Transition,
}

impl Phase {
    pub const OPENING: [Phase; 7] = [
        Phase::Greeting,
        Phase::Response,
        Phase::Topic,
        Phase::Discuss,
        Phase::Elaborate,
        Phase::Question,
        Phase::Answer,
    ];

    pub const CYCLE: [Phase; 6] = [
        Phase::Discuss,
        Phase::Elaborate,
        Phase::Question,
        Phase::Answer,
        Phase::Agree,
        Phase::Transition,
    ];

    pub fn for_turn(turn: usize) -> Phase {
        if turn < Self::OPENING.len() {
            Self::OPENING[turn]
        } else {
            Self::CYCLE[(turn - Self::OPENING.len()) % Self::CYCLE.len()]
        }
    }

    /// Template bank the phase draws from. A transition draws a topic intro
    /// and puts a transition phrase in front of it.
    pub fn category(self) -> TemplateCategory {
        match self {
            Phase::Greeting => TemplateCategory::Greeting,
            Phase::Response => TemplateCategory::ResponseGreeting,
            Phase::Topic | Phase::Transition => TemplateCategory::TopicIntro,
            Phase::Discuss | Phase::Elaborate => TemplateCategory::Elaboration,
            Phase::Question => TemplateCategory::Question,
            Phase::Answer => TemplateCategory::Answer,
            Phase::Agree => TemplateCategory::Agreement,
        }
    }

    pub fn takes_tone(self) -> bool {
        matches!(self, Phase::Discuss | Phase::Elaborate)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisOutcome {
    pub conversation: Conversation,
    /// Re-draws caused by duplicate lines, summed over the run.
    pub rerolls: usize,
}

/// A candidate line and the words substituted into it, not yet recorded.
struct Draft {
    text: String,
    substitutions: Vec<(WordCategory, String)>,
}

/// Last tier: builds a conversation turn by turn from sentence templates,
/// filling placeholders with lexicon words.
#[derive(Debug, Clone, Default)]
pub struct TemplateSynthesizer {
    settings: SynthesisSettings,
}

impl TemplateSynthesizer {
    pub fn new(settings: SynthesisSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SynthesisSettings {
        &self.settings
    }

    /// Runs the phase sequence until the budget or the turn ceiling is hit.
    ///
    /// Words substituted into accepted lines are recorded in `usage`. Phases
    /// whose template bank is empty are skipped; with no templates anywhere the
    /// conversation comes back empty.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        bundle: &LexiconBundle,
        phrases: &PhraseBank,
        request: &GenerationRequest,
        usage: &mut VocabularyUsage,
        rng: &mut R,
    ) -> SynthesisOutcome {
        let budget = request.length_budget;
        let mut conversation = Conversation::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut words = 0usize;
        let mut rerolls = 0usize;
        let mut turn = 0usize;

        while words < budget && turn < self.settings.max_turns {
            let phase = Phase::for_turn(turn);
            let Some(mut draft) = self.draft_line(phase, bundle, phrases, request, rng) else {
                debug!("No templates for {:?}, skipping turn {}", phase, turn);
                turn += 1;
                continue;
            };

            let mut attempts = 0;
            while seen.contains(&draft.text) && attempts < self.settings.max_rerolls {
                match self.draft_line(Phase::Elaborate, bundle, phrases, request, rng) {
                    Some(rerolled) => draft = rerolled,
                    None => break,
                }
                attempts += 1;
            }
            rerolls += attempts;
            seen.insert(draft.text.clone());

            let line_words = word_count(&draft.text);
            if words + line_words > budget && turn >= self.settings.min_turns_before_closing {
                if let Some(closing) = self.closing_line(bundle, phrases, request, rng) {
                    let closing_words = word_count(&closing.text);
                    if words + closing_words <= budget {
                        commit(usage, bundle, &closing.substitutions);
                        conversation.push(next_speaker(&conversation), closing.text);
                        words += closing_words;
                    }
                }
                break;
            }

            commit(usage, bundle, &draft.substitutions);
            conversation.push(next_speaker(&conversation), draft.text);
            words += line_words;
            turn += 1;
        }

        debug!(
            "Synthesized {} line(s), {} of {} word(s), {} re-roll(s)",
            conversation.len(),
            words,
            budget,
            rerolls
        );
        SynthesisOutcome { conversation, rerolls }
    }

    fn draft_line<R: Rng + ?Sized>(
        &self,
        phase: Phase,
        bundle: &LexiconBundle,
        phrases: &PhraseBank,
        request: &GenerationRequest,
        rng: &mut R,
    ) -> Option<Draft> {
        let template = phrases.templates(phase.category(), request.difficulty).choose(rng)?;
        let mut substitutions = Vec::new();
        let mut text = fill_template(template, bundle, &mut substitutions, rng);

        if phase == Phase::Transition {
            let prefix = phrases
                .templates(TemplateCategory::Transition, request.difficulty)
                .choose(rng)?;
            text = format!("{} {}", prefix, text.to_lowercase());
        }
        if phase.takes_tone() {
            text = self.apply_tone(text, request.tone, phrases, rng);
        }

        Some(Draft {
            text: capitalize_first(&text),
            substitutions,
        })
    }

    fn closing_line<R: Rng + ?Sized>(
        &self,
        bundle: &LexiconBundle,
        phrases: &PhraseBank,
        request: &GenerationRequest,
        rng: &mut R,
    ) -> Option<Draft> {
        let template = phrases
            .templates(TemplateCategory::Closing, request.difficulty)
            .choose(rng)?;
        let mut substitutions = Vec::new();
        let text = fill_template(template, bundle, &mut substitutions, rng);
        Some(Draft {
            text: capitalize_first(&text),
            substitutions,
        })
    }

    fn apply_tone<R: Rng + ?Sized>(&self, text: String, tone: Tone, phrases: &PhraseBank, rng: &mut R) -> String {
        if rng.gen::<f64>() >= self.settings.tone_prefix_probability {
            return text;
        }
        match phrases.tone_modifier(tone).prefixes.choose(rng) {
            Some(prefix) => format!("{} {}", prefix, text.to_lowercase()),
            None => text,
        }
    }
}

/// Replaces each placeholder with an independently drawn word of its category.
/// An empty category yields its generic word, which is not tracked.
fn fill_template<R: Rng + ?Sized>(
    template: &str,
    bundle: &LexiconBundle,
    substitutions: &mut Vec<(WordCategory, String)>,
    rng: &mut R,
) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let Some(category) = WordCategory::from_placeholder(&caps[1]) else {
                return caps[0].to_string();
            };
            match bundle.words(category).keys().choose(&mut *rng) {
                Some(word) => {
                    substitutions.push((category, word.clone()));
                    word.clone()
                }
                None => category.generic_word().to_string(),
            }
        })
        .into_owned()
}

fn commit(usage: &mut VocabularyUsage, bundle: &LexiconBundle, substitutions: &[(WordCategory, String)]) {
    for (category, word) in substitutions {
        if let Some(entry) = bundle.words(*category).get(word) {
            usage.record(*category, word, entry);
        }
    }
}

fn next_speaker(conversation: &Conversation) -> Speaker {
    if conversation.len() % 2 == 0 {
        Speaker::A
    } else {
        Speaker::B
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
