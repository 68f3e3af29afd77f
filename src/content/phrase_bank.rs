use crate::types::conversation::{DialogueFragment, FragmentRole};
use crate::types::lexicon::{Difficulty, Tone};
use serde::Deserialize;
use std::collections::BTreeMap;

/// The three fragment lists kept per topic and difficulty.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct FragmentSet {
    #[serde(default)]
    pub openings: Vec<DialogueFragment>,
    #[serde(default)]
    pub discussions: Vec<DialogueFragment>,
    #[serde(default)]
    pub closings: Vec<DialogueFragment>,
}

impl FragmentSet {
    pub fn role(&self, role: FragmentRole) -> &[DialogueFragment] {
        match role {
            FragmentRole::Opening => &self.openings,
            FragmentRole::Discussion => &self.discussions,
            FragmentRole::Closing => &self.closings,
        }
    }
}

/// topic -> difficulty -> fragments, as stored in `dialogues.json`.
pub type DialogueTable = BTreeMap<String, BTreeMap<String, FragmentSet>>;

/// Template banks, one per conversational function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateCategory {
    Greeting,
    ResponseGreeting,
    TopicIntro,
    Agreement,
    Elaboration,
    Question,
    Answer,
    Transition,
    Closing,
}

impl TemplateCategory {
    /// Key of the bank in `conversation_flow.json`.
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateCategory::Greeting => "greeting",
            TemplateCategory::ResponseGreeting => "response_greeting",
            TemplateCategory::TopicIntro => "topic_intro",
            TemplateCategory::Agreement => "agreement",
            TemplateCategory::Elaboration => "elaboration",
            TemplateCategory::Question => "question",
            TemplateCategory::Answer => "answer",
            TemplateCategory::Transition => "transition",
            TemplateCategory::Closing => "closing",
        }
    }
}

/// Phrases a tone can wrap around a sentence.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ToneModifier {
    #[serde(default)]
    pub prefixes: Vec<String>,
    #[serde(default)]
    pub suffixes: Vec<String>,
}

/// `conversation_flow.json`: template contexts keyed by difficulty, plus tone modifiers.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ConversationFlow {
    #[serde(default)]
    pub contexts: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    pub tone_modifiers: BTreeMap<String, ToneModifier>,
}

/// Pre-written fragments and sentence templates.
#[derive(Debug, Clone, Default)]
pub struct PhraseBank {
    dialogues: DialogueTable,
    flow: ConversationFlow,
    no_tone: ToneModifier,
}

impl PhraseBank {
    pub fn new(dialogues: DialogueTable, flow: ConversationFlow) -> Self {
        Self {
            dialogues,
            flow,
            no_tone: ToneModifier::default(),
        }
    }

    /// Fragments for one role. An absent topic, difficulty or role gives an
    /// empty slice. Unlike the lexicon, nothing is substituted.
    pub fn fragments(&self, topic: &str, difficulty: Difficulty, role: FragmentRole) -> &[DialogueFragment] {
        self.dialogues
            .get(topic)
            .and_then(|levels| levels.get(difficulty.as_str()))
            .map(|set| set.role(role))
            .unwrap_or(&[])
    }

    pub fn has_fragments(&self, topic: &str, difficulty: Difficulty) -> bool {
        [FragmentRole::Opening, FragmentRole::Discussion, FragmentRole::Closing]
            .iter()
            .any(|role| !self.fragments(topic, difficulty, *role).is_empty())
    }

    /// Templates for a category, falling back to the easy bank.
    pub fn templates(&self, category: TemplateCategory, difficulty: Difficulty) -> &[String] {
        let Some(by_level) = self.flow.contexts.get(category.as_str()) else {
            return &[];
        };
        by_level
            .get(difficulty.as_str())
            .filter(|templates| !templates.is_empty())
            .or_else(|| by_level.get(Difficulty::Easy.as_str()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Modifier for `tone`, falling back to the neutral one.
    pub fn tone_modifier(&self, tone: Tone) -> &ToneModifier {
        self.flow
            .tone_modifiers
            .get(tone.as_str())
            .or_else(|| self.flow.tone_modifiers.get(Tone::Neutral.as_str()))
            .unwrap_or(&self.no_tone)
    }

    pub(crate) fn dialogues(&self) -> &DialogueTable {
        &self.dialogues
    }
}
