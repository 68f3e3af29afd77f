use super::lexicon_store::{LexiconStore, LexiconTable};
use super::phrase_bank::{ConversationFlow, DialogueTable, PhraseBank};
use crate::error::ContentError;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

const LEXICON_FILE: &str = "lexicon.json";
const TOPICS_FILE: &str = "topics.json";
const DIALOGUES_FILE: &str = "dialogues.json";
const FLOW_FILE: &str = "conversation_flow.json";

const BUNDLED_LEXICON: &str = include_str!("../../data/lexicon.json");
const BUNDLED_TOPICS: &str = include_str!("../../data/topics.json");
const BUNDLED_DIALOGUES: &str = include_str!("../../data/dialogues.json");
const BUNDLED_FLOW: &str = include_str!("../../data/conversation_flow.json");

/// Everything generation reads from: vocabulary plus fragments and templates.
#[derive(Debug, Clone)]
pub struct ContentLibrary {
    pub lexicon: Arc<LexiconStore>,
    pub phrases: Arc<PhraseBank>,
}

impl ContentLibrary {
    /// Tables compiled into the binary.
    pub fn bundled(default_topic: &str) -> Result<Self, ContentError> {
        Self::from_sources(
            default_topic,
            BUNDLED_LEXICON,
            BUNDLED_TOPICS,
            BUNDLED_DIALOGUES,
            BUNDLED_FLOW,
        )
    }

    /// Reads the four JSON tables from `dir`.
    pub fn load(dir: &Path, default_topic: &str) -> Result<Self, ContentError> {
        info!("Loading content tables from {}", dir.display());
        let lexicon = read_table(dir, LEXICON_FILE)?;
        let topics = read_table(dir, TOPICS_FILE)?;
        let dialogues = read_table(dir, DIALOGUES_FILE)?;
        let flow = read_table(dir, FLOW_FILE)?;
        Self::from_sources(default_topic, &lexicon, &topics, &dialogues, &flow)
    }

    pub fn from_sources(
        default_topic: &str,
        lexicon_json: &str,
        topics_json: &str,
        dialogues_json: &str,
        flow_json: &str,
    ) -> Result<Self, ContentError> {
        let lexicon: LexiconTable = parse_table("lexicon", lexicon_json)?;
        let display_names: BTreeMap<String, String> = parse_table("topics", topics_json)?;
        let dialogues: DialogueTable = parse_table("dialogues", dialogues_json)?;
        let flow: ConversationFlow = parse_table("conversation_flow", flow_json)?;

        let lexicon = LexiconStore::new(lexicon, display_names).with_default_topic(default_topic);
        let phrases = PhraseBank::new(dialogues, flow);
        validate(&lexicon, &phrases)?;

        debug!(
            "Content ready: {} lexicon topic(s), {} dialogue topic(s)",
            lexicon.topics().count(),
            phrases.dialogues().len()
        );
        Ok(Self {
            lexicon: Arc::new(lexicon),
            phrases: Arc::new(phrases),
        })
    }
}

fn read_table(dir: &Path, file_name: &str) -> Result<String, ContentError> {
    let path = dir.join(file_name);
    fs::read_to_string(&path).map_err(|source| ContentError::Read { path, source })
}

fn parse_table<T: DeserializeOwned>(table: &'static str, json: &str) -> Result<T, ContentError> {
    serde_json::from_str(json).map_err(|source| ContentError::Parse { table, source })
}

/// The default topic must resolve to real words, and no fragment may be empty.
fn validate(lexicon: &LexiconStore, phrases: &PhraseBank) -> Result<(), ContentError> {
    let default_topic = lexicon.default_topic();
    if !lexicon.has_topic(default_topic) {
        return Err(ContentError::Invalid(format!(
            "default topic '{}' is missing from the lexicon",
            default_topic
        )));
    }
    let has_words = lexicon
        .difficulties(default_topic)
        .into_iter()
        .any(|d| !lexicon.lookup(default_topic, d).is_empty());
    if !has_words {
        return Err(ContentError::Invalid(format!(
            "default topic '{}' has no vocabulary",
            default_topic
        )));
    }

    for (topic, levels) in phrases.dialogues() {
        for (level, set) in levels {
            let mut all = set.openings.iter().chain(&set.discussions).chain(&set.closings);
            if all.any(|fragment| fragment.lines.is_empty()) {
                return Err(ContentError::Invalid(format!(
                    "empty dialogue fragment in {}/{}",
                    topic, level
                )));
            }
        }
    }
    Ok(())
}
