use crate::content::lexicon_store::LexiconStore;
use crate::error::GenerationError;
use crate::parsing::dialogue_parser::parse_dialogue;
use crate::types::conversation::{Conversation, GenerationRequest};
use crate::types::lexicon::{LexiconBundle, PhraseCategory, WordCategory};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use tracing::debug;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that generates natural English conversations for language learning. Always format conversations with \"A:\" and \"B:\" prefixes for each speaker.";

/// Words per part of speech offered to the model.
const HINT_WORDS_PER_CATEGORY: usize = 6;
/// Idioms and collocations offered to the model, each.
const HINT_PHRASES_PER_CATEGORY: usize = 2;
/// Rough words per exchange, used to turn the budget into an exchange count.
const WORDS_PER_EXCHANGE: usize = 12;
const MIN_EXCHANGES: usize = 4;

/// First tier. Any non-empty conversation it returns is used as is; an error
/// or an empty conversation sends the pipeline to the next tier.
#[async_trait]
pub trait ExternalGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Conversation, GenerationError>;
}

/// A text-completion backend: system prompt and user prompt in, raw text out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, GenerationError>;
}

/// Drives a [`CompletionClient`] with a conversation prompt and parses the reply.
pub struct PromptedGenerator<C: CompletionClient> {
    client: C,
    lexicon: Arc<LexiconStore>,
}

impl<C: CompletionClient> PromptedGenerator<C> {
    pub fn new(client: C, lexicon: Arc<LexiconStore>) -> Self {
        Self { client, lexicon }
    }

    pub fn build_prompt<R: Rng + ?Sized>(&self, request: &GenerationRequest, rng: &mut R) -> String {
        let topic_name = self.lexicon.display_name(&request.topic);
        let bundle = self.lexicon.lookup(&request.topic, request.difficulty);
        let vocab = vocabulary_hint(bundle, rng);
        let exchanges = estimated_exchanges(request.length_budget);

        format!(
            r#"Generate a natural English conversation between two people (Speaker A and Speaker B) about "{topic_name}".

Requirements:
- Difficulty: {difficulty} ({difficulty_desc})
- Tone: {tone_desc}
- Length: approximately {exchanges} exchanges (about {budget} words total)
- Make it sound like a real human conversation with natural flow
- Include greetings, topic discussion, questions, responses, and a natural ending
- Each speaker should respond meaningfully to what the other person said
- IMPORTANT: Naturally incorporate these vocabulary words/phrases in the conversation: {vocab}

Format each line exactly like this:
A: [Speaker A's dialogue]
B: [Speaker B's dialogue]

Start the conversation now:"#,
            difficulty = request.difficulty,
            difficulty_desc = request.difficulty.description(),
            tone_desc = request.tone.description(),
            budget = request.length_budget,
        )
    }
}

#[async_trait]
impl<C: CompletionClient> ExternalGenerator for PromptedGenerator<C> {
    async fn generate(&self, request: &GenerationRequest) -> Result<Conversation, GenerationError> {
        // ThreadRng is not Send and must be dropped before the await.
        let prompt = self.build_prompt(request, &mut rand::thread_rng());
        debug!("Requesting external conversation ({} prompt chars)", prompt.len());

        let reply = self.client.complete(SYSTEM_PROMPT, &prompt).await?;
        let conversation = parse_dialogue(&reply);
        if conversation.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(conversation)
    }
}

pub fn estimated_exchanges(length_budget: usize) -> usize {
    (length_budget / WORDS_PER_EXCHANGE).max(MIN_EXCHANGES)
}

/// Comma-separated words for the prompt: a random handful per part of speech
/// plus the first idioms and collocations, in shuffled order.
pub fn vocabulary_hint<R: Rng + ?Sized>(bundle: &LexiconBundle, rng: &mut R) -> String {
    let mut words: Vec<&str> = Vec::new();
    for category in WordCategory::ALL {
        let mut keys: Vec<&str> = bundle.words(category).keys().map(String::as_str).collect();
        keys.shuffle(rng);
        words.extend(keys.into_iter().take(HINT_WORDS_PER_CATEGORY));
    }
    for category in PhraseCategory::ALL {
        words.extend(
            bundle
                .phrases(category)
                .keys()
                .take(HINT_PHRASES_PER_CATEGORY)
                .map(String::as_str),
        );
    }
    words.shuffle(rng);
    words.join(", ")
}
