use super::assembler::{AssemblySettings, BudgetedAssembler};
use super::external::ExternalGenerator;
use super::synthesizer::{SynthesisSettings, TemplateSynthesizer};
use crate::content::lexicon_store::LexiconStore;
use crate::content::phrase_bank::PhraseBank;
use crate::matching::matcher::VocabularyMatcher;
use crate::types::conversation::{Conversation, GenerationRequest};
use crate::types::usage::VocabularyUsage;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Which strategy produced a conversation.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenerationTier {
    External,
    Assembled,
    Synthesized,
    /// Every tier came back empty.
    None,
}

impl fmt::Display for GenerationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerationTier::External => "external",
            GenerationTier::Assembled => "assembled",
            GenerationTier::Synthesized => "synthesized",
            GenerationTier::None => "none",
        };
        f.write_str(name)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub conversation: Conversation,
    pub usage: VocabularyUsage,
    pub tier: GenerationTier,
}

impl GenerationResult {
    /// True only on total failure.
    pub fn is_empty(&self) -> bool {
        self.conversation.is_empty()
    }
}

/// Tunables for the built-in tiers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineSettings {
    pub assembly: AssemblySettings,
    pub synthesis: SynthesisSettings,
    pub seed: Option<u64>,
}

/// Runs the tiers in order (external, assembled, synthesized) and reports
/// the vocabulary the winning conversation uses.
pub struct ConversationPipeline {
    lexicon: Arc<LexiconStore>,
    phrases: Arc<PhraseBank>,
    external: Option<Box<dyn ExternalGenerator>>,
    assembler: BudgetedAssembler,
    synthesizer: TemplateSynthesizer,
    matcher: VocabularyMatcher,
    rng: StdRng,
}

impl ConversationPipeline {
    pub fn new(lexicon: Arc<LexiconStore>, phrases: Arc<PhraseBank>, settings: PipelineSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            lexicon,
            phrases,
            external: None,
            assembler: BudgetedAssembler::new(settings.assembly),
            synthesizer: TemplateSynthesizer::new(settings.synthesis),
            matcher: VocabularyMatcher::new(),
            rng,
        }
    }

    pub fn with_external(mut self, external: Box<dyn ExternalGenerator>) -> Self {
        self.external = Some(external);
        self
    }

    pub fn lexicon(&self) -> &Arc<LexiconStore> {
        &self.lexicon
    }

    /// Never fails. Total failure is an empty conversation with
    /// [`GenerationTier::None`].
    pub async fn generate(&mut self, request: &GenerationRequest) -> GenerationResult {
        let mut usage = VocabularyUsage::new();
        let (conversation, tier) = self.produce(request, &mut usage).await;

        if tier == GenerationTier::None {
            warn!(
                "No tier produced a conversation for {}/{}",
                request.topic, request.difficulty
            );
        } else {
            info!(
                "{} tier produced {} line(s), {} word(s)",
                tier,
                conversation.len(),
                conversation.word_count()
            );
        }

        self.matcher.extract_into(
            &mut usage,
            &conversation,
            &self.lexicon,
            &request.topic,
            request.difficulty,
        );
        GenerationResult {
            conversation,
            usage,
            tier,
        }
    }

    async fn produce(
        &mut self,
        request: &GenerationRequest,
        usage: &mut VocabularyUsage,
    ) -> (Conversation, GenerationTier) {
        if let Some(external) = &self.external {
            debug!("Trying external generator");
            match external.generate(request).await {
                Ok(conversation) if !conversation.is_empty() => {
                    return (conversation, GenerationTier::External);
                }
                Ok(_) => debug!("External generator returned nothing, falling through"),
                Err(e) => warn!("External generator failed, falling through: {}", e),
            }
        }

        debug!("Trying fragment assembly");
        let assembled = self.assembler.assemble(&self.phrases, request, &mut self.rng);
        if !assembled.is_empty() {
            return (assembled, GenerationTier::Assembled);
        }

        debug!("No fragments for {}/{}, synthesizing", request.topic, request.difficulty);
        let bundle = self.lexicon.lookup(&request.topic, request.difficulty);
        let outcome = self
            .synthesizer
            .synthesize(bundle, &self.phrases, request, usage, &mut self.rng);
        if outcome.rerolls > 0 {
            debug!("Synthesis needed {} re-roll(s)", outcome.rerolls);
        }
        if outcome.conversation.is_empty() {
            (outcome.conversation, GenerationTier::None)
        } else {
            (outcome.conversation, GenerationTier::Synthesized)
        }
    }
}
