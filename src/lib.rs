pub mod config;
pub mod error;
pub mod types {
    pub mod conversation;
    pub mod lexicon;
    pub mod usage;
}
pub mod content {
    pub mod lexicon_store;
    pub mod loader;
    pub mod phrase_bank;
}
pub mod parsing {
    pub mod dialogue_parser;
}
pub mod matching {
    pub mod inflection;
    pub mod matcher;
}
pub mod generation {
    pub mod assembler;
    pub mod external;
    pub mod pipeline;
    pub mod synthesizer;
}
pub mod runner;

pub use config::Config;
pub use content::loader::ContentLibrary;
pub use error::{ConfigError, ContentError, GenerationError};
pub use generation::external::{CompletionClient, ExternalGenerator, PromptedGenerator};
pub use generation::pipeline::{ConversationPipeline, GenerationResult, GenerationTier, PipelineSettings};
pub use types::conversation::{Conversation, GeneratedLine, GenerationRequest, Speaker};
pub use types::lexicon::{Difficulty, Tone};
pub use types::usage::VocabularyUsage;
