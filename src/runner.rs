use crate::config::Config;
use crate::content::lexicon_store::LexiconStore;
use crate::content::loader::ContentLibrary;
use crate::error::ContentError;
use crate::generation::pipeline::{ConversationPipeline, GenerationResult};
use crate::types::conversation::GenerationRequest;
use crate::types::lexicon::{Difficulty, Tone, VocabCategory};
use std::error::Error;
use std::fmt::{self, Write as _};
use std::io::Write;
use tracing::{info, warn};

/// Options for one `generate` run, filled from the command line.
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub topic: String,
    pub difficulty: Difficulty,
    pub words: usize,
    pub tone: Tone,
    pub seed: Option<u64>,
    pub json: bool,
}

/// Bundled tables, or the ones in `content_dir` when the config names it.
pub fn load_library(config: &Config) -> Result<ContentLibrary, ContentError> {
    match &config.content_dir {
        Some(dir) => ContentLibrary::load(dir, &config.default_topic),
        None => ContentLibrary::bundled(&config.default_topic),
    }
}

pub async fn run_generation<W: Write>(
    config: &Config,
    args: &GenerateArgs,
    out: &mut W,
) -> Result<GenerationResult, Box<dyn Error>> {
    let library = load_library(config)?;

    let mut settings = config.pipeline_settings();
    if let Some(seed) = args.seed {
        if let Some(configured) = settings.seed.filter(|s| *s != seed) {
            warn!("--seed {} overrides seed {} from config", seed, configured);
        }
        settings.seed = Some(seed);
    }

    if !library.lexicon.has_topic(&args.topic) {
        info!(
            "Unknown topic '{}', vocabulary falls back to '{}'",
            args.topic,
            library.lexicon.default_topic()
        );
    }

    let mut pipeline = ConversationPipeline::new(library.lexicon.clone(), library.phrases.clone(), settings);
    let request = GenerationRequest::new(args.topic.clone(), args.difficulty, args.words, args.tone);
    let result = pipeline.generate(&request).await;

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
    } else {
        write!(out, "{}", render_result(&result))?;
    }
    Ok(result)
}

/// The conversation, then the matched vocabulary grouped by category.
pub fn render_result(result: &GenerationResult) -> String {
    let mut text = String::new();
    if result.is_empty() {
        text.push_str("No conversation could be generated.\n");
    } else if write_result(result, &mut text).is_err() {
        text.clear();
    }
    text
}

fn write_result(result: &GenerationResult, text: &mut String) -> fmt::Result {
    writeln!(text, "{}", result.conversation)?;
    writeln!(
        text,
        "\n[{} words, {} tier]",
        result.conversation.word_count(),
        result.tier
    )?;
    if result.usage.is_empty() {
        return Ok(());
    }

    writeln!(text, "\nVocabulary:")?;
    for category in VocabCategory::ALL {
        let keys = result.usage.keys(category);
        if keys.is_empty() {
            continue;
        }
        writeln!(text, "  {}:", category.plural())?;
        for key in keys {
            match result.usage.detail(key) {
                Some(detail) if !detail.entry.definition.is_empty() => {
                    writeln!(text, "    {} - {}", key, detail.entry.definition)?
                }
                _ => writeln!(text, "    {}", key)?,
            }
        }
    }
    Ok(())
}

/// One line per topic: key, display name and the difficulties it has words for.
pub fn list_topics<W: Write>(lexicon: &LexiconStore, out: &mut W) -> Result<(), Box<dyn Error>> {
    for topic in lexicon.topics() {
        let levels: Vec<&str> = lexicon
            .difficulties(topic)
            .into_iter()
            .map(Difficulty::as_str)
            .collect();
        writeln!(
            out,
            "{:<12} {:<24} {}",
            topic,
            lexicon.display_name(topic),
            levels.join(", ")
        )?;
    }
    Ok(())
}
