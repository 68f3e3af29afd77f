use async_trait::async_trait;
use std::sync::Arc;
use vocabot::content::phrase_bank::PhraseBank;
use vocabot::generation::external::PromptedGenerator;
use vocabot::matching::matcher::VocabularyMatcher;
use vocabot::types::lexicon::WordCategory;
use vocabot::{
    CompletionClient, ContentLibrary, Conversation, ConversationPipeline, Difficulty, GenerationError,
    GenerationRequest, GenerationTier, PipelineSettings, Speaker, Tone,
};

fn pipeline(library: &ContentLibrary, seed: u64) -> ConversationPipeline {
    let settings = PipelineSettings {
        seed: Some(seed),
        ..Default::default()
    };
    ConversationPipeline::new(library.lexicon.clone(), library.phrases.clone(), settings)
}

#[tokio::test]
async fn office_easy_is_assembled_within_budget() {
    let library = ContentLibrary::bundled("office").unwrap();
    let request = GenerationRequest::new("office", Difficulty::Easy, 50, Tone::Neutral);

    for seed in 0..20 {
        let result = pipeline(&library, seed).generate(&request).await;
        assert_eq!(result.tier, GenerationTier::Assembled);
        assert!(!result.conversation.is_empty());
        assert!(result.conversation.word_count() <= 50);

        let text = result.conversation.lowercase_text();
        for noun in &result.usage.nouns {
            assert!(text.contains(&noun.to_lowercase()), "{noun} not in {text}");
        }
    }
}

#[test]
fn matcher_finds_office_nouns() {
    let library = ContentLibrary::bundled("office").unwrap();
    let mut conversation = Conversation::new();
    conversation.push(Speaker::A, "Did you see the email about the meeting?");

    let usage = VocabularyMatcher::new().extract(&conversation, &library.lexicon, "office", Difficulty::Easy);
    assert!(usage.contains(WordCategory::Noun, "email"));
    assert!(usage.contains(WordCategory::Noun, "meeting"));
    assert!(usage.detail("email").is_some());
}

#[tokio::test]
async fn unknown_topic_still_produces_a_conversation() {
    let library = ContentLibrary::bundled("office").unwrap();
    let request = GenerationRequest::new("nonexistent", Difficulty::Hard, 30, Tone::Formal);

    let result = pipeline(&library, 3).generate(&request).await;
    assert!(!result.conversation.is_empty());
    assert_eq!(result.tier, GenerationTier::Synthesized);
}

#[tokio::test]
async fn unknown_topic_vocabulary_comes_from_the_default_topic() {
    let library = ContentLibrary::bundled("office").unwrap();
    let request = GenerationRequest::new("nonexistent", Difficulty::Medium, 120, Tone::Informal);
    let office = library.lexicon.lookup("office", Difficulty::Medium);

    let result = pipeline(&library, 8).generate(&request).await;
    assert!(!result.usage.is_empty());
    for noun in &result.usage.nouns {
        assert!(office.nouns.contains_key(noun));
    }
}

#[tokio::test]
async fn dialogue_topics_without_lexicon_use_fragments() {
    let library = ContentLibrary::bundled("office").unwrap();
    assert!(!library.lexicon.has_topic("restaurant"));
    let request = GenerationRequest::new("restaurant", Difficulty::Easy, 60, Tone::Neutral);

    let result = pipeline(&library, 5).generate(&request).await;
    assert_eq!(result.tier, GenerationTier::Assembled);
    assert!(result.conversation.word_count() <= 60);
}

#[tokio::test]
async fn no_content_is_reported_as_total_failure() {
    let library = ContentLibrary::bundled("office").unwrap();
    let settings = PipelineSettings::default();
    let mut pipeline = ConversationPipeline::new(library.lexicon.clone(), Arc::new(PhraseBank::default()), settings);

    let result = pipeline
        .generate(&GenerationRequest::new("office", Difficulty::Easy, 50, Tone::Neutral))
        .await;
    assert_eq!(result.tier, GenerationTier::None);
    assert!(result.is_empty());
}

struct Unreachable;

#[async_trait]
impl CompletionClient for Unreachable {
    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable("connection refused".to_string()))
    }
}

struct Chatty;

#[async_trait]
impl CompletionClient for Chatty {
    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, GenerationError> {
        Ok("Here you go!\n\nSpeaker A: Morning, is the coffee machine fixed?\nSpeaker B: Not yet, but the team ordered a new one.".to_string())
    }
}

#[tokio::test]
async fn unreachable_backend_falls_back_to_fragments() {
    let library = ContentLibrary::bundled("office").unwrap();
    let generator = PromptedGenerator::new(Unreachable, library.lexicon.clone());
    let mut pipeline = pipeline(&library, 11).with_external(Box::new(generator));

    let result = pipeline
        .generate(&GenerationRequest::new("office", Difficulty::Easy, 80, Tone::Neutral))
        .await;
    assert_eq!(result.tier, GenerationTier::Assembled);
}

#[tokio::test]
async fn prompted_backend_reply_is_parsed_and_matched() {
    let library = ContentLibrary::bundled("office").unwrap();
    let generator = PromptedGenerator::new(Chatty, library.lexicon.clone());
    let mut pipeline = pipeline(&library, 12).with_external(Box::new(generator));

    let result = pipeline
        .generate(&GenerationRequest::new("office", Difficulty::Easy, 80, Tone::Neutral))
        .await;
    assert_eq!(result.tier, GenerationTier::External);
    assert_eq!(result.conversation.len(), 2);
    assert_eq!(result.conversation.lines[1].speaker, Speaker::B);
    assert!(result.usage.contains(WordCategory::Noun, "coffee"));
    assert!(result.usage.contains(WordCategory::Noun, "team"));
}
