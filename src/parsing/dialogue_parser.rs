use crate::types::conversation::{Conversation, Speaker};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

static TAGGED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([AB]):\s*(.+)$").expect("Valid tagged line regex"));

static SPEAKER_TAGGED_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:Speaker\s+)?([AB]):\s*(.+)$").expect("Valid speaker-tagged line regex")
});

static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*•]\s*").expect("Valid bullet regex"));

/// Untagged lines at or below this many characters are dropped by the last-resort pass.
const MIN_UNTAGGED_CHARS: usize = 5;

/// Which pass produced the lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    Tagged,
    SpeakerTagged,
    Untagged,
}

/// Turns free-form model output into a conversation.
///
/// Tries `A: text` lines first, then `Speaker A: text`, then treats every
/// non-trivial line as dialogue with alternating speakers starting at A. An
/// empty conversation means nothing usable was found.
pub fn parse_dialogue(text: &str) -> Conversation {
    parse_dialogue_with_strategy(text)
        .map(|(conversation, _)| conversation)
        .unwrap_or_default()
}

pub fn parse_dialogue_with_strategy(text: &str) -> Option<(Conversation, ParseStrategy)> {
    let tagged = collect_tagged(text, &TAGGED_LINE);
    if !tagged.is_empty() {
        debug!("Parsed {} tagged dialogue line(s)", tagged.len());
        return Some((tagged, ParseStrategy::Tagged));
    }

    let speaker_tagged = collect_tagged(text, &SPEAKER_TAGGED_LINE);
    if !speaker_tagged.is_empty() {
        warn!(
            "Dialogue had no 'A:' lines; recovered {} line(s) from 'Speaker A:' format",
            speaker_tagged.len()
        );
        return Some((speaker_tagged, ParseStrategy::SpeakerTagged));
    }

    let untagged = collect_untagged(text);
    if !untagged.is_empty() {
        warn!(
            "Dialogue had no speaker tags; assigned speakers to {} untagged line(s)",
            untagged.len()
        );
        return Some((untagged, ParseStrategy::Untagged));
    }
    None
}

fn collect_tagged(text: &str, re: &Regex) -> Conversation {
    let mut conversation = Conversation::new();
    for line in text.lines().map(str::trim) {
        let Some(caps) = re.captures(line) else { continue };
        let speaker = match caps.get(1).map(|m| m.as_str()) {
            Some("A") => Speaker::A,
            Some("B") => Speaker::B,
            _ => continue,
        };
        let dialogue = caps.get(2).map_or("", |m| m.as_str().trim());
        if !dialogue.is_empty() {
            conversation.push(speaker, dialogue);
        }
    }
    conversation
}

fn collect_untagged(text: &str) -> Conversation {
    let mut conversation = Conversation::new();
    let mut speaker = Speaker::A;
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let clean = BULLET.replace(line, "");
        let clean = clean.trim();
        if clean.chars().count() > MIN_UNTAGGED_CHARS {
            conversation.push(speaker, clean);
            speaker = speaker.other();
        }
    }
    conversation
}
