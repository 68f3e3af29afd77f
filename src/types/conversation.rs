use super::lexicon::{Difficulty, Tone};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Speaker {
    A,
    B,
}

impl Speaker {
    pub fn other(self) -> Speaker {
        match self {
            Speaker::A => Speaker::B,
            Speaker::B => Speaker::A,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Speaker::A => "A",
            Speaker::B => "B",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whitespace-separated tokens, the unit every length budget is counted in.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GeneratedLine {
    pub speaker: Speaker,
    pub text: String,
}

impl GeneratedLine {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self { speaker, text: text.into() }
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.text)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct Conversation {
    pub lines: Vec<GeneratedLine>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.lines.push(GeneratedLine::new(speaker, text));
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn last_speaker(&self) -> Option<Speaker> {
        self.lines.last().map(|line| line.speaker)
    }

    pub fn word_count(&self) -> usize {
        self.lines.iter().map(GeneratedLine::word_count).sum()
    }

    /// All line texts, lower-cased and joined by single spaces.
    pub fn lowercase_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.text.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `"{speaker}: {text}"` per line, newline separated. Used for copy and export.
    pub fn to_plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| format!("{}: {}", line.speaker, line.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<Vec<GeneratedLine>> for Conversation {
    fn from(lines: Vec<GeneratedLine>) -> Self {
        Self { lines }
    }
}

impl fmt::Display for Conversation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_plain_text())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentRole {
    Opening,
    Discussion,
    Closing,
}

/// A pre-written exchange. Lines keep their own speaker tags; callers rebase them
/// with [`DialogueFragment::swapped`] when the fragment has to start on the other voice.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct DialogueFragment {
    pub lines: Vec<GeneratedLine>,
}

impl DialogueFragment {
    pub fn first_speaker(&self) -> Option<Speaker> {
        self.lines.first().map(|line| line.speaker)
    }

    pub fn word_count(&self) -> usize {
        self.lines.iter().map(GeneratedLine::word_count).sum()
    }

    pub fn swapped(&self) -> DialogueFragment {
        DialogueFragment {
            lines: self
                .lines
                .iter()
                .map(|line| GeneratedLine::new(line.speaker.other(), line.text.clone()))
                .collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub topic: String,
    pub difficulty: Difficulty,
    /// Word budget for the whole conversation.
    pub length_budget: usize,
    pub tone: Tone,
}

impl GenerationRequest {
    pub fn new(topic: impl Into<String>, difficulty: Difficulty, length_budget: usize, tone: Tone) -> Self {
        Self {
            topic: topic.into(),
            difficulty,
            length_budget,
            tone,
        }
    }
}
