use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Easiest first. Lookups that have to substitute a difficulty walk this order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Wording handed to completion backends.
    pub fn description(self) -> &'static str {
        match self {
            Difficulty::Easy => "simple vocabulary, short sentences, common words",
            Difficulty::Medium => "intermediate vocabulary, varied sentence structures",
            Difficulty::Hard => "advanced vocabulary, complex sentences, professional language",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Easy
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Formal,
    Informal,
    Neutral,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Formal => "formal",
            Tone::Informal => "informal",
            Tone::Neutral => "neutral",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Tone::Formal => "formal and professional",
            Tone::Informal => "casual and friendly",
            Tone::Neutral => "neutral and balanced",
        }
    }
}

impl Default for Tone {
    fn default() -> Self {
        Tone::Neutral
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "formal" => Ok(Tone::Formal),
            "informal" => Ok(Tone::Informal),
            "neutral" => Ok(Tone::Neutral),
            other => Err(format!("unknown tone '{}'", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Common,
    Intermediate,
    Rare,
}

/// Part-of-speech buckets that templates can draw from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum WordCategory {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl WordCategory {
    pub const ALL: [WordCategory; 4] = [
        WordCategory::Noun,
        WordCategory::Verb,
        WordCategory::Adjective,
        WordCategory::Adverb,
    ];

    /// Stand-in used when a bundle has no words of this kind.
    pub fn generic_word(self) -> &'static str {
        match self {
            WordCategory::Noun => "thing",
            WordCategory::Verb => "do",
            WordCategory::Adjective => "good",
            WordCategory::Adverb => "well",
        }
    }

    pub fn from_placeholder(name: &str) -> Option<WordCategory> {
        match name {
            "noun" => Some(WordCategory::Noun),
            "verb" => Some(WordCategory::Verb),
            "adjective" => Some(WordCategory::Adjective),
            "adverb" => Some(WordCategory::Adverb),
            _ => None,
        }
    }
}

/// Multi-word expressions. Matched as plain phrases, never inflected.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum PhraseCategory {
    Idiom,
    Collocation,
}

impl PhraseCategory {
    pub const ALL: [PhraseCategory; 2] = [PhraseCategory::Idiom, PhraseCategory::Collocation];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VocabCategory {
    Word(WordCategory),
    Phrase(PhraseCategory),
}

impl VocabCategory {
    pub const ALL: [VocabCategory; 6] = [
        VocabCategory::Word(WordCategory::Noun),
        VocabCategory::Word(WordCategory::Verb),
        VocabCategory::Word(WordCategory::Adjective),
        VocabCategory::Word(WordCategory::Adverb),
        VocabCategory::Phrase(PhraseCategory::Idiom),
        VocabCategory::Phrase(PhraseCategory::Collocation),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VocabCategory::Word(WordCategory::Noun) => "noun",
            VocabCategory::Word(WordCategory::Verb) => "verb",
            VocabCategory::Word(WordCategory::Adjective) => "adjective",
            VocabCategory::Word(WordCategory::Adverb) => "adverb",
            VocabCategory::Phrase(PhraseCategory::Idiom) => "idiom",
            VocabCategory::Phrase(PhraseCategory::Collocation) => "collocation",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            VocabCategory::Word(WordCategory::Noun) => "nouns",
            VocabCategory::Word(WordCategory::Verb) => "verbs",
            VocabCategory::Word(WordCategory::Adjective) => "adjectives",
            VocabCategory::Word(WordCategory::Adverb) => "adverbs",
            VocabCategory::Phrase(PhraseCategory::Idiom) => "idioms",
            VocabCategory::Phrase(PhraseCategory::Collocation) => "collocations",
        }
    }
}

impl From<WordCategory> for VocabCategory {
    fn from(category: WordCategory) -> Self {
        VocabCategory::Word(category)
    }
}

impl From<PhraseCategory> for VocabCategory {
    fn from(category: PhraseCategory) -> Self {
        VocabCategory::Phrase(category)
    }
}

impl fmt::Display for VocabCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for VocabCategory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct LexiconEntry {
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
}

pub type EntryMap = BTreeMap<String, LexiconEntry>;

/// Every vocabulary table for one topic and difficulty.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LexiconBundle {
    #[serde(default)]
    pub nouns: EntryMap,
    #[serde(default)]
    pub verbs: EntryMap,
    #[serde(default)]
    pub adjectives: EntryMap,
    #[serde(default)]
    pub adverbs: EntryMap,
    #[serde(default)]
    pub idioms: EntryMap,
    #[serde(default)]
    pub collocations: EntryMap,
}

impl LexiconBundle {
    pub fn words(&self, category: WordCategory) -> &EntryMap {
        match category {
            WordCategory::Noun => &self.nouns,
            WordCategory::Verb => &self.verbs,
            WordCategory::Adjective => &self.adjectives,
            WordCategory::Adverb => &self.adverbs,
        }
    }

    pub fn phrases(&self, category: PhraseCategory) -> &EntryMap {
        match category {
            PhraseCategory::Idiom => &self.idioms,
            PhraseCategory::Collocation => &self.collocations,
        }
    }

    pub fn entries(&self, category: VocabCategory) -> &EntryMap {
        match category {
            VocabCategory::Word(c) => self.words(c),
            VocabCategory::Phrase(c) => self.phrases(c),
        }
    }

    /// Count of part-of-speech words, phrases excluded.
    pub fn word_count(&self) -> usize {
        WordCategory::ALL.iter().map(|c| self.words(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        VocabCategory::ALL.iter().all(|c| self.entries(*c).is_empty())
    }
}
