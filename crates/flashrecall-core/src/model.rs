//! Core data model types for flashrecall.
//!
//! Stories are immutable once loaded; the player and the scorer only ever
//! borrow them through an `Arc`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TrainerError;

/// A story: an ordered list of sentences, identified by its title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// Unique identifier for this story.
    pub title: String,
    /// Difficulty tier the story was loaded from.
    pub difficulty: Difficulty,
    /// Sentence texts, in reading order.
    pub sentences: Vec<String>,
}

impl Story {
    pub fn new(title: impl Into<String>, difficulty: Difficulty, sentences: Vec<String>) -> Self {
        Self {
            title: title.into(),
            difficulty,
            sentences,
        }
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// Whitespace-delimited words of one sentence, casing and punctuation kept.
    pub fn words(&self, sentence: usize) -> Vec<&str> {
        self.sentences
            .get(sentence)
            .map(|s| s.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Total number of words across all sentences.
    pub fn word_count(&self) -> usize {
        self.sentences
            .iter()
            .map(|s| s.split_whitespace().count())
            .sum()
    }

    /// Every word of the story, in order.
    pub fn all_words(&self) -> Vec<&str> {
        self.sentences
            .iter()
            .flat_map(|s| s.split_whitespace())
            .collect()
    }

    /// Words of the last `last_n` sentences, with `last_n` clamped to
    /// `[1, sentence_count]`.
    pub fn trailing_words(&self, last_n: usize) -> Vec<&str> {
        let count = self.sentences.len();
        let n = last_n.clamp(1, count.max(1));
        self.sentences[count.saturating_sub(n)..]
            .iter()
            .flat_map(|s| s.split_whitespace())
            .collect()
    }

    /// Check that the story can be played.
    pub fn validate(&self) -> Result<(), TrainerError> {
        if self.sentences.is_empty() {
            return Err(TrainerError::invalid_story(
                &self.title,
                "story has no sentences",
            ));
        }
        if let Some(idx) = self
            .sentences
            .iter()
            .position(|s| s.split_whitespace().next().is_none())
        {
            return Err(TrainerError::invalid_story(
                &self.title,
                format!("sentence {idx} has no words"),
            ));
        }
        Ok(())
    }
}

/// Story difficulty tiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Simple,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Simple, Difficulty::Medium, Difficulty::Hard];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Simple => write!(f, "simple"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" | "easy" => Ok(Difficulty::Simple),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// How much of a sentence one playback step reveals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    FullSentence,
    #[default]
    WordByWord,
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::FullSentence => write!(f, "full_sentence"),
            DisplayMode::WordByWord => write!(f, "word_by_word"),
        }
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "full_sentence" | "full" | "sentence" => Ok(DisplayMode::FullSentence),
            "word_by_word" | "word" | "words" => Ok(DisplayMode::WordByWord),
            other => Err(format!("unknown display mode: {other}")),
        }
    }
}

/// Whether the player keeps going on its own after a reveal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseMode {
    #[default]
    AutoAdvance,
    /// Stop after every revealed unit.
    PauseAfterEachUnit,
    /// Stop only once the last unit of a sentence has been revealed.
    PauseAfterSentence,
}

impl fmt::Display for PauseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PauseMode::AutoAdvance => write!(f, "auto_advance"),
            PauseMode::PauseAfterEachUnit => write!(f, "pause_after_each_unit"),
            PauseMode::PauseAfterSentence => write!(f, "pause_after_sentence"),
        }
    }
}

impl FromStr for PauseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "auto_advance" | "auto" => Ok(PauseMode::AutoAdvance),
            "pause_after_each_unit" | "unit" | "pause" => Ok(PauseMode::PauseAfterEachUnit),
            "pause_after_sentence" | "sentence" => Ok(PauseMode::PauseAfterSentence),
            other => Err(format!("unknown pause mode: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(sentences: &[&str]) -> Story {
        Story::new(
            "Test",
            Difficulty::Simple,
            sentences.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn difficulty_display_and_parse() {
        assert_eq!(Difficulty::Medium.to_string(), "medium");
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Simple);
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn mode_parse_accepts_short_forms() {
        assert_eq!("full".parse::<DisplayMode>().unwrap(), DisplayMode::FullSentence);
        assert_eq!(
            "word-by-word".parse::<DisplayMode>().unwrap(),
            DisplayMode::WordByWord
        );
        assert_eq!("auto".parse::<PauseMode>().unwrap(), PauseMode::AutoAdvance);
        assert_eq!(
            "pause_after_sentence".parse::<PauseMode>().unwrap(),
            PauseMode::PauseAfterSentence
        );
        assert!("sideways".parse::<PauseMode>().is_err());
    }

    #[test]
    fn words_keep_casing_and_punctuation() {
        let s = story(&["The quick  brown fox.", "It ran!"]);
        assert_eq!(s.words(0), vec!["The", "quick", "brown", "fox."]);
        assert_eq!(s.word_count(), 6);
        assert!(s.words(5).is_empty());
    }

    #[test]
    fn trailing_words_clamps() {
        let s = story(&["one two", "three", "four five"]);
        assert_eq!(s.trailing_words(1), vec!["four", "five"]);
        assert_eq!(s.trailing_words(0), vec!["four", "five"]);
        assert_eq!(s.trailing_words(10), s.all_words());
    }

    #[test]
    fn validate_rejects_empty_stories() {
        assert!(story(&[]).validate().is_err());
        let err = story(&["fine", "   "]).validate().unwrap_err();
        assert!(err.to_string().contains("sentence 1 has no words"));
        assert!(story(&["fine"]).validate().is_ok());
    }
}
