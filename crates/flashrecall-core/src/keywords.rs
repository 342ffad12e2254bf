//! Order-insensitive keyword recall.
//!
//! A looser alternative to positional scoring: stop words are dropped and a
//! reference keyword counts as recalled if it appears anywhere in the attempt.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::text::{normalize_token, tokenize};

pub const STOP_WORDS: [&str; 10] = ["the", "a", "is", "are", "and", "in", "on", "at", "to", "of"];

/// Which scorer a recall check uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreMode {
    #[default]
    Positional,
    Keywords,
}

impl fmt::Display for ScoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreMode::Positional => write!(f, "positional"),
            ScoreMode::Keywords => write!(f, "keywords"),
        }
    }
}

impl FromStr for ScoreMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positional" => Ok(ScoreMode::Positional),
            "keywords" | "keyword" => Ok(ScoreMode::Keywords),
            other => Err(format!("unknown score mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordScore {
    pub matched: usize,
    pub total: usize,
    pub reference_text: String,
}

fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Normalized, non-stop-word tokens of `text`, in order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    tokenize(text).filter(|t| !is_stop_word(t)).collect()
}

pub fn score_keywords<S: AsRef<str>>(attempt: &str, reference: &[S]) -> KeywordScore {
    let recalled: HashSet<String> = extract_keywords(attempt).into_iter().collect();
    let expected: Vec<String> = reference
        .iter()
        .map(|w| normalize_token(w.as_ref()))
        .filter(|t| !t.is_empty() && !is_stop_word(t))
        .collect();

    let matched = expected.iter().filter(|k| recalled.contains(*k)).count();

    KeywordScore {
        matched,
        total: expected.len(),
        reference_text: reference
            .iter()
            .map(|w| w.as_ref())
            .collect::<Vec<_>>()
            .join(" "),
    }
}
