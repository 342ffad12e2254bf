//! Positional recall scoring.
//!
//! The attempt and the reference are compared index by index. There is no
//! realignment: one dropped word early in an attempt shifts every later word
//! out of place and each of those positions is reported on its own.

use serde::{Deserialize, Serialize};

use crate::text::{normalize_token, tokenize, tokens_match};

/// What went wrong at one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscrepancyKind {
    /// The reference has a token here, the attempt ran out.
    Missing,
    /// The attempt has a token past the end of the reference.
    Extra,
    /// Both have a token and they are too far apart.
    Mismatch,
}

/// A single difference between attempt and reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub kind: DiscrepancyKind,
    /// Zero-based token position.
    pub position: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl Discrepancy {
    fn missing(position: usize, expected: &str) -> Self {
        Self {
            kind: DiscrepancyKind::Missing,
            position,
            expected: Some(expected.to_string()),
            actual: None,
        }
    }

    fn extra(position: usize, actual: &str) -> Self {
        Self {
            kind: DiscrepancyKind::Extra,
            position,
            expected: None,
            actual: Some(actual.to_string()),
        }
    }

    fn mismatch(position: usize, expected: &str, actual: &str) -> Self {
        Self {
            kind: DiscrepancyKind::Mismatch,
            position,
            expected: Some(expected.to_string()),
            actual: Some(actual.to_string()),
        }
    }
}

impl std::fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let expected = self.expected.as_deref().unwrap_or("");
        let actual = self.actual.as_deref().unwrap_or("");
        match self.kind {
            DiscrepancyKind::Missing => write!(f, "#{}: missing '{expected}'", self.position + 1),
            DiscrepancyKind::Extra => write!(f, "#{}: extra '{actual}'", self.position + 1),
            DiscrepancyKind::Mismatch => write!(
                f,
                "#{}: expected '{expected}', got '{actual}'",
                self.position + 1
            ),
        }
    }
}

/// Outcome of one scoring call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Positions that matched exactly or within typo tolerance.
    pub matched: usize,
    /// Number of normalized reference tokens.
    pub total: usize,
    /// Differences in position order.
    pub discrepancies: Vec<Discrepancy>,
    /// The reference as displayed, for showing the correct answer.
    pub reference_text: String,
}

impl ScoreResult {
    /// Fraction of reference tokens matched, `1.0` for an empty reference.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.matched as f64 / self.total as f64
    }

    pub fn is_perfect(&self) -> bool {
        self.matched == self.total && self.discrepancies.is_empty()
    }

    pub fn count(&self, kind: DiscrepancyKind) -> usize {
        self.discrepancies.iter().filter(|d| d.kind == kind).count()
    }
}

/// Score a free-text attempt against reference words.
///
/// Reference words are normalized like the attempt; words that normalize to
/// nothing (stray punctuation) are not counted.
pub fn score<S: AsRef<str>>(attempt: &str, reference: &[S]) -> ScoreResult {
    let expected: Vec<String> = reference
        .iter()
        .map(|w| normalize_token(w.as_ref()))
        .filter(|t| !t.is_empty())
        .collect();
    let actual: Vec<String> = tokenize(attempt).collect();

    let mut matched = 0usize;
    let mut discrepancies = Vec::new();

    for position in 0..expected.len().max(actual.len()) {
        match (expected.get(position), actual.get(position)) {
            (Some(e), None) => discrepancies.push(Discrepancy::missing(position, e)),
            (None, Some(a)) => discrepancies.push(Discrepancy::extra(position, a)),
            (Some(e), Some(a)) => {
                if tokens_match(e, a) {
                    matched += 1;
                } else {
                    discrepancies.push(Discrepancy::mismatch(position, e, a));
                }
            }
            (None, None) => unreachable!("position is below the longer length"),
        }
    }

    let reference_text = reference
        .iter()
        .map(|w| w.as_ref())
        .collect::<Vec<_>>()
        .join(" ");

    tracing::debug!(
        matched,
        total = expected.len(),
        discrepancies = discrepancies.len(),
        "scored recall attempt"
    );

    ScoreResult {
        matched,
        total: expected.len(),
        discrepancies,
        reference_text,
    }
}
