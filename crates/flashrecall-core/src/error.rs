//! Trainer error types.
//!
//! These are the contract violations the player and notes book surface to
//! their callers. Scoring never fails: malformed recall input degrades to an
//! empty token sequence instead.

use thiserror::Error;

/// Errors raised by the sequence player, the catalog and the notes book.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrainerError {
    /// The story cannot be played (no sentences, or an empty sentence).
    #[error("invalid story '{title}': {reason}")]
    InvalidStory { title: String, reason: String },

    /// A playback setting was rejected; the previous value is kept.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An operation needed an active story but none was started.
    #[error("no story has been started")]
    NotStarted,

    /// A notes category does not exist.
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

impl TrainerError {
    pub(crate) fn invalid_story(title: &str, reason: impl Into<String>) -> Self {
        TrainerError::InvalidStory {
            title: title.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if the error was caused by the story content itself.
    pub fn is_story_error(&self) -> bool {
        matches!(self, TrainerError::InvalidStory { .. })
    }
}
