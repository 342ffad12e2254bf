//! flashrecall-core: Recall scoring, story playback and memory notes.
//!
//! This crate holds the story model, the positional recall scorer, the
//! timer-driven sequence player and the notes book that the rest of
//! flashrecall builds on. It performs no terminal or network IO.

pub mod catalog;
pub mod error;
pub mod keywords;
pub mod model;
pub mod notes;
pub mod player;
pub mod progress;
pub mod scheduler;
pub mod scorer;
pub mod text;
pub mod trainer;
pub mod traits;

pub use error::TrainerError;
