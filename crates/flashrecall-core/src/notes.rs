//! Memory-aid notes: descriptions attached to words, grouped by category.
//!
//! The on-disk form is a JSON object mapping each category name to an array
//! of `{"word": .., "desc": ..}` records, in display order.

use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::TrainerError;
use crate::text::clean_word_key;

pub const DEFAULT_CATEGORY: &str = "Descriptors";

/// A single note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub word: String,
    #[serde(default)]
    pub desc: String,
}

/// Resolves a word to its memory-aid description.
pub trait NoteLookup {
    fn describe(&self, word: &str) -> Option<String>;
}

/// Adapts a plain function or closure into a [`NoteLookup`].
pub struct LookupFn<F>(pub F);

impl<F> NoteLookup for LookupFn<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn describe(&self, word: &str) -> Option<String> {
        (self.0)(word)
    }
}

/// What `NoteBook::upsert` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    /// The word already had a note; its old description is returned.
    Updated { previous: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteBook {
    categories: IndexMap<String, Vec<Note>>,
}

impl Default for NoteBook {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteBook {
    /// An empty book holding only the default category.
    pub fn new() -> Self {
        let mut book = Self {
            categories: IndexMap::new(),
        };
        book.ensure_default_category();
        book
    }

    fn ensure_default_category(&mut self) {
        self.categories
            .entry(DEFAULT_CATEGORY.to_string())
            .or_default();
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &[Note])> {
        self.categories
            .iter()
            .map(|(name, notes)| (name.as_str(), notes.as_slice()))
    }

    pub fn category(&self, name: &str) -> Option<&[Note]> {
        self.categories.get(name).map(Vec::as_slice)
    }

    /// Add an empty category. Returns `false` if it already existed.
    pub fn add_category(&mut self, name: &str) -> Result<bool, TrainerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrainerError::InvalidConfiguration(
                "category name must not be empty".into(),
            ));
        }
        if self.categories.contains_key(name) {
            return Ok(false);
        }
        self.categories.insert(name.to_string(), Vec::new());
        Ok(true)
    }

    /// Insert a note, or replace the description of an existing note for the
    /// same word (case-insensitive) in that category. Unknown categories are
    /// created.
    pub fn upsert(
        &mut self,
        category: &str,
        word: &str,
        desc: &str,
    ) -> Result<UpsertOutcome, TrainerError> {
        let category = category.trim();
        let word = word.trim();
        if category.is_empty() {
            return Err(TrainerError::InvalidConfiguration(
                "category name must not be empty".into(),
            ));
        }
        if word.is_empty() {
            return Err(TrainerError::InvalidConfiguration(
                "note word must not be empty".into(),
            ));
        }

        let notes = self.categories.entry(category.to_string()).or_default();
        let key = word.to_lowercase();
        if let Some(existing) = notes.iter_mut().find(|n| n.word.to_lowercase() == key) {
            let previous = std::mem::replace(&mut existing.desc, desc.trim().to_string());
            tracing::debug!(category, word, "updated note");
            return Ok(UpsertOutcome::Updated { previous });
        }

        notes.push(Note {
            word: word.to_string(),
            desc: desc.trim().to_string(),
        });
        tracing::debug!(category, word, "added note");
        Ok(UpsertOutcome::Inserted)
    }

    /// Remove the note for `word` from `category`, returning it.
    pub fn remove(&mut self, category: &str, word: &str) -> Result<Option<Note>, TrainerError> {
        let notes = self
            .categories
            .get_mut(category)
            .ok_or_else(|| TrainerError::UnknownCategory(category.to_string()))?;
        let key = word.to_lowercase();
        Ok(notes
            .iter()
            .position(|n| n.word.to_lowercase() == key)
            .map(|idx| notes.remove(idx)))
    }

    /// Description for a displayed word, searching categories in order.
    ///
    /// Punctuation is stripped from `word` first, so `"Fox."` finds `fox`.
    pub fn lookup(&self, word: &str) -> Option<&str> {
        let key = clean_word_key(word).to_lowercase();
        if key.is_empty() {
            return None;
        }
        self.categories
            .values()
            .flatten()
            .find(|n| n.word.to_lowercase() == key)
            .map(|n| n.desc.as_str())
    }

    /// Notes whose word contains `query`, case-insensitively.
    pub fn search(&self, query: &str) -> Vec<(&str, &Note)> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.categories
            .iter()
            .flat_map(|(cat, notes)| notes.iter().map(move |n| (cat.as_str(), n)))
            .filter(|(_, n)| n.word.to_lowercase().contains(&query))
            .collect()
    }

    pub fn note_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Parse an exported notes document. Replaces nothing; the caller decides.
    pub fn import_json(content: &str) -> Result<Self> {
        let mut book: NoteBook =
            serde_json::from_str(content).context("invalid notes file format")?;
        book.ensure_default_category();
        Ok(book)
    }

    pub fn export_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize notes")
    }

    /// Load notes from a file; a missing file yields the default book.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read notes from {}", path.display()))?;
        Self::import_json(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.export_json()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write notes to {}", path.display()))?;
        Ok(())
    }
}

impl NoteLookup for NoteBook {
    fn describe(&self, word: &str) -> Option<String> {
        self.lookup(word)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
    }
}

/// Render a word with its note: `word (desc)`, keeping trailing sentence
/// punctuation after the note, so `fox.` becomes `fox (desc).`.
///
/// A word made only of punctuation has no stem to attach the note to and is
/// rendered whole before it: `...` becomes `... (desc)`, never ` (desc)...`.
pub fn annotate_word(word: &str, desc: &str) -> String {
    let stem = word.trim_end_matches(['.', '!', '?', ',', ';', ':']);
    if stem.is_empty() || stem.len() == word.len() {
        return format!("{word} ({desc})");
    }
    let punctuation = &word[stem.len()..];
    format!("{stem} ({desc}){punctuation}")
}
