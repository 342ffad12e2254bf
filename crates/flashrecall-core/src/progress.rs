//! Completed-story log with JSON persistence.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Difficulty;

/// One finished (or at least started) story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedStory {
    pub title: String,
    pub difficulty: Difficulty,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressLog {
    #[serde(default)]
    completed: Vec<CompletedStory>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `title` as played. Returns `false` if it was already recorded.
    pub fn mark_done(&mut self, title: &str, difficulty: Difficulty) -> bool {
        if self.contains(title) {
            return false;
        }
        self.completed.push(CompletedStory {
            title: title.to_string(),
            difficulty,
            completed_at: Utc::now(),
        });
        true
    }

    pub fn contains(&self, title: &str) -> bool {
        self.completed.iter().any(|c| c.title == title)
    }

    /// Titles in the form the story selector filters on.
    pub fn titles(&self) -> HashSet<String> {
        self.completed.iter().map(|c| c.title.clone()).collect()
    }

    pub fn entries(&self) -> &[CompletedStory] {
        &self.completed
    }

    pub fn get(&self, title: &str) -> Option<&CompletedStory> {
        self.completed.iter().find(|c| c.title == title)
    }

    /// Forget every completed story.
    pub fn reset(&mut self) {
        self.completed.clear();
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    /// Load the log from a file; a missing file yields an empty log.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read progress from {}", path.display()))?;
        serde_json::from_str(&content).context("failed to parse progress JSON")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize progress")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write progress to {}", path.display()))?;
        Ok(())
    }
}
