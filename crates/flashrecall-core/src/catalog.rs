//! Story catalog parsing, validation and selection.
//!
//! The catalog is a JSON document with one array of stories per difficulty
//! tier. It is loaded once and read-only afterwards.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

use crate::model::{Difficulty, Story};

/// Intermediate JSON structure for the catalog file.
#[derive(Debug, Deserialize)]
struct JsonCatalog {
    #[serde(default)]
    simple: Vec<JsonStory>,
    #[serde(default)]
    medium: Vec<JsonStory>,
    #[serde(default)]
    hard: Vec<JsonStory>,
}

#[derive(Debug, Deserialize)]
struct JsonStory {
    title: String,
    #[serde(default)]
    sentences: Vec<String>,
}

/// All stories, grouped by difficulty tier.
#[derive(Debug, Clone, Default)]
pub struct StoryCatalog {
    simple: Vec<Arc<Story>>,
    medium: Vec<Arc<Story>>,
    hard: Vec<Arc<Story>>,
}

impl StoryCatalog {
    pub fn new(stories: impl IntoIterator<Item = Story>) -> Self {
        let mut catalog = Self::default();
        for story in stories {
            catalog.tier_mut(story.difficulty).push(Arc::new(story));
        }
        catalog
    }

    /// Parse a catalog from its JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        let parsed: JsonCatalog =
            serde_json::from_str(content).context("failed to parse story catalog JSON")?;

        let tier = |difficulty: Difficulty, stories: Vec<JsonStory>| {
            stories
                .into_iter()
                .map(|s| Story::new(s.title, difficulty, s.sentences))
                .collect::<Vec<_>>()
        };

        let mut stories = tier(Difficulty::Simple, parsed.simple);
        stories.extend(tier(Difficulty::Medium, parsed.medium));
        stories.extend(tier(Difficulty::Hard, parsed.hard));

        Ok(Self::new(stories))
    }

    /// Read and parse a catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read story catalog: {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn tier(&self, difficulty: Difficulty) -> &[Arc<Story>] {
        match difficulty {
            Difficulty::Simple => &self.simple,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    fn tier_mut(&mut self, difficulty: Difficulty) -> &mut Vec<Arc<Story>> {
        match difficulty {
            Difficulty::Simple => &mut self.simple,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }

    /// Every story, simple tier first.
    pub fn stories(&self) -> impl Iterator<Item = &Arc<Story>> {
        self.simple.iter().chain(&self.medium).chain(&self.hard)
    }

    pub fn len(&self) -> usize {
        self.simple.len() + self.medium.len() + self.hard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, title: &str) -> Option<Arc<Story>> {
        self.stories().find(|s| s.title == title).cloned()
    }

    /// Pick a random story of `difficulty` whose title is not in `completed`.
    ///
    /// Returns `None` when every story in the tier has been played.
    pub fn select_story<R: Rng + ?Sized>(
        &self,
        difficulty: Difficulty,
        completed: &HashSet<String>,
        rng: &mut R,
    ) -> Option<Arc<Story>> {
        let mut pool: Vec<&Arc<Story>> = self
            .tier(difficulty)
            .iter()
            .filter(|s| !completed.contains(&s.title))
            .collect();

        if pool.is_empty() {
            tracing::info!("no unread stories left in tier {difficulty}");
            return None;
        }

        pool.shuffle(rng);
        let chosen = Arc::clone(pool[0]);
        tracing::info!(title = %chosen.title, %difficulty, "selected story");
        Some(chosen)
    }
}

/// A warning from catalog validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The story title (if applicable).
    pub title: Option<String>,
    pub message: String,
}

/// Check a catalog for stories that would fail or confuse playback.
pub fn validate_catalog(catalog: &StoryCatalog) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen = HashSet::new();
    for story in catalog.stories() {
        if !seen.insert(story.title.as_str()) {
            warnings.push(ValidationWarning {
                title: Some(story.title.clone()),
                message: format!("duplicate story title: {}", story.title),
            });
        }
    }

    for story in catalog.stories() {
        if story.title.trim().is_empty() {
            warnings.push(ValidationWarning {
                title: None,
                message: format!("a {} story has an empty title", story.difficulty),
            });
        }
        if let Err(e) = story.validate() {
            warnings.push(ValidationWarning {
                title: Some(story.title.clone()),
                message: e.to_string(),
            });
        }
    }

    warnings
}
