//! Application context: the catalog, the notes book and the progress log,
//! owned together for the lifetime of the program.

use std::sync::Arc;

use rand::Rng;

use crate::catalog::StoryCatalog;
use crate::model::{Difficulty, Story};
use crate::notes::NoteBook;
use crate::progress::ProgressLog;

#[derive(Debug, Clone, Default)]
pub struct Trainer {
    catalog: StoryCatalog,
    notes: Arc<NoteBook>,
    progress: ProgressLog,
}

impl Trainer {
    pub fn new(catalog: StoryCatalog, notes: NoteBook, progress: ProgressLog) -> Self {
        Self {
            catalog,
            notes: Arc::new(notes),
            progress,
        }
    }

    pub fn catalog(&self) -> &StoryCatalog {
        &self.catalog
    }

    /// Shared handle for the player's annotation lookup.
    pub fn notes(&self) -> Arc<NoteBook> {
        Arc::clone(&self.notes)
    }

    /// Mutable notes; clones the book if a player still holds the old one.
    pub fn notes_mut(&mut self) -> &mut NoteBook {
        Arc::make_mut(&mut self.notes)
    }

    pub fn progress(&self) -> &ProgressLog {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressLog {
        &mut self.progress
    }

    /// Pick an unplayed story of `difficulty` and record it as played.
    pub fn choose_story<R: Rng + ?Sized>(
        &mut self,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Option<Arc<Story>> {
        let completed = self.progress.titles();
        let chosen = self.catalog.select_story(difficulty, &completed, rng)?;
        self.progress.mark_done(&chosen.title, chosen.difficulty);
        Some(chosen)
    }

    /// Stories of `difficulty` not yet played.
    pub fn remaining(&self, difficulty: Difficulty) -> usize {
        self.catalog
            .tier(difficulty)
            .iter()
            .filter(|s| !self.progress.contains(&s.title))
            .count()
    }
}
