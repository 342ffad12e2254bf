pub mod config;
pub mod init;
pub mod list;
pub mod notes;
pub mod play;
pub mod reset;
pub mod score;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use flashrecall_core::catalog::StoryCatalog;
use flashrecall_core::keywords::{score_keywords, KeywordScore, ScoreMode};
use flashrecall_core::notes::NoteBook;
use flashrecall_core::progress::ProgressLog;
use flashrecall_core::scorer::{score, ScoreResult};
use flashrecall_core::trainer::Trainer;
use flashrecall_sources::config::{load_config_from, FlashRecallConfig};
use flashrecall_sources::create_source;

/// Load the configuration, then the catalog it points at.
pub async fn load_catalog(config: &FlashRecallConfig) -> Result<StoryCatalog> {
    let source = create_source(&config.source)?;
    tracing::debug!(source = source.name(), location = %source.location(), "loading stories");
    source
        .load()
        .await
        .with_context(|| format!("failed to load stories from {}", source.location()))
}

/// Everything a command that touches notes or progress needs.
pub async fn load_trainer(config_path: Option<&Path>) -> Result<(FlashRecallConfig, Trainer)> {
    let config = load_config_from(config_path)?;
    let catalog = load_catalog(&config).await?;
    let notes = NoteBook::load(&config.notes_path())?;
    let progress = ProgressLog::load(&config.progress_path())?;
    Ok((config, Trainer::new(catalog, notes, progress)))
}

/// A recall result in either scoring mode.
#[derive(Debug, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RecallReport {
    Positional(ScoreResult),
    Keywords(KeywordScore),
}

impl RecallReport {
    pub fn new<S: AsRef<str>>(mode: ScoreMode, attempt: &str, reference: &[S]) -> Self {
        match mode {
            ScoreMode::Positional => RecallReport::Positional(score(attempt, reference)),
            ScoreMode::Keywords => RecallReport::Keywords(score_keywords(attempt, reference)),
        }
    }

    pub fn print(&self) {
        match self {
            RecallReport::Positional(result) => {
                println!(
                    "Score: {}/{} ({:.1}%)",
                    result.matched,
                    result.total,
                    result.accuracy() * 100.0
                );
                if result.is_perfect() {
                    println!("Perfect recall!");
                } else {
                    println!("Discrepancies:");
                    for d in &result.discrepancies {
                        println!("  {d}");
                    }
                }
                println!("Reference: {}", result.reference_text);
            }
            RecallReport::Keywords(result) => {
                println!("Keywords recalled: {}/{}", result.matched, result.total);
                println!("Reference: {}", result.reference_text);
            }
        }
    }
}
