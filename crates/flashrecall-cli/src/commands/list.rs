//! The `flashrecall list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use flashrecall_core::model::Difficulty;

use super::load_trainer;

pub async fn execute(difficulty: Option<Difficulty>, config_path: Option<PathBuf>) -> Result<()> {
    let (_, trainer) = load_trainer(config_path.as_deref()).await?;

    let tiers: Vec<Difficulty> = match difficulty {
        Some(d) => vec![d],
        None => Difficulty::ALL.to_vec(),
    };

    let mut table = Table::new();
    table.set_header(vec!["Title", "Difficulty", "Sentences", "Words", "Played"]);

    let mut shown = 0;
    let mut played = 0;
    for tier in tiers {
        for story in trainer.catalog().tier(tier) {
            let completed = trainer.progress().get(&story.title);
            shown += 1;
            if completed.is_some() {
                played += 1;
            }
            table.add_row(vec![
                Cell::new(&story.title),
                Cell::new(story.difficulty),
                Cell::new(story.sentence_count()),
                Cell::new(story.word_count()),
                Cell::new(
                    completed
                        .map(|c| c.completed_at.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
            ]);
        }
    }

    if shown == 0 {
        println!("No stories found. Run `flashrecall init` to create a starter catalog.");
        return Ok(());
    }

    println!("{table}");
    println!("{played} of {shown} stories played.");
    Ok(())
}
