//! The `flashrecall score` command.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};

use flashrecall_core::keywords::ScoreMode;
use flashrecall_sources::config::load_config_from;

use super::{load_catalog, RecallReport};

pub async fn execute(
    title: String,
    attempt: Option<String>,
    last: Option<usize>,
    mode: Option<ScoreMode>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let catalog = load_catalog(&config).await?;
    let story = catalog
        .find(&title)
        .with_context(|| format!("story not found: {title}"))?;

    let attempt = match attempt {
        Some(text) => text,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read attempt from stdin")?;
            text
        }
    };

    let reference = match last {
        Some(n) => story.trailing_words(n),
        None => story.all_words(),
    };
    let report = RecallReport::new(mode.unwrap_or(config.score_mode), &attempt, &reference);

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => {
            println!("Story: {} ({})", story.title, story.difficulty);
            report.print();
        }
    }

    Ok(())
}
