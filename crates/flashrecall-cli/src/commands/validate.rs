//! The `flashrecall validate` command.

use std::path::PathBuf;

use anyhow::Result;

use flashrecall_core::catalog::{validate_catalog, StoryCatalog};
use flashrecall_core::model::Difficulty;
use flashrecall_sources::config::load_config_from;

use super::load_catalog;

pub async fn execute(stories: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let catalog = match stories {
        Some(path) => StoryCatalog::load(&path)?,
        None => load_catalog(&load_config_from(config_path.as_deref())?).await?,
    };

    println!(
        "Catalog: {} stories ({} simple, {} medium, {} hard)",
        catalog.len(),
        catalog.tier(Difficulty::Simple).len(),
        catalog.tier(Difficulty::Medium).len(),
        catalog.tier(Difficulty::Hard).len(),
    );

    let warnings = validate_catalog(&catalog);
    for w in &warnings {
        let prefix = w
            .title
            .as_ref()
            .map(|title| format!("  [{title}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All stories valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
