//! The `flashrecall reset` command.

use std::path::PathBuf;

use anyhow::Result;

use flashrecall_core::progress::ProgressLog;
use flashrecall_sources::config::load_config_from;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let path = config.progress_path();

    let mut progress = ProgressLog::load(&path)?;
    let cleared = progress.len();
    progress.reset();
    progress.save(&path)?;

    tracing::info!(cleared, "progress reset");
    println!("Progress reset ({cleared} stories cleared).");
    Ok(())
}
