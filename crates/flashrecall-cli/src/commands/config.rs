//! The `flashrecall config` command.

use std::path::PathBuf;

use anyhow::Result;

use flashrecall_sources::config::{default_config_path, set_config_value, CONFIG_FILE_NAME};

use crate::ConfigCommand;

pub fn execute(command: ConfigCommand, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        ConfigCommand::Set { key, value } => {
            let path = config_path
                .or_else(default_config_path)
                .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
            set_config_value(&path, &key, &value)?;
            println!("Set {key} = {value} in {}", path.display());
        }
    }
    Ok(())
}
