//! Configuration loading and story source factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use flashrecall_core::keywords::ScoreMode;
use flashrecall_core::model::{Difficulty, DisplayMode, PauseMode};
use flashrecall_core::player::{word_delay_from_ms, PlayerSettings};
use flashrecall_core::traits::StorySource;
use flashrecall_core::TrainerError;

use crate::file::FileSource;
use crate::http::HttpSource;

pub const CONFIG_FILE_NAME: &str = "flashrecall.toml";

/// Where the story catalog is loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    File {
        path: PathBuf,
    },
    Http {
        url: String,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::File {
            path: PathBuf::from("stories.json"),
        }
    }
}

impl SourceConfig {
    /// Interpret a bare location: `http(s)://` URLs are fetched, anything
    /// else is a file path.
    pub fn from_location(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            SourceConfig::Http {
                url: location.to_string(),
                timeout_secs: None,
            }
        } else {
            SourceConfig::File {
                path: PathBuf::from(location),
            }
        }
    }
}

/// Top-level flashrecall configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashRecallConfig {
    /// Story catalog location.
    #[serde(default)]
    pub source: SourceConfig,
    /// Delay between reveals in milliseconds. Must be positive.
    #[serde(default = "default_word_delay_ms")]
    pub word_delay_ms: i64,
    #[serde(default)]
    pub display_mode: DisplayMode,
    #[serde(default)]
    pub pause_mode: PauseMode,
    /// Narrate reveals through `speech_command`.
    #[serde(default)]
    pub speech: bool,
    #[serde(default = "default_speech_command")]
    pub speech_command: String,
    /// Show memory-aid notes next to revealed words.
    #[serde(default = "default_true")]
    pub show_notes: bool,
    #[serde(default)]
    pub score_mode: ScoreMode,
    /// Difficulty used when none is given on the command line.
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Directory holding the notes and progress files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_word_delay_ms() -> i64 {
    1000
}
fn default_speech_command() -> String {
    "espeak".to_string()
}
fn default_true() -> bool {
    true
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./flashrecall-data")
}

impl Default for FlashRecallConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            word_delay_ms: default_word_delay_ms(),
            display_mode: DisplayMode::default(),
            pause_mode: PauseMode::default(),
            speech: false,
            speech_command: default_speech_command(),
            show_notes: true,
            score_mode: ScoreMode::default(),
            difficulty: Difficulty::default(),
            data_dir: default_data_dir(),
        }
    }
}

impl FlashRecallConfig {
    /// Player settings, rejecting a non-positive word delay.
    pub fn player_settings(&self) -> Result<PlayerSettings, TrainerError> {
        Ok(PlayerSettings {
            word_delay: word_delay_from_ms(self.word_delay_ms)?,
            display_mode: self.display_mode,
            pause_mode: self.pause_mode,
        })
    }

    pub fn notes_path(&self) -> PathBuf {
        self.data_dir.join("memory_notes.json")
    }

    pub fn progress_path(&self) -> PathBuf {
        self.data_dir.join("progress.json")
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied as-is and never scanned for further
/// references.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut cursor = 0;
    while let Some(offset) = result[cursor..].find("${") {
        let start = cursor + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result.replace_range(start..start + end + 1, &value);
        cursor = start + value.len();
    }
    result
}

fn resolve_source_config(config: &SourceConfig) -> SourceConfig {
    match config {
        SourceConfig::File { path } => SourceConfig::File {
            path: PathBuf::from(resolve_env_vars(&path.to_string_lossy())),
        },
        SourceConfig::Http { url, timeout_secs } => SourceConfig::Http {
            url: resolve_env_vars(url),
            timeout_secs: *timeout_secs,
        },
    }
}

/// Apply `FLASHRECALL_*` overrides, reading variables through `var`.
fn apply_overrides(
    config: &mut FlashRecallConfig,
    var: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(location) = var("FLASHRECALL_STORIES") {
        config.source = SourceConfig::from_location(&location);
    }
    if let Some(delay) = var("FLASHRECALL_WORD_DELAY_MS") {
        let ms: i64 = delay.trim().parse().map_err(|_| {
            TrainerError::InvalidConfiguration(format!(
                "FLASHRECALL_WORD_DELAY_MS is not a number: '{delay}'"
            ))
        })?;
        config.word_delay_ms = ms;
    }
    Ok(())
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `flashrecall.toml` in the current directory
/// 2. `~/.config/flashrecall/config.toml`
///
/// Environment variable overrides: `FLASHRECALL_STORIES`,
/// `FLASHRECALL_WORD_DELAY_MS`.
pub fn load_config_from(path: Option<&Path>) -> Result<FlashRecallConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => default_config_path(),
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<FlashRecallConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => FlashRecallConfig::default(),
    };

    apply_overrides(&mut config, |name| std::env::var(name).ok())?;

    config.source = resolve_source_config(&config.source);
    config.speech_command = resolve_env_vars(&config.speech_command);

    word_delay_from_ms(config.word_delay_ms)?;

    Ok(config)
}

/// The first existing default config file, if any.
pub fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    let global = dirs_path()?.join("config.toml");
    global.exists().then_some(global)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("flashrecall"))
}

/// Settable top-level keys and how their values are written.
const SCALAR_KEYS: &[&str] = &[
    "word_delay_ms",
    "display_mode",
    "pause_mode",
    "speech",
    "speech_command",
    "show_notes",
    "score_mode",
    "difficulty",
    "data_dir",
];

/// Set one configuration value in `path`, keeping the rest of the file
/// (comments and ordering included) intact.
///
/// `key` is one of the top-level settings, or `source` with a file path or
/// URL as the value. The edited document is validated before it is written.
pub fn set_config_value(path: &Path, key: &str, value: &str) -> Result<()> {
    let content = if path.exists() {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?
    } else {
        String::new()
    };
    let mut doc: toml_edit::DocumentMut = content
        .parse()
        .with_context(|| format!("failed to parse config: {}", path.display()))?;

    match key {
        "source" => {
            let mut table = toml_edit::Table::new();
            match SourceConfig::from_location(value) {
                SourceConfig::File { path } => {
                    table["type"] = toml_edit::value("file");
                    table["path"] = toml_edit::value(path.to_string_lossy().as_ref());
                }
                SourceConfig::Http { url, .. } => {
                    table["type"] = toml_edit::value("http");
                    table["url"] = toml_edit::value(url);
                }
            }
            doc["source"] = toml_edit::Item::Table(table);
        }
        "word_delay_ms" => {
            let ms: i64 = value.trim().parse().map_err(|_| {
                TrainerError::InvalidConfiguration(format!("word delay is not a number: '{value}'"))
            })?;
            word_delay_from_ms(ms)?;
            doc[key] = toml_edit::value(ms);
        }
        "speech" | "show_notes" => {
            let flag: bool = value
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("{key} must be true or false, got '{value}'"))?;
            doc[key] = toml_edit::value(flag);
        }
        "display_mode" => {
            let mode: DisplayMode = value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            doc[key] = toml_edit::value(mode.to_string());
        }
        "pause_mode" => {
            let mode: PauseMode = value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            doc[key] = toml_edit::value(mode.to_string());
        }
        "score_mode" => {
            let mode: ScoreMode = value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            doc[key] = toml_edit::value(mode.to_string());
        }
        "difficulty" => {
            let difficulty: Difficulty = value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            doc[key] = toml_edit::value(difficulty.to_string());
        }
        "speech_command" | "data_dir" => {
            doc[key] = toml_edit::value(value);
        }
        other => anyhow::bail!(
            "unknown config key '{other}' (expected source or one of: {})",
            SCALAR_KEYS.join(", ")
        ),
    }

    let updated = doc.to_string();
    toml::from_str::<FlashRecallConfig>(&updated)
        .with_context(|| format!("setting {key} would make the config invalid"))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, updated)
        .with_context(|| format!("failed to write config: {}", path.display()))?;
    tracing::info!(key, value, "updated config");
    Ok(())
}

/// Create a story source from its configuration.
pub fn create_source(config: &SourceConfig) -> Result<Box<dyn StorySource>> {
    match config {
        SourceConfig::File { path } => Ok(Box::new(FileSource::new(path))),
        SourceConfig::Http { url, timeout_secs } => {
            let source = match timeout_secs {
                Some(secs) => HttpSource::with_timeout(url, *secs)?,
                None => HttpSource::new(url)?,
            };
            Ok(Box::new(source))
        }
    }
}
