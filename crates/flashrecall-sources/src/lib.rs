//! flashrecall-sources: Story sources and configuration.
//!
//! Implements the `StorySource` trait for local files and HTTP endpoints,
//! and loads the `flashrecall.toml` configuration that selects between them.

pub mod config;
pub mod error;
pub mod file;
pub mod http;

pub use config::{create_source, load_config_from, FlashRecallConfig, SourceConfig};
pub use error::SourceError;
