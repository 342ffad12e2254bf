//! Story source trait.
//!
//! Implemented by the `flashrecall-sources` crate for local files and HTTP
//! endpoints; the core only ever sees a loaded [`StoryCatalog`].

use async_trait::async_trait;

use crate::catalog::StoryCatalog;

/// Somewhere a story catalog can be loaded from.
#[async_trait]
pub trait StorySource: Send + Sync {
    /// Human-readable source name (e.g. "file").
    fn name(&self) -> &str;

    /// Where the catalog comes from, for logs and error messages.
    fn location(&self) -> String;

    /// Load and parse the whole catalog.
    async fn load(&self) -> anyhow::Result<StoryCatalog>;
}
