//! Story catalog stored as a local JSON file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::instrument;

use flashrecall_core::catalog::StoryCatalog;
use flashrecall_core::traits::StorySource;

use crate::error::SourceError;

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StorySource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> anyhow::Result<StoryCatalog> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SourceError::NotFound(self.location()).into());
            }
            Err(e) => return Err(e.into()),
        };

        let catalog = StoryCatalog::from_json(&content).map_err(|e| SourceError::Parse {
            location: self.location(),
            message: format!("{e:#}"),
        })?;
        tracing::info!(stories = catalog.len(), "loaded story catalog");
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loads_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stories.json");
        std::fs::write(
            &path,
            r#"{"medium": [{"title": "Rain", "sentences": ["It rained."]}]}"#,
        )
        .unwrap();

        let source = FileSource::new(&path);
        let catalog = source.load().await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.find("Rain").is_some());
        assert_eq!(source.name(), "file");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let source = FileSource::new("/definitely/not/here/stories.json");
        let err = source.load().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SourceError>(),
            Some(SourceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stories.json");
        std::fs::write(&path, "[oops").unwrap();

        let err = FileSource::new(&path).load().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SourceError>(),
            Some(SourceError::Parse { .. })
        ));
    }
}
