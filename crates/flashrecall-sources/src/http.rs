//! Story catalog served over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use flashrecall_core::catalog::StoryCatalog;
use flashrecall_core::traits::StorySource;

use crate::error::SourceError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct HttpSource {
    url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        Self::with_timeout(url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(url: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SourceError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.to_string(),
            timeout_secs,
            client,
        })
    }
}

#[async_trait]
impl StorySource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    fn location(&self) -> String {
        self.url.clone()
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn load(&self) -> anyhow::Result<StoryCatalog> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(self.timeout_secs)
            } else {
                SourceError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(SourceError::NotFound(self.url.clone()).into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Http {
                status,
                url: self.url.clone(),
                message: body,
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;
        let catalog = StoryCatalog::from_json(&body).map_err(|e| SourceError::Parse {
            location: self.url.clone(),
            message: format!("{e:#}"),
        })?;
        tracing::info!(stories = catalog.len(), "fetched story catalog");
        Ok(catalog)
    }
}
