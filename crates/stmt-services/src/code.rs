//! Source files referenced by `is_implemented_by`

use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::Client;

/// Source of implementation files
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait CodeSource: Send + Sync {
    /// Fetch the text of a source file
    async fn fetch_source(&self, url: &str) -> Result<String, FetchError>;
}

/// Plain-text HTTP fetcher
#[derive(Debug, Clone, Default)]
pub struct HttpCodeSource {
    client: Client,
}

impl HttpCodeSource {
    /// Create fetcher sharing an existing client
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CodeSource for HttpCodeSource {
    #[tracing::instrument(skip(self))]
    async fn fetch_source(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| FetchError::decode(url, e))
    }
}
