//! Type-schema lookup service
//!
//! `GET {base}/service/type-info?key=<TypeKey>` answers
//! `{ name, schema: { Properties: [{ Name }] } }`.

use crate::error::FetchError;
use crate::http::join;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use stmt_model::{TypeInfo, TypeKey};

/// Source of type schemas
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Fetch the schema of a type
    ///
    /// # Errors
    /// - `FetchError::InvalidSchema` if the payload lacks `schema.Properties`
    /// - any other `FetchError` on transport or status failure
    async fn fetch_type_info(&self, key: &TypeKey) -> Result<TypeInfo, FetchError>;
}

/// HTTP client of the type-schema service
#[derive(Debug, Clone)]
pub struct HttpSchemaSource {
    client: Client,
    base_url: String,
}

impl HttpSchemaSource {
    /// Create source with a default client
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create source sharing an existing client
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Lookup endpoint
    #[must_use]
    pub fn endpoint(&self) -> String {
        join(&self.base_url, "service/type-info")
    }
}

#[async_trait]
impl SchemaSource for HttpSchemaSource {
    #[tracing::instrument(skip(self, key), fields(key = %key))]
    async fn fetch_type_info(&self, key: &TypeKey) -> Result<TypeInfo, FetchError> {
        let url = self.endpoint();

        let response = self
            .client
            .get(&url)
            .query(&[("key", key.as_str())])
            .send()
            .await
            .map_err(|e| FetchError::transport(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "type-info lookup failed");
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| FetchError::decode(&url, e))?;

        let info = TypeInfo::from_service_payload(key, &payload)?;
        tracing::info!(name = %info.name, properties = info.properties.len(), "type resolved");
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_path() {
        let source = HttpSchemaSource::new("https://kg.example.org/");
        assert_eq!(
            source.endpoint(),
            "https://kg.example.org/service/type-info"
        );
    }

    #[tokio::test]
    async fn mock_source_answers() {
        let mut source = MockSchemaSource::new();
        source
            .expect_fetch_type_info()
            .withf(|key| key.as_str() == "P1004")
            .times(1)
            .returning(|_| Ok(TypeInfo::from_names("analysis", ["label"])));

        let info = source
            .fetch_type_info(&TypeKey::from_normalized("P1004"))
            .await
            .unwrap();
        assert_eq!(info.properties, vec!["label"]);
    }
}
