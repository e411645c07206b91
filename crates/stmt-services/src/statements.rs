//! Articles API: statement content

use crate::error::FetchError;
use crate::http::join;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use stmt_model::Statement;

/// Source of statements
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait StatementApi: Send + Sync {
    /// `GET /articles/get_statement_by_id/?id=<id>`
    async fn get_statement_by_id(&self, id: &str) -> Result<Statement, FetchError>;

    /// `GET /articles/get_statement/?id=<id>`
    async fn get_statement(&self, id: &str) -> Result<Statement, FetchError>;
}

/// HTTP client of the articles API
#[derive(Debug, Clone)]
pub struct HttpStatementApi {
    client: Client,
    base_url: String,
}

impl HttpStatementApi {
    /// Create client with a default HTTP client
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create client sharing an existing HTTP client
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, path: &str, id: &str) -> Result<Statement, FetchError> {
        let url = join(&self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(&[("id", id)])
            .send()
            .await
            .map_err(|e| FetchError::transport(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| FetchError::decode(&url, e))?;

        parse_statement(payload).map_err(|e| FetchError::decode(&url, e))
    }
}

/// Accept both a bare statement and `{ "statement": {..} }`
fn parse_statement(payload: Value) -> Result<Statement, serde_json::Error> {
    let body = match payload {
        Value::Object(mut map) if map.get("statement").is_some_and(Value::is_object) => {
            map.remove("statement").unwrap_or(Value::Null)
        }
        other => other,
    };
    serde_json::from_value(body)
}

#[async_trait]
impl StatementApi for HttpStatementApi {
    #[tracing::instrument(skip(self))]
    async fn get_statement_by_id(&self, id: &str) -> Result<Statement, FetchError> {
        self.fetch("articles/get_statement_by_id/", id).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_statement(&self, id: &str) -> Result<Statement, FetchError> {
        self.fetch("articles/get_statement/", id).await
    }
}
