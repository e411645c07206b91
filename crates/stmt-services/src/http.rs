//! Shared HTTP client construction

use crate::error::FetchError;
use reqwest::Client;
use std::time::Duration;

/// Timeouts applied to every outgoing request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_millis(5_000),
            request_timeout: Duration::from_millis(30_000),
        }
    }
}

/// Build a client honoring the settings
///
/// # Errors
/// - `FetchError::Transport` if the TLS backend cannot be initialized
pub fn build_client(settings: &HttpSettings) -> Result<Client, FetchError> {
    Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .user_agent(concat!("stmt-viewer/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| FetchError::transport("<client>", e))
}

/// Join a base URL and a path without doubling slashes
pub(crate) fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
