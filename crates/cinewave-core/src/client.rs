//! HTTP client for the TMDB v3 API
//!
//! This module owns the transport: it builds authenticated query strings,
//! sends GET requests and turns status codes into typed errors. There is no
//! retry logic; callers decide what to do with a failure.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{CatalogError, Result, GENERIC_SERVICE_MESSAGE};

/// Base URL for the TMDB v3 API
pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Language sent with every request
pub const LANGUAGE: &str = "es-ES";

/// Region sent with every request; also used to pick watch providers
pub const REGION: &str = "ES";

/// User-Agent identifying the client
const DEFAULT_USER_AGENT: &str = concat!("CineWave/", env!("CARGO_PKG_VERSION"));

/// Configuration for the catalog HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root without a trailing slash (default: TMDB v3)
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: TMDB_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Build the query string for a request.
///
/// The API key, language and region come first, followed by `params` in
/// order. Keys and values are percent-encoded.
///
/// # Example
/// ```
/// use cinewave_core::client::build_query;
///
/// let query = build_query("k", &[("query", "star wars".to_string())]);
/// assert_eq!(query, "api_key=k&language=es-ES&region=ES&query=star%20wars");
/// ```
pub fn build_query(api_key: &str, params: &[(&str, String)]) -> String {
    let fixed = [("api_key", api_key), ("language", LANGUAGE), ("region", REGION)];

    fixed
        .into_iter()
        .chain(params.iter().map(|(k, v)| (*k, v.as_str())))
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Pull the human-readable message out of an error body.
fn service_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["status_message"].as_str().map(str::to_string))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| GENERIC_SERVICE_MESSAGE.to_string())
}

/// HTTP client for the catalog API
///
/// Every request is authenticated with the API key and carries the fixed
/// language and region.
pub struct CatalogClient {
    /// Underlying HTTP client
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl CatalogClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// Returns an error if the key is blank or the HTTP client cannot be created
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Arguments
    /// * `api_key` - TMDB v3 API key
    /// * `config` - Client configuration
    ///
    /// # Errors
    /// Returns an error if the key is blank or the HTTP client cannot be created
    pub fn with_config(api_key: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(CatalogError::Credentials("API key cannot be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch and deserialize JSON from an API path
    ///
    /// # Arguments
    /// * `path` - Path below the API root (e.g., "/movie/popular")
    /// * `params` - Extra query parameters
    ///
    /// # Errors
    /// - `CatalogError::Unauthorized` - Server returned 401
    /// - `CatalogError::Service` - Any other non-success status
    /// - `CatalogError::Http` - Network failure
    /// - `CatalogError::Parse` - Body did not match `T`
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}?{}", self.base_url, path, build_query(&self.api_key, params));
        debug!(path = %path, params = params.len(), "catalog request");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(CatalogError::Unauthorized);
        }

        let body = response.text().await?;

        if !status.is_success() {
            debug!(path = %path, status = status.as_u16(), "catalog request failed");
            return Err(CatalogError::Service(service_message(&body)));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, TMDB_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_client_creation() {
        let client = CatalogClient::new("abc123");
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_rejects_blank_key() {
        let result = CatalogClient::new("   ");
        assert!(matches!(result, Err(CatalogError::Credentials(_))));
    }

    #[test]
    fn test_client_trims_base_url() {
        let config = ClientConfig {
            base_url: "http://localhost:1234/".to_string(),
            timeout_secs: 5,
        };
        let client = CatalogClient::with_config("k", config).unwrap();
        assert_eq!(client.base_url, "http://localhost:1234");
    }

    #[test]
    fn test_build_query_fixed_params_first() {
        assert_eq!(build_query("key", &[]), "api_key=key&language=es-ES&region=ES");
    }

    #[test]
    fn test_build_query_encodes_values() {
        let query = build_query(
            "key",
            &[
                ("append_to_response", "videos,watch/providers".to_string()),
                ("query", "amélie & co".to_string()),
            ],
        );
        assert!(query.ends_with(
            "&append_to_response=videos%2Cwatch%2Fproviders&query=am%C3%A9lie%20%26%20co"
        ));
    }

    #[test]
    fn test_service_message_from_body() {
        let body = r#"{"status_code":34,"status_message":"The resource could not be found."}"#;
        assert_eq!(service_message(body), "The resource could not be found.");
    }

    #[test]
    fn test_service_message_fallback() {
        assert_eq!(service_message("<html>oops</html>"), GENERIC_SERVICE_MESSAGE);
        assert_eq!(service_message("{}"), GENERIC_SERVICE_MESSAGE);
    }
}
