//! Runtime settings
//!
//! Settings are read once at startup, from the environment, and handed to
//! the components that need them.

use std::path::{Path, PathBuf};

use crate::client::{CatalogClient, ClientConfig};
use crate::corrector::{GeminiConfig, GeminiGenerator, QueryCorrector};
use crate::credentials::CredentialStore;
use crate::error::Result;
use crate::gateway::CatalogGateway;
use crate::orchestrator::SearchOrchestrator;

/// Credential file used when no path is configured, relative to the data directory
pub const DEFAULT_CREDENTIALS_PATH: &str = "cinewave-credentials.json";

/// Everything needed to build the catalog stack
#[derive(Debug, Clone)]
pub struct Settings {
    pub client: ClientConfig,
    /// Query correction is disabled when no generator key is configured
    pub gemini: Option<GeminiConfig>,
    /// Catalog key used until the user resets it
    pub default_api_key: Option<String>,
    pub credentials_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            gemini: None,
            default_api_key: None,
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// | Variable | Meaning |
    /// |----------|---------|
    /// | `CINEWAVE_TMDB_BASE_URL` | Catalog API root |
    /// | `CINEWAVE_TIMEOUT_SECS` | Catalog request timeout |
    /// | `CINEWAVE_DEFAULT_TMDB_KEY` | Fallback catalog key |
    /// | `CINEWAVE_CREDENTIALS_PATH` | Credential file |
    /// | `GEMINI_API_KEY` / `API_KEY` | Enables query correction |
    /// | `CINEWAVE_GEMINI_MODEL` | Correction model |
    /// | `CINEWAVE_GEMINI_BASE_URL` | Generative API root |
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`, ignoring blank values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut settings = Settings::default();

        if let Some(url) = get("CINEWAVE_TMDB_BASE_URL") {
            settings.client.base_url = url;
        }
        if let Some(secs) = get("CINEWAVE_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            settings.client.timeout_secs = secs;
        }
        settings.default_api_key = get("CINEWAVE_DEFAULT_TMDB_KEY");
        if let Some(path) = get("CINEWAVE_CREDENTIALS_PATH") {
            settings.credentials_path = PathBuf::from(path);
        }

        settings.gemini = get("GEMINI_API_KEY").or_else(|| get("API_KEY")).map(|key| {
            let mut gemini = GeminiConfig::new(key);
            if let Some(model) = get("CINEWAVE_GEMINI_MODEL") {
                gemini.model = model;
            }
            if let Some(url) = get("CINEWAVE_GEMINI_BASE_URL") {
                gemini.base_url = url;
            }
            gemini
        });

        settings
    }

    /// Resolve a relative credential path against `dir`.
    ///
    /// Hosts pass their per-user data directory so the key file does not
    /// depend on the working directory.
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        if self.credentials_path.is_relative() {
            self.credentials_path = dir.as_ref().join(&self.credentials_path);
        }
        self
    }

    pub fn credential_store(&self) -> CredentialStore {
        CredentialStore::new(self.credentials_path.clone())
    }

    /// Corrector backed by Gemini, or a pass-through one without a key
    pub fn corrector(&self) -> Result<QueryCorrector> {
        match &self.gemini {
            Some(config) => Ok(QueryCorrector::new(Box::new(GeminiGenerator::new(config.clone())?))),
            None => Ok(QueryCorrector::disabled()),
        }
    }

    pub fn gateway(&self, api_key: &str) -> Result<CatalogGateway> {
        let client = CatalogClient::with_config(api_key, self.client.clone())?;
        Ok(CatalogGateway::with_client(client))
    }

    /// Full search stack for one API key
    pub fn orchestrator(&self, api_key: &str) -> Result<SearchOrchestrator> {
        Ok(SearchOrchestrator::new(self.gateway(api_key)?, self.corrector()?))
    }
}
