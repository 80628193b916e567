//! AI-assisted search query correction
//!
//! A free-text query goes through one generative-text call that is asked to
//! fix misspelled titles or names. Correction is best effort: every failure
//! falls back to the text the user typed.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::{CatalogError, Result};

/// Base URL for the Gemini API
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used for corrections
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";

/// Single prompt in, single completion out
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Configuration for the Gemini generator
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API root without a trailing slash
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    /// Request timeout in seconds (default: 15)
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Default endpoint and model with the given key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: GEMINI_BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_key: api_key.into(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Part {
    text: Option<String>,
}

/// Gemini `generateContent` client
pub struct GeminiGenerator {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiGenerator {
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Generation(format!(
                "generateContent returned {}",
                status
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Generation(format!("parse JSON: {e}")))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::Generation("no candidates".to_string()))?
            .content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        Ok(text)
    }
}

/// Instruction sent with every correction request
pub fn correction_prompt(query: &str) -> String {
    format!(
        "Actúa como un experto en cine. Analiza esta búsqueda: \"{query}\". \
         Si tiene errores ortográficos o es un nombre de película o actor mal escrito, \
         devuelve ÚNICAMENTE la versión correcta más probable. \
         Si ya es correcto, devuelve el texto original. \
         No añadas notas ni explicaciones. Solo el nombre limpio."
    )
}

/// Trim the reply and strip surrounding quotes.
///
/// Returns `None` when nothing is left.
pub fn sanitize_reply(reply: &str) -> Option<String> {
    const QUOTES: &[char] = &['"', '\'', '“', '”', '‘', '’', '«', '»', '`'];

    let cleaned = reply.trim().trim_matches(QUOTES).trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Best-effort spelling correction for search queries
pub struct QueryCorrector {
    generator: Option<Box<dyn TextGenerator>>,
}

impl QueryCorrector {
    pub fn new(generator: Box<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    /// Corrector that always returns the original query
    pub fn disabled() -> Self {
        Self { generator: None }
    }

    /// Corrected query, or `query` unchanged on any failure.
    pub async fn correct(&self, query: &str) -> String {
        let Some(generator) = &self.generator else {
            return query.to_string();
        };
        if query.trim().is_empty() {
            return query.to_string();
        }

        match generator.generate(&correction_prompt(query)).await {
            Ok(reply) => match sanitize_reply(&reply) {
                Some(corrected) => corrected,
                None => {
                    warn!(query = %query, "query correction returned an empty reply");
                    query.to_string()
                }
            },
            Err(e) => {
                warn!(query = %query, error = %e, "query correction failed");
                query.to_string()
            }
        }
    }

    /// Correction to surface, if it differs from the query ignoring case.
    pub async fn suggest(&self, query: &str) -> Option<String> {
        let corrected = self.correct(query).await;
        if corrected.to_lowercase() == query.trim().to_lowercase() {
            None
        } else {
            debug!(query = %query, corrected = %corrected, "query corrected");
            Some(corrected)
        }
    }
}
