//! Error types for the CineWave catalog core
//!
//! This module defines all error types used throughout the library.
//! CatalogError implements Serialize for Tauri compatibility.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Message surfaced when the catalog fails without saying why
pub const GENERIC_SERVICE_MESSAGE: &str = "Error al conectar con TMDB.";

/// Error type for catalog operations
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog rejected the API key (HTTP 401)
    #[error("API Key inválida o expirada.")]
    Unauthorized,

    /// Any other non-success answer from the catalog
    #[error("{0}")]
    Service(String),

    /// HTTP transport failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Request parameters were rejected before hitting the network
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Invalid catalog ID provided
    #[error("Invalid catalog ID: {0}")]
    InvalidId(u64),

    /// Reading or writing the stored API key failed
    #[error("Credential store error: {0}")]
    Credentials(String),

    /// Generative-text call failed; never leaves the corrector
    #[error("Text generation failed: {0}")]
    Generation(String),
}

impl CatalogError {
    /// Whether the caller should discard the current API key and ask for a new one
    pub fn is_auth(&self) -> bool {
        matches!(self, CatalogError::Unauthorized)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(err.to_string())
    }
}

/// Serialize CatalogError as a string for Tauri compatibility
impl Serialize for CatalogError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
