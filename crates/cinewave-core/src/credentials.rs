//! Persistent storage for the catalog API key
//!
//! The key lives in a small JSON file at a path chosen by the caller. A
//! configured default key is handed out until the user explicitly resets
//! the credential; after that the caller must prompt for a new key.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CatalogError, Result};

/// Contents of the credential file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredCredentials {
    pub api_key: Option<String>,
    /// Set by a reset; cleared once a new key is saved
    pub awaiting_prompt: bool,
}

/// File-backed API key store
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file; a missing file means nothing stored yet.
    ///
    /// # Errors
    /// Returns `CatalogError::Credentials` if the file exists but cannot be read or parsed
    pub fn load(&self) -> Result<StoredCredentials> {
        if !self.path.exists() {
            return Ok(StoredCredentials::default());
        }

        let raw = fs::read_to_string(&self.path).map_err(|e| {
            CatalogError::Credentials(format!("read {}: {}", self.path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            CatalogError::Credentials(format!("parse {}: {}", self.path.display(), e))
        })
    }

    fn write(&self, credentials: &StoredCredentials) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                CatalogError::Credentials(format!("create {}: {}", parent.display(), e))
            })?;
        }

        // Staged beside the target; the rename swaps the whole file at once
        let raw = serde_json::to_string_pretty(credentials)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, raw).map_err(|e| {
            CatalogError::Credentials(format!("write {}: {}", staging.display(), e))
        })?;
        fs::rename(&staging, &self.path).map_err(|e| {
            CatalogError::Credentials(format!("replace {}: {}", self.path.display(), e))
        })
    }

    /// Store a key entered by the user.
    ///
    /// # Errors
    /// Returns `CatalogError::Credentials` if the key is blank or the file cannot be written
    pub fn save(&self, api_key: &str) -> Result<()> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(CatalogError::Credentials("API key cannot be empty".to_string()));
        }

        self.write(&StoredCredentials {
            api_key: Some(api_key.to_string()),
            awaiting_prompt: false,
        })?;
        info!(path = %self.path.display(), "API key saved");
        Ok(())
    }

    /// Forget the stored key and stop handing out the default one.
    pub fn reset(&self) -> Result<()> {
        self.write(&StoredCredentials {
            api_key: None,
            awaiting_prompt: true,
        })?;
        info!(path = %self.path.display(), "API key reset");
        Ok(())
    }

    /// Key to use right now, or `None` when the user has to be prompted.
    ///
    /// An unreadable or corrupt file also means prompting; saving a new key
    /// overwrites it.
    ///
    /// # Arguments
    /// * `default_key` - Fallback used until the first reset
    pub fn resolve(&self, default_key: Option<&str>) -> Result<Option<String>> {
        let stored = match self.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "credential file unusable, prompting for a new key");
                return Ok(None);
            }
        };

        if let Some(key) = stored.api_key.filter(|k| !k.trim().is_empty()) {
            return Ok(Some(key));
        }
        if stored.awaiting_prompt {
            debug!("no API key stored, prompt required");
            return Ok(None);
        }
        Ok(default_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string))
    }
}
