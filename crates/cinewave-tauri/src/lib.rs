//! CineWave Tauri Integration
//!
//! This crate provides Tauri commands for driving the CineWave catalog
//! from a Tauri 2.0 front end.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cinewave_core::Settings;
//! use cinewave_tauri::AppState;
//! use tauri::Manager;
//!
//! fn main() {
//!     cinewave_tauri::init_logging();
//!     tauri::Builder::default()
//!         .setup(|app| {
//!             app.manage(AppState::for_app(app.handle(), Settings::from_env())?);
//!             Ok(())
//!         })
//!         .invoke_handler(tauri::generate_handler![
//!             cinewave_tauri::commands::api_key_status,
//!             cinewave_tauri::commands::save_api_key,
//!             cinewave_tauri::commands::reset_api_key,
//!             cinewave_tauri::commands::load_tab,
//!             cinewave_tauri::commands::search,
//!             cinewave_tauri::commands::apply_filters,
//!             cinewave_tauri::commands::clear_search,
//!             cinewave_tauri::commands::session_snapshot,
//!             cinewave_tauri::commands::get_details,
//!             cinewave_tauri::commands::get_person,
//!             cinewave_tauri::commands::get_genres,
//!         ])
//!         .run(tauri::generate_context!())
//!         .expect("error while running tauri application");
//! }
//! ```
//!
//! # Commands
//! - `api_key_status` - Whether a catalog key is available
//! - `save_api_key` / `reset_api_key` - Credential entry and reset
//! - `load_tab` - Hero and rows for home, movies or TV
//! - `search` - Search with AI correction
//! - `apply_filters` - Discovery with structured filters
//! - `clear_search` - Leave the search view
//! - `session_snapshot` - Current search session
//! - `get_details` / `get_person` - Details overlay data
//! - `get_genres` - Genres for the filter panel

pub mod commands;

use std::sync::Arc;
use tauri::{AppHandle, Manager, Runtime};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use cinewave_core::{CatalogError, CredentialStore, SearchOrchestrator, Settings};

/// Message returned by commands while no API key is available
pub const KEY_REQUIRED: &str = "Se necesita una API Key de TMDB.";

/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG`, defaulting to `info`. Calling it twice is harmless.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .try_init();
}

/// Shared state for all commands.
///
/// Holds the credential store and the search stack built for the current
/// API key. The stack is rebuilt whenever the key changes and dropped when
/// the key is reset.
///
/// # Example
/// ```rust,ignore
/// use cinewave_core::Settings;
/// use cinewave_tauri::AppState;
/// use tauri::Manager;
///
/// tauri::Builder::default()
///     .setup(|app| {
///         app.manage(AppState::for_app(app.handle(), Settings::from_env())?);
///         Ok(())
///     })
/// ```
pub struct AppState {
    settings: Settings,
    credentials: CredentialStore,
    orchestrator: RwLock<Option<Arc<SearchOrchestrator>>>,
}

impl AppState {
    /// Create the state, resolving the stored or default API key.
    ///
    /// # Errors
    /// Returns an error string if the credential file is unreadable or the
    /// HTTP clients cannot be created.
    pub fn new(settings: Settings) -> Result<Self, String> {
        let credentials = settings.credential_store();
        let api_key = credentials
            .resolve(settings.default_api_key.as_deref())
            .map_err(|e| e.to_string())?;

        let orchestrator = match api_key {
            Some(key) => Some(Arc::new(settings.orchestrator(&key).map_err(|e| e.to_string())?)),
            None => {
                info!("no API key available, waiting for the user");
                None
            }
        };

        Ok(Self {
            settings,
            credentials,
            orchestrator: RwLock::new(orchestrator),
        })
    }

    /// Create the state with relative credential paths placed in the app
    /// data directory.
    ///
    /// # Errors
    /// Returns an error string if the data directory cannot be resolved, or
    /// for any reason [`AppState::new`] fails.
    pub fn for_app<R: Runtime>(app: &AppHandle<R>, settings: Settings) -> Result<Self, String> {
        let dir = app.path().app_data_dir().map_err(|e| e.to_string())?;
        Self::new(settings.with_data_dir(dir))
    }

    /// Search stack for the current key.
    ///
    /// # Errors
    /// Returns [`KEY_REQUIRED`] when the user still has to enter a key.
    pub async fn orchestrator(&self) -> Result<Arc<SearchOrchestrator>, String> {
        self.orchestrator
            .read()
            .await
            .clone()
            .ok_or_else(|| KEY_REQUIRED.to_string())
    }

    pub async fn has_api_key(&self) -> bool {
        self.orchestrator.read().await.is_some()
    }

    /// Persist a new key and rebuild the search stack with it.
    pub async fn save_api_key(&self, api_key: &str) -> Result<(), String> {
        let orchestrator = self.settings.orchestrator(api_key).map_err(|e| e.to_string())?;
        let mut current = self.orchestrator.write().await;
        self.credentials.save(api_key).map_err(|e| e.to_string())?;
        *current = Some(Arc::new(orchestrator));
        Ok(())
    }

    /// Forget the key; commands fail with [`KEY_REQUIRED`] until a new one is saved.
    pub async fn reset_api_key(&self) -> Result<(), String> {
        let mut current = self.orchestrator.write().await;
        self.credentials.reset().map_err(|e| e.to_string())?;
        *current = None;
        Ok(())
    }

    /// Turn a catalog error into the message shown to the user.
    ///
    /// An authentication failure also resets the stored key so the front end
    /// falls back to the key prompt, but only while `used` is still the
    /// current stack. A rejection of a key the user has since replaced
    /// leaves the new key alone.
    pub async fn report(&self, used: &Arc<SearchOrchestrator>, error: CatalogError) -> String {
        if error.is_auth() {
            let mut current = self.orchestrator.write().await;
            if current.as_ref().is_some_and(|c| Arc::ptr_eq(c, used)) {
                warn!("catalog rejected the API key, resetting it");
                if let Err(e) = self.credentials.reset() {
                    warn!(error = %e, "failed to reset API key");
                }
                *current = None;
            } else {
                debug!("ignoring rejection of a replaced API key");
            }
        }
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn settings(dir: &tempfile::TempDir, default_key: Option<&str>) -> Settings {
        Settings {
            default_api_key: default_key.map(str::to_string),
            credentials_path: dir.path().join("credentials.json"),
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn test_state_without_key_requires_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(settings(&dir, None)).unwrap();

        assert!(!state.has_api_key().await);
        assert_eq!(state.orchestrator().await.err().as_deref(), Some(KEY_REQUIRED));
    }

    #[tokio::test]
    async fn test_state_uses_default_key() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(settings(&dir, Some("fallback"))).unwrap();
        assert!(state.has_api_key().await);
    }

    #[tokio::test]
    async fn test_save_and_reset_key() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(settings(&dir, Some("fallback"))).unwrap();

        state.save_api_key("mine").await.unwrap();
        assert!(state.has_api_key().await);

        state.reset_api_key().await.unwrap();
        assert!(!state.has_api_key().await);

        // The default key is not handed out again after a reset
        let reopened = AppState::new(settings(&dir, Some("fallback"))).unwrap();
        assert!(!reopened.has_api_key().await);
    }

    #[tokio::test]
    async fn test_save_blank_key_fails() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(settings(&dir, None)).unwrap();
        assert!(state.save_api_key("   ").await.is_err());
        assert!(!state.has_api_key().await);
    }

    #[tokio::test]
    async fn test_auth_error_resets_key() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(settings(&dir, Some("fallback"))).unwrap();

        let used = state.orchestrator().await.unwrap();
        let message = state.report(&used, CatalogError::Unauthorized).await;
        assert_eq!(message, CatalogError::Unauthorized.to_string());
        assert!(!state.has_api_key().await);
        assert_eq!(state.credentials.resolve(Some("fallback")).unwrap(), None);
    }

    #[tokio::test]
    async fn test_late_auth_error_keeps_replacement_key() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(settings(&dir, Some("fallback"))).unwrap();

        let old = state.orchestrator().await.unwrap();
        state.save_api_key("replacement").await.unwrap();

        state.report(&old, CatalogError::Unauthorized).await;

        assert!(state.has_api_key().await);
        assert!(!Arc::ptr_eq(&state.orchestrator().await.unwrap(), &old));
        assert_eq!(
            state.credentials.resolve(Some("fallback")).unwrap(),
            Some("replacement".to_string())
        );
    }

    #[tokio::test]
    async fn test_service_error_keeps_key() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(settings(&dir, Some("fallback"))).unwrap();

        let used = state.orchestrator().await.unwrap();
        let message = state
            .report(&used, CatalogError::Service("offline".to_string()))
            .await;
        assert_eq!(message, "offline");
        assert!(state.has_api_key().await);
    }

    proptest! {
        #[test]
        fn prop_saved_key_survives_restart(key in "[A-Za-z0-9]{1,32}", pad in " {0,3}") {
            let dir = tempfile::tempdir().unwrap();
            let padded = format!("{pad}{key}{pad}");
            let store = settings(&dir, None).credential_store();
            store.save(&padded).unwrap();
            prop_assert_eq!(store.resolve(None).unwrap(), Some(key));
        }
    }
}
