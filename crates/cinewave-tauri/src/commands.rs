//! Tauri commands for CineWave
//!
//! This module contains all Tauri commands that can be invoked from the frontend.
//! Errors are returned as display strings; an authentication failure also
//! resets the stored API key.

use tauri::State;

use crate::AppState;
use cinewave_core::{
    ContentDetails, Feed, FilterCriteria, Genre, MediaType, PersonDetails, SearchSession,
    SessionUpdate, Tab,
};

/// Whether a catalog API key is available.
///
/// The front end shows the key prompt when this is `false`.
#[tauri::command]
pub async fn api_key_status(state: State<'_, AppState>) -> Result<bool, String> {
    Ok(state.has_api_key().await)
}

/// Store a key entered by the user.
#[tauri::command]
pub async fn save_api_key(state: State<'_, AppState>, api_key: String) -> Result<(), String> {
    state.save_api_key(&api_key).await
}

/// Forget the stored key.
#[tauri::command]
pub async fn reset_api_key(state: State<'_, AppState>) -> Result<(), String> {
    state.reset_api_key().await
}

/// Hero and rows for a tab.
///
/// # Arguments
/// * `tab` - `home`, `movies` or `tv`
///
/// # Returns
/// * `Ok(Feed)` when every listing loaded
/// * `Err(String)` with the first error otherwise
#[tauri::command]
pub async fn load_tab(state: State<'_, AppState>, tab: Tab) -> Result<Feed, String> {
    let orchestrator = state.orchestrator().await?;
    match orchestrator.load_tab(tab).await {
        Ok(feed) => Ok(feed),
        Err(e) => Err(state.report(&orchestrator, e).await),
    }
}

/// Search with AI correction.
///
/// # Arguments
/// * `query` - Text typed by the user; blank clears the search view
///
/// # Returns
/// * `Ok(SessionUpdate::Committed)` with the session to display
/// * `Ok(SessionUpdate::Superseded)` if a newer search started meanwhile
/// * `Err(String)` with error message if search fails
#[tauri::command]
pub async fn search(state: State<'_, AppState>, query: String) -> Result<SessionUpdate, String> {
    let orchestrator = state.orchestrator().await?;
    match orchestrator.search(&query).await {
        Ok(update) => Ok(update),
        Err(e) => Err(state.report(&orchestrator, e).await),
    }
}

/// Discovery with the filter panel's criteria.
#[tauri::command]
pub async fn apply_filters(
    state: State<'_, AppState>,
    criteria: FilterCriteria,
) -> Result<SessionUpdate, String> {
    let orchestrator = state.orchestrator().await?;
    match orchestrator.apply_filters(criteria).await {
        Ok(update) => Ok(update),
        Err(e) => Err(state.report(&orchestrator, e).await),
    }
}

/// Leave the search view, discarding any in-flight session.
#[tauri::command]
pub async fn clear_search(state: State<'_, AppState>) -> Result<SearchSession, String> {
    let orchestrator = state.orchestrator().await?;
    Ok(orchestrator.clear().await)
}

/// Session currently on display, for restoring the search view.
#[tauri::command]
pub async fn session_snapshot(state: State<'_, AppState>) -> Result<SearchSession, String> {
    let orchestrator = state.orchestrator().await?;
    Ok(orchestrator.snapshot().await)
}

/// Details bundle for the overlay.
///
/// # Arguments
/// * `media_type` - `movie` or `tv`
/// * `id` - Catalog ID
#[tauri::command]
pub async fn get_details(
    state: State<'_, AppState>,
    media_type: MediaType,
    id: u64,
) -> Result<ContentDetails, String> {
    let orchestrator = state.orchestrator().await?;
    match orchestrator.gateway().fetch_details(media_type, id).await {
        Ok(details) => Ok(details),
        Err(e) => Err(state.report(&orchestrator, e).await),
    }
}

/// Person profile with filmography.
#[tauri::command]
pub async fn get_person(state: State<'_, AppState>, id: u64) -> Result<PersonDetails, String> {
    let orchestrator = state.orchestrator().await?;
    match orchestrator.gateway().fetch_person(id).await {
        Ok(person) => Ok(person),
        Err(e) => Err(state.report(&orchestrator, e).await),
    }
}

/// Movie and TV genres for the filter panel.
#[tauri::command]
pub async fn get_genres(state: State<'_, AppState>) -> Result<Vec<Genre>, String> {
    let orchestrator = state.orchestrator().await?;
    match orchestrator.gateway().all_genres().await {
        Ok(genres) => Ok(genres),
        Err(e) => Err(state.report(&orchestrator, e).await),
    }
}
