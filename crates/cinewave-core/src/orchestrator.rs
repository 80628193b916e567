//! Search and filter orchestration
//!
//! Drives one user-visible session at a time: a free-text search goes through
//! query correction, the catalog search and an optional fallback search; a
//! filter submission resolves the actor name and runs a discovery request.
//!
//! Every new session bumps an epoch counter. Completions compare the epoch
//! they started with against the current one and are dropped when a newer
//! session has begun, so late results never overwrite what is on screen.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::corrector::QueryCorrector;
use crate::error::{CatalogError, Result};
use crate::gateway::CatalogGateway;
use crate::types::{
    retain_displayable, CatalogItem, FilterCriteria, ListCategory, MediaType, Page, TimeWindow,
};

/// Text shown as the query of a filter session
pub const FILTER_SESSION_LABEL: &str = "Filtros aplicados";

/// What started a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Query,
    Filter,
}

/// Where a session is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Correcting,
    Searching,
    Results,
    Empty,
    Error(String),
}

/// One user-initiated search or filter submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSession {
    /// Epoch the session was started in
    pub id: u64,
    pub kind: Option<SessionKind>,
    /// Query as typed by the user
    pub original_query: String,
    /// Correction surfaced to the user, if any
    pub corrected_query: Option<String>,
    pub results: Vec<CatalogItem>,
    pub status: SessionStatus,
}

impl SearchSession {
    fn idle(id: u64) -> Self {
        Self {
            id,
            kind: None,
            original_query: String::new(),
            corrected_query: None,
            results: Vec::new(),
            status: SessionStatus::Idle,
        }
    }

    /// Whether a request is still in flight
    pub fn is_busy(&self) -> bool {
        matches!(self.status, SessionStatus::Correcting | SessionStatus::Searching)
    }
}

/// Result of a session completion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "session", rename_all = "snake_case")]
pub enum SessionUpdate {
    /// The session was current and its results are now on display
    Committed(SearchSession),
    /// A newer session started first; nothing was written
    Superseded,
}

/// Top-level view of the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Home,
    Movies,
    Tv,
}

/// Titled row of items
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub items: Vec<CatalogItem>,
}

impl Section {
    fn new(title: &str, page: Page<CatalogItem>) -> Self {
        Self {
            title: title.to_string(),
            items: page.items,
        }
    }
}

/// Hero banner plus rows for a tab
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feed {
    pub hero: Option<CatalogItem>,
    pub sections: Vec<Section>,
}

/// First item that can fill the hero banner: a backdrop and a synopsis.
pub fn pick_hero(items: &[CatalogItem]) -> Option<CatalogItem> {
    items
        .iter()
        .find(|item| {
            item.backdrop_path().is_some()
                && item.overview().is_some_and(|o| !o.trim().is_empty())
        })
        .cloned()
}

/// Coordinates gateway calls for the search view and the tab feeds
pub struct SearchOrchestrator {
    gateway: CatalogGateway,
    corrector: QueryCorrector,
    epoch: AtomicU64,
    session: Mutex<SearchSession>,
}

impl SearchOrchestrator {
    pub fn new(gateway: CatalogGateway, corrector: QueryCorrector) -> Self {
        Self {
            gateway,
            corrector,
            epoch: AtomicU64::new(0),
            session: Mutex::new(SearchSession::idle(0)),
        }
    }

    /// Gateway for calls outside the session (details, person profiles, genres)
    pub fn gateway(&self) -> &CatalogGateway {
        &self.gateway
    }

    /// Copy of the session currently on display
    pub async fn snapshot(&self) -> SearchSession {
        self.session.lock().await.clone()
    }

    /// Drop the current session and any in-flight work.
    pub async fn clear(&self) -> SearchSession {
        let mut session = self.session.lock().await;
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        *session = SearchSession::idle(epoch);
        session.clone()
    }

    /// Start a session, superseding whatever was running.
    async fn begin(&self, kind: SessionKind, original: &str, status: SessionStatus) -> u64 {
        let mut session = self.session.lock().await;
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        *session = SearchSession {
            id: epoch,
            kind: Some(kind),
            original_query: original.to_string(),
            corrected_query: None,
            results: Vec::new(),
            status,
        };
        debug!(epoch, kind = ?kind, "session started");
        epoch
    }

    /// Apply `f` to the session if `epoch` is still current.
    ///
    /// Returns the updated snapshot, or `None` when the session was superseded.
    async fn update<F>(&self, epoch: u64, f: F) -> Option<SearchSession>
    where
        F: FnOnce(&mut SearchSession),
    {
        let mut session = self.session.lock().await;
        if self.epoch.load(Ordering::SeqCst) != epoch {
            debug!(epoch, "dropping superseded session update");
            return None;
        }
        f(&mut session);
        Some(session.clone())
    }

    /// Search with AI correction and a fallback to the original query.
    ///
    /// A blank query clears the session. When the corrected query finds
    /// nothing, the original query is searched instead and the correction is
    /// withdrawn. Only items with an image are kept.
    ///
    /// # Errors
    /// Gateway errors end the session in the error state and are returned,
    /// unless a newer session has started meanwhile.
    pub async fn search(&self, query: &str) -> Result<SessionUpdate> {
        let original = query.trim();
        if original.is_empty() {
            return Ok(SessionUpdate::Committed(self.clear().await));
        }

        let epoch = self.begin(SessionKind::Query, original, SessionStatus::Correcting).await;

        let suggestion = self.corrector.suggest(original).await;
        let effective = suggestion.clone().unwrap_or_else(|| original.to_string());

        let started = self
            .update(epoch, |s| {
                s.corrected_query = suggestion;
                s.status = SessionStatus::Searching;
            })
            .await;
        if started.is_none() {
            return Ok(SessionUpdate::Superseded);
        }

        match self.run_search(original, &effective).await {
            Ok((items, fell_back)) => {
                info!(query = %original, results = items.len(), fell_back, "search finished");
                let committed = self
                    .update(epoch, |s| {
                        if fell_back {
                            s.corrected_query = None;
                        }
                        s.status = if items.is_empty() {
                            SessionStatus::Empty
                        } else {
                            SessionStatus::Results
                        };
                        s.results = items;
                    })
                    .await;
                Ok(committed.map_or(SessionUpdate::Superseded, SessionUpdate::Committed))
            }
            Err(e) => self.fail(epoch, e).await,
        }
    }

    /// Search `effective`, retrying with `original` when it finds nothing.
    async fn run_search(
        &self,
        original: &str,
        effective: &str,
    ) -> Result<(Vec<CatalogItem>, bool)> {
        let page = self.gateway.search(effective, 1).await?;
        if page.items.is_empty() && effective != original {
            debug!(corrected = %effective, "corrected query found nothing, retrying");
            let fallback = self.gateway.search(original, 1).await?;
            return Ok((retain_displayable(fallback.items), true));
        }
        Ok((retain_displayable(page.items), false))
    }

    /// Discovery with structured filters; no query correction.
    ///
    /// The actor name is resolved to the first matching person. If nothing
    /// matches, or the lookup fails, the cast constraint is dropped.
    ///
    /// # Errors
    /// Discovery errors end the session in the error state and are returned,
    /// unless a newer session has started meanwhile.
    pub async fn apply_filters(&self, criteria: FilterCriteria) -> Result<SessionUpdate> {
        let epoch = self
            .begin(SessionKind::Filter, FILTER_SESSION_LABEL, SessionStatus::Searching)
            .await;

        let with_cast = match criteria.actor() {
            Some(name) => self.resolve_actor(name).await,
            None => None,
        };
        let media_type = criteria.media_type;
        let query = criteria.into_query(with_cast);

        match self.gateway.discover(media_type, &query).await {
            Ok(page) => {
                info!(media_type = %media_type, results = page.items.len(), "filters applied");
                let committed = self
                    .update(epoch, |s| {
                        s.status = if page.items.is_empty() {
                            SessionStatus::Empty
                        } else {
                            SessionStatus::Results
                        };
                        s.results = page.items;
                    })
                    .await;
                Ok(committed.map_or(SessionUpdate::Superseded, SessionUpdate::Committed))
            }
            Err(e) => self.fail(epoch, e).await,
        }
    }

    /// Person ID for an actor name, if the catalog knows one.
    async fn resolve_actor(&self, name: &str) -> Option<u64> {
        match self.gateway.search_person(name).await {
            Ok(page) => {
                let id = page.items.first().map(|p| p.id);
                if id.is_none() {
                    debug!(actor = %name, "no person matched, dropping cast filter");
                }
                id
            }
            Err(e) => {
                warn!(actor = %name, error = %e, "person lookup failed, dropping cast filter");
                None
            }
        }
    }

    async fn fail(&self, epoch: u64, error: CatalogError) -> Result<SessionUpdate> {
        let message = error.to_string();
        match self.update(epoch, |s| s.status = SessionStatus::Error(message)).await {
            Some(_) => Err(error),
            None => Ok(SessionUpdate::Superseded),
        }
    }

    /// Load the hero and rows for a tab.
    ///
    /// All listings are fetched concurrently; if any fails the whole feed
    /// fails with that error.
    pub async fn load_tab(&self, tab: Tab) -> Result<Feed> {
        match tab {
            Tab::Home => self.load_home().await,
            Tab::Movies => self.load_movies().await,
            Tab::Tv => self.load_tv().await,
        }
    }

    /// Home feed: trending plus the popular and top rated movies and shows.
    pub async fn load_home(&self) -> Result<Feed> {
        let g = &self.gateway;
        let movie = Some(MediaType::Movie);
        let tv = Some(MediaType::Tv);

        let (trending, popular_movies, top_movies, upcoming, popular_tv, top_tv) = tokio::try_join!(
            g.fetch_list(ListCategory::Trending(TimeWindow::Day), None),
            g.fetch_list(ListCategory::Popular, movie),
            g.fetch_list(ListCategory::TopRated, movie),
            g.fetch_list(ListCategory::Upcoming, movie),
            g.fetch_list(ListCategory::Popular, tv),
            g.fetch_list(ListCategory::TopRated, tv),
        )?;

        Ok(Feed {
            hero: pick_hero(&trending.items),
            sections: vec![
                Section::new("Tendencias hoy", trending),
                Section::new("Películas Populares", popular_movies),
                Section::new("Lo más valorado", top_movies),
                Section::new("Series de TV Populares", popular_tv),
                Section::new("Próximos lanzamientos", upcoming),
                Section::new("Joyas de la televisión", top_tv),
            ],
        })
    }

    async fn load_movies(&self) -> Result<Feed> {
        let g = &self.gateway;
        let movie = Some(MediaType::Movie);

        let (popular, top, upcoming, now_playing) = tokio::try_join!(
            g.fetch_list(ListCategory::Popular, movie),
            g.fetch_list(ListCategory::TopRated, movie),
            g.fetch_list(ListCategory::Upcoming, movie),
            g.fetch_list(ListCategory::NowPlaying, movie),
        )?;

        Ok(Feed {
            hero: popular.items.first().cloned(),
            sections: vec![
                Section::new("En cartelera", now_playing),
                Section::new("Populares", popular),
                Section::new("Mejor valoradas", top),
                Section::new("Próximamente", upcoming),
            ],
        })
    }

    async fn load_tv(&self) -> Result<Feed> {
        let g = &self.gateway;
        let tv = Some(MediaType::Tv);

        let (popular, top, on_the_air, airing_today) = tokio::try_join!(
            g.fetch_list(ListCategory::Popular, tv),
            g.fetch_list(ListCategory::TopRated, tv),
            g.fetch_list(ListCategory::OnTheAir, tv),
            g.fetch_list(ListCategory::AiringToday, tv),
        )?;

        Ok(Feed {
            hero: popular.items.first().cloned(),
            sections: vec![
                Section::new("Series populares", popular),
                Section::new("Aclamadas por la crítica", top),
                Section::new("Nuevos episodios", on_the_air),
                Section::new("Hoy en televisión", airing_today),
            ],
        })
    }
}
