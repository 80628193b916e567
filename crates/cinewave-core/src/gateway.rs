//! Metadata gateway for the TMDB catalog
//!
//! This module provides the typed API on top of [`CatalogClient`]: listings,
//! details, person profiles, search, discovery and genres. Responses are
//! shaped into the closed [`CatalogItem`] union so callers never handle
//! untyped JSON.

use std::collections::HashSet;

use tracing::debug;

use crate::client::CatalogClient;
use crate::error::{CatalogError, Result};
use crate::types::{
    CatalogItem, ContentDetails, DiscoverQuery, Genre, ListCategory, MediaType, Movie, Page,
    Person, PersonDetails, TvShow,
};
use crate::video::normalize_video_keys;

/// Sub-resources appended to a details request
const DETAILS_APPEND: &str = "videos,credits,recommendations,watch/providers";

/// Sub-resources appended to a person request
const PERSON_APPEND: &str = "combined_credits,images";

#[derive(serde::Deserialize)]
struct GenreList {
    #[serde(default)]
    genres: Vec<Genre>,
}

/// Query parameters for a discovery request.
///
/// The year goes out as `primary_release_year` for movies and as
/// `first_air_date_year` for shows; the catalog ignores the wrong one.
///
/// # Example
/// ```
/// use cinewave_core::gateway::discover_params;
/// use cinewave_core::{DiscoverQuery, MediaType};
///
/// let query = DiscoverQuery { year: Some(2008), ..DiscoverQuery::default() };
/// let params = discover_params(MediaType::Tv, &query);
/// assert!(params.contains(&("first_air_date_year", "2008".to_string())));
/// ```
pub fn discover_params(media_type: MediaType, query: &DiscoverQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("sort_by", query.sort_by.as_param(media_type).to_string())];

    if let Some(genre) = query.genre {
        params.push(("with_genres", genre.to_string()));
    }

    if let Some(year) = query.year {
        let key = match media_type {
            MediaType::Tv => "first_air_date_year",
            MediaType::Movie | MediaType::Person => "primary_release_year",
        };
        params.push((key, year.to_string()));
    }

    if let Some(cast) = query.with_cast {
        params.push(("with_cast", cast.to_string()));
    }

    params
}

/// Reject queries that are empty or whitespace-only.
fn validate_query(query: &str) -> Result<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::InvalidQuery(
            "Search query cannot be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

/// Reject the person media type where only titles make sense.
fn require_title_type(media_type: MediaType) -> Result<MediaType> {
    match media_type {
        MediaType::Movie | MediaType::Tv => Ok(media_type),
        MediaType::Person => Err(CatalogError::InvalidQuery(
            "Expected a movie or TV media type".to_string(),
        )),
    }
}

/// Typed gateway to the catalog API
///
/// Provides methods for listings, details, search and discovery.
/// All operations are asynchronous and issue exactly one request.
///
/// # Example
/// ```no_run
/// use cinewave_core::CatalogGateway;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let gateway = CatalogGateway::new("my-tmdb-key")?;
///
///     let results = gateway.search("Blade Runner", 1).await?;
///     println!("Found {} results", results.items.len());
///
///     Ok(())
/// }
/// ```
pub struct CatalogGateway {
    client: CatalogClient,
}

impl CatalogGateway {
    /// Create a new gateway with default client configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = CatalogClient::new(api_key)?;
        Ok(Self { client })
    }

    /// Create a new gateway with a custom client.
    ///
    /// This is useful for testing or when you need custom client configuration.
    pub fn with_client(client: CatalogClient) -> Self {
        Self { client }
    }

    /// Fetch one page of a named listing.
    ///
    /// Trending accepts `None` for a mixed listing; every other category needs
    /// a media type it supports. Items from single-type listings are tagged
    /// with that type since the catalog does not echo it back.
    ///
    /// # Errors
    /// * `CatalogError::InvalidQuery` if the category and media type do not fit
    pub async fn fetch_list(
        &self,
        category: ListCategory,
        media_type: Option<MediaType>,
    ) -> Result<Page<CatalogItem>> {
        let path = match (category, media_type) {
            (ListCategory::Trending(window), None) => {
                format!("/trending/all/{}", window.as_str())
            }
            (ListCategory::Trending(window), Some(media)) => {
                format!("/trending/{}/{}", media.as_str(), window.as_str())
            }
            (_, Some(media)) if category.supports(media) => {
                format!("/{}/{}", media.as_str(), category.as_str())
            }
            _ => {
                return Err(CatalogError::InvalidQuery(format!(
                    "Listing '{}' is not available for {}",
                    category.as_str(),
                    media_type.map(|m| m.as_str()).unwrap_or("all"),
                )));
            }
        };

        self.fetch_items(&path, media_type, &[]).await
    }

    /// Fetch a page of items, typed by `media_type` or by each item's own tag.
    async fn fetch_items(
        &self,
        path: &str,
        media_type: Option<MediaType>,
        params: &[(&str, String)],
    ) -> Result<Page<CatalogItem>> {
        let page = match media_type {
            None => self.client.get_json::<Page<CatalogItem>>(path, params).await?,
            Some(MediaType::Movie) => self
                .client
                .get_json::<Page<Movie>>(path, params)
                .await?
                .map(CatalogItem::Movie),
            Some(MediaType::Tv) => self
                .client
                .get_json::<Page<TvShow>>(path, params)
                .await?
                .map(CatalogItem::Show),
            Some(MediaType::Person) => self
                .client
                .get_json::<Page<Person>>(path, params)
                .await?
                .map(CatalogItem::Person),
        };
        Ok(page)
    }

    /// Get a movie or show with videos, cast, recommendations and watch providers.
    ///
    /// YouTube video keys are normalized before the bundle is returned.
    ///
    /// # Errors
    /// * `CatalogError::InvalidId` if id is 0
    /// * `CatalogError::InvalidQuery` if media type is person
    pub async fn fetch_details(&self, media_type: MediaType, id: u64) -> Result<ContentDetails> {
        let media_type = require_title_type(media_type)?;
        if id == 0 {
            return Err(CatalogError::InvalidId(id));
        }

        let path = format!("/{}/{}", media_type.as_str(), id);
        let mut details: ContentDetails = self
            .client
            .get_json(&path, &[("append_to_response", DETAILS_APPEND.to_string())])
            .await?;

        normalize_video_keys(&mut details);
        debug!(
            media_type = %media_type,
            id,
            videos = details.videos.results.len(),
            "details resolved"
        );
        Ok(details)
    }

    /// Get a person profile with combined credits.
    ///
    /// # Errors
    /// * `CatalogError::InvalidId` if id is 0
    pub async fn fetch_person(&self, id: u64) -> Result<PersonDetails> {
        if id == 0 {
            return Err(CatalogError::InvalidId(id));
        }

        let path = format!("/person/{}", id);
        self.client
            .get_json(&path, &[("append_to_response", PERSON_APPEND.to_string())])
            .await
    }

    /// Search movies, shows and people at once.
    ///
    /// # Arguments
    /// * `query` - Search query string
    /// * `page` - Page number (1-based)
    ///
    /// # Errors
    /// * `CatalogError::InvalidQuery` if query is empty or whitespace-only
    pub async fn search(&self, query: &str, page: u32) -> Result<Page<CatalogItem>> {
        let query = validate_query(query)?;
        let params = [
            ("query", query.to_string()),
            ("page", page.max(1).to_string()),
        ];
        self.fetch_items("/search/multi", None, &params).await
    }

    /// Search people by name.
    ///
    /// # Errors
    /// * `CatalogError::InvalidQuery` if query is empty or whitespace-only
    pub async fn search_person(&self, query: &str) -> Result<Page<Person>> {
        let query = validate_query(query)?;
        self.client
            .get_json("/search/person", &[("query", query.to_string())])
            .await
    }

    /// Filtered listing of movies or shows.
    ///
    /// Results are tagged with `media_type`.
    ///
    /// # Errors
    /// * `CatalogError::InvalidQuery` if media type is person
    pub async fn discover(
        &self,
        media_type: MediaType,
        query: &DiscoverQuery,
    ) -> Result<Page<CatalogItem>> {
        let media_type = require_title_type(media_type)?;
        if let Some(year) = query.year {
            if !(1000..=9999).contains(&year) {
                return Err(CatalogError::InvalidQuery(format!(
                    "Year must have four digits: {}",
                    year
                )));
            }
        }

        let path = format!("/discover/{}", media_type.as_str());
        let params = discover_params(media_type, query);
        self.fetch_items(&path, Some(media_type), &params).await
    }

    /// Genres for movies or shows.
    pub async fn genres(&self, media_type: MediaType) -> Result<Vec<Genre>> {
        let media_type = require_title_type(media_type)?;
        let path = format!("/genre/{}/list", media_type.as_str());
        let list: GenreList = self.client.get_json(&path, &[]).await?;
        Ok(list.genres)
    }

    /// Movie and show genres merged, first occurrence of each ID wins.
    pub async fn all_genres(&self) -> Result<Vec<Genre>> {
        let (movie, tv) = tokio::try_join!(
            self.genres(MediaType::Movie),
            self.genres(MediaType::Tv),
        )?;
        Ok(merge_genres(movie, tv))
    }
}

/// Concatenate two genre lists, dropping repeated IDs.
///
/// Order follows first appearance, and for a repeated ID the entry (and
/// name) from `first` is kept.
pub fn merge_genres(first: Vec<Genre>, second: Vec<Genre>) -> Vec<Genre> {
    let mut seen = HashSet::new();
    first
        .into_iter()
        .chain(second)
        .filter(|g| seen.insert(g.id))
        .collect()
}
