//! Data types for the CineWave catalog
//!
//! This module contains all the core data structures used throughout the library.
//! Field names follow the TMDB v3 JSON so responses deserialize directly, and
//! all types implement Serialize for JSON compatibility with Tauri.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum cast members shown for a title
pub const MAX_CAST: usize = 15;

/// Maximum recommendations shown for a title
pub const MAX_RECOMMENDATIONS: usize = 12;

/// Maximum credits shown on a person profile
pub const MAX_FILMOGRAPHY: usize = 18;

/// Kind of catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Feature film
    Movie,
    /// TV show
    Tv,
    /// Cast or crew member
    Person,
}

impl MediaType {
    /// Path segment used by the catalog API
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
            MediaType::Person => "person",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Genre as listed by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Movie entry in a listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    /// Average rating (0.0 - 10.0)
    pub vote_average: f64,
    pub genre_ids: Vec<u32>,
    pub popularity: f64,
    pub adult: bool,
}

/// TV show entry in a listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TvShow {
    pub id: u64,
    pub name: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub first_air_date: Option<String>,
    /// Average rating (0.0 - 10.0)
    pub vote_average: f64,
    pub genre_ids: Vec<u32>,
    pub popularity: f64,
}

/// Person entry in a listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    pub id: u64,
    pub name: String,
    pub profile_path: Option<String>,
    pub known_for_department: Option<String>,
    pub popularity: f64,
    pub known_for: Vec<CatalogItem>,
}

/// Any entry the catalog can list, tagged by `media_type` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "media_type")]
pub enum CatalogItem {
    #[serde(rename = "movie")]
    Movie(Movie),
    #[serde(rename = "tv")]
    Show(TvShow),
    #[serde(rename = "person")]
    Person(Person),
}

impl CatalogItem {
    pub fn id(&self) -> u64 {
        match self {
            CatalogItem::Movie(m) => m.id,
            CatalogItem::Show(s) => s.id,
            CatalogItem::Person(p) => p.id,
        }
    }

    pub fn media_type(&self) -> MediaType {
        match self {
            CatalogItem::Movie(_) => MediaType::Movie,
            CatalogItem::Show(_) => MediaType::Tv,
            CatalogItem::Person(_) => MediaType::Person,
        }
    }

    /// Title for movies, name for shows and people
    pub fn display_name(&self) -> &str {
        match self {
            CatalogItem::Movie(m) => &m.title,
            CatalogItem::Show(s) => &s.name,
            CatalogItem::Person(p) => &p.name,
        }
    }

    /// Synopsis; people have none and titles may lack one
    pub fn overview(&self) -> Option<&str> {
        match self {
            CatalogItem::Movie(m) => m.overview.as_deref(),
            CatalogItem::Show(s) => s.overview.as_deref(),
            CatalogItem::Person(_) => None,
        }
    }

    pub fn poster_path(&self) -> Option<&str> {
        match self {
            CatalogItem::Movie(m) => m.poster_path.as_deref(),
            CatalogItem::Show(s) => s.poster_path.as_deref(),
            CatalogItem::Person(_) => None,
        }
    }

    pub fn backdrop_path(&self) -> Option<&str> {
        match self {
            CatalogItem::Movie(m) => m.backdrop_path.as_deref(),
            CatalogItem::Show(s) => s.backdrop_path.as_deref(),
            CatalogItem::Person(_) => None,
        }
    }

    pub fn profile_path(&self) -> Option<&str> {
        match self {
            CatalogItem::Person(p) => p.profile_path.as_deref(),
            CatalogItem::Movie(_) | CatalogItem::Show(_) => None,
        }
    }

    pub fn popularity(&self) -> f64 {
        match self {
            CatalogItem::Movie(m) => m.popularity,
            CatalogItem::Show(s) => s.popularity,
            CatalogItem::Person(p) => p.popularity,
        }
    }

    /// Average rating (0.0 - 10.0); people are unrated
    pub fn vote_average(&self) -> f64 {
        match self {
            CatalogItem::Movie(m) => m.vote_average,
            CatalogItem::Show(s) => s.vote_average,
            CatalogItem::Person(_) => 0.0,
        }
    }

    /// Whether the item has a poster, profile or backdrop image to show
    pub fn has_displayable_image(&self) -> bool {
        self.poster_path().is_some()
            || self.profile_path().is_some()
            || self.backdrop_path().is_some()
    }
}

impl From<Movie> for CatalogItem {
    fn from(movie: Movie) -> Self {
        CatalogItem::Movie(movie)
    }
}

impl From<TvShow> for CatalogItem {
    fn from(show: TvShow) -> Self {
        CatalogItem::Show(show)
    }
}

impl From<Person> for CatalogItem {
    fn from(person: Person) -> Self {
        CatalogItem::Person(person)
    }
}

/// Keep only items that have an image to show, preserving order.
pub fn retain_displayable(items: Vec<CatalogItem>) -> Vec<CatalogItem> {
    items
        .into_iter()
        .filter(CatalogItem::has_displayable_image)
        .collect()
}

/// Paginated response wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Current page number (1-based)
    #[serde(rename = "page", default = "first_page")]
    pub current_page: u32,
    /// Items on the current page
    #[serde(rename = "results", default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

fn first_page() -> u32 {
    1
}

impl<T> Page<T> {
    /// Create a new page
    pub fn new(items: Vec<T>, current_page: u32, total_pages: u32, total_results: u32) -> Self {
        Self {
            current_page,
            items,
            total_pages,
            total_results,
        }
    }

    /// Create an empty result for the first page
    pub fn empty() -> Self {
        Self::new(Vec::new(), 1, 0, 0)
    }

    /// Whether there are more pages available
    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Convert every item, keeping the paging fields
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            current_page: self.current_page,
            items: self.items.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            total_results: self.total_results,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Category of a video attached to a title
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoKind {
    Trailer,
    Teaser,
    Clip,
    #[default]
    #[serde(other)]
    Other,
}

/// Trailer, teaser or clip attached to a title
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Video {
    pub id: String,
    /// Site-specific key; YouTube keys are normalized to the 11-character ID
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: VideoKind,
    pub official: bool,
}

impl Video {
    /// Whether the video is hosted on YouTube
    pub fn is_youtube(&self) -> bool {
        self.site.eq_ignore_ascii_case("youtube")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoList {
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credits {
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchProvider {
    pub provider_id: u64,
    pub provider_name: String,
    pub logo_path: Option<String>,
}

/// Providers offering a title in one region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionProviders {
    pub link: String,
    /// Subscription streaming
    pub flatrate: Vec<WatchProvider>,
    pub rent: Vec<WatchProvider>,
    pub buy: Vec<WatchProvider>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchProviders {
    /// Keyed by ISO 3166-1 region code
    pub results: BTreeMap<String, RegionProviders>,
}

/// Details of a movie or show with its appended sub-resources
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentDetails {
    pub id: u64,
    pub genres: Vec<Genre>,
    /// Movie runtime in minutes
    pub runtime: Option<u32>,
    pub episode_run_time: Vec<u32>,
    pub number_of_seasons: Option<u32>,
    pub number_of_episodes: Option<u32>,
    pub status: Option<String>,
    pub tagline: Option<String>,
    pub videos: VideoList,
    pub credits: Credits,
    pub recommendations: Page<CatalogItem>,
    #[serde(rename = "watch/providers")]
    pub watch_providers: WatchProviders,
}

impl ContentDetails {
    pub fn top_cast(&self) -> &[CastMember] {
        let cast = &self.credits.cast;
        &cast[..cast.len().min(MAX_CAST)]
    }

    pub fn top_recommendations(&self) -> &[CatalogItem] {
        let items = &self.recommendations.items;
        &items[..items.len().min(MAX_RECOMMENDATIONS)]
    }

    /// Subscription providers for a region, empty when the region is unknown
    pub fn streaming_providers(&self, region: &str) -> &[WatchProvider] {
        self.watch_providers
            .results
            .get(region)
            .map(|r| r.flatrate.as_slice())
            .unwrap_or(&[])
    }

    /// Best YouTube video to play: trailer, then teaser, then clip, then anything.
    pub fn trailer(&self) -> Option<&Video> {
        let youtube = || self.videos.results.iter().filter(|v| v.is_youtube());

        [VideoKind::Trailer, VideoKind::Teaser, VideoKind::Clip]
            .into_iter()
            .find_map(|kind| youtube().find(|v| v.kind == kind))
            .or_else(|| youtube().next())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinedCredits {
    pub cast: Vec<CatalogItem>,
}

/// Person profile with filmography
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonDetails {
    #[serde(flatten)]
    pub person: Person,
    pub biography: Option<String>,
    pub birthday: Option<String>,
    pub deathday: Option<String>,
    pub place_of_birth: Option<String>,
    pub combined_credits: CombinedCredits,
}

impl PersonDetails {
    /// Credits with a poster, most popular first.
    pub fn filmography(&self) -> Vec<&CatalogItem> {
        let mut credits: Vec<&CatalogItem> = self
            .combined_credits
            .cast
            .iter()
            .filter(|c| c.poster_path().is_some())
            .collect();
        credits.sort_by(|a, b| b.popularity().total_cmp(&a.popularity()));
        credits.truncate(MAX_FILMOGRAPHY);
        credits
    }
}

/// Window for trending listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Day,
    Week,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

/// Named listing offered by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListCategory {
    Trending(TimeWindow),
    Popular,
    TopRated,
    /// Movies only
    Upcoming,
    /// Movies only
    NowPlaying,
    /// Shows only
    OnTheAir,
    /// Shows only
    AiringToday,
}

impl ListCategory {
    /// Path segment for the non-trending categories
    pub fn as_str(&self) -> &'static str {
        match self {
            ListCategory::Trending(_) => "trending",
            ListCategory::Popular => "popular",
            ListCategory::TopRated => "top_rated",
            ListCategory::Upcoming => "upcoming",
            ListCategory::NowPlaying => "now_playing",
            ListCategory::OnTheAir => "on_the_air",
            ListCategory::AiringToday => "airing_today",
        }
    }

    /// Whether the category can be listed for the given media type
    pub fn supports(&self, media_type: MediaType) -> bool {
        match self {
            ListCategory::Trending(_) => true,
            ListCategory::Popular | ListCategory::TopRated => {
                matches!(media_type, MediaType::Movie | MediaType::Tv)
            }
            ListCategory::Upcoming | ListCategory::NowPlaying => media_type == MediaType::Movie,
            ListCategory::OnTheAir | ListCategory::AiringToday => media_type == MediaType::Tv,
        }
    }
}

/// Sort directive for discovery
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    PopularityDesc,
    VoteAverageDesc,
    ReleaseDateDesc,
}

impl SortOrder {
    /// Value of the `sort_by` parameter; the release date field differs per media type
    pub fn as_param(&self, media_type: MediaType) -> &'static str {
        match (self, media_type) {
            (SortOrder::PopularityDesc, _) => "popularity.desc",
            (SortOrder::VoteAverageDesc, _) => "vote_average.desc",
            (SortOrder::ReleaseDateDesc, MediaType::Tv) => "first_air_date.desc",
            (SortOrder::ReleaseDateDesc, _) => "primary_release_date.desc",
        }
    }
}

/// Structured filter input as submitted by the filter panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub media_type: MediaType,
    #[serde(default)]
    pub genre: Option<u32>,
    /// Four-digit release (or first air) year
    #[serde(default)]
    pub year: Option<u16>,
    /// Free-text actor name, resolved to a person ID before discovery
    #[serde(default)]
    pub actor_name: Option<String>,
    #[serde(default)]
    pub sort_by: SortOrder,
}

impl FilterCriteria {
    /// Criteria with only a media type and the default sort
    pub fn new(media_type: MediaType) -> Self {
        Self {
            media_type,
            genre: None,
            year: None,
            actor_name: None,
            sort_by: SortOrder::default(),
        }
    }

    /// Actor name with surrounding whitespace removed, if any is left
    pub fn actor(&self) -> Option<&str> {
        self.actor_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Discovery query once the actor has been resolved (or not)
    pub fn into_query(self, with_cast: Option<u64>) -> DiscoverQuery {
        DiscoverQuery {
            genre: self.genre,
            year: self.year,
            with_cast,
            sort_by: self.sort_by,
        }
    }
}

/// Resolved discovery parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoverQuery {
    pub genre: Option<u32>,
    pub year: Option<u16>,
    pub with_cast: Option<u64>,
    pub sort_by: SortOrder,
}
