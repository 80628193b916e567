//! CineWave Catalog Core Library
//!
//! This crate provides the catalog layer behind the CineWave front end:
//! typed access to the TMDB API, AI-assisted query correction and the
//! search session orchestration.
//!
//! # Features
//! - Trending and category listings, details bundles and person profiles
//! - YouTube trailer key normalization
//! - Search with query correction and an empty-result fallback
//! - Discovery filters with actor-name resolution
//! - Stale-result protection for overlapping sessions

pub mod client;
pub mod config;
pub mod corrector;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod images;
pub mod orchestrator;
pub mod types;
pub mod video;

// Re-export main types for convenience
pub use client::{CatalogClient, ClientConfig};
pub use config::Settings;
pub use corrector::{GeminiConfig, GeminiGenerator, QueryCorrector, TextGenerator};
pub use credentials::CredentialStore;
pub use error::{CatalogError, Result};
pub use gateway::CatalogGateway;
pub use orchestrator::{Feed, SearchOrchestrator, SearchSession, SessionStatus, SessionUpdate, Tab};
pub use types::{
    CatalogItem, ContentDetails, DiscoverQuery, FilterCriteria, Genre, ListCategory, MediaType,
    Page, PersonDetails, SortOrder, TimeWindow, Video,
};
pub use video::extract_video_id;
