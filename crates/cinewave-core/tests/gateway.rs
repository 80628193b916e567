use cinewave_core::{
    CatalogClient, CatalogError, CatalogGateway, CatalogItem, ClientConfig, DiscoverQuery,
    ListCategory, MediaType, SortOrder, TimeWindow,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "test-key";

async fn setup() -> (MockServer, CatalogGateway) {
    let server = MockServer::start().await;
    let config = ClientConfig {
        base_url: server.uri(),
        timeout_secs: 5,
    };
    let client = CatalogClient::with_config(KEY, config).unwrap();
    (server, CatalogGateway::with_client(client))
}

fn page(results: serde_json::Value) -> serde_json::Value {
    json!({ "page": 1, "results": results, "total_pages": 1, "total_results": 1 })
}

#[tokio::test]
async fn test_fetch_list_sends_fixed_params_and_tags_movies() {
    let (server, gateway) = setup().await;
    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .and(query_param("api_key", KEY))
        .and(query_param("language", "es-ES"))
        .and(query_param("region", "ES"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            { "id": 1, "title": "Dune", "poster_path": "/dune.jpg" },
            { "id": 2, "title": "Heat", "poster_path": null }
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let page = gateway
        .fetch_list(ListCategory::Popular, Some(MediaType::Movie))
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert!(page.items.iter().all(|i| i.media_type() == MediaType::Movie));
    assert_eq!(page.items[0].display_name(), "Dune");
}

#[tokio::test]
async fn test_fetch_list_trending_all_keeps_item_tags() {
    let (server, gateway) = setup().await;
    Mock::given(method("GET"))
        .and(path("/trending/all/day"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            { "media_type": "movie", "id": 1, "title": "Dune" },
            { "media_type": "tv", "id": 2, "name": "Dark" },
            { "media_type": "person", "id": 3, "name": "Zendaya" }
        ]))))
        .mount(&server)
        .await;

    let page = gateway
        .fetch_list(ListCategory::Trending(TimeWindow::Day), None)
        .await
        .unwrap();

    let types: Vec<MediaType> = page.items.iter().map(CatalogItem::media_type).collect();
    assert_eq!(types, vec![MediaType::Movie, MediaType::Tv, MediaType::Person]);
}

#[tokio::test]
async fn test_fetch_list_keeps_items_with_null_text() {
    let (server, gateway) = setup().await;
    Mock::given(method("GET"))
        .and(path("/trending/all/day"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            { "media_type": "movie", "id": 1, "title": "Dune", "overview": "Spice." },
            { "media_type": "movie", "id": 2, "title": "Untitled", "overview": null, "release_date": null },
            { "media_type": "tv", "id": 3, "name": "Pilot", "overview": null, "first_air_date": null }
        ]))))
        .mount(&server)
        .await;

    let page = gateway
        .fetch_list(ListCategory::Trending(TimeWindow::Day), None)
        .await
        .unwrap();

    let ids: Vec<u64> = page.items.iter().map(CatalogItem::id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(page.items[0].overview(), Some("Spice."));
    assert!(page.items[1].overview().is_none());
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_error() {
    let (server, gateway) = setup().await;
    Mock::given(method("GET"))
        .and(path("/tv/popular"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status_code": 7,
            "status_message": "Invalid API key: You must be granted a valid key."
        })))
        .mount(&server)
        .await;

    let err = gateway
        .fetch_list(ListCategory::Popular, Some(MediaType::Tv))
        .await
        .unwrap_err();
    assert!(err.is_auth());
}

#[tokio::test]
async fn test_service_error_carries_status_message() {
    let (server, gateway) = setup().await;
    Mock::given(method("GET"))
        .and(path("/movie/top_rated"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "status_code": 11,
            "status_message": "Internal error: Something went wrong."
        })))
        .mount(&server)
        .await;

    match gateway
        .fetch_list(ListCategory::TopRated, Some(MediaType::Movie))
        .await
    {
        Err(CatalogError::Service(msg)) => assert_eq!(msg, "Internal error: Something went wrong."),
        other => panic!("Expected Service error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_service_error_without_body_uses_generic_message() {
    let (_server, gateway) = setup().await;

    // Nothing mounted: wiremock answers 404 with an empty body.
    match gateway.fetch_person(42).await {
        Err(CatalogError::Service(msg)) => {
            assert_eq!(msg, cinewave_core::error::GENERIC_SERVICE_MESSAGE)
        }
        other => panic!("Expected Service error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_details_normalizes_youtube_keys() {
    let (server, gateway) = setup().await;
    Mock::given(method("GET"))
        .and(path("/movie/603"))
        .and(query_param(
            "append_to_response",
            "videos,credits,recommendations,watch/providers",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 603,
            "genres": [{ "id": 28, "name": "Acción" }],
            "runtime": 136,
            "status": "Released",
            "tagline": "Welcome to the Real World.",
            "videos": { "results": [
                { "id": "a", "key": "https://youtu.be/vKQi3bBA1y8?si=track", "site": "YouTube", "type": "Trailer", "official": true },
                { "id": "b", "key": "https://www.youtube.com/watch?v=m8e-FF8MsqU&t=3s", "site": "youtube", "type": "Teaser", "official": false },
                { "id": "c", "key": "123456", "site": "Vimeo", "type": "Clip", "official": false }
            ] },
            "credits": { "cast": [{ "id": 6384, "name": "Keanu Reeves", "character": "Neo" }] },
            "recommendations": { "page": 1, "results": [
                { "media_type": "movie", "id": 604, "title": "The Matrix Reloaded" }
            ] },
            "watch/providers": { "results": { "ES": {
                "link": "https://www.themoviedb.org/movie/603/watch",
                "flatrate": [{ "provider_id": 119, "provider_name": "Amazon Prime Video" }]
            } } }
        })))
        .mount(&server)
        .await;

    let details = gateway.fetch_details(MediaType::Movie, 603).await.unwrap();

    let keys: Vec<&str> = details.videos.results.iter().map(|v| v.key.as_str()).collect();
    assert_eq!(keys, vec!["vKQi3bBA1y8", "m8e-FF8MsqU", "123456"]);
    assert_eq!(details.runtime, Some(136));
    assert_eq!(details.top_cast()[0].character.as_deref(), Some("Neo"));
    assert_eq!(details.top_recommendations()[0].id(), 604);
    assert_eq!(details.streaming_providers("ES").len(), 1);
    assert_eq!(details.trailer().map(|v| v.key.as_str()), Some("vKQi3bBA1y8"));
}

#[tokio::test]
async fn test_fetch_person_with_credits() {
    let (server, gateway) = setup().await;
    Mock::given(method("GET"))
        .and(path("/person/6384"))
        .and(query_param("append_to_response", "combined_credits,images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 6384,
            "name": "Keanu Reeves",
            "profile_path": "/keanu.jpg",
            "known_for_department": "Acting",
            "biography": "Canadian actor.",
            "place_of_birth": "Beirut, Lebanon",
            "combined_credits": { "cast": [
                { "media_type": "movie", "id": 603, "title": "The Matrix", "poster_path": "/m.jpg", "popularity": 80.0 },
                { "media_type": "movie", "id": 245891, "title": "John Wick", "poster_path": "/jw.jpg", "popularity": 95.0 },
                { "media_type": "tv", "id": 1, "name": "Talk Show", "poster_path": null, "popularity": 99.0 }
            ] }
        })))
        .mount(&server)
        .await;

    let person = gateway.fetch_person(6384).await.unwrap();
    assert_eq!(person.person.name, "Keanu Reeves");

    let films: Vec<u64> = person.filmography().iter().map(|c| c.id()).collect();
    assert_eq!(films, vec![245891, 603]);
}

#[tokio::test]
async fn test_search_multi_encodes_query() {
    let (server, gateway) = setup().await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .and(query_param("query", "amélie & nino"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 2,
            "results": [{ "media_type": "movie", "id": 194, "title": "Amélie" }],
            "total_pages": 3,
            "total_results": 41
        })))
        .mount(&server)
        .await;

    let page = gateway.search("  amélie & nino ", 2).await.unwrap();
    assert_eq!(page.current_page, 2);
    assert!(page.has_next_page());
    assert_eq!(page.items[0].display_name(), "Amélie");
}

#[tokio::test]
async fn test_search_person() {
    let (server, gateway) = setup().await;
    Mock::given(method("GET"))
        .and(path("/search/person"))
        .and(query_param("query", "keanu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            { "id": 6384, "name": "Keanu Reeves", "known_for": [
                { "media_type": "movie", "id": 603, "title": "The Matrix" }
            ] }
        ]))))
        .mount(&server)
        .await;

    let page = gateway.search_person("keanu").await.unwrap();
    assert_eq!(page.items[0].id, 6384);
    assert_eq!(page.items[0].known_for.len(), 1);
}

#[tokio::test]
async fn test_discover_tv_uses_show_year_key() {
    let (server, gateway) = setup().await;
    Mock::given(method("GET"))
        .and(path("/discover/tv"))
        .and(query_param("first_air_date_year", "2019"))
        .and(query_param("with_genres", "18"))
        .and(query_param("sort_by", "popularity.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            { "id": 87108, "name": "Chernobyl", "poster_path": "/c.jpg" }
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let query = DiscoverQuery {
        genre: Some(18),
        year: Some(2019),
        with_cast: None,
        sort_by: SortOrder::PopularityDesc,
    };
    let page = gateway.discover(MediaType::Tv, &query).await.unwrap();
    assert_eq!(page.items[0].media_type(), MediaType::Tv);

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r
        .url
        .query_pairs()
        .all(|(k, _)| k != "primary_release_year")));
}

#[tokio::test]
async fn test_discover_movie_uses_release_year_key() {
    let (server, gateway) = setup().await;
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("primary_release_year", "1999"))
        .and(query_param("with_cast", "6384"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            { "id": 603, "title": "The Matrix" }
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let query = DiscoverQuery {
        year: Some(1999),
        with_cast: Some(6384),
        ..DiscoverQuery::default()
    };
    let page = gateway.discover(MediaType::Movie, &query).await.unwrap();
    assert_eq!(page.items[0].media_type(), MediaType::Movie);
}

#[tokio::test]
async fn test_all_genres_merges_lists() {
    let (server, gateway) = setup().await;
    Mock::given(method("GET"))
        .and(path("/genre/movie/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "genres": [
            { "id": 28, "name": "Acción" },
            { "id": 18, "name": "Drama" }
        ] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/genre/tv/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "genres": [
            { "id": 18, "name": "Drama" },
            { "id": 10765, "name": "Sci-Fi & Fantasy" }
        ] })))
        .mount(&server)
        .await;

    let genres = gateway.all_genres().await.unwrap();
    let ids: Vec<u32> = genres.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![28, 18, 10765]);
}
