use cinewave_core::{MediaType, SessionUpdate, Settings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env();
    let store = settings.credential_store();
    let api_key = store
        .resolve(settings.default_api_key.as_deref())?
        .ok_or("No TMDB API key stored; set CINEWAVE_DEFAULT_TMDB_KEY")?;

    let query = std::env::args().nth(1).unwrap_or_else(|| "matirx".to_string());
    let orchestrator = settings.orchestrator(&api_key)?;

    println!("🔍 Searching '{}'...\n", query);

    let SessionUpdate::Committed(session) = orchestrator.search(&query).await? else {
        return Ok(());
    };

    if let Some(corrected) = &session.corrected_query {
        println!("Did you mean: {}?", corrected);
    }
    println!("Found {} results ({:?}):", session.results.len(), session.status);
    for (i, item) in session.results.iter().enumerate() {
        println!("  {}. {} [{}] - ID: {}", i + 1, item.display_name(), item.media_type(), item.id());
    }

    let Some(first) = session
        .results
        .iter()
        .find(|i| i.media_type() != MediaType::Person)
    else {
        return Ok(());
    };

    println!("\n🎬 Details for {} (ID: {})\n", first.display_name(), first.id());
    let details = orchestrator
        .gateway()
        .fetch_details(first.media_type(), first.id())
        .await?;

    let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
    println!("Genres: {}", genres.join(", "));
    if let Some(status) = &details.status {
        println!("Status: {}", status);
    }
    if let Some(trailer) = details.trailer() {
        println!("Trailer: {}", cinewave_core::video::embed_url(&trailer.key));
    }
    for member in details.top_cast() {
        println!("  • {} as {}", member.name, member.character.as_deref().unwrap_or("?"));
    }
    let providers: Vec<&str> = details
        .streaming_providers(cinewave_core::client::REGION)
        .iter()
        .map(|p| p.provider_name.as_str())
        .collect();
    if !providers.is_empty() {
        println!("Streaming on: {}", providers.join(", "));
    }

    Ok(())
}
