//! Catalog browsing command handlers

use crate::domain::AnimeId;
use crate::models::CatalogRecord;
use crate::state::SharedState;

pub(super) fn print_summary(anime: &CatalogRecord) {
    println!("• {} ({} eps)", anime.title, anime.display_episodes());
    if let Some(english) = anime.english_title() {
        println!("  EN: {english}");
    }
    println!(
        "  Score: {} | Status: {} | ID: {}",
        anime.display_score(),
        anime.display_status(),
        anime.id
    );
}

pub async fn cmd_trending(state: &SharedState) -> anyhow::Result<()> {
    let results = state.catalog.fetch_trending().await;

    if results.is_empty() {
        println!("No trending anime right now (or the catalog is unreachable).");
        return Ok(());
    }

    println!("Trending Now:");
    println!("{:-<60}", "");
    for anime in &results {
        print_summary(anime);
        println!();
    }

    Ok(())
}

pub async fn cmd_search(state: &SharedState, query: &str) -> anyhow::Result<()> {
    println!("Searching for: {query}");

    let results = state.catalog.search(query).await;

    if results.is_empty() {
        println!("No anime found matching '{query}'");
        return Ok(());
    }

    println!();
    println!("Search Results ({}):", results.len());
    println!("{:-<60}", "");
    for anime in &results {
        print_summary(anime);
        println!();
    }

    println!("To bookmark an anime: anidex watchlist add <ID>");

    Ok(())
}

pub(super) fn print_details(anime: &CatalogRecord, in_watchlist: Option<bool>) {
    println!("{}", anime.title);
    if let Some(english) = anime.english_title() {
        println!("{english}");
    }
    println!("{:-<60}", "");
    println!("ID:       {}", anime.id);
    println!("Type:     {}", anime.kind.as_deref().unwrap_or("Unknown"));
    println!("Score:    {}", anime.display_score());
    println!("Rank:     {}", anime.display_rank());
    println!("Episodes: {}", anime.display_episodes());
    println!("Status:   {}", anime.display_status());
    println!("Aired:    {}", anime.aired.as_deref().unwrap_or("Unknown"));
    println!("Duration: {}", anime.duration.as_deref().unwrap_or("Unknown"));
    println!("Rating:   {}", anime.rating.as_deref().unwrap_or("Unknown"));

    let genres = anime.genre_names();
    if !genres.is_empty() {
        println!("Genres:   {}", genres.join(", "));
    }
    if let Some(image) = anime.cover_image() {
        println!("Image:    {image}");
    }
    if let Some(listed) = in_watchlist {
        println!("Watchlist: {}", if listed { "✓ saved" } else { "not saved" });
    }

    if let Some(synopsis) = &anime.synopsis {
        println!();
        println!("{synopsis}");
    }
}

pub async fn cmd_info(state: &SharedState, id_str: &str) -> anyhow::Result<()> {
    let id: AnimeId = match id_str.parse() {
        Ok(id) => id,
        Err(e) => {
            println!("{e}");
            return Ok(());
        }
    };

    let Some(anime) = state.catalog.get_details(id).await else {
        println!("Anime with ID {id} not found (or the catalog is unreachable).");
        return Ok(());
    };

    let listed = if state.auth.state().await.is_authenticated() {
        Some(state.watchlist().contains(id).await)
    } else {
        None
    };

    print_details(&anime, listed);
    Ok(())
}

pub async fn cmd_random(state: &SharedState) -> anyhow::Result<()> {
    match state.catalog.fetch_random().await {
        Ok(anime) => {
            println!("🎲 Your random pick:");
            println!();
            print_details(&anime, None);
        }
        Err(e) => println!("Couldn't fetch a random anime: {e}"),
    }
    Ok(())
}

pub async fn cmd_recommend(state: &SharedState) -> anyhow::Result<()> {
    let recommendations = state.catalog.fetch_recommendations().await;

    if recommendations.is_empty() {
        println!("No recommendations available.");
        return Ok(());
    }

    println!("If you liked one, try the other:");
    println!("{:-<60}", "");
    for rec in &recommendations {
        let titles: Vec<String> = rec
            .entries
            .iter()
            .map(|e| format!("{} [{}]", e.title, e.id))
            .collect();
        println!("• {}", titles.join("  ↔  "));
        if let Some(content) = rec.content.as_deref().filter(|c| !c.is_empty()) {
            let excerpt: String = content.chars().take(120).collect();
            println!("  \"{excerpt}\"");
        }
    }

    Ok(())
}
