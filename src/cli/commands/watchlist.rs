//! Watchlist command handlers

use anyhow::Context;

use crate::domain::AnimeId;
use crate::state::SharedState;

use super::catalog::print_summary;

fn parse_id(id_str: &str) -> Option<AnimeId> {
    match id_str.parse() {
        Ok(id) => Some(id),
        Err(e) => {
            println!("{e}");
            println!("Use 'anidex search <query>' to find IDs.");
            None
        }
    }
}

pub async fn cmd_watchlist_list(state: &SharedState) -> anyhow::Result<()> {
    let entries = state.watchlist().list().await;

    if entries.is_empty() {
        println!("Your watchlist is empty");
        println!();
        println!("Add anime with: anidex watchlist add <ID>");
        return Ok(());
    }

    println!("Watchlist ({} total)", entries.len());
    println!("{:-<60}", "");
    for anime in &entries {
        print_summary(anime);
    }

    Ok(())
}

pub async fn cmd_watchlist_add(state: &SharedState, id_str: &str) -> anyhow::Result<()> {
    let Some(id) = parse_id(id_str) else {
        return Ok(());
    };

    let watchlist = state.watchlist();
    if watchlist.contains(id).await {
        println!("Already in your watchlist.");
        return Ok(());
    }

    let Some(anime) = state.catalog.get_details(id).await else {
        println!("Anime with ID {id} not found (or the catalog is unreachable).");
        return Ok(());
    };

    watchlist
        .add(&anime)
        .await
        .context("Failed to update watchlist")?;
    println!("✓ Added to watchlist: {}", anime.title);
    Ok(())
}

pub async fn cmd_watchlist_remove(state: &SharedState, id_str: &str) -> anyhow::Result<()> {
    let Some(id) = parse_id(id_str) else {
        return Ok(());
    };

    let removed = state
        .watchlist()
        .remove(id)
        .await
        .context("Failed to remove from watchlist")?;

    if removed {
        println!("✓ Removed from watchlist");
    } else {
        println!("Anime with ID {id} is not in your watchlist.");
    }
    Ok(())
}

pub async fn cmd_watchlist_toggle(state: &SharedState, id_str: &str) -> anyhow::Result<()> {
    let Some(id) = parse_id(id_str) else {
        return Ok(());
    };

    let watchlist = state.watchlist();
    let existing = watchlist.list().await.into_iter().find(|r| r.id == id);

    let record = match existing {
        Some(record) => record,
        None => {
            let Some(anime) = state.catalog.get_details(id).await else {
                println!("Anime with ID {id} not found (or the catalog is unreachable).");
                return Ok(());
            };
            anime
        }
    };

    let present = watchlist
        .toggle(&record)
        .await
        .context("Failed to update watchlist")?;

    if present {
        println!("✓ Added to watchlist: {}", record.title);
    } else {
        println!("✓ Removed from watchlist: {}", record.title);
    }
    Ok(())
}

pub async fn cmd_watchlist_count(state: &SharedState) -> anyhow::Result<()> {
    println!("{}", state.watchlist().count().await);
    Ok(())
}

pub async fn cmd_watchlist_clear(state: &SharedState) -> anyhow::Result<()> {
    println!("Remove every anime from your watchlist?");
    println!("Enter 'y' to confirm, anything else to cancel:");

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim().eq_ignore_ascii_case("y") {
        state
            .watchlist()
            .clear()
            .await
            .context("Failed to clear watchlist")?;
        println!("✓ Watchlist cleared");
    } else {
        println!("Cancelled.");
    }

    Ok(())
}
