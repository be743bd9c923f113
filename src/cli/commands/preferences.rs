//! Theme and profile image command handlers

use anyhow::Context;

use crate::models::Theme;
use crate::state::SharedState;

fn print_theme(theme: &Theme) {
    let name = if theme.is_dark_mode { "🌙 Dark" } else { "☀️ Light" };
    println!("Theme: {name}");
    println!("  background {}  card {}  text {}", theme.background, theme.card, theme.text);
    println!("  primary {}  accent {}", theme.primary, theme.accent);
}

pub async fn cmd_theme_show(state: &SharedState) -> anyhow::Result<()> {
    print_theme(&state.preferences().theme().await);
    Ok(())
}

pub async fn cmd_theme_set(state: &SharedState, dark: bool) -> anyhow::Result<()> {
    state
        .preferences()
        .set_dark_mode(dark)
        .await
        .context("Failed to save theme preference")?;
    print_theme(&Theme::for_mode(dark));
    Ok(())
}

pub async fn cmd_theme_toggle(state: &SharedState) -> anyhow::Result<()> {
    let dark = state
        .preferences()
        .toggle_dark_mode()
        .await
        .context("Failed to save theme preference")?;
    print_theme(&Theme::for_mode(dark));
    Ok(())
}

pub async fn cmd_avatar_show(state: &SharedState) -> anyhow::Result<()> {
    match state.preferences().profile_image().await {
        Some(reference) => println!("{reference}"),
        None => println!("No profile image set."),
    }
    Ok(())
}

pub async fn cmd_avatar_set(state: &SharedState, reference: &str) -> anyhow::Result<()> {
    let reference = reference.trim();
    if reference.is_empty() {
        println!("Profile image reference cannot be empty.");
        return Ok(());
    }

    state
        .preferences()
        .set_profile_image(reference)
        .await
        .context("Failed to upload image")?;
    println!("✓ Profile image updated");
    Ok(())
}
