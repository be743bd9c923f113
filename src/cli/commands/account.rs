//! Sign-in command handlers

use crate::services::AuthError;
use crate::state::SharedState;

fn report_failure(action: &str, err: &AuthError) {
    match err {
        AuthError::Validation(e) => println!("{action} failed: {e}"),
        AuthError::Storage(e) => println!("{action} failed, please try again: {e}"),
    }
}

pub async fn cmd_login(state: &SharedState, email: &str, password: &str) -> anyhow::Result<()> {
    match state.auth.login(email, password).await {
        Ok(user) => println!("✓ Welcome back, {}!", user.display_name),
        Err(e) => report_failure("Login", &e),
    }
    Ok(())
}

pub async fn cmd_signup(state: &SharedState, email: &str, password: &str) -> anyhow::Result<()> {
    match state.auth.signup(email, password).await {
        Ok(user) => println!("✓ Account created. Hi, {}!", user.display_name),
        Err(e) => report_failure("Signup", &e),
    }
    Ok(())
}

pub async fn cmd_logout(state: &SharedState) -> anyhow::Result<()> {
    state.auth.logout().await;
    println!("Signed out.");
    Ok(())
}

pub async fn cmd_whoami(state: &SharedState) -> anyhow::Result<()> {
    match state.auth.current_user().await {
        Some(user) => {
            let count = state.watchlist().count().await;
            println!("{} <{}>", user.display_name, user.email);
            println!("Watchlist: {count} anime");
            if let Some(image) = state.preferences().profile_image().await {
                println!("Avatar:    {image}");
            }
        }
        None => println!("Not signed in."),
    }
    Ok(())
}
