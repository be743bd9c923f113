//! CLI module - Command-line front-end for anidex
//!
//! Stands in for the app screens: each command calls into the catalog
//! client and the repositories, then prints the result.

mod commands;

use clap::{Parser, Subcommand};

/// anidex - browse, search and bookmark anime from the Jikan catalog
#[derive(Parser)]
#[command(name = "anidex")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the top currently airing anime
    #[command(alias = "t", alias = "top")]
    Trending,

    /// Search the catalog
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Show details about an anime
    #[command(alias = "i")]
    Info {
        /// MyAnimeList ID
        id: String,
    },

    /// Pick a random anime
    #[command(alias = "surprise")]
    Random,

    /// Show community recommendations
    Recommend,

    /// Manage your watchlist
    #[command(alias = "w")]
    Watchlist {
        #[command(subcommand)]
        command: Option<WatchlistCommands>,
    },

    /// Show or change the color theme
    Theme {
        #[command(subcommand)]
        command: Option<ThemeCommands>,
    },

    /// Show or change the profile image
    Avatar {
        #[command(subcommand)]
        command: Option<AvatarCommands>,
    },

    /// Sign in (demo: any valid email and password)
    Login { email: String, password: String },

    /// Create an account (demo: always succeeds for valid input)
    Signup { email: String, password: String },

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

#[derive(Subcommand)]
pub enum WatchlistCommands {
    /// List bookmarked anime
    #[command(alias = "ls")]
    List,
    /// Bookmark an anime by ID
    Add { id: String },
    /// Remove a bookmark by ID
    #[command(alias = "rm")]
    Remove { id: String },
    /// Add if missing, remove if present
    Toggle { id: String },
    /// Number of bookmarks
    Count,
    /// Remove every bookmark
    Clear,
}

#[derive(Subcommand)]
pub enum ThemeCommands {
    /// Print the current theme
    Show,
    /// Switch to dark mode
    Dark,
    /// Switch to light mode
    Light,
    /// Flip between dark and light
    Toggle,
}

#[derive(Subcommand)]
pub enum AvatarCommands {
    /// Print the stored profile image reference
    Show,
    /// Store a new profile image reference (path or URI)
    Set { reference: String },
}

pub use commands::*;
