pub mod cli;
pub mod clients;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod models;
pub mod services;
pub mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{AvatarCommands, Cli, Commands, ThemeCommands, WatchlistCommands};
pub use config::Config;
use config::LogFormat;
pub use state::SharedState;

pub fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.general.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    init_tracing(&config);
    config.validate()?;

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        print_help();
        return Ok(());
    };

    if matches!(command, Commands::Init) {
        return cmd_init();
    }

    let state = SharedState::new(config)?;
    let session = state.auth.restore().await;

    let requires_session = matches!(
        command,
        Commands::Watchlist { .. } | Commands::Avatar { .. }
    );
    if requires_session && !session.is_authenticated() {
        println!("Sign in first: anidex login <email> <password>");
        return Ok(());
    }

    match command {
        Commands::Trending => cli::cmd_trending(&state).await,
        Commands::Search { query } => cli::cmd_search(&state, &query.join(" ")).await,
        Commands::Info { id } => cli::cmd_info(&state, &id).await,
        Commands::Random => cli::cmd_random(&state).await,
        Commands::Recommend => cli::cmd_recommend(&state).await,

        Commands::Watchlist { command } => match command.unwrap_or(WatchlistCommands::List) {
            WatchlistCommands::List => cli::cmd_watchlist_list(&state).await,
            WatchlistCommands::Add { id } => cli::cmd_watchlist_add(&state, &id).await,
            WatchlistCommands::Remove { id } => cli::cmd_watchlist_remove(&state, &id).await,
            WatchlistCommands::Toggle { id } => cli::cmd_watchlist_toggle(&state, &id).await,
            WatchlistCommands::Count => cli::cmd_watchlist_count(&state).await,
            WatchlistCommands::Clear => cli::cmd_watchlist_clear(&state).await,
        },

        Commands::Theme { command } => match command.unwrap_or(ThemeCommands::Show) {
            ThemeCommands::Show => cli::cmd_theme_show(&state).await,
            ThemeCommands::Dark => cli::cmd_theme_set(&state, true).await,
            ThemeCommands::Light => cli::cmd_theme_set(&state, false).await,
            ThemeCommands::Toggle => cli::cmd_theme_toggle(&state).await,
        },

        Commands::Avatar { command } => match command.unwrap_or(AvatarCommands::Show) {
            AvatarCommands::Show => cli::cmd_avatar_show(&state).await,
            AvatarCommands::Set { reference } => cli::cmd_avatar_set(&state, &reference).await,
        },

        Commands::Login { email, password } => cli::cmd_login(&state, &email, &password).await,
        Commands::Signup { email, password } => cli::cmd_signup(&state, &email, &password).await,
        Commands::Logout => cli::cmd_logout(&state).await,
        Commands::Whoami => cli::cmd_whoami(&state).await,
        Commands::Init => cmd_init(),
    }
}

fn cmd_init() -> anyhow::Result<()> {
    let path = Config::default_path();
    if Config::create_default_if_missing(&path)? {
        println!("Created {} with default settings.", path.display());
    } else {
        println!("{} already exists.", path.display());
    }
    Ok(())
}

fn print_help() {
    println!("anidex - browse, search and bookmark anime");
    println!();
    println!("Usage: anidex <command>");
    println!();
    println!("Catalog:");
    println!("  trending              Top currently airing anime");
    println!("  search <query>        Search the catalog");
    println!("  info <id>             Show details");
    println!("  random                Surprise me");
    println!("  recommend             Community recommendations");
    println!();
    println!("Account:");
    println!("  login <email> <pw>    Sign in");
    println!("  signup <email> <pw>   Create an account");
    println!("  logout                Sign out");
    println!("  whoami                Show the signed-in user");
    println!();
    println!("Signed in:");
    println!("  watchlist [list|add|remove|toggle|count|clear]");
    println!("  avatar [show|set <ref>]");
    println!();
    println!("Settings:");
    println!("  theme [show|dark|light|toggle]");
    println!("  init                  Create a default config file");
    println!();
    println!("Run 'anidex help <command>' for details.");
}
