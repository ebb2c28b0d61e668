//! myFlix terminal client.
//!
//! # Usage
//!
//! ```bash
//! # Create an account, then log in (password may come from MYFLIX_PASSWORD)
//! myflix register -u moviebuff42 -e buff@example.com -p hunter2 -b 1990-04-12
//! myflix login -u moviebuff42 -p hunter2
//!
//! # Browse
//! myflix movies
//! myflix movie "The Dark Knight"
//! myflix genre Thriller
//! myflix director "Michael Mann"
//!
//! # Favorites
//! myflix favorites list
//! myflix favorites toggle 5f0e5b3c9d1e8a2b4c6d7e8f
//!
//! # Account
//! myflix profile
//! myflix edit --email new@example.com
//! myflix delete-account --yes
//! myflix logout
//! ```
//!
//! # Environment Variables
//!
//! - `MYFLIX_API_URL` - Base URL of the myFlix REST API
//! - `MYFLIX_API_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `MYFLIX_HOME` - Directory for `session.json` (default: `$HOME/.config/myflix`)
//! - `RUST_LOG` - Log filter for stderr (default: warn)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use myflix_web::api::MyflixClient;
use myflix_web::config::ApiConfig;
use myflix_web::session::SessionContext;

mod commands;
mod storage;

use commands::account::ProfileChanges;
use commands::catalog::FavoriteChange;
use commands::{CliError, Context};
use storage::FileStorage;

#[derive(Parser)]
#[command(name = "myflix")]
#[command(author, version, about = "myFlix terminal client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "MYFLIX_PASSWORD", hide_env_values = true)]
        password: String,

        /// Birthday as YYYY-MM-DD
        #[arg(short, long)]
        birthday: Option<String>,
    },
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "MYFLIX_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the session
    Logout,
    /// Show who is logged in
    Status,
    /// List all movies (favorites are starred)
    Movies,
    /// Show a movie's synopsis
    Movie { title: String },
    /// Show a genre
    Genre { name: String },
    /// Show a director
    Director { name: String },
    /// Show the profile and favorite movies
    Profile,
    /// Update the profile
    Edit {
        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// Birthday as YYYY-MM-DD; an empty value clears it
        #[arg(short, long)]
        birthday: Option<String>,

        /// New password
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Delete the account
    DeleteAccount {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Manage favorite movies
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorite movies
    List,
    /// Add a movie by ID
    Add { movie_id: String },
    /// Remove a movie by ID
    Remove { movie_id: String },
    /// Add the movie if absent, otherwise remove it
    Toggle { movie_id: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Failed) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = ApiConfig::from_env()?;
    let storage = FileStorage::from_env()?;

    // Ctrl-C cancels the in-flight request.
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let api = MyflixClient::new(&config)?.with_cancellation(cancel.clone());
    let session = SessionContext::load(storage).await?;
    let mut ctx = Context::new(api, session, std::io::stdout());

    let result = dispatch(&mut ctx, cli.command).await;
    if cancel.is_cancelled() {
        tracing::warn!("Cancelled");
    }
    result
}

async fn dispatch<W: std::io::Write + Send>(
    ctx: &mut Context<W>,
    command: Commands,
) -> Result<(), CliError> {
    use commands::{account, catalog};

    match command {
        Commands::Register {
            username,
            email,
            password,
            birthday,
        } => account::register(ctx, &username, &email, password, birthday.as_deref()).await,
        Commands::Login { username, password } => account::login(ctx, username, password).await,
        Commands::Logout => account::logout(ctx).await,
        Commands::Status => account::status(ctx).await,
        Commands::Movies => catalog::movies(ctx).await,
        Commands::Movie { title } => catalog::movie(ctx, &title).await,
        Commands::Genre { name } => catalog::genre(ctx, &name).await,
        Commands::Director { name } => catalog::director(ctx, &name).await,
        Commands::Profile => account::profile(ctx).await,
        Commands::Edit {
            username,
            email,
            birthday,
            password,
        } => {
            let changes = ProfileChanges {
                username,
                email,
                birthday,
                password,
            };
            account::edit(ctx, changes).await
        }
        Commands::DeleteAccount { yes } => account::delete_account(ctx, yes).await,
        Commands::Favorites { action } => match action {
            FavoritesAction::List => catalog::favorites(ctx).await,
            FavoritesAction::Add { movie_id } => {
                catalog::change_favorite(ctx, &movie_id, FavoriteChange::Add).await
            }
            FavoritesAction::Remove { movie_id } => {
                catalog::change_favorite(ctx, &movie_id, FavoriteChange::Remove).await
            }
            FavoritesAction::Toggle { movie_id } => {
                catalog::change_favorite(ctx, &movie_id, FavoriteChange::Toggle).await
            }
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_favorites_toggle() {
        let cli = Cli::try_parse_from(["myflix", "favorites", "toggle", "m1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Favorites {
                action: FavoritesAction::Toggle { movie_id }
            } if movie_id == "m1"
        ));
    }

    #[test]
    fn test_parse_delete_account_flag() {
        let cli = Cli::try_parse_from(["myflix", "delete-account", "--yes"]).unwrap();
        assert!(matches!(cli.command, Commands::DeleteAccount { yes: true }));

        let cli = Cli::try_parse_from(["myflix", "delete-account"]).unwrap();
        assert!(matches!(cli.command, Commands::DeleteAccount { yes: false }));
    }

    #[test]
    fn test_parse_edit_partial() {
        let cli = Cli::try_parse_from(["myflix", "edit", "--email", "new@example.com"]).unwrap();
        let Commands::Edit {
            username, email, ..
        } = cli.command
        else {
            panic!("expected edit");
        };
        assert_eq!(username, None);
        assert_eq!(email.as_deref(), Some("new@example.com"));
    }

    #[test]
    fn test_movie_requires_title() {
        assert!(Cli::try_parse_from(["myflix", "movie"]).is_err());
    }
}
