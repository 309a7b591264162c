//! spotauth - a Spotify account client with a self-refreshing OAuth session.
//!
//! The library owns the OAuth token lifecycle (code exchange, cached
//! credential, single-flight refresh) and an authenticated request dispatcher
//! that the Web API endpoint functions and the CLI are built on.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the local sign-in callback server
//! - `cli` - Command-line interface implementations
//! - `clock` - Time source used for token expiry
//! - `config` - Configuration management and environment variables
//! - `error` - Typed errors of the session core
//! - `management` - Credential store and its persistence
//! - `server` - Local HTTP server for OAuth callbacks
//! - `session` - Wiring of store, coordinator and dispatcher
//! - `spotify` - Token exchange, refresh coordination, dispatcher, endpoints
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use spotauth::{config, session::Session, spotify};
//!
//! #[tokio::main]
//! async fn main() -> spotauth::Res<()> {
//!     config::load_env().await?;
//!     let session = Session::open(config::Settings::from_env()?).await?;
//!     let me = spotify::profile::current_user(&session.dispatcher).await?;
//!     println!("{}", me.id);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod session;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the CLI glue where errors are only reported, never matched on.
/// Library components return the typed errors from [`error`].
///
/// # Example
///
/// ```
/// use spotauth::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints a status line prefixed with a blue `o`.
///
/// ```
/// info!("Waiting for authorization in your browser...");
/// info!("Found {} playlists", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a confirmation line prefixed with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line to stderr and exits with status 1.
///
/// Only for the CLI layer; library code returns typed errors instead.
///
/// ```
/// error!("Not signed in: {}", reason);
/// // unreachable from here
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a yellow `!` line for problems the command can continue past.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
