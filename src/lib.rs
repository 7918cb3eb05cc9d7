//! Spotify Web API request layer
//!
//! This library sits between code that knows *which* Spotify endpoint to call
//! and the network. It manages a pool of HTTP sessions, attaches bearer
//! authentication, classifies responses into typed errors, and retries a
//! request exactly once after renewing an expired token.
//!
//! # Modules
//!
//! - `client` - [`SpotifyApiClient`], owner of credentials, token and dispatcher
//! - `dispatcher` - [`RequestDispatcher`], the `make_request` contract
//! - `pool` - round-robin pool of HTTP sessions
//! - `status` - HTTP status classification
//! - `token` - [`AuthToken`]
//! - `renewal` - [`TokenRenewal`] callback invoked on 401
//! - `params` - query parameters and request bodies
//! - `preferences` - application credentials
//! - `error` - [`SpotifyError`]
//! - `config`, `cli`, `types`, `utils` - support for the `spotreq` binary
//!
//! # Example
//!
//! ```
//! use spotreq::{AuthToken, Preferences, QueryParams, SpotifyApiClient};
//!
//! #[tokio::main]
//! async fn main() -> spotreq::Res<()> {
//!     let mut preferences = Preferences::default();
//!     preferences.load_from_env();
//!
//!     let client = SpotifyApiClient::new(preferences, true)?
//!         .with_token(AuthToken::new("access", "refresh", 1_700_000_000));
//!     client.create_default_client()?;
//!
//!     let params = QueryParams::new().with("ids", vec!["a", "b"]);
//!     let albums = client
//!         .make_request("GET", "https://api.spotify.com/v1/albums", &params, None, None)
//!         .await?;
//!     println!("{albums:?}");
//!
//!     client.close_client();
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod params;
pub mod pool;
pub mod preferences;
pub mod renewal;
pub mod status;
pub mod token;
pub mod types;
pub mod urls;
pub mod utils;

pub use client::SpotifyApiClient;
pub use dispatcher::RequestDispatcher;
pub use error::{Result, SpotifyError};
pub use params::{QueryParams, QueryValue, RequestBody};
pub use pool::{ConnectionPool, PooledSession};
pub use preferences::Preferences;
pub use renewal::{RefreshTokenRenewal, TokenRenewal};
pub use status::{ResponseStatus, StatusClass};
pub use token::AuthToken;
pub use urls::SpotifyUrls;

/// A convenient Result type alias for the binary's glue code.
///
/// Uses a boxed dynamic error so CLI functions can mix library errors with
/// I/O and parse failures while keeping Send + Sync bounds for async contexts.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal errors in the binary; library code returns errors instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
