//! Configuration management for the `spotreq` binary.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file in the local data directory. Application credentials are read by
//! [`Preferences::load_from_env`](crate::preferences::Preferences::load_from_env);
//! this module covers endpoints, pool tuning and the held token.

use std::{env, path::PathBuf, str::FromStr};

use crate::{
    client::{DEFAULT_REQUEST_LIMIT, DEFAULT_REQUEST_TIMEOUT_SECS},
    token::AuthToken,
    urls::{API_BASE_URL, AUTHORIZE_URL, SpotifyUrls, TOKEN_URL},
};

/// Loads environment variables from `spotreq/.env` in the local data directory.
///
/// The directory is created if it does not exist. A missing `.env` file is not
/// an error; variables already present in the environment take precedence.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotreq/.env`
/// - macOS: `~/Library/Application Support/spotreq/.env`
/// - Windows: `%LOCALAPPDATA%/spotreq/.env`
pub async fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

pub fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotreq/.env");
    path
}

/// Returns the Spotify Web API base URL (`SPOTIFY_API_URL`).
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| API_BASE_URL.to_string())
}

/// Returns the Spotify OAuth authorization URL (`SPOTIFY_API_AUTH_URL`).
pub fn spotify_apiauth_url() -> String {
    env::var("SPOTIFY_API_AUTH_URL").unwrap_or_else(|_| AUTHORIZE_URL.to_string())
}

/// Returns the Spotify OAuth token exchange URL (`SPOTIFY_API_TOKEN_URL`).
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|_| TOKEN_URL.to_string())
}

pub fn spotify_urls() -> SpotifyUrls {
    SpotifyUrls {
        authorize: spotify_apiauth_url(),
        token: spotify_apitoken_url(),
        api_base: spotify_apiurl(),
    }
}

/// Total per-request timeout in seconds (`SPOTREQ_REQUEST_TIMEOUT`).
pub fn request_timeout() -> u64 {
    parsed_or("SPOTREQ_REQUEST_TIMEOUT", DEFAULT_REQUEST_TIMEOUT_SECS)
}

/// Overall concurrent request budget (`SPOTREQ_REQUEST_LIMIT`).
pub fn request_limit() -> usize {
    parsed_or("SPOTREQ_REQUEST_LIMIT", DEFAULT_REQUEST_LIMIT)
}

/// The token configured in the environment, possibly empty.
///
/// `SPOTIFY_ACCESS_TOKEN`, `SPOTIFY_REFRESH_TOKEN` and
/// `SPOTIFY_TOKEN_ACTIVATION_TIME` (Unix seconds). Without an activation time
/// the token is treated as activated long ago, so it reads as expired.
pub fn held_token() -> AuthToken {
    let access_token = env::var("SPOTIFY_ACCESS_TOKEN").ok();
    let refresh_token = env::var("SPOTIFY_REFRESH_TOKEN").ok();
    let activation_time = env::var("SPOTIFY_TOKEN_ACTIVATION_TIME")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .or_else(|| access_token.as_ref().map(|_| 1));

    AuthToken {
        access_token,
        refresh_token,
        activation_time,
    }
}

fn parsed_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
