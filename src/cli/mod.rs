//! # CLI Module
//!
//! Implementations of the `spotreq` subcommands. Each one loads the
//! application preferences from the environment, builds a
//! [`SpotifyApiClient`] and reports through the coloured output macros.
//!
//! - [`request`] - dispatch an arbitrary Web API call with the configured token
//! - [`authorize_url`] - print the authorization URL for the configured scopes
//! - [`exchange`] - trade an authorization code for a token
//! - [`refresh`] - run the refresh-token grant
//! - [`info`] - show configuration and token status

mod auth;
mod info;
mod request;

pub use auth::authorize_url;
pub use auth::exchange;
pub use auth::refresh;
pub use info::info;
pub use request::group_params;
pub use request::request;

use crate::{client::SpotifyApiClient, config, error::Result, preferences::Preferences};

fn build_client(hold_authentication: bool) -> Result<SpotifyApiClient> {
    let mut preferences = Preferences::default();
    preferences.load_from_env();

    Ok(SpotifyApiClient::new(preferences, hold_authentication)?.with_urls(config::spotify_urls()))
}
