use async_trait::async_trait;

use crate::{client::SpotifyApiClient, error::Result, token::AuthToken};

/// Produces a fresh token when the Web API rejects the current one.
///
/// The dispatcher calls this at most once per request, only after a 401,
/// and hands the result back to the owning client to store.
#[async_trait]
pub trait TokenRenewal: Send + Sync {
    async fn renew(&self, client: &SpotifyApiClient) -> Result<AuthToken>;
}

/// Renews by running the refresh-token grant against the held token.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefreshTokenRenewal;

#[async_trait]
impl TokenRenewal for RefreshTokenRenewal {
    async fn renew(&self, client: &SpotifyApiClient) -> Result<AuthToken> {
        client.refresh_token(None).await
    }
}
