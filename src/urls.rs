/// Spotify's OAuth authorization page.
pub const AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";

/// Spotify's token endpoint (code exchange and refresh).
pub const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Base of every Web API resource URL.
pub const API_BASE_URL: &str = "https://api.spotify.com/v1";

/// The three endpoints a client talks to. Overridable so tests can point a
/// client at a local mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyUrls {
    pub authorize: String,
    pub token: String,
    pub api_base: String,
}

impl Default for SpotifyUrls {
    fn default() -> Self {
        SpotifyUrls {
            authorize: AUTHORIZE_URL.to_string(),
            token: TOKEN_URL.to_string(),
            api_base: API_BASE_URL.to_string(),
        }
    }
}

impl SpotifyUrls {
    /// Resolves `path` against the API base unless it is already absolute.
    pub fn api(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
