use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Reply of the accounts token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub expires_in: Option<u64>,
    /// Only present on code exchange, or when Spotify rotates it on refresh.
    pub refresh_token: Option<String>,
}

#[derive(Tabled)]
pub struct TokenTableRow {
    pub access_token: String,
    pub refresh_token: String,
    pub activated: String,
    pub expired: String,
}

#[derive(Tabled)]
pub struct InfoTableRow {
    pub setting: String,
    pub value: String,
}
