use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};

use crate::{token::AuthToken, types::TokenTableRow};

/// `Basic base64(client_id:client_secret)` for the token endpoint.
pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    let credentials = STANDARD.encode(format!("{client_id}:{client_secret}"));
    format!("Basic {credentials}")
}

pub fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Parses a `key=value` command line argument. The value may itself contain `=`.
pub fn parse_key_value(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{arg}'")),
    }
}

/// Keeps the first and last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

pub fn format_timestamp(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

pub fn token_table_row(token: &AuthToken) -> TokenTableRow {
    let masked = |value: &Option<String>| {
        value
            .as_deref()
            .map(mask_secret)
            .unwrap_or_else(|| "-".to_string())
    };

    TokenTableRow {
        access_token: masked(&token.access_token),
        refresh_token: masked(&token.refresh_token),
        activated: token
            .activation_time
            .map(format_timestamp)
            .unwrap_or_else(|| "-".to_string()),
        expired: match token.activation_time {
            Some(_) => token.is_expired().to_string(),
            None => "-".to_string(),
        },
    }
}
