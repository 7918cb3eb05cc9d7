use tabled::Table;

use crate::{
    config,
    preferences::Preferences,
    types::InfoTableRow,
    utils::{self, mask_secret},
    warning,
};

/// Shows the effective configuration and the state of the configured token.
pub fn info() {
    let mut preferences = Preferences::default();
    preferences.load_from_env();

    if !preferences.is_valid() {
        warning!(
            "Application credentials are incomplete. Check {}",
            config::env_path().display()
        );
    }

    let token = config::held_token();
    let urls = config::spotify_urls();
    let or_dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

    let rows = vec![
        row("env file", config::env_path().display().to_string()),
        row("client id", or_dash(preferences.application_id.clone())),
        row(
            "client secret",
            or_dash(preferences.application_secret.as_deref().map(mask_secret)),
        ),
        row("redirect uri", or_dash(preferences.redirect_url.clone())),
        row("scopes", preferences.scopes.join(" ")),
        row("api url", urls.api_base),
        row("token url", urls.token),
        row("request timeout", format!("{}s", config::request_timeout())),
        row("request limit", config::request_limit().to_string()),
        row("token valid", token.is_valid().to_string()),
        row(
            "token activated",
            or_dash(token.activation_time.map(utils::format_timestamp)),
        ),
        row("token expired", token.is_expired().to_string()),
    ];

    println!("{}", Table::new(rows));
}

fn row(setting: &str, value: String) -> InfoTableRow {
    InfoTableRow {
        setting: setting.to_string(),
        value,
    }
}
