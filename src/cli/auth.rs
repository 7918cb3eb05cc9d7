use tabled::Table;

use crate::{Res, cli::build_client, config, info, success, utils};

/// Prints the URL the user has to open to authorize the application.
pub fn authorize_url(show_dialog: bool, state: Option<String>) -> Res<()> {
    let client = build_client(false)?;
    let url = client.build_authorization_url(show_dialog, state.as_deref())?;

    info!("Open the following URL and copy the `code` parameter of the redirect:");
    println!("{url}");
    Ok(())
}

/// Trades an authorization code for a token and prints it.
pub async fn exchange(code: String) -> Res<()> {
    let client = build_client(true)?;
    let token = client.get_auth_token_with_code(&code).await?;

    success!("Authorization code exchanged.");
    println!("{}", Table::new(vec![utils::token_table_row(&token)]));
    print_env_hint(&token);
    Ok(())
}

/// Refreshes the token configured in the environment and prints the result.
pub async fn refresh() -> Res<()> {
    let client = build_client(true)?.with_token(config::held_token());
    let token = client.refresh_token(None).await?;

    success!("Access token refreshed.");
    println!("{}", Table::new(vec![utils::token_table_row(&token)]));
    print_env_hint(&token);
    Ok(())
}

fn print_env_hint(token: &crate::token::AuthToken) {
    info!("Add these to {} to use the token:", config::env_path().display());
    if let Some(access) = &token.access_token {
        println!("SPOTIFY_ACCESS_TOKEN={access}");
    }
    if let Some(refresh) = &token.refresh_token {
        println!("SPOTIFY_REFRESH_TOKEN={refresh}");
    }
    if let Some(activated) = token.activation_time {
        println!("SPOTIFY_TOKEN_ACTIVATION_TIME={activated}");
    }
}
