use std::{path::PathBuf, sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Res,
    cli::build_client,
    config,
    params::{QueryParams, QueryValue, RequestBody},
    renewal::RefreshTokenRenewal,
    success, warning,
};

/// Dispatches one request with the configured token and prints the result.
///
/// The client holds the token from the environment and renews it through the
/// refresh grant if Spotify answers 401. Relative URLs are resolved against
/// the Web API base. Repeated `--param` keys become a list and are sent as
/// repeated query parameters.
pub async fn request(
    method: String,
    url: String,
    params: Vec<(String, String)>,
    body: Option<String>,
    image: Option<PathBuf>,
) -> Res<()> {
    let client = build_client(true)?
        .with_token(config::held_token())
        .with_token_renewal(Arc::new(RefreshTokenRenewal));

    client.create_new_client(config::request_timeout(), config::request_limit())?;

    let body = match (body, image) {
        (Some(json), _) => Some(RequestBody::Json(serde_json::from_str(&json)?)),
        (None, Some(path)) => Some(RequestBody::Image(async_fs::read(path).await?)),
        (None, None) => None,
    };

    let url = client.urls().api(&url);
    let query = group_params(params);

    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("{} {}", method.to_uppercase(), url));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(ProgressStyle::with_template("{spinner:.blue} {msg}")?.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));

    let result = client
        .make_request(&method, &url, &query, None, body.as_ref())
        .await;

    pb.finish_and_clear();
    client.close_client();

    match result? {
        Some(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        None => success!("Request succeeded without a response body"),
    }

    if let Ok(token) = client.spotify_authorization_token() {
        if token != config::held_token() {
            warning!(
                "The access token was renewed during this request; update SPOTIFY_ACCESS_TOKEN \
                 and SPOTIFY_TOKEN_ACTIVATION_TIME to reuse it."
            );
        }
    }

    Ok(())
}

/// Folds repeated keys into list values, keeping first-seen key order.
pub fn group_params(params: Vec<(String, String)>) -> QueryParams {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for (key, value) in params {
        match grouped.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => grouped.push((key, vec![value])),
        }
    }

    grouped
        .into_iter()
        .map(|(key, mut values)| {
            if values.len() == 1 {
                (key, QueryValue::Scalar(values.remove(0)))
            } else {
                (key, QueryValue::List(values))
            }
        })
        .collect()
}
