use std::sync::{Mutex, MutexGuard, PoisonError};

use reqwest::{Method, header::CONTENT_TYPE};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::{
    client::SpotifyApiClient,
    error::{Result, SpotifyError},
    params::{QueryParams, RequestBody},
    pool::ConnectionPool,
    status::ResponseStatus,
    token::AuthToken,
};

/// Sends authenticated requests to the Web API over a pool of sessions.
///
/// One dispatcher belongs to exactly one [`SpotifyApiClient`]. A request that
/// comes back 401 is retried once after the client's token renewal ran; every
/// other failure goes straight back to the caller.
#[derive(Debug, Default)]
pub struct RequestDispatcher {
    pool: Mutex<ConnectionPool>,
}

impl RequestDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the session pool. Existing sessions are closed first.
    pub fn create_new_client(&self, timeout_secs: u64, request_limit: usize) -> Result<()> {
        self.pool().create(timeout_secs, request_limit)
    }

    /// Closes all sessions. Idempotent.
    pub fn close_client(&self) {
        self.pool().close();
    }

    pub fn session_count(&self) -> usize {
        self.pool().len()
    }

    /// Index of the session the last request went out on, `None` without a pool.
    ///
    /// A request retried after a 401 takes two turns of the ring.
    pub fn last_session(&self) -> Option<usize> {
        self.pool().head()
    }

    // the guard is never held across an await
    fn pool(&self) -> MutexGuard<'_, ConnectionPool> {
        self.pool.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issues `method url` and returns the decoded JSON body.
    ///
    /// `auth_token` overrides the token held by `owner`. Lists in
    /// `query_params` are expanded into repeated keys. `Ok(None)` means the
    /// call succeeded without a JSON body (e.g. `204 No Content`).
    ///
    /// # Errors
    ///
    /// * [`SpotifyError::Configuration`] - no pool, no usable token, or an
    ///   unsupported method
    /// * [`SpotifyError::TokenExpired`] - 401 without renewal, or 401 again
    ///   after the renewed retry
    /// * [`SpotifyError::RateLimitExceeded`] - 429, never retried here
    /// * [`SpotifyError::Api`] - any other non-success status
    /// * [`SpotifyError::Transport`] - no response (timeout, connection)
    pub async fn make_request(
        &self,
        owner: &SpotifyApiClient,
        method: &str,
        url: &str,
        query_params: &QueryParams,
        auth_token: Option<&AuthToken>,
        body: Option<&RequestBody>,
    ) -> Result<Option<Value>> {
        if self.pool().is_empty() {
            return Err(SpotifyError::Configuration(
                "You have to create a new client with create_new_client before you can make \
                 requests to the Spotify API"
                    .to_string(),
            ));
        }

        let method = parse_method(method)?;
        let pairs = query_params.to_pairs();
        let mut bearer = resolve_bearer(owner, auth_token)?;
        let mut is_retry = false;

        loop {
            match self
                .send_once(method.clone(), url, &pairs, &bearer, body)
                .await
            {
                Err(SpotifyError::TokenExpired(payload)) if !is_retry => {
                    let Some(renewal) = owner.token_renewal() else {
                        return Err(SpotifyError::TokenExpired(payload));
                    };

                    warn!(%url, "access token rejected, renewing and retrying once");
                    let renewed = renewal.renew(owner).await?;
                    owner.accept_renewed_token(&renewed);

                    bearer = access_token_of(&renewed)?;
                    is_retry = true;
                }
                result => return result,
            }
        }
    }

    async fn send_once(
        &self,
        method: Method,
        url: &str,
        pairs: &[(String, String)],
        bearer: &str,
        body: Option<&RequestBody>,
    ) -> Result<Option<Value>> {
        let session = self.pool().acquire_next().ok_or_else(|| {
            SpotifyError::Configuration("The connection pool was closed".to_string())
        })?;

        // released once the response body is consumed
        let _slot = session.acquire_slot().await?;

        debug!(%method, %url, session = session.index, "dispatching request");

        let mut request = session
            .client
            .request(method, url)
            .query(pairs)
            .bearer_auth(bearer);

        request = match body {
            Some(RequestBody::Json(value)) => request.json(value),
            Some(RequestBody::Image(bytes)) => request
                .header(CONTENT_TYPE, "image/jpeg")
                .body(bytes.clone()),
            None => request,
        };

        let response = request.send().await?;
        let status = ResponseStatus::new(response.status().as_u16());

        // 429 replies are not always JSON, so read text first
        let text = response.text().await?;
        let parsed = if text.trim().is_empty() {
            None
        } else {
            serde_json::from_str::<Value>(&text).ok()
        };

        debug!(
            status = status.code,
            success = status.success,
            reason = %status.message,
            "response classified"
        );

        if status.success {
            return Ok(parsed);
        }

        let payload = parsed.unwrap_or_else(|| {
            if text.is_empty() {
                json!({})
            } else {
                Value::String(text)
            }
        });

        Err(match status.code {
            401 => SpotifyError::TokenExpired(payload),
            429 => {
                warn!(%url, "rate limit exceeded");
                SpotifyError::RateLimitExceeded(payload)
            }
            code => SpotifyError::Api {
                status: code,
                payload,
            },
        })
    }
}

fn parse_method(method: &str) -> Result<Method> {
    match method.to_ascii_uppercase().as_str() {
        "GET" => Ok(Method::GET),
        "POST" => Ok(Method::POST),
        "PUT" => Ok(Method::PUT),
        "DELETE" => Ok(Method::DELETE),
        other => Err(SpotifyError::Configuration(format!(
            "Unsupported HTTP method: {other}"
        ))),
    }
}

fn resolve_bearer(owner: &SpotifyApiClient, supplied: Option<&AuthToken>) -> Result<String> {
    if let Some(token) = supplied {
        return access_token_of(token);
    }

    match owner.held_token() {
        Some(token) if token.is_valid() => access_token_of(&token),
        _ => Err(SpotifyError::Configuration(
            "You have to provide a valid auth token or hold the authentication and obtain a \
             token with get_auth_token_with_code or refresh_token first"
                .to_string(),
        )),
    }
}

fn access_token_of(token: &AuthToken) -> Result<String> {
    match token.access_token.as_deref() {
        Some(access) if !access.is_empty() => Ok(access.to_string()),
        _ => Err(SpotifyError::Configuration(
            "The auth token carries no access token".to_string(),
        )),
    }
}
