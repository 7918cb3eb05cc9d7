//! The owning client: credentials, the held token and the request dispatcher.

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::{Client, Url, header::AUTHORIZATION};
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    dispatcher::RequestDispatcher,
    error::{Result, SpotifyError},
    params::{QueryParams, RequestBody},
    preferences::Preferences,
    renewal::TokenRenewal,
    status::ResponseStatus,
    token::AuthToken,
    types::TokenResponse,
    urls::SpotifyUrls,
    utils,
};

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_REQUEST_LIMIT: usize = 500;

/// Entry point for talking to the Spotify Web API.
///
/// The client owns its [`RequestDispatcher`] and, when `hold_authentication`
/// is on, the token used for requests that do not bring their own. It is the
/// only writer of that token: code exchange, refresh and renewal after a 401
/// all store through the client.
pub struct SpotifyApiClient {
    preferences: Preferences,
    urls: SpotifyUrls,
    hold_authentication: bool,
    token: RwLock<AuthToken>,
    token_renewal: Option<Arc<dyn TokenRenewal>>,
    dispatcher: RequestDispatcher,
    auth_http: Client,
}

impl SpotifyApiClient {
    /// Creates a client without a token, a renewal hook or a connection pool.
    ///
    /// # Arguments
    ///
    /// * `preferences` - Application id, secret, scopes and redirect URL
    /// * `hold_authentication` - Keep the obtained token in memory and use it
    ///   for requests that do not bring their own
    ///
    /// # Errors
    ///
    /// [`SpotifyError::Configuration`] if `preferences` is incomplete.
    pub fn new(preferences: Preferences, hold_authentication: bool) -> Result<Self> {
        if !preferences.is_valid() {
            return Err(SpotifyError::Configuration(
                "The preferences of your app are not correct".to_string(),
            ));
        }

        Ok(SpotifyApiClient {
            preferences,
            urls: SpotifyUrls::default(),
            hold_authentication,
            token: RwLock::new(AuthToken::default()),
            token_renewal: None,
            dispatcher: RequestDispatcher::new(),
            auth_http: Client::new(),
        })
    }

    /// Seeds the held token, e.g. one saved from an earlier session.
    pub fn with_token(self, token: AuthToken) -> Self {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
        self
    }

    /// Installs the hook run when the Web API answers 401.
    pub fn with_token_renewal(mut self, renewal: Arc<dyn TokenRenewal>) -> Self {
        self.token_renewal = Some(renewal);
        self
    }

    /// Points the client at other endpoints (a proxy or a mock server).
    pub fn with_urls(mut self, urls: SpotifyUrls) -> Self {
        self.urls = urls;
        self
    }

    /// The application credentials this client was built with.
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// The endpoints this client talks to.
    pub fn urls(&self) -> &SpotifyUrls {
        &self.urls
    }

    /// Builds a fresh pool of `ceil(request_limit / 500)` sessions, closing
    /// the previous one.
    pub fn create_new_client(&self, request_timeout_secs: u64, request_limit: usize) -> Result<()> {
        self.dispatcher
            .create_new_client(request_timeout_secs, request_limit)
    }

    /// [`create_new_client`](Self::create_new_client) with 30 s and 500 requests.
    pub fn create_default_client(&self) -> Result<()> {
        self.create_new_client(DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_REQUEST_LIMIT)
    }

    /// Closes the session pool. Call before the program ends.
    pub fn close_client(&self) {
        self.dispatcher.close_client();
    }

    /// Number of pooled sessions, `0` before `create_new_client` or after
    /// `close_client`.
    pub fn session_count(&self) -> usize {
        self.dispatcher.session_count()
    }

    /// Index of the pooled session the last request went out on.
    pub fn last_session(&self) -> Option<usize> {
        self.dispatcher.last_session()
    }

    /// Sends a request through the dispatcher on behalf of this client.
    ///
    /// # Arguments
    ///
    /// * `method` - `GET`, `POST`, `PUT` or `DELETE`, any case
    /// * `url` - Absolute resource URL
    /// * `query_params` - Query string; lists become repeated keys
    /// * `auth_token` - Token to use instead of the held one
    /// * `body` - JSON document or JPEG bytes
    ///
    /// # Returns
    ///
    /// The decoded JSON body, or `None` for a success without one.
    ///
    /// # Errors
    ///
    /// See [`RequestDispatcher::make_request`].
    pub async fn make_request(
        &self,
        method: &str,
        url: &str,
        query_params: &QueryParams,
        auth_token: Option<&AuthToken>,
        body: Option<&RequestBody>,
    ) -> Result<Option<Value>> {
        self.dispatcher
            .make_request(self, method, url, query_params, auth_token, body)
            .await
    }

    /// Follows a paging `next` URL.
    pub async fn next(&self, url: &str, auth_token: Option<&AuthToken>) -> Result<Option<Value>> {
        self.make_request("GET", url, &QueryParams::new(), auth_token, None)
            .await
    }

    /// Follows a paging `previous` URL.
    pub async fn previous(
        &self,
        url: &str,
        auth_token: Option<&AuthToken>,
    ) -> Result<Option<Value>> {
        self.make_request("GET", url, &QueryParams::new(), auth_token, None)
            .await
    }

    /// URL the user has to visit to grant the configured scopes.
    ///
    /// # Arguments
    ///
    /// * `show_dialog` - Force the consent dialog even if already approved
    /// * `state` - Opaque value echoed back on the redirect
    ///
    /// # Errors
    ///
    /// [`SpotifyError::Configuration`] if the authorize URL does not parse.
    pub fn build_authorization_url(&self, show_dialog: bool, state: Option<&str>) -> Result<String> {
        let mut params: Vec<(&str, String)> = vec![
            ("client_id", self.preferences.application_id.clone().unwrap_or_default()),
            ("response_type", "code".to_string()),
            ("scope", self.preferences.scopes.join(" ")),
            ("show_dialog", show_dialog.to_string()),
            (
                "redirect_uri",
                self.preferences.redirect_url.clone().unwrap_or_default(),
            ),
        ];
        if let Some(state) = state {
            params.push(("state", state.to_string()));
        }

        Url::parse_with_params(&self.urls.authorize, &params)
            .map(String::from)
            .map_err(|e| SpotifyError::Configuration(format!("Invalid authorize URL: {e}")))
    }

    /// Exchanges the `code` from the authorization redirect for a token.
    ///
    /// The token is kept in memory and a copy is returned.
    ///
    /// # Errors
    ///
    /// * [`SpotifyError::Authorization`] - the token endpoint refused the code,
    ///   or answered without a refresh token
    /// * [`SpotifyError::Transport`] - no response from the token endpoint
    pub async fn get_auth_token_with_code(&self, code: &str) -> Result<AuthToken> {
        let redirect = self.preferences.redirect_url.clone().unwrap_or_default();
        let response = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect.as_str()),
            ])
            .await?;

        let refresh = response.refresh_token.ok_or_else(|| SpotifyError::Authorization {
            status: 200,
            payload: SpotifyError::message_payload(200, "The token response has no refresh_token"),
        })?;

        let token = AuthToken::new(response.access_token, refresh, utils::now_timestamp());
        self.store_token(&token);
        info!("authorization code exchanged for a token");
        Ok(token)
    }

    /// Runs the refresh-token grant.
    ///
    /// Without `auth_token` the held token is used (authentication must be
    /// held). The refresh token is kept unless Spotify sends a new one.
    ///
    /// # Errors
    ///
    /// * [`SpotifyError::Configuration`] - no token to refresh, or it has no
    ///   refresh token
    /// * [`SpotifyError::Authorization`] - the token endpoint refused the grant
    /// * [`SpotifyError::Transport`] - no response from the token endpoint
    pub async fn refresh_token(&self, auth_token: Option<AuthToken>) -> Result<AuthToken> {
        let current = match auth_token {
            Some(token) => token,
            None if self.hold_authentication => self.read_token().clone(),
            None => {
                return Err(SpotifyError::Configuration(
                    "Pass a token to refresh or enable hold_authentication".to_string(),
                ));
            }
        };

        let refresh = current
            .refresh_token
            .clone()
            .filter(|r| !r.is_empty())
            .ok_or_else(|| {
                SpotifyError::Configuration("The token has no refresh token".to_string())
            })?;

        let response = self
            .request_token(&[("grant_type", "refresh_token"), ("refresh_token", refresh.as_str())])
            .await?;

        let token = AuthToken::new(
            response.access_token,
            response.refresh_token.unwrap_or(refresh),
            utils::now_timestamp(),
        );
        self.store_token(&token);
        info!("access token refreshed");
        Ok(token)
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse> {
        let id = self.preferences.application_id.as_deref().unwrap_or_default();
        let secret = self
            .preferences
            .application_secret
            .as_deref()
            .unwrap_or_default();

        debug!(url = %self.urls.token, "requesting token");
        let response = self
            .auth_http
            .post(&self.urls.token)
            .header(AUTHORIZATION, utils::basic_auth_header(id, secret))
            .form(form)
            .send()
            .await?;

        let status = ResponseStatus::new(response.status().as_u16());
        let text = response.text().await?;

        if !status.success {
            let payload = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
            return Err(SpotifyError::Authorization {
                status: status.code,
                payload,
            });
        }

        serde_json::from_str::<TokenResponse>(&text).map_err(|e| SpotifyError::Authorization {
            status: status.code,
            payload: SpotifyError::message_payload(status.code, e.to_string()),
        })
    }

    /// The held token. Fails unless authentication is held.
    pub fn spotify_authorization_token(&self) -> Result<AuthToken> {
        self.require_hold_authentication()?;
        Ok(self.read_token().clone())
    }

    /// Replaces the held token field by field. Fails unless authentication is held.
    pub fn set_spotify_authorization_token(&self, token: &AuthToken) -> Result<()> {
        self.require_hold_authentication()?;
        self.store_token(token);
        Ok(())
    }

    /// Whether the client keeps the token in memory.
    pub fn hold_authentication(&self) -> bool {
        self.hold_authentication
    }

    /// Turning authentication off forgets the held token.
    pub fn set_hold_authentication(&mut self, hold_authentication: bool) {
        self.hold_authentication = hold_authentication;
        if !hold_authentication {
            self.write_token().clear();
        }
    }

    /// The hook run on 401, if one is installed.
    pub fn token_renewal(&self) -> Option<Arc<dyn TokenRenewal>> {
        self.token_renewal.clone()
    }

    /// Installs or removes the hook run on 401.
    pub fn set_token_renewal(&mut self, renewal: Option<Arc<dyn TokenRenewal>>) {
        self.token_renewal = renewal;
    }

    /// Token the dispatcher falls back to, if authentication is held.
    pub(crate) fn held_token(&self) -> Option<AuthToken> {
        self.hold_authentication
            .then(|| self.read_token().clone())
    }

    /// Stores a token obtained by renewal after a 401. Ignored unless
    /// authentication is held.
    pub(crate) fn accept_renewed_token(&self, token: &AuthToken) {
        if self.hold_authentication {
            self.store_token(token);
        }
    }

    fn store_token(&self, token: &AuthToken) {
        self.write_token().update_from(token);
    }

    fn require_hold_authentication(&self) -> Result<()> {
        if self.hold_authentication {
            Ok(())
        } else {
            Err(SpotifyError::Configuration(
                "You have to enable hold_authentication".to_string(),
            ))
        }
    }

    fn read_token(&self) -> std::sync::RwLockReadGuard<'_, AuthToken> {
        self.token.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_token(&self) -> std::sync::RwLockWriteGuard<'_, AuthToken> {
        self.token.write().unwrap_or_else(PoisonError::into_inner)
    }
}
