//! Application credentials registered with the Spotify developer dashboard.

use std::{
    env,
    path::{Path, PathBuf},
};

pub const ENV_CLIENT_ID: &str = "SPOTIFY_API_AUTH_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "SPOTIFY_API_AUTH_CLIENT_SECRET";
pub const ENV_REDIRECT_URI: &str = "SPOTIFY_API_REDIRECT_URI";
pub const ENV_SCOPE: &str = "SPOTIFY_API_AUTH_SCOPE";

/// Where docker (and compose) mounts secrets by default.
pub const DOCKER_SECRETS_DIR: &str = "/run/secrets";

/// Client id, secret, requested scopes and redirect URL of the application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub application_id: Option<String>,
    pub application_secret: Option<String>,
    pub scopes: Vec<String>,
    pub redirect_url: Option<String>,
}

impl Preferences {
    /// Preferences with every value set. Check [`is_valid`](Self::is_valid)
    /// if any of them may be empty.
    pub fn new(
        application_id: impl Into<String>,
        application_secret: impl Into<String>,
        scopes: Vec<String>,
        redirect_url: impl Into<String>,
    ) -> Self {
        Preferences {
            application_id: Some(application_id.into()),
            application_secret: Some(application_secret.into()),
            scopes,
            redirect_url: Some(redirect_url.into()),
        }
    }

    /// All four values are present and non-empty.
    pub fn is_valid(&self) -> bool {
        let filled = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());

        filled(&self.application_id)
            && filled(&self.application_secret)
            && filled(&self.redirect_url)
            && !self.scopes.is_empty()
    }

    /// Overwrites fields from the process environment. Unset variables keep
    /// the current value. The scope variable is space separated.
    pub fn load_from_env(&mut self) {
        self.apply(|name| env::var(Self::env_name(name)).ok());
    }

    /// Overwrites fields from one file per value (`application_id`,
    /// `application_secret`, `redirect_url`, `scopes`) in `secrets_dir`.
    /// Missing or unreadable files keep the current value.
    pub fn load_from_docker_secret(&mut self, secrets_dir: impl AsRef<Path>) {
        let dir = secrets_dir.as_ref();
        self.apply(|name| read_secret(&dir.join(name)));
    }

    /// [`load_from_docker_secret`](Self::load_from_docker_secret) on `/run/secrets`.
    pub fn load_from_default_docker_secret(&mut self) {
        self.load_from_docker_secret(PathBuf::from(DOCKER_SECRETS_DIR));
    }

    fn apply(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(id) = lookup("application_id") {
            self.application_id = Some(id);
        }
        if let Some(secret) = lookup("application_secret") {
            self.application_secret = Some(secret);
        }
        if let Some(redirect) = lookup("redirect_url") {
            self.redirect_url = Some(redirect);
        }
        if let Some(scopes) = lookup("scopes") {
            let scopes: Vec<String> = scopes.split_whitespace().map(str::to_string).collect();
            if !scopes.is_empty() {
                self.scopes = scopes;
            }
        }
    }

    fn env_name(field: &str) -> &'static str {
        match field {
            "application_id" => ENV_CLIENT_ID,
            "application_secret" => ENV_CLIENT_SECRET,
            "redirect_url" => ENV_REDIRECT_URI,
            _ => ENV_SCOPE,
        }
    }
}

fn read_secret(path: &Path) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .map(|content| content.trim().to_string())
}
