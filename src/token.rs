use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Seconds after activation at which a token is treated as expired.
///
/// Spotify issues access tokens for 3600 seconds; the gap is slack so a
/// request never leaves with a token about to lapse.
pub const TOKEN_LIFETIME_SECS: i64 = 3400;

/// Access and refresh credentials together with the moment they were issued.
///
/// Equality is field-wise. A token is owned by the [`SpotifyApiClient`] that
/// obtained it; the dispatcher only reads it.
///
/// [`SpotifyApiClient`]: crate::client::SpotifyApiClient
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    /// Seconds since the Unix epoch.
    pub activation_time: Option<i64>,
}

impl AuthToken {
    /// A complete token activated at `activation_time` (Unix seconds).
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        activation_time: i64,
    ) -> Self {
        AuthToken {
            access_token: Some(access_token.into()),
            refresh_token: Some(refresh_token.into()),
            activation_time: Some(activation_time),
        }
    }

    /// True once more than [`TOKEN_LIFETIME_SECS`] have passed since activation.
    ///
    /// A token that was never activated reports `false`; check [`is_valid`]
    /// first.
    ///
    /// [`is_valid`]: AuthToken::is_valid
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    /// Same as [`is_expired`](AuthToken::is_expired) against an explicit clock.
    pub fn is_expired_at(&self, now: i64) -> bool {
        match self.activation_time {
            Some(activated) => now - activated > TOKEN_LIFETIME_SECS,
            None => false,
        }
    }

    /// True iff none of the three fields is missing or empty.
    pub fn is_valid(&self) -> bool {
        let filled = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());

        filled(&self.access_token)
            && filled(&self.refresh_token)
            && self.activation_time.is_some_and(|t| t != 0)
    }

    /// Copies every field of `other` into `self`, keeping this instance.
    pub fn update_from(&mut self, other: &AuthToken) {
        self.access_token = other.access_token.clone();
        self.refresh_token = other.refresh_token.clone();
        self.activation_time = other.activation_time;
    }

    /// Empties all fields.
    pub fn clear(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
        self.activation_time = None;
    }
}
