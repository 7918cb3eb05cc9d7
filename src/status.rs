use reqwest::StatusCode;

/// Coarse family a status code falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Ok,
    Redirect,
    ClientError,
    ServerError,
    Unknown,
}

/// Classification of a raw HTTP status code.
///
/// Only 2xx codes and `304 Not Modified` count as success. Codes without a
/// registered reason phrase, and the informational 1xx range, classify as
/// [`StatusClass::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseStatus {
    pub code: u16,
    pub success: bool,
    pub class: StatusClass,
    pub message: String,
}

impl ResponseStatus {
    /// Classifies `code`.
    ///
    /// # Arguments
    ///
    /// * `code` - Raw HTTP status, any value
    ///
    /// # Returns
    ///
    /// The class, the success flag and the reason phrase ("Unknown response
    /// code" for unregistered codes).
    pub fn new(code: u16) -> Self {
        let reason = StatusCode::from_u16(code)
            .ok()
            .and_then(|status| status.canonical_reason());

        let class = match (code, reason) {
            (_, None) => StatusClass::Unknown,
            (200..=299, _) => StatusClass::Ok,
            (300..=399, _) => StatusClass::Redirect,
            (400..=499, _) => StatusClass::ClientError,
            (500..=599, _) => StatusClass::ServerError,
            _ => StatusClass::Unknown,
        };

        // 304 carries no redirect target, the cached representation is still good
        let success = match class {
            StatusClass::Ok => true,
            StatusClass::Redirect => code == 304,
            _ => false,
        };

        let message = match class {
            StatusClass::Unknown => "Unknown response code".to_string(),
            _ => reason.unwrap_or_default().to_string(),
        };

        ResponseStatus {
            code,
            success,
            class,
            message,
        }
    }

    /// `401 Unauthorized`: the access token expired or was revoked.
    pub fn is_expired(&self) -> bool {
        self.code == 401
    }

    /// `429 Too Many Requests`.
    pub fn is_rate_limited(&self) -> bool {
        self.code == 429
    }
}
