use spotreq::{AuthToken, token::TOKEN_LIFETIME_SECS};

const ACTIVATED: i64 = 1_700_000_000;

#[test]
fn test_is_expired_boundary() {
    let token = AuthToken::new("access", "refresh", ACTIVATED);

    // fresh and just inside the lifetime
    assert!(!token.is_expired_at(ACTIVATED));
    assert!(!token.is_expired_at(ACTIVATED + TOKEN_LIFETIME_SECS - 1));

    // exactly 3400 seconds is still valid
    assert!(!token.is_expired_at(ACTIVATED + 3400));

    // one second past is expired
    assert!(token.is_expired_at(ACTIVATED + 3401));
    assert!(token.is_expired_at(ACTIVATED + 7200));
}

#[test]
fn test_is_expired_against_wall_clock() {
    let now = chrono::Utc::now().timestamp();

    assert!(!AuthToken::new("a", "r", now).is_expired());
    assert!(AuthToken::new("a", "r", now - 3500).is_expired());
}

#[test]
fn test_is_expired_without_activation_time() {
    let token = AuthToken {
        access_token: Some("access".to_string()),
        refresh_token: Some("refresh".to_string()),
        activation_time: None,
    };
    assert!(!token.is_expired());
}

#[test]
fn test_valid_requires_all_fields() {
    let complete = AuthToken::new("access", "refresh", ACTIVATED);
    assert!(complete.is_valid());

    let mut missing_access = complete.clone();
    missing_access.access_token = None;
    assert!(!missing_access.is_valid());

    let mut missing_refresh = complete.clone();
    missing_refresh.refresh_token = None;
    assert!(!missing_refresh.is_valid());

    let mut missing_activation = complete.clone();
    missing_activation.activation_time = None;
    assert!(!missing_activation.is_valid());

    assert!(!AuthToken::default().is_valid());
}

#[test]
fn test_valid_rejects_empty_values() {
    let mut token = AuthToken::new("", "refresh", ACTIVATED);
    assert!(!token.is_valid());

    token.access_token = Some("access".to_string());
    token.refresh_token = Some(String::new());
    assert!(!token.is_valid());

    token.refresh_token = Some("refresh".to_string());
    token.activation_time = Some(0);
    assert!(!token.is_valid());
}

#[test]
fn test_equality_is_structural() {
    let a = AuthToken::new("access", "refresh", ACTIVATED);
    let b = AuthToken::new("access", "refresh", ACTIVATED);
    let c = AuthToken::new("access", "refresh", ACTIVATED + 1);

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_update_from_and_clear() {
    let mut held = AuthToken::new("old", "refresh", ACTIVATED);
    let renewed = AuthToken::new("new", "refresh-2", ACTIVATED + 3600);

    held.update_from(&renewed);
    assert_eq!(held, renewed);

    held.clear();
    assert_eq!(held, AuthToken::default());
}

#[test]
fn test_token_serializes_with_field_names() {
    let token = AuthToken::new("access", "refresh", ACTIVATED);
    let json = serde_json::to_value(&token).unwrap();

    assert_eq!(json["access_token"], "access");
    assert_eq!(json["refresh_token"], "refresh");
    assert_eq!(json["activation_time"], ACTIVATED);

    let back: AuthToken = serde_json::from_value(json).unwrap();
    assert_eq!(back, token);
}
