use spotreq::{ResponseStatus, StatusClass};

#[test]
fn test_success_codes() {
    for code in [200, 201, 202, 204] {
        let status = ResponseStatus::new(code);
        assert!(status.success, "{code} should be a success");
        assert_eq!(status.class, StatusClass::Ok);
    }

    assert_eq!(ResponseStatus::new(200).message, "OK");
    assert_eq!(ResponseStatus::new(204).message, "No Content");
}

#[test]
fn test_redirects() {
    let moved = ResponseStatus::new(301);
    assert_eq!(moved.class, StatusClass::Redirect);
    assert!(!moved.success);
    assert_eq!(moved.message, "Moved Permanently");

    // not modified has nothing to follow
    let not_modified = ResponseStatus::new(304);
    assert_eq!(not_modified.class, StatusClass::Redirect);
    assert!(not_modified.success);
}

#[test]
fn test_client_and_server_errors_are_not_success() {
    let expired = ResponseStatus::new(401);
    assert_eq!(expired.class, StatusClass::ClientError);
    assert!(!expired.success);
    assert!(expired.is_expired());
    assert_eq!(expired.message, "Unauthorized");

    let limited = ResponseStatus::new(429);
    assert_eq!(limited.class, StatusClass::ClientError);
    assert!(!limited.success);
    assert!(limited.is_rate_limited());

    let bad_gateway = ResponseStatus::new(502);
    assert_eq!(bad_gateway.class, StatusClass::ServerError);
    assert!(!bad_gateway.success);
    assert_eq!(bad_gateway.message, "Bad Gateway");
}

#[test]
fn test_unknown_codes() {
    for code in [0, 99, 299, 599, 600, 999] {
        let status = ResponseStatus::new(code);
        assert_eq!(status.class, StatusClass::Unknown, "{code}");
        assert!(!status.success);
        assert_eq!(status.message, "Unknown response code");
    }

    // informational responses never reach the dispatcher as final answers
    assert_eq!(ResponseStatus::new(100).class, StatusClass::Unknown);
}
