use hyper::StatusCode;
use stackexchange_authenticator::error::{AuthError, ExternalServiceError, TransportError};
use std::time::Duration;

#[test]
fn test_auth_error_status_codes() {
    let cases = [
        (AuthError::InvalidState, StatusCode::BAD_REQUEST, "invalid_state"),
        (AuthError::MissingCode, StatusCode::BAD_REQUEST, "invalid_request"),
        (
            AuthError::MethodNotAllowed,
            StatusCode::METHOD_NOT_ALLOWED,
            "method_not_allowed",
        ),
        (
            AuthError::InvalidRedirectUri {
                uri: "nope".into(),
                reason: "relative URL without a base".into(),
            },
            StatusCode::INTERNAL_SERVER_ERROR,
            "invalid_redirect_uri",
        ),
        (
            AuthError::from(ExternalServiceError::MissingAccessToken),
            StatusCode::BAD_GATEWAY,
            "external_service_error",
        ),
    ];

    for (err, status, code) in cases {
        assert_eq!(err.status_code(), status, "{err}");
        assert_eq!(err.error_code(), code, "{err}");
    }
}

#[test]
fn test_transport_errors_become_external_failures() {
    let err: AuthError =
        ExternalServiceError::from(TransportError::Timeout(Duration::from_secs(10))).into();
    assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    assert!(err.to_string().contains("10s"));
}

#[test]
fn test_provider_error_display() {
    let err = ExternalServiceError::ProviderError {
        code: "invalid_request".into(),
        description: None,
    };
    assert_eq!(
        err.to_string(),
        "Provider reported error invalid_request: no description"
    );

    let err = ExternalServiceError::Http {
        endpoint: "https://api.stackexchange.com/2.2/me",
        status: StatusCode::BAD_REQUEST,
    };
    assert_eq!(
        err.to_string(),
        "HTTP 400 Bad Request from https://api.stackexchange.com/2.2/me"
    );
}
