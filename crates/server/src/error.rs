use hyper::StatusCode;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Timeout after {0:?} while calling provider")]
    Timeout(Duration),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

#[derive(Debug, Error)]
pub enum ExternalServiceError {
    #[error("Provider reported error {code}: {}", description.as_deref().unwrap_or("no description"))]
    ProviderError {
        code: String,
        description: Option<String>,
    },
    #[error("HTTP {status} from {endpoint}")]
    Http {
        endpoint: &'static str,
        status: StatusCode,
    },
    #[error("Invalid JSON from {endpoint}: {message}")]
    InvalidJson {
        endpoint: &'static str,
        message: String,
    },
    #[error("Token response did not contain an access token")]
    MissingAccessToken,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("State parameter is missing or does not match the session")]
    InvalidState,
    #[error("Callback did not contain an authorization code")]
    MissingCode,
    #[error(transparent)]
    ExternalService(#[from] ExternalServiceError),
    #[error("Could not create redirect URI from {uri}: {reason}")]
    InvalidRedirectUri { uri: String, reason: String },
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidState | AuthError::MissingCode => StatusCode::BAD_REQUEST,
            AuthError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            AuthError::InvalidRedirectUri { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Machine-readable code used in the JSON error body.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidState => "invalid_state",
            AuthError::MissingCode => "invalid_request",
            AuthError::ExternalService(_) => "external_service_error",
            AuthError::InvalidRedirectUri { .. } => "invalid_redirect_uri",
            AuthError::MethodNotAllowed => "method_not_allowed",
        }
    }
}
