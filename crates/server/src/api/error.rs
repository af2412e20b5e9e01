//! JSON error bodies for failed login requests.

use crate::error::AuthError;
use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by the authenticator endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error code (e.g. "invalid_state", "external_service_error")
    pub error: String,
    /// Human-readable error description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl From<&AuthError> for ErrorResponse {
    fn from(err: &AuthError) -> Self {
        // Provider and configuration details stay in the logs.
        let error_description = match err {
            AuthError::ExternalService(_) => {
                "Could not complete the login with StackExchange".to_string()
            }
            AuthError::InvalidRedirectUri { .. } => {
                "The authenticator is not configured correctly".to_string()
            }
            other => other.to_string(),
        };
        Self {
            error: err.error_code().to_string(),
            error_description: Some(error_description),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, %status, "Login request failed");
        } else {
            tracing::warn!(error = %self, %status, "Login request rejected");
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}
