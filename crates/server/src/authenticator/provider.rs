//! StackExchange endpoints and response shapes.
//!
//! The token endpoint is the `/json` variant, which answers the form POST with
//! a JSON object instead of a query string. The API authenticates the profile
//! request through query parameters rather than an `Authorization` header.

use crate::authenticator::Site;
use crate::error::{ExternalServiceError, TransportError};
use crate::host::{HttpResponse, HttpTransport};
use hyper::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::{debug, error};
use url::Url;

pub const AUTHORIZATION_ENDPOINT: &str = "https://stackexchange.com/oauth";
pub const TOKEN_ENDPOINT: &str = "https://stackexchange.com/oauth/access_token/json";
pub const PROFILE_ENDPOINT: &str = "https://api.stackexchange.com/2.2/me";

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    /// Lifetime in seconds; absent when `no_expiry` was granted.
    pub expires: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    pub items: Option<Vec<UserProfile>>,
}

/// One entry of the `/me` response.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    #[serde(deserialize_with = "id_string")]
    pub account_id: String,
    #[serde(default, deserialize_with = "optional_id_string")]
    pub user_id: Option<String>,
    pub display_name: Option<String>,
    pub link: Option<String>,
    pub location: Option<String>,
    pub profile_image: Option<String>,
    pub website_url: Option<String>,
}

/// Error wrapper the API returns with non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    pub error_id: Option<i64>,
    pub error_name: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(serde_json::Number),
    Text(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

// The API sends ids as numbers; accept strings too and normalize to text.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

fn optional_id_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<RawId>::deserialize(deserializer).map(|id| id.map(String::from))
}

/// Body for diagnostic logs. Token endpoint bodies may carry the access token,
/// so only their size is reported.
fn loggable_body(endpoint: &'static str, response: &HttpResponse) -> String {
    if endpoint == TOKEN_ENDPOINT {
        format!("<{} bytes withheld>", response.body.len())
    } else {
        response.body_text()
    }
}

/// Fail unless the provider answered 200 OK. The body is logged for diagnosis.
fn ensure_ok(endpoint: &'static str, response: &HttpResponse) -> Result<(), ExternalServiceError> {
    if response.status == StatusCode::OK {
        return Ok(());
    }

    let api_error: ApiErrorBody = serde_json::from_slice(&response.body).unwrap_or_default();
    error!(
        endpoint,
        status = %response.status,
        error_id = ?api_error.error_id,
        error_name = ?api_error.error_name,
        error_message = ?api_error.error_message,
        body = %loggable_body(endpoint, response),
        "Got error response from StackExchange"
    );
    Err(ExternalServiceError::Http {
        endpoint,
        status: response.status,
    })
}

fn decode_json<T: DeserializeOwned>(
    endpoint: &'static str,
    response: &HttpResponse,
) -> Result<T, ExternalServiceError> {
    serde_json::from_slice(&response.body).map_err(|e| {
        error!(
            endpoint,
            error = %e,
            body = %loggable_body(endpoint, response),
            "Could not parse StackExchange response"
        );
        ExternalServiceError::InvalidJson {
            endpoint,
            message: e.to_string(),
        }
    })
}

/// Form fields of the authorization-code exchange.
pub struct CodeExchange<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub code: &'a str,
    pub redirect_uri: &'a str,
}

/// Exchange an authorization code for an access token.
#[tracing::instrument(name = "exchange_code", skip_all)]
pub async fn exchange_code<T: HttpTransport>(
    transport: &T,
    exchange: &CodeExchange<'_>,
) -> Result<String, ExternalServiceError> {
    let form = [
        ("client_id", exchange.client_id),
        ("client_secret", exchange.client_secret),
        ("code", exchange.code),
        ("grant_type", "authorization_code"),
        ("redirect_uri", exchange.redirect_uri),
    ];
    let response = transport.post_form(TOKEN_ENDPOINT, &form).await?;
    ensure_ok(TOKEN_ENDPOINT, &response)?;

    let token: TokenResponse = decode_json(TOKEN_ENDPOINT, &response)?;
    match token.access_token {
        Some(access_token) if !access_token.is_empty() => {
            debug!(expires = ?token.expires, "Received access token");
            Ok(access_token)
        }
        _ => {
            error!("Token response did not contain an access token");
            Err(ExternalServiceError::MissingAccessToken)
        }
    }
}

/// Fetch the profile of the token's owner on `site`.
///
/// `Ok(None)` means the user has no account on that site: the API answers with
/// an empty (or missing) `items` list.
#[tracing::instrument(name = "fetch_profile", skip_all, fields(site = %site))]
pub async fn fetch_profile<T: HttpTransport>(
    transport: &T,
    access_token: &str,
    app_key: &str,
    site: &Site,
) -> Result<Option<UserProfile>, ExternalServiceError> {
    let url = Url::parse_with_params(
        PROFILE_ENDPOINT,
        [
            ("access_token", access_token),
            ("key", app_key),
            ("site", site.as_str()),
        ],
    )
    .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

    let response = transport.get(url.as_str()).await?;
    ensure_ok(PROFILE_ENDPOINT, &response)?;

    let profile: ProfileResponse = decode_json(PROFILE_ENDPOINT, &response)?;
    Ok(profile.items.and_then(|items| items.into_iter().next()))
}
