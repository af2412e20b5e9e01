#![allow(dead_code)]

use hyper::StatusCode;
use stackexchange_authenticator::authenticator::{ScopeSet, Site};
use stackexchange_authenticator::config::{AuthenticatorConfig, HttpClientConfig};
use stackexchange_authenticator::error::TransportError;
use stackexchange_authenticator::host::{HttpResponse, HttpTransport};
use std::sync::{Arc, Mutex};
use url::Url;

pub const AUTH_URI: &str = "https://login.example.com/authn/authentication/stackexchange";
pub const AUTH_PATH: &str = "/authn/authentication/stackexchange";
pub const CALLBACK_URI: &str =
    "https://login.example.com/authn/authentication/stackexchange/callback";

pub const TOKEN_OK: &str = r#"{"access_token":"T1","expires":86400}"#;
pub const PROFILE_ADA: &str = r#"{
    "items": [{
        "account_id": 42,
        "user_id": 1001,
        "display_name": "Ada",
        "link": "https://stackoverflow.com/users/1001/ada",
        "location": "London",
        "profile_image": "https://i.sstatic.net/ada.png",
        "website_url": "https://ada.example"
    }],
    "has_more": false,
    "quota_max": 10000,
    "quota_remaining": 9999
}"#;
pub const PROFILE_EMPTY: &str = r#"{"items":[],"has_more":false}"#;

pub fn authenticator_config(scopes: ScopeSet) -> AuthenticatorConfig {
    AuthenticatorConfig {
        client_id: "1234".to_string(),
        client_secret: "s3cret".to_string(),
        app_key: "appkey((".to_string(),
        site: Site::default(),
        scopes,
        authentication_uri: AUTH_URI.to_string(),
        http_client: HttpClientConfig::default(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedCall {
    Post {
        url: String,
        form: Vec<(String, String)>,
    },
    Get {
        url: String,
    },
}

#[derive(Default)]
struct Script {
    calls: Vec<RecordedCall>,
    token: Option<HttpResponse>,
    profile: Option<HttpResponse>,
}

/// Transport that records every call and answers with scripted responses.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    script: Arc<Mutex<Script>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(self, status: StatusCode, body: &'static str) -> Self {
        self.script.lock().unwrap().token = Some(HttpResponse::new(status, body));
        self
    }

    pub fn with_profile(self, status: StatusCode, body: &'static str) -> Self {
        self.script.lock().unwrap().profile = Some(HttpResponse::new(status, body));
        self
    }

    /// A transport for the happy path: token `T1`, profile of Ada.
    pub fn succeeding() -> Self {
        Self::new()
            .with_token(StatusCode::OK, TOKEN_OK)
            .with_profile(StatusCode::OK, PROFILE_ADA)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn form_value(&self, key: &str) -> Option<String> {
        self.calls().into_iter().find_map(|call| match call {
            RecordedCall::Post { form, .. } => form
                .into_iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v),
            RecordedCall::Get { .. } => None,
        })
    }

    fn unscripted() -> HttpResponse {
        HttpResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "unscripted")
    }
}

impl HttpTransport for RecordingTransport {
    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<HttpResponse, TransportError> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(RecordedCall::Post {
            url: url.to_string(),
            form: form
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        Ok(script.token.clone().unwrap_or_else(Self::unscripted))
    }

    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(RecordedCall::Get {
            url: url.to_string(),
        });
        Ok(script.profile.clone().unwrap_or_else(Self::unscripted))
    }
}

/// Value of query parameter `name` in `url`.
pub fn query_param(url: &str, name: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}
