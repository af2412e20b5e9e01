//! Session cookie handling for the bundled host.

use crate::api::login::AuthenticatorState;
use crate::config::SessionConfig;
use crate::host::{AuthenticatorInformationProvider, HttpTransport, SessionRegistry};
use axum::{extract::FromRequestParts, http::request::Parts};
use hyper::header::{COOKIE, HeaderValue};
use std::convert::Infallible;

/// The browser's session id, taken from the session cookie or freshly minted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionCookie {
    pub id: String,
    /// True when the browser did not present a usable cookie.
    pub is_new: bool,
}

impl SessionCookie {
    /// `Set-Cookie` value binding this session to the browser.
    pub fn set_cookie_header(&self, config: &SessionConfig) -> Option<HeaderValue> {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            config.cookie_name, self.id, config.max_age_secs
        );
        if config.secure_cookie {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie).ok()
    }
}

/// Find `name` among the `Cookie` headers. Empty values are ignored.
pub fn find_cookie(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

impl<T, I> FromRequestParts<AuthenticatorState<T, I>> for SessionCookie
where
    T: HttpTransport,
    I: AuthenticatorInformationProvider,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AuthenticatorState<T, I>,
    ) -> Result<Self, Self::Rejection> {
        Ok(match find_cookie(parts, &state.session_config.cookie_name) {
            Some(id) => SessionCookie { id, is_new: false },
            None => SessionCookie {
                id: SessionRegistry::new_session_id(),
                is_new: true,
            },
        })
    }
}
