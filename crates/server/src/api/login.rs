//! HTTP surface of the authenticator.
//!
//! Mounts the handler table below the path of the configured authentication
//! URI:
//! - `{path}` - starts the login ([`AuthorizationRedirector`])
//! - `{path}/callback` - completes it ([`CallbackHandler`])

use crate::api::session::SessionCookie;
use crate::authenticator::descriptor::{self, HandlerKind};
use crate::authenticator::{
    AuthorizationRedirector, CallbackHandler, CallbackOutcome, CallbackRequest, Redirect,
    SubjectAttributes,
};
use crate::config::{AuthenticatorConfig, SessionConfig};
use crate::error::AuthError;
use crate::host::{AuthenticatorInformationProvider, HttpTransport, SessionRegistry};
use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::{MethodRouter, get},
};
use hyper::{
    StatusCode,
    header::{LOCATION, SET_COOKIE},
};
use serde::Serialize;
use std::sync::Arc;
use url::Url;

/// Shared state for the authenticator endpoints.
pub struct AuthenticatorState<T, I> {
    pub redirector: Arc<AuthorizationRedirector<I>>,
    pub callback: Arc<CallbackHandler<T, I>>,
    pub sessions: SessionRegistry,
    pub session_config: Arc<SessionConfig>,
    authentication_uri: Arc<str>,
}

// Manual impl: the handlers are behind `Arc`, so `T` and `I` need not be `Clone`.
impl<T, I> Clone for AuthenticatorState<T, I> {
    fn clone(&self) -> Self {
        Self {
            redirector: self.redirector.clone(),
            callback: self.callback.clone(),
            sessions: self.sessions.clone(),
            session_config: self.session_config.clone(),
            authentication_uri: self.authentication_uri.clone(),
        }
    }
}

impl<T, I> AuthenticatorState<T, I>
where
    T: HttpTransport,
    I: AuthenticatorInformationProvider + Clone,
{
    pub fn new(
        config: Arc<AuthenticatorConfig>,
        transport: T,
        info: I,
        sessions: SessionRegistry,
        session_config: Arc<SessionConfig>,
    ) -> Self {
        let authentication_uri = Arc::from(info.authentication_uri());
        Self {
            redirector: Arc::new(AuthorizationRedirector::new(config.clone(), info.clone())),
            callback: Arc::new(CallbackHandler::new(config, transport, info)),
            sessions,
            session_config,
            authentication_uri,
        }
    }
}

/// Successful login as reported to the browser. The access token stays server side.
#[derive(Debug, Serialize)]
pub struct AuthenticatedResponse {
    pub subject: String,
    pub attributes: SubjectAttributes,
}

/// Path the handlers are mounted under, without a trailing slash. Empty for the root.
pub fn mount_path(authentication_uri: &str) -> Result<String, AuthError> {
    let url = Url::parse(authentication_uri).map_err(|e| AuthError::InvalidRedirectUri {
        uri: authentication_uri.to_string(),
        reason: e.to_string(),
    })?;
    Ok(url.path().trim_end_matches('/').to_string())
}

/// Creates the router serving every entry of the handler table.
#[tracing::instrument(skip(state))]
pub fn router<T, I>(state: AuthenticatorState<T, I>) -> Result<Router, AuthError>
where
    T: HttpTransport + 'static,
    I: AuthenticatorInformationProvider + 'static,
{
    let base = mount_path(&state.authentication_uri)?;

    let mut router = Router::new();
    for (name, kind) in descriptor::handler_types() {
        let path = match kind.route_path().as_str() {
            "/" if base.is_empty() => "/".to_string(),
            "/" => base.clone(),
            route => format!("{base}{route}"),
        };
        let handler: MethodRouter<AuthenticatorState<T, I>> = match kind {
            HandlerKind::Authorization => get(index_get::<T, I>).post(index_post::<T, I>),
            HandlerKind::Callback => get(callback_get::<T, I>).post(callback_post::<T, I>),
        };
        tracing::debug!(handler = name, %path, "Mounting authenticator handler");
        router = router.route(&path, handler);
    }

    Ok(router.with_state(state))
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}

async fn index_get<T, I>(
    State(state): State<AuthenticatorState<T, I>>,
    cookie: SessionCookie,
) -> Response
where
    T: HttpTransport + 'static,
    I: AuthenticatorInformationProvider + 'static,
{
    let session = state.sessions.session(&cookie.id);
    match state.redirector.get(&session) {
        Ok(Redirect { location }) => {
            // Re-issued on every login start so Max-Age runs from the fresh state.
            let mut response = found(&location);
            if let Some(value) = cookie.set_cookie_header(&state.session_config) {
                response.headers_mut().insert(SET_COOKIE, value);
            }
            response
        }
        Err(e) => e.into_response(),
    }
}

async fn index_post<T, I>(State(state): State<AuthenticatorState<T, I>>) -> Response
where
    T: HttpTransport + 'static,
    I: AuthenticatorInformationProvider + 'static,
{
    match state.redirector.post() {
        Ok(Redirect { location }) => found(&location),
        Err(e) => e.into_response(),
    }
}

async fn callback_get<T, I>(
    State(state): State<AuthenticatorState<T, I>>,
    cookie: SessionCookie,
    Query(request): Query<CallbackRequest>,
) -> Response
where
    T: HttpTransport + 'static,
    I: AuthenticatorInformationProvider + 'static,
{
    let session = state.sessions.session(&cookie.id);
    match state.callback.get(request, &session).await {
        Ok(CallbackOutcome::Authenticated(result)) => {
            tracing::info!(subject = %result.subject, "User authenticated with StackExchange");
            Json(AuthenticatedResponse {
                subject: result.subject,
                attributes: result.subject_attributes,
            })
            .into_response()
        }
        Ok(CallbackOutcome::RestartLogin { location, reason }) => {
            tracing::info!(?reason, "Sending user back to the start of the login");
            found(&location)
        }
        Err(e) => e.into_response(),
    }
}

async fn callback_post<T, I>(State(state): State<AuthenticatorState<T, I>>) -> Response
where
    T: HttpTransport + 'static,
    I: AuthenticatorInformationProvider + 'static,
{
    match state.callback.post() {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_path_strips_trailing_slash() {
        assert_eq!(
            mount_path("https://login.example.com/authn/stackexchange/").unwrap(),
            "/authn/stackexchange"
        );
        assert_eq!(mount_path("https://login.example.com").unwrap(), "");
        assert_eq!(
            mount_path("http://localhost:8080/se?x=1").unwrap(),
            "/se"
        );
    }

    #[test]
    fn mount_path_rejects_relative_uri() {
        assert!(matches!(
            mount_path("/authn/stackexchange"),
            Err(AuthError::InvalidRedirectUri { .. })
        ));
    }
}
