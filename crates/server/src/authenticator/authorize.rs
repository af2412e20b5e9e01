use crate::authenticator::Redirect;
use crate::authenticator::provider::AUTHORIZATION_ENDPOINT;
use crate::authenticator::redirect_uri::build_redirect_uri;
use crate::config::AuthenticatorConfig;
use crate::error::AuthError;
use crate::host::{AuthenticatorInformationProvider, SessionStore};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Session key of the anti-forgery token shared with [`CallbackHandler`](super::CallbackHandler).
pub const STATE_SESSION_KEY: &str = "state";

/// Starts a login by sending the browser to StackExchange's authorization endpoint.
pub struct AuthorizationRedirector<I> {
    config: Arc<AuthenticatorConfig>,
    info: I,
}

impl<I: AuthenticatorInformationProvider> AuthorizationRedirector<I> {
    pub fn new(config: Arc<AuthenticatorConfig>, info: I) -> Self {
        Self { config, info }
    }

    /// Build the authorization request and remember its `state` in the session.
    ///
    /// The state is written before the redirect is returned, so a fast
    /// callback always finds it.
    #[tracing::instrument(name = "authorization_redirect", skip_all)]
    pub fn get(&self, session: &impl SessionStore) -> Result<Redirect, AuthError> {
        info!("GET request received for StackExchange authentication");

        let redirect_uri = build_redirect_uri(self.info.authentication_uri())?;
        let state = uuid::Uuid::new_v4().to_string();

        let mut url = Url::parse(AUTHORIZATION_ENDPOINT).map_err(|e| {
            AuthError::InvalidRedirectUri {
                uri: AUTHORIZATION_ENDPOINT.to_string(),
                reason: e.to_string(),
            }
        })?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client_id", &self.config.client_id)
                .append_pair("redirect_uri", &redirect_uri)
                .append_pair("state", &state)
                .append_pair("response_type", "code");
            if !self.config.scopes.is_empty() {
                query.append_pair("scope", &self.config.scopes.to_query_value());
            }
        }

        session.put(STATE_SESSION_KEY, state);

        debug!(
            endpoint = AUTHORIZATION_ENDPOINT,
            redirect_uri = %redirect_uri,
            scope = %self.config.scopes.to_query_value(),
            "Redirecting to StackExchange"
        );
        Ok(Redirect::to(url.into()))
    }

    pub fn post(&self) -> Result<Redirect, AuthError> {
        Err(AuthError::MethodNotAllowed)
    }
}
